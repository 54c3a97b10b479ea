//! Text styles and measured labels.
//!
//! - [`TextDefinition`] - font, size, color and optional label background
//! - [`Text`] - a string paired with a definition; measurable and drawable
//!
//! Measurement uses the Helvetica metric tables in [`crate::metrics`], so a
//! label sized here fits exactly when drawn in the PDF with the same font.
//!
//! ```
//! # use proofpass_core::draw::{Text, TextDefinition};
//! let style = TextDefinition::new();
//! let text = Text::new(&style, "Redis");
//! assert!(text.calculate_size().width() > 0.0);
//! ```

use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Insets, Point, Size},
    metrics::Font,
};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Visual style of a text element.
///
/// | Property | Default |
/// |----------|---------|
/// | Font | Helvetica |
/// | Font size | `10` |
/// | Color | black |
/// | Background color | `None` |
/// | Padding | zero |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font: Font,
    font_size: f32,
    color: Color,
    background_color: Option<Color>,
    padding: Insets,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the color of the rectangle drawn behind the text; `None` draws
    /// no background.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.background_color = color;
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
    }

    /// Distance between two consecutive baselines.
    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font: Font::Helvetica,
            font_size: 10.0,
            color: Color::default(),
            background_color: None,
            padding: Insets::default(),
        }
    }
}

/// A string paired with the [`TextDefinition`] it is drawn with.
///
/// Content may span several lines separated by `\n`; lines are centered on
/// the drawing position.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn definition(&self) -> &'a TextDefinition {
        self.definition
    }

    /// Returns the lines of the content; empty content has no lines.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.content.lines()
    }

    /// Size of the text including padding.
    pub fn calculate_size(&self) -> Size {
        self.calculate_size_without_padding()
            .add_padding(self.definition.padding())
    }

    fn calculate_size_without_padding(&self) -> Size {
        let font = self.definition.font();
        let size = self.definition.font_size();
        let (width, count) = self.lines().fold((0.0_f32, 0_usize), |(width, count), line| {
            (width.max(font.text_width(line, size)), count + 1)
        });
        Size::new(width, count as f32 * self.definition.line_height())
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let definition = self.definition;
        let line_height = definition.line_height();
        let inner = self.calculate_size_without_padding();

        if let Some(background) = definition.background_color() {
            let bounds = position.to_bounds(self.calculate_size());
            let rect = svg_element::Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha())
                .set("rx", 2.0);
            output.add_to_layer(RenderLayer::Label, Box::new(rect));
        }

        let mut text = svg_element::Text::new("")
            .set("x", position.x())
            .set("text-anchor", "middle")
            .set("font-family", "Helvetica, Arial, sans-serif")
            .set("font-weight", definition.font().svg_weight())
            .set("font-size", definition.font_size())
            .set("fill", definition.color().to_string());

        // First baseline sits at the middle of the first line box.
        let top = position.y() - inner.height() / 2.0;
        for (index, line) in self.lines().enumerate() {
            let baseline = top + line_height * (index as f32 + 0.5) + definition.font_size() * 0.35;
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("y", baseline)
                .add(SvgText::new(line));
            text = text.add(tspan);
        }

        output.add_to_layer(RenderLayer::Text, Box::new(text));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_defaults() {
        let def = TextDefinition::default();
        assert_eq!(def.font(), Font::Helvetica);
        assert_approx_eq!(f32, def.font_size(), 10.0);
        assert_eq!(def.background_color(), None);
        assert_approx_eq!(f32, def.line_height(), 12.0, epsilon = 0.001);
    }

    #[test]
    fn test_single_line_size() {
        let def = TextDefinition::new();
        let text = Text::new(&def, "API");
        let size = text.calculate_size();
        assert_approx_eq!(
            f32,
            size.width(),
            Font::Helvetica.text_width("API", 10.0),
            epsilon = 0.001
        );
        assert_approx_eq!(f32, size.height(), 12.0, epsilon = 0.001);
    }

    #[test]
    fn test_multiline_size_uses_widest_line() {
        let def = TextDefinition::new();
        let text = Text::new(&def, "VC\nToolkit");
        let size = text.calculate_size();
        assert_approx_eq!(
            f32,
            size.width(),
            Font::Helvetica.text_width("Toolkit", 10.0),
            epsilon = 0.001
        );
        assert_approx_eq!(f32, size.height(), 24.0, epsilon = 0.001);
    }

    #[test]
    fn test_padding_is_included() {
        let mut def = TextDefinition::new();
        def.set_padding(Insets::uniform(3.0));
        let text = Text::new(&def, "");
        assert_eq!(text.calculate_size(), Size::new(6.0, 6.0));
    }

    #[test]
    fn test_bold_text_is_wider() {
        let mut bold = TextDefinition::new();
        bold.set_font(Font::HelveticaBold);
        let regular = TextDefinition::new();
        assert!(
            Text::new(&bold, "PostgreSQL").size().width()
                > Text::new(&regular, "PostgreSQL").size().width()
        );
    }

    #[test]
    fn test_render_emits_background_only_when_set() {
        let mut def = TextDefinition::new();
        let plain = Text::new(&def, "txHash").render_to_layers(Point::default());
        assert_eq!(plain.render().len(), 1);

        def.set_background_color(Some(Color::new("white").unwrap()));
        let labeled = Text::new(&def, "txHash").render_to_layers(Point::default());
        assert_eq!(labeled.render().len(), 2);
    }
}
