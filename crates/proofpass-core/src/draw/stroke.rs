//! Stroke definitions for outlines and edges.
//!
//! A [`StrokeDefinition`] carries the color, width and dash style of a line.
//! The SVG exporter applies it with [`apply_stroke!`](crate::apply_stroke!);
//! the PDF exporter reads the same values through [`StrokeDefinition::dash_pattern`]
//! and the color accessors, so both backends draw identical lines.
//!
//! ```
//! use proofpass_core::color::Color;
//! use proofpass_core::draw::StrokeDefinition;
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::solid(Color::new("#455A64").unwrap(), 1.2);
//! let path = svg_element::Path::new().set("d", "M0,0 L10,10");
//! let path = proofpass_core::apply_stroke!(path, &stroke);
//! ```

use crate::color::Color;

/// Dash style of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// 4 units on, 3 units off.
    Dashed,
}

impl StrokeStyle {
    /// Returns the on/off lengths of the dash pattern, or `None` for solid lines.
    pub fn dash_pattern(self) -> Option<[f32; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some([4.0, 3.0]),
        }
    }

    /// Returns the SVG `stroke-dasharray` value, or `None` for solid lines.
    pub fn to_svg_value(self) -> Option<String> {
        self.dash_pattern().map(|[on, off]| format!("{on},{off}"))
    }
}

/// Color, width and dash style of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Dashed,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Returns the dash pattern scaled by the stroke width.
    ///
    /// Thicker lines get proportionally longer dashes so the pattern stays
    /// legible when a diagram is scaled down onto a page.
    pub fn dash_pattern(&self) -> Option<[f32; 2]> {
        let scale = self.width.max(1.0);
        self.style
            .dash_pattern()
            .map(|[on, off]| [on * scale, off * scale])
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::solid(Color::default(), 1.0)
    }
}

/// Apply the stroke color, opacity, width and dash pattern to an SVG element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &$crate::draw::StrokeDefinition = $stroke;
        let mut elem = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width())
            .set("stroke-linejoin", "round");

        if let Some([on, off]) = stroke.dash_pattern() {
            elem = elem.set("stroke-dasharray", format!("{on},{off}"));
        }

        elem
    }};
}
