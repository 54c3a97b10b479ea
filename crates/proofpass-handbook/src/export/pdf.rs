//! PDF rendering of documents.
//!
//! Pages are A4 with 2 cm margins. Text is set in the built-in Helvetica
//! fonts with WinAnsi encoding and wrapped with the same metrics the fonts
//! are drawn with. Diagrams are drawn as vector graphics, scaled to fit the
//! box their block asks for.
//!
//! The writer emits no timestamps or random identifiers, so rendering the
//! same document twice yields identical bytes.

use encoding_rs::WINDOWS_1252;
use log::{debug, info};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use proofpass_core::{
    color::Color,
    draw::{Path, Segment, StrokeDefinition, Text, TextDefinition},
    geometry::{Point, Size},
    metrics::Font,
};

use crate::{
    diagram::DiagramLayout,
    document::{Block, Document, Span, parse_inline},
    error::HandbookError,
};

/// Points per centimeter.
pub const CM: f32 = 72.0 / 2.54;

/// A4 portrait, in points.
pub const PAGE_SIZE: Size = Size::new(595.276, 841.89);

/// Margin on every side of the page.
pub const MARGIN: f32 = 2.0 * CM;

const CONTENT_WIDTH: f32 = 595.276 - 2.0 * MARGIN;
const CONTENT_HEIGHT: f32 = 841.89 - 2.0 * MARGIN;

/// Vertical space after a diagram.
const DIAGRAM_SPACE_AFTER: f32 = 12.0;

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: Font,
    size: f32,
    leading: f32,
    space_before: f32,
    space_after: f32,
    centered: bool,
}

const TITLE: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size: 20.0,
    leading: 24.0,
    space_before: 0.0,
    space_after: 20.0,
    centered: true,
};

const HEADING: TextStyle = TextStyle {
    font: Font::HelveticaBold,
    size: 14.0,
    leading: 18.0,
    space_before: 12.0,
    space_after: 10.0,
    centered: false,
};

const BODY: TextStyle = TextStyle {
    font: Font::Helvetica,
    size: 11.0,
    leading: 15.0,
    space_before: 0.0,
    space_after: 6.0,
    centered: false,
};

/// A rendered PDF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Renders `document` to PDF.
///
/// Every diagram block is drawn from the layout in `layouts` whose name
/// matches the diagram name.
///
/// # Errors
///
/// Returns [`HandbookError::Layout`] if a diagram block has no layout.
pub fn render(
    document: &Document<'_>,
    layouts: &[DiagramLayout<'_>],
) -> Result<RenderedPdf, HandbookError> {
    let mut paginator = Paginator::new();

    for block in document.blocks() {
        match *block {
            Block::Title(text) => paginator.text_block(text, &TITLE),
            Block::Heading(text) => paginator.text_block(text, &HEADING),
            Block::Paragraph(text) => paginator.text_block(text, &BODY),
            Block::Diagram {
                spec,
                width_cm,
                height_cm,
            } => {
                let layout = layouts
                    .iter()
                    .find(|layout| layout.name() == spec.name)
                    .ok_or_else(|| HandbookError::layout(spec.name, "diagram was not laid out"))?;
                paginator.diagram(layout, Size::new(width_cm * CM, height_cm * CM));
            }
            Block::Spacer(height) => paginator.spacer(height),
            Block::PageBreak => paginator.page_break(),
        }
    }

    let pages = paginator.finish();
    let page_count = pages.len();
    let bytes = write_pdf(document.title(), pages);

    info!(pages = page_count, bytes = bytes.len(); "PDF rendered");
    Ok(RenderedPdf { bytes, page_count })
}

fn write_pdf(title: &str, pages: Vec<Content>) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();
    let info_id = alloc.bump();
    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (&(page_id, content_id), content) in page_ids.iter().zip(pages) {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_SIZE.width(), PAGE_SIZE.height()));
        page.parent(tree_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(resource_name(Font::Helvetica), regular_id)
            .pair(resource_name(Font::HelveticaBold), bold_id);
        page.finish();

        pdf.stream(content_id, &content.finish());
    }

    for (font_id, font) in [(regular_id, Font::Helvetica), (bold_id, Font::HelveticaBold)] {
        pdf.type1_font(font_id)
            .base_font(Name(font.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr("proofpass-handbook"));

    pdf.finish()
}

fn resource_name(font: Font) -> Name<'static> {
    match font {
        Font::Helvetica => Name(b"F1"),
        Font::HelveticaBold => Name(b"F2"),
    }
}

/// Encodes `text` as WinAnsi (Windows-1252); characters outside the
/// encoding become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut buffer = [0_u8; 4];
    for ch in text.chars() {
        let (encoded, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut buffer));
        if unmappable {
            bytes.push(b'?');
        } else {
            bytes.extend_from_slice(&encoded);
        }
    }
    bytes
}

/// Consumes blocks top to bottom, starting new pages as content overflows.
struct Paginator {
    pages: Vec<Content>,
    content: Content,
    /// Height already used on the current page, measured from the top margin.
    cursor: f32,
    empty: bool,
}

impl Paginator {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            content: Content::new(),
            cursor: 0.0,
            empty: true,
        }
    }

    fn new_page(&mut self) {
        let finished = std::mem::replace(&mut self.content, Content::new());
        self.pages.push(finished);
        self.cursor = 0.0;
        self.empty = true;
        debug!(page = self.pages.len() + 1; "Starting page");
    }

    fn page_break(&mut self) {
        if !self.empty {
            self.new_page();
        }
    }

    /// Starts a new page unless `height` still fits on the current one.
    /// An empty page accepts anything.
    fn reserve(&mut self, height: f32) {
        if !self.empty && self.cursor + height > CONTENT_HEIGHT {
            self.new_page();
        }
    }

    /// Y coordinate of the current position in PDF space.
    fn top(&self) -> f32 {
        PAGE_SIZE.height() - MARGIN - self.cursor
    }

    fn spacer(&mut self, height: f32) {
        if self.cursor + height > CONTENT_HEIGHT {
            self.page_break();
        } else {
            self.cursor += height;
        }
    }

    fn text_block(&mut self, text: &str, style: &TextStyle) {
        if !self.empty {
            self.cursor += style.space_before;
        }

        for line in wrap(&parse_inline(text), style, CONTENT_WIDTH) {
            self.reserve(style.leading);
            let x = if style.centered {
                MARGIN + (CONTENT_WIDTH - line.width) / 2.0
            } else {
                MARGIN
            };
            let baseline = self.top() - style.size;
            let origin = Point::new(x, baseline);
            draw_line(&mut self.content, &line, style.size, origin);
            self.cursor += style.leading;
            self.empty = false;
        }

        self.cursor += style.space_after;
    }

    fn diagram(&mut self, layout: &DiagramLayout<'_>, slot: Size) {
        let slot = Size::new(
            slot.width().min(CONTENT_WIDTH),
            slot.height().min(CONTENT_HEIGHT),
        );
        let scale = layout.size().fit_factor(slot);
        let drawn = layout.size().scale(scale);

        self.reserve(drawn.height());
        let origin = Point::new(MARGIN + (CONTENT_WIDTH - drawn.width()) / 2.0, self.top());
        DiagramPainter {
            content: &mut self.content,
            origin,
            scale,
        }
        .paint(layout);

        debug!(diagram = layout.name(), scale = scale; "Diagram placed");
        self.cursor += drawn.height() + DIAGRAM_SPACE_AFTER;
        self.empty = false;
    }

    /// Returns the finished pages; a document always has at least one page.
    fn finish(mut self) -> Vec<Content> {
        if !self.empty || self.pages.is_empty() {
            self.pages.push(self.content);
        }
        self.pages
    }
}

/// A piece of text that is not separated from its neighbor by a space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Piece<'a> {
    text: &'a str,
    font: Font,
}

/// A run of pieces that must stay together on one line.
#[derive(Debug, Clone, PartialEq)]
struct Word<'a> {
    pieces: Vec<Piece<'a>>,
    width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Line<'a> {
    words: Vec<Word<'a>>,
    width: f32,
}

/// Splits hard lines of spans into words. A bold run glued to regular text
/// (as in `**Auth**:`) stays one word.
fn words<'a>(spans: &[Span<'a>], style: &TextStyle) -> Vec<Word<'a>> {
    let mut words: Vec<Word<'a>> = Vec::new();
    let mut at_boundary = true;

    for span in spans {
        let font = if span.bold {
            Font::HelveticaBold
        } else {
            style.font
        };
        let mut rest = span.text;
        loop {
            let trimmed = rest.trim_start_matches(char::is_whitespace);
            if trimmed.len() != rest.len() {
                at_boundary = true;
            }
            if trimmed.is_empty() {
                break;
            }
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            let (text, tail) = trimmed.split_at(end);
            let piece = Piece { text, font };
            let width = font.text_width(text, style.size);

            match words.last_mut() {
                Some(word) if !at_boundary => {
                    word.pieces.push(piece);
                    word.width += width;
                }
                _ => words.push(Word {
                    pieces: vec![piece],
                    width,
                }),
            }
            at_boundary = false;
            rest = tail;
        }
    }

    words
}

/// Greedy line breaking. Words wider than `max_width` get a line of their own.
fn wrap<'a>(hard_lines: &[Vec<Span<'a>>], style: &TextStyle, max_width: f32) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for spans in hard_lines {
        let mut line = Line::default();
        for word in words(spans, style) {
            let space = word
                .pieces
                .first()
                .map(|piece| piece.font.text_width(" ", style.size))
                .unwrap_or_default();
            if !line.words.is_empty() && line.width + space + word.width > max_width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.words.is_empty() {
                line.width += space;
            }
            line.width += word.width;
            line.words.push(word);
        }
        lines.push(line);
    }

    lines
}

fn draw_line(content: &mut Content, line: &Line<'_>, size: f32, position: Point) {
    if line.words.is_empty() {
        return;
    }

    content.begin_text();
    content.set_fill_rgb(0.0, 0.0, 0.0);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, position.x(), position.y()]);

    let mut current: Option<Font> = None;
    for (index, word) in line.words.iter().enumerate() {
        for (piece_index, piece) in word.pieces.iter().enumerate() {
            if current != Some(piece.font) {
                content.set_font(resource_name(piece.font), size);
                current = Some(piece.font);
            }
            let text = if index > 0 && piece_index == 0 {
                format!(" {}", piece.text)
            } else {
                piece.text.to_string()
            };
            content.show(Str(&encode_win_ansi(&text)));
        }
    }

    content.end_text();
}

/// Draws a diagram layout with its top-left corner at `origin` (PDF space).
struct DiagramPainter<'c> {
    content: &'c mut Content,
    origin: Point,
    scale: f32,
}

impl DiagramPainter<'_> {
    /// Maps a diagram point (Y down) to PDF space (Y up).
    fn map(&self, point: Point) -> (f32, f32) {
        (
            self.origin.x() + point.x() * self.scale,
            self.origin.y() - point.y() * self.scale,
        )
    }

    fn paint(&mut self, layout: &DiagramLayout<'_>) {
        self.content.save_state();

        if let Some(background) = layout.background() {
            let size = layout.size().scale(self.scale);
            set_fill(self.content, background);
            self.content.rect(
                self.origin.x(),
                self.origin.y() - size.height(),
                size.width(),
                size.height(),
            );
            self.content.fill_nonzero();
        }

        for edge in layout.edges() {
            self.apply_stroke(edge.stroke());
            let (x, y) = self.map(edge.start());
            self.content.move_to(x, y);
            let (x, y) = self.map(edge.shaft_end());
            self.content.line_to(x, y);
            self.content.stroke();

            set_fill(self.content, edge.stroke().color());
            self.trace(&edge.arrowhead());
            self.content.fill_nonzero();
        }

        for node in layout.nodes() {
            let outline = node.outline();
            self.apply_stroke(layout.node_stroke());
            set_fill(self.content, node.fill());
            self.trace(&outline.body);
            self.content.fill_nonzero_and_stroke();
            for detail in &outline.details {
                self.trace(detail);
                self.content.stroke();
            }
            self.label(layout.node_text(), node.label(), node.center());
        }

        for edge in layout.edges() {
            if let Some((label, center)) = edge.label() {
                self.label(layout.edge_text(), label, center);
            }
        }

        self.content.restore_state();
    }

    fn apply_stroke(&mut self, stroke: &StrokeDefinition) {
        let [r, g, b] = stroke.color().to_rgb();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(stroke.width() * self.scale);
        let pattern: Vec<f32> = stroke
            .dash_pattern()
            .map(|pattern| pattern.iter().map(|length| length * self.scale).collect())
            .unwrap_or_default();
        self.content.set_dash_pattern(pattern, 0.0);
    }

    fn trace(&mut self, path: &Path) {
        for segment in path.segments() {
            match *segment {
                Segment::MoveTo(point) => {
                    let (x, y) = self.map(point);
                    self.content.move_to(x, y);
                }
                Segment::LineTo(point) => {
                    let (x, y) = self.map(point);
                    self.content.line_to(x, y);
                }
                Segment::CubicTo(ctrl1, ctrl2, end) => {
                    let (x1, y1) = self.map(ctrl1);
                    let (x2, y2) = self.map(ctrl2);
                    let (x3, y3) = self.map(end);
                    self.content.cubic_to(x1, y1, x2, y2, x3, y3);
                }
                Segment::Close => {
                    self.content.close_path();
                }
            }
        }
    }

    /// Draws centered, possibly multi-line label text like the SVG backend.
    fn label(&mut self, definition: &TextDefinition, label: &str, center: Point) {
        let text = Text::new(definition, label);

        if let Some(background) = definition.background_color() {
            let bounds = center.to_bounds(text.calculate_size());
            let (x, y) = self.map(Point::new(bounds.min_x(), bounds.max_y()));
            set_fill(self.content, background);
            self.content.rect(
                x,
                y,
                bounds.width() * self.scale,
                bounds.height() * self.scale,
            );
            self.content.fill_nonzero();
        }

        let font = definition.font();
        let size = definition.font_size();
        let line_height = definition.line_height();
        let line_count = text.lines().count();
        let top = center.y() - line_count as f32 * line_height / 2.0;

        set_fill(self.content, definition.color());
        self.content.begin_text();
        self.content.set_font(resource_name(font), size * self.scale);
        for (index, line) in text.lines().enumerate() {
            let width = font.text_width(line, size);
            let baseline = top + line_height * (index as f32 + 0.5) + size * 0.35;
            let (x, y) = self.map(Point::new(center.x() - width / 2.0, baseline));
            self.content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
            self.content.show(Str(&encode_win_ansi(line)));
        }
        self.content.end_text();
    }
}

fn set_fill(content: &mut Content, color: Color) {
    let [r, g, b] = color.to_rgb();
    content.set_fill_rgb(r, g, b);
}
