//! Document model consumed by the PDF paginator.
//!
//! A [`Document`] is an ordered list of [`Block`]s. Insertion order is
//! rendering order and a document is never modified once rendering starts.
//!
//! Paragraph text supports a tiny inline markup: `**bold**` runs and `\n`
//! hard line breaks. Everything else is laid out as running text and wrapped
//! to the page width.

use crate::diagram::DiagramSpec;

/// A unit of document content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Block<'a> {
    /// Centered document title.
    Title(&'a str),
    Heading(&'a str),
    Paragraph(&'a str),
    /// A diagram laid out automatically and scaled into a box of the given
    /// size in centimeters.
    Diagram {
        spec: &'a DiagramSpec<'a>,
        width_cm: f32,
        height_cm: f32,
    },
    /// Vertical space in points.
    Spacer(f32),
    /// Starts a new page unless the current one is still empty.
    PageBreak,
}

/// An ordered sequence of [`Block`]s with a title for the PDF metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    title: &'a str,
    blocks: Vec<Block<'a>>,
}

impl<'a> Document<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            blocks: Vec::new(),
        }
    }

    /// Appends a block at the end of the document.
    pub fn push(&mut self, block: Block<'a>) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn title(&self) -> &'a str {
        self.title
    }

    pub fn blocks(&self) -> &[Block<'a>] {
        &self.blocks
    }

    /// Returns the diagrams of the document in rendering order.
    pub fn diagrams(&self) -> impl Iterator<Item = &'a DiagramSpec<'a>> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Diagram { spec, .. } => Some(*spec),
            _ => None,
        })
    }
}

impl<'a> FromIterator<Block<'a>> for Document<'a> {
    fn from_iter<T: IntoIterator<Item = Block<'a>>>(iter: T) -> Self {
        Self {
            title: "",
            blocks: iter.into_iter().collect(),
        }
    }
}

/// A run of paragraph text set in a single weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub bold: bool,
}

/// Splits paragraph text into hard lines of [`Span`]s.
///
/// `**` toggles bold; the toggle state carries across line breaks, and an
/// unmatched marker leaves the remainder of the paragraph bold. Empty runs
/// are dropped.
///
/// # Examples
///
/// ```
/// # use proofpass_handbook::document::{parse_inline, Span};
/// let lines = parse_inline("**Auth**: JWT\nRedis");
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0][0], Span { text: "Auth", bold: true });
/// assert_eq!(lines[0][1], Span { text: ": JWT", bold: false });
/// ```
pub fn parse_inline(text: &str) -> Vec<Vec<Span<'_>>> {
    let mut bold = false;
    text.split('\n')
        .map(|line| {
            let mut spans = Vec::new();
            for (index, piece) in line.split("**").enumerate() {
                if index > 0 {
                    bold = !bold;
                }
                if !piece.is_empty() {
                    spans.push(Span { text: piece, bold });
                }
            }
            spans
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut document = Document::new("Handbook");
        document
            .push(Block::Title("Title"))
            .push(Block::PageBreak)
            .push(Block::Paragraph("Body"));

        assert_eq!(document.title(), "Handbook");
        assert_eq!(
            document.blocks(),
            &[
                Block::Title("Title"),
                Block::PageBreak,
                Block::Paragraph("Body")
            ]
        );
        assert_eq!(document.diagrams().count(), 0);
    }

    #[test]
    fn test_plain_text_is_one_span() {
        let lines = parse_inline("Rate limiting con Redis.");
        assert_eq!(
            lines,
            vec![vec![Span {
                text: "Rate limiting con Redis.",
                bold: false
            }]]
        );
    }

    #[test]
    fn test_bold_runs() {
        let lines = parse_inline("a **b** c");
        assert_eq!(
            lines[0],
            vec![
                Span {
                    text: "a ",
                    bold: false
                },
                Span {
                    text: "b",
                    bold: true
                },
                Span {
                    text: " c",
                    bold: false
                },
            ]
        );
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let lines = parse_inline("one\n\ntwo");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
    }

    #[test]
    fn test_unmatched_marker_keeps_bold() {
        let lines = parse_inline("**open\nstill bold");
        assert!(lines[0][0].bold);
        assert!(lines[1][0].bold);
    }
}
