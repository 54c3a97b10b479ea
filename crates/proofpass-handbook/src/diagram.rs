//! Diagram descriptions, graphs and automatic layout.
//!
//! Diagrams are described as static data ([`DiagramSpec`]): labeled nodes
//! with a shape and a fill color, and directed, optionally labeled edges.
//! [`DiagramGraph`] validates a description and assigns nodes to layers;
//! [`LayoutEngine`] turns the layers into positioned shapes and clipped edges
//! that the SVG and PDF exporters draw.
//!
//! # Pipeline
//!
//! ```text
//! DiagramSpec
//!     ↓ DiagramGraph::from_spec (validation, layer assignment)
//! DiagramGraph
//!     ↓ LayoutEngine::calculate (sizing, positioning, edge clipping)
//! DiagramLayout
//!     ↓ export::svg / export::pdf
//! ```

mod graph;
mod layout;

pub use graph::DiagramGraph;
pub use layout::{
    ARROW_HALF_WIDTH, ARROW_LENGTH, DiagramLayout, LayoutEngine, PositionedEdge, PositionedNode,
};

use proofpass_core::draw::ShapeKind;

/// Direction in which successive layers are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Layers stacked from top to bottom; nodes of a layer side by side.
    #[default]
    TopToBottom,
    /// Layers placed from left to right; nodes of a layer stacked vertically.
    LeftToRight,
}

/// A node of a diagram description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec<'a> {
    /// Identifier referenced by edges; unique within a diagram.
    pub id: &'a str,
    pub label: &'a str,
    pub kind: ShapeKind,
    /// Fill color as a CSS color string.
    pub fill: &'a str,
}

impl<'a> NodeSpec<'a> {
    pub const fn new(id: &'a str, label: &'a str, kind: ShapeKind, fill: &'a str) -> Self {
        Self {
            id,
            label,
            kind,
            fill,
        }
    }
}

/// A directed edge of a diagram description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSpec<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub label: Option<&'a str>,
    /// Draw the edge with a dashed stroke (used for replies).
    pub dashed: bool,
}

impl<'a> EdgeSpec<'a> {
    /// Creates a solid, unlabeled edge.
    pub const fn new(source: &'a str, target: &'a str) -> Self {
        Self {
            source,
            target,
            label: None,
            dashed: false,
        }
    }

    pub const fn with_label(self, label: &'a str) -> Self {
        Self {
            label: Some(label),
            ..self
        }
    }

    pub const fn dashed(self) -> Self {
        Self {
            dashed: true,
            ..self
        }
    }
}

/// A complete diagram description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramSpec<'a> {
    /// File stem of the intermediate image written next to the PDF.
    pub name: &'a str,
    pub direction: Direction,
    pub nodes: &'a [NodeSpec<'a>],
    pub edges: &'a [EdgeSpec<'a>],
}

impl DiagramSpec<'_> {
    /// File name of the intermediate PNG image.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_builders() {
        let edge = EdgeSpec::new("ST", "API").with_label("txHash").dashed();
        assert_eq!(edge.source, "ST");
        assert_eq!(edge.target, "API");
        assert_eq!(edge.label, Some("txHash"));
        assert!(edge.dashed);
        assert!(!EdgeSpec::new("a", "b").dashed);
    }

    #[test]
    fn test_file_name() {
        let spec = DiagramSpec {
            name: "sequence_flow",
            direction: Direction::LeftToRight,
            nodes: &[],
            edges: &[],
        };
        assert_eq!(spec.file_name(), "sequence_flow.png");
    }
}
