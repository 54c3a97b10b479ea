//! Z-ordered collection of SVG nodes.
//!
//! Drawables emit their SVG elements into a [`LayeredOutput`], tagging each
//! element with a [`RenderLayer`]. Rendering sorts the elements by layer so
//! edges sit under nodes and label backgrounds sit under the label text,
//! regardless of the order in which the elements were produced.
//!
//! ```
//! # use proofpass_core::draw::{LayeredOutput, RenderLayer};
//! # use svg::node::element::{Rectangle, Text};
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Text, Box::new(Text::new("API")));
//! output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
//!
//! // Content is emitted before Text.
//! assert_eq!(output.render().len(), 2);
//! ```

use svg::node::element as svg_element;

/// Boxed SVG node.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background.
    Background,
    /// Edges and their arrowheads.
    Arrow,
    /// Node shapes.
    Content,
    /// Rectangles behind label text.
    Label,
    /// Text.
    Text,
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Arrow => "arrow",
            Self::Content => "content",
            Self::Label => "label",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by [`RenderLayer`].
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node` to `layer`. Nodes keep their insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Moves every node of `other` into this output.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders each non-empty layer as a `<g data-layer="...">` group,
    /// bottom layer first.
    pub fn render(mut self) -> Vec<SvgNode> {
        // Stable sort keeps insertion order inside a layer.
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result: Vec<SvgNode> = Vec::new();
        let mut current: Option<(RenderLayer, svg_element::Group)> = None;

        for (layer, node) in self.items {
            current = match current {
                Some((current_layer, group)) if current_layer == layer => {
                    Some((current_layer, group.add(node)))
                }
                previous => {
                    if let Some((_, group)) = previous {
                        result.push(Box::new(group));
                    }
                    let group = svg_element::Group::new().set("data-layer", layer.name());
                    Some((layer, group.add(node)))
                }
            };
        }

        if let Some((_, group)) = current {
            result.push(Box::new(group));
        }
        result
    }
}
