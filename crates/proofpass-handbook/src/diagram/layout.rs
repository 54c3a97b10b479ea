//! Layered layout of diagram graphs.
//!
//! The engine places the layers computed by [`DiagramGraph::layers`] one
//! after another along the main axis (downwards for
//! [`Direction::TopToBottom`], rightwards for [`Direction::LeftToRight`]) and
//! centers the nodes of each layer on the cross axis. Gaps between layers
//! grow to make room for edge labels. Edges are clipped at node outlines, and
//! pairs of antiparallel edges are pushed apart so both remain visible.

use std::collections::HashMap;

use log::{debug, info};
use petgraph::graph::NodeIndex;

use proofpass_core::{
    color::Color,
    draw::{Path, ShapeKind, ShapeOutline, StrokeDefinition, Text, TextDefinition},
    geometry::{Bounds, Insets, Point, Size},
};

use super::{DiagramGraph, Direction, EdgeSpec, NodeSpec};
use crate::error::HandbookError;

/// Length of an arrowhead along the edge.
pub const ARROW_LENGTH: f32 = 8.0;
/// Half of the arrowhead base width.
pub const ARROW_HALF_WIDTH: f32 = 3.5;

const NODE_TEXT_COLOR: &str = "#212121";
const EDGE_COLOR: &str = "#455A64";

/// Layout engine with the spacing rules of the handbook diagrams.
///
/// ```
/// # use proofpass_handbook::diagram::{DiagramGraph, DiagramSpec, Direction, EdgeSpec, LayoutEngine, NodeSpec};
/// # use proofpass_core::draw::ShapeKind;
/// let spec = DiagramSpec {
///     name: "demo",
///     direction: Direction::TopToBottom,
///     nodes: &[
///         NodeSpec::new("api", "API", ShapeKind::Box, "#C8E6C9"),
///         NodeSpec::new("db", "PostgreSQL", ShapeKind::Cylinder, "#BBDEFB"),
///     ],
///     edges: &[EdgeSpec::new("api", "db")],
/// };
/// let graph = DiagramGraph::from_spec(&spec).unwrap();
/// let layout = LayoutEngine::new().calculate(&graph).unwrap();
/// assert_eq!(layout.nodes().len(), 2);
/// assert!(layout.nodes()[0].center().y() < layout.nodes()[1].center().y());
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    node_padding: Insets,
    node_gap: f32,
    layer_gap: f32,
    label_clearance: f32,
    antiparallel_offset: f32,
    margin: f32,
    background: Option<Color>,
    node_text: TextDefinition,
    edge_text: TextDefinition,
    stroke_color: Color,
}

impl LayoutEngine {
    pub fn new() -> Self {
        let mut node_text = TextDefinition::new();
        node_text.set_font_size(10.0);
        node_text.set_color(Color::new(NODE_TEXT_COLOR).unwrap_or_default());

        let mut edge_text = TextDefinition::new();
        edge_text.set_font_size(8.0);
        edge_text.set_color(Color::new(EDGE_COLOR).unwrap_or_default());
        edge_text.set_padding(Insets::new(1.0, 3.0, 1.0, 3.0));

        Self {
            node_padding: Insets::new(8.0, 12.0, 8.0, 12.0),
            node_gap: 24.0,
            layer_gap: 50.0,
            label_clearance: 30.0,
            antiparallel_offset: 7.0,
            margin: 16.0,
            background: None,
            node_text,
            edge_text,
            stroke_color: Color::new(EDGE_COLOR).unwrap_or_default(),
        }
    }

    /// Sets the canvas background; edge labels are backed with the same color
    /// (white when there is none) so they stay readable over the lines.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn with_layer_gap(mut self, gap: f32) -> Self {
        self.layer_gap = gap;
        self
    }

    pub fn with_node_gap(mut self, gap: f32) -> Self {
        self.node_gap = gap;
        self
    }

    /// Lays out `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::Layout`] if a node's fill is not a valid CSS color.
    pub fn calculate<'a>(
        &self,
        graph: &DiagramGraph<'a>,
    ) -> Result<DiagramLayout<'a>, HandbookError> {
        let spec = graph.spec();
        info!(diagram = spec.name; "Calculating diagram layout");

        let mut edge_text = self.edge_text.clone();
        edge_text.set_background_color(Some(
            self.background
                .unwrap_or_else(|| Color::new("white").unwrap_or_default()),
        ));

        let layers = graph.layers();
        let layer_of: HashMap<NodeIndex, usize> = layers
            .iter()
            .enumerate()
            .flat_map(|(layer, nodes)| nodes.iter().map(move |&node| (node, layer)))
            .collect();

        let sizes: HashMap<NodeIndex, Size> = layer_of
            .keys()
            .map(|&index| {
                let node = graph.node(index);
                let label = Text::new(&self.node_text, node.label).calculate_size();
                (index, node.kind.outer_size(label, self.node_padding))
            })
            .collect();

        let axis = Axis(spec.direction);
        let gaps = self.layer_gaps(graph, &layers, &layer_of, &edge_text, axis);

        // Main axis: one slot per layer.
        let mut layer_centers = Vec::with_capacity(layers.len());
        let mut cursor = 0.0;
        for (layer, nodes) in layers.iter().enumerate() {
            let extent = nodes
                .iter()
                .map(|node| axis.main(sizes[node]))
                .fold(0.0_f32, f32::max);
            layer_centers.push(cursor + extent / 2.0);
            cursor += extent + gaps.get(layer).copied().unwrap_or_default();
        }

        // Cross axis: nodes side by side, each layer centered on the widest.
        let spans: Vec<f32> = layers
            .iter()
            .map(|nodes| {
                let total: f32 = nodes.iter().map(|node| axis.cross(sizes[node])).sum();
                total + self.node_gap * nodes.len().saturating_sub(1) as f32
            })
            .collect();
        let widest = spans.iter().copied().fold(0.0_f32, f32::max);

        let mut centers: HashMap<NodeIndex, Point> = HashMap::new();
        for (layer, nodes) in layers.iter().enumerate() {
            let mut cross = (widest - spans[layer]) / 2.0;
            for node in nodes {
                let extent = axis.cross(sizes[node]);
                let center = axis.point(layer_centers[layer], cross + extent / 2.0);
                centers.insert(*node, center);
                cross += extent + self.node_gap;
            }
        }

        let mut nodes = Vec::with_capacity(spec.nodes.len());
        for nodes_in_layer in &layers {
            for &index in nodes_in_layer {
                let node = graph.node(index);
                let fill = Color::new(node.fill).map_err(|err| {
                    HandbookError::layout(spec.name, format!("node `{}`: {err}", node.id))
                })?;
                nodes.push(PositionedNode {
                    spec: node,
                    center: centers[&index],
                    size: sizes[&index],
                    fill,
                });
            }
        }

        let edges: Vec<PositionedEdge<'a>> = graph
            .edges()
            .map(|(edge, source, target)| {
                self.position_edge(
                    graph,
                    edge,
                    (source, centers[&source], sizes[&source]),
                    (target, centers[&target], sizes[&target]),
                    &edge_text,
                )
            })
            .collect();

        let mut layout = DiagramLayout {
            name: spec.name,
            size: Size::default(),
            background: self.background,
            node_text: self.node_text.clone(),
            edge_text,
            node_stroke: StrokeDefinition::solid(self.stroke_color, 1.0),
            nodes,
            edges,
        };
        layout.fit_to_content(self.margin);

        info!(
            diagram = spec.name,
            layers = layers.len(),
            width = layout.size.width(),
            height = layout.size.height();
            "Layout calculated"
        );
        Ok(layout)
    }

    /// Gaps after each layer, widened to fit the labels of edges that start
    /// or end in it.
    fn layer_gaps(
        &self,
        graph: &DiagramGraph<'_>,
        layers: &[Vec<NodeIndex>],
        layer_of: &HashMap<NodeIndex, usize>,
        edge_text: &TextDefinition,
        axis: Axis,
    ) -> Vec<f32> {
        let mut gaps = vec![self.layer_gap; layers.len().saturating_sub(1)];

        for (edge, source, target) in graph.edges() {
            let Some(label) = edge.label else {
                continue;
            };
            let (source_layer, target_layer) = (layer_of[&source], layer_of[&target]);
            if source_layer == target_layer {
                continue;
            }
            let gap = source_layer.min(target_layer);
            let needed =
                axis.main(Text::new(edge_text, label).calculate_size()) + self.label_clearance;
            if let Some(current) = gaps.get_mut(gap) {
                *current = current.max(needed);
            }
        }

        debug!(gaps:? = gaps; "Layer gaps");
        gaps
    }

    fn position_edge<'a>(
        &self,
        graph: &DiagramGraph<'a>,
        edge: &'a EdgeSpec<'a>,
        (source, source_center, source_size): (NodeIndex, Point, Size),
        (target, target_center, target_size): (NodeIndex, Point, Size),
        edge_text: &TextDefinition,
    ) -> PositionedEdge<'a> {
        let direction = target_center.sub_point(source_center).normalize();
        let normal = direction.perpendicular();

        let antiparallel = graph.has_reverse_edge(source, target);
        let offset = if antiparallel {
            normal.scale(self.antiparallel_offset)
        } else {
            Point::default()
        };

        let from = source_center.add_point(offset);
        let to = target_center.add_point(offset);
        let start = graph.node(source).kind.find_intersection(from, source_size, to);
        let end = graph.node(target).kind.find_intersection(to, target_size, from);

        let label_center = edge.label.map(|label| {
            let middle = start.midpoint(end);
            if !antiparallel {
                return middle;
            }
            // Move the label off the line, towards the side its edge was pushed to.
            let size = Text::new(edge_text, label).calculate_size();
            let reach =
                normal.x().abs() * size.width() / 2.0 + normal.y().abs() * size.height() / 2.0;
            middle.add_point(normal.scale(reach + 1.0))
        });

        let stroke = if edge.dashed {
            StrokeDefinition::dashed(self.stroke_color, 1.0)
        } else {
            StrokeDefinition::solid(self.stroke_color, 1.0)
        };

        PositionedEdge {
            spec: edge,
            start,
            end,
            label_center,
            stroke,
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps layer-relative coordinates onto diagram coordinates.
#[derive(Debug, Clone, Copy)]
struct Axis(Direction);

impl Axis {
    fn main(self, size: Size) -> f32 {
        match self.0 {
            Direction::TopToBottom => size.height(),
            Direction::LeftToRight => size.width(),
        }
    }

    fn cross(self, size: Size) -> f32 {
        match self.0 {
            Direction::TopToBottom => size.width(),
            Direction::LeftToRight => size.height(),
        }
    }

    fn point(self, main: f32, cross: f32) -> Point {
        match self.0 {
            Direction::TopToBottom => Point::new(cross, main),
            Direction::LeftToRight => Point::new(main, cross),
        }
    }
}

/// A node with its final position and size.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode<'a> {
    spec: &'a NodeSpec<'a>,
    center: Point,
    size: Size,
    fill: Color,
}

impl<'a> PositionedNode<'a> {
    pub fn label(&self) -> &'a str {
        self.spec.label
    }

    pub fn kind(&self) -> ShapeKind {
        self.spec.kind
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn bounds(&self) -> Bounds {
        self.center.to_bounds(self.size)
    }

    pub fn outline(&self) -> ShapeOutline {
        self.spec.kind.outline(self.center, self.size)
    }
}

/// An edge clipped at the outlines of its endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEdge<'a> {
    spec: &'a EdgeSpec<'a>,
    start: Point,
    end: Point,
    label_center: Option<Point>,
    stroke: StrokeDefinition,
}

impl<'a> PositionedEdge<'a> {
    pub fn start(&self) -> Point {
        self.start
    }

    /// Point where the arrowhead touches the target outline.
    pub fn end(&self) -> Point {
        self.end
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Label text and the point it is centered on.
    pub fn label(&self) -> Option<(&'a str, Point)> {
        self.spec.label.zip(self.label_center)
    }

    /// Filled triangle of the arrowhead, tip at [`end`](Self::end).
    pub fn arrowhead(&self) -> Path {
        let direction = self.end.sub_point(self.start).normalize();
        let back = self.end.sub_point(direction.scale(ARROW_LENGTH));
        let side = direction.perpendicular().scale(ARROW_HALF_WIDTH);
        Path::polygon(&[self.end, back.add_point(side), back.sub_point(side)])
    }

    /// Point where the line meets the arrowhead base.
    pub fn shaft_end(&self) -> Point {
        let direction = self.end.sub_point(self.start).normalize();
        self.end.sub_point(direction.scale(ARROW_LENGTH))
    }

    fn translate(&mut self, offset: Point) {
        self.start = self.start.add_point(offset);
        self.end = self.end.add_point(offset);
        self.label_center = self.label_center.map(|center| center.add_point(offset));
    }
}

/// A fully positioned diagram ready for export.
///
/// Coordinates follow SVG conventions: origin at the top-left corner of the
/// canvas, Y growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout<'a> {
    name: &'a str,
    size: Size,
    background: Option<Color>,
    node_text: TextDefinition,
    edge_text: TextDefinition,
    node_stroke: StrokeDefinition,
    nodes: Vec<PositionedNode<'a>>,
    edges: Vec<PositionedEdge<'a>>,
}

impl<'a> DiagramLayout<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Canvas size including the margin.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn node_text(&self) -> &TextDefinition {
        &self.node_text
    }

    pub fn edge_text(&self) -> &TextDefinition {
        &self.edge_text
    }

    pub fn node_stroke(&self) -> &StrokeDefinition {
        &self.node_stroke
    }

    /// Nodes, layer by layer.
    pub fn nodes(&self) -> &[PositionedNode<'a>] {
        &self.nodes
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> &[PositionedEdge<'a>] {
        &self.edges
    }

    /// Moves all content so its bounds start at `margin` and sizes the canvas
    /// to the content plus `margin` on every side.
    fn fit_to_content(&mut self, margin: f32) {
        let node_bounds = self.nodes.iter().map(PositionedNode::bounds);
        let label_bounds = self.edges.iter().filter_map(|edge| {
            let (label, center) = edge.label()?;
            let size = Text::new(&self.edge_text, label).calculate_size();
            Some(center.to_bounds(size))
        });
        let Some(bounds) = node_bounds
            .chain(label_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
        else {
            return;
        };

        let offset = Point::new(margin - bounds.min_x(), margin - bounds.min_y());
        for node in &mut self.nodes {
            node.center = node.center.add_point(offset);
        }
        for edge in &mut self.edges {
            edge.translate(offset);
        }
        self.size = bounds.to_size().add_padding(Insets::uniform(margin));
    }
}
