//! SVG rendering of diagram layouts.

use indexmap::IndexSet;
use log::debug;
use svg::{
    Document,
    node::element::{self as svg_element, Definitions, Marker},
};

use proofpass_core::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, Text},
};

use crate::diagram::{
    ARROW_HALF_WIDTH, ARROW_LENGTH, DiagramLayout, PositionedEdge, PositionedNode,
};

/// Renders `layout` as a standalone SVG document.
///
/// The output depends only on the layout, so equal layouts always produce
/// byte-identical documents.
pub fn render(layout: &DiagramLayout<'_>) -> String {
    let size = layout.size();
    let mut output = LayeredOutput::new();

    if let Some(background) = layout.background() {
        let rect = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", background.to_string());
        output.add_to_layer(RenderLayer::Background, Box::new(rect));
    }

    for edge in layout.edges() {
        output.merge(render_edge(layout, edge));
    }
    for node in layout.nodes() {
        output.merge(render_node(layout, node));
    }

    let colors: IndexSet<Color> = layout
        .edges()
        .iter()
        .map(|edge| edge.stroke().color())
        .collect();

    let document = output.render().into_iter().fold(
        Document::new()
            .set("viewBox", (0.0, 0.0, size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height())
            .add(create_marker_definitions(colors.iter())),
        |document, group| document.add(group),
    );

    debug!(diagram = layout.name(); "SVG document rendered");
    document.to_string()
}

fn render_node(layout: &DiagramLayout<'_>, node: &PositionedNode<'_>) -> LayeredOutput {
    let mut output = LayeredOutput::new();
    let outline = node.outline();
    let stroke = layout.node_stroke();

    let body = svg_element::Path::new()
        .set("d", outline.body.to_svg_data())
        .set("fill", node.fill().to_string());
    output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(body, stroke)));

    for detail in &outline.details {
        let path = svg_element::Path::new()
            .set("d", detail.to_svg_data())
            .set("fill", "none");
        output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(path, stroke)));
    }

    let label = Text::new(layout.node_text(), node.label());
    output.merge(label.render_to_layers(node.center()));
    output
}

fn render_edge(layout: &DiagramLayout<'_>, edge: &PositionedEdge<'_>) -> LayeredOutput {
    let mut output = LayeredOutput::new();
    let start = edge.start();
    let shaft_end = edge.shaft_end();

    let line = svg_element::Path::new()
        .set(
            "d",
            format!(
                "M {} {} L {} {}",
                start.x(),
                start.y(),
                shaft_end.x(),
                shaft_end.y()
            ),
        )
        .set("fill", "none")
        .set("marker-end", marker_url(edge.stroke().color()));
    let line = apply_stroke!(line, edge.stroke());
    output.add_to_layer(RenderLayer::Arrow, Box::new(line));

    if let Some((label, center)) = edge.label() {
        let text = Text::new(layout.edge_text(), label);
        output.merge(text.render_to_layers(center));
    }
    output
}

fn marker_url(color: Color) -> String {
    format!("url(#arrow-{})", color.to_id_safe_string())
}

/// Creates one arrowhead marker per edge color.
///
/// Markers sit on the end of the shaft and reach forward to the outline of
/// the target node.
fn create_marker_definitions<'a, I>(colors: I) -> Definitions
where
    I: Iterator<Item = &'a Color>,
{
    colors.fold(Definitions::new(), |defs, color| {
        let marker = Marker::new()
            .set("id", format!("arrow-{}", color.to_id_safe_string()))
            .set("viewBox", (0.0, 0.0, ARROW_LENGTH, ARROW_HALF_WIDTH * 2.0))
            .set("refX", 0)
            .set("refY", ARROW_HALF_WIDTH)
            .set("markerUnits", "userSpaceOnUse")
            .set("markerWidth", ARROW_LENGTH)
            .set("markerHeight", ARROW_HALF_WIDTH * 2.0)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set(
                        "d",
                        format!(
                            "M 0 0 L {ARROW_LENGTH} {ARROW_HALF_WIDTH} L 0 {} z",
                            ARROW_HALF_WIDTH * 2.0
                        ),
                    )
                    .set("fill", color.to_string()),
            );
        defs.add(marker)
    })
}
