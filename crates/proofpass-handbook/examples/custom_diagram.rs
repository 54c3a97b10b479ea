//! Example: Laying out and rendering a custom diagram
//!
//! Diagrams are plain static data, so any description can go through the
//! same layout and PNG pipeline as the handbook diagrams.

use proofpass_handbook::{
    HandbookBuilder,
    diagram::{DiagramSpec, Direction, EdgeSpec, NodeSpec},
    draw::ShapeKind,
};

static VERIFICATION: DiagramSpec<'static> = DiagramSpec {
    name: "verification_flow",
    direction: Direction::LeftToRight,
    nodes: &[
        NodeSpec::new("V", "Verificador", ShapeKind::Ellipse, "#E1BEE7"),
        NodeSpec::new("API", "API Fastify", ShapeKind::Box, "#C8E6C9"),
        NodeSpec::new("ST", "Stellar SDK", ShapeKind::Ellipse, "#FFF9C4"),
    ],
    edges: &[
        EdgeSpec::new("V", "API").with_label("POST /verify"),
        EdgeSpec::new("API", "ST").with_label("Consulta hash"),
        EdgeSpec::new("ST", "API").with_label("Anclado").dashed(),
        EdgeSpec::new("API", "V").with_label("Resultado").dashed(),
    ],
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let builder = HandbookBuilder::default();

    println!("Laying out diagram...");
    let layout = builder.layout_diagram(&VERIFICATION)?;
    println!(
        "Diagram size: {:.0} x {:.0}",
        layout.size().width(),
        layout.size().height()
    );

    let png = builder.render_png(&layout)?;
    let output_path = VERIFICATION.file_name();
    std::fs::write(&output_path, &png)?;
    println!("PNG written to: {output_path}");

    Ok(())
}
