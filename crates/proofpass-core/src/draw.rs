//! Drawing primitives shared by the SVG and PDF backends.
//!
//! Shapes are described once as backend-neutral [`Path`] outlines; the SVG
//! exporter turns them into `<path>` data and the PDF exporter into content
//! stream operators. Only the final serialization differs between the two.

mod layer;
mod path;
mod shape;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use path::{Path, Segment};
pub use shape::{ShapeKind, ShapeOutline};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{LINE_HEIGHT_FACTOR, Text, TextDefinition};

use crate::geometry::{Point, Size};

/// An element that can be drawn into SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this element centered at `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size the element occupies.
    fn size(&self) -> Size;
}
