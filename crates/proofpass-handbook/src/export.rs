//! Output backends for laid-out diagrams and documents.
//!
//! ```text
//! DiagramLayout ──► svg::render ──► png::render ──► <name>.png
//!        │
//! Document ──┴────► pdf::render ──────► handbook PDF
//! ```
//!
//! Both backends draw diagrams from the same [`DiagramLayout`] and the same
//! backend-neutral outlines, so the PNG images and the vector drawings in the
//! PDF are identical up to scale.
//!
//! [`DiagramLayout`]: crate::diagram::DiagramLayout

pub mod pdf;
pub mod png;
pub mod svg;
