//! ProofPass Core Types
//!
//! Foundational types shared by the ProofPass handbook renderer:
//!
//! - **Colors**: CSS color parsing with sRGB access for PDF output ([`color::Color`])
//! - **Geometry**: points, sizes, bounds and insets ([`geometry`] module)
//! - **Metrics**: Helvetica advance widths for text measurement ([`metrics`] module)
//! - **Draw**: backend-neutral shape outlines, strokes, text styles and SVG
//!   layering ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod metrics;
