//! PNG rasterization of diagram layouts.
//!
//! The SVG document of a layout is parsed with `usvg` and painted with
//! `resvg`. Labels use the host's system fonts; hosts without a sans-serif
//! font produce images without label text.

use log::debug;
use resvg::{tiny_skia, usvg};

use crate::{HandbookError, diagram::DiagramLayout, export::svg};

/// Device pixels per layout unit.
pub const PIXEL_SCALE: f32 = 2.0;

/// Renders `layout` as PNG bytes at [`PIXEL_SCALE`].
///
/// # Errors
///
/// Returns [`HandbookError::Render`] if the diagram is empty or the image
/// cannot be encoded.
pub fn render(layout: &DiagramLayout<'_>) -> Result<Vec<u8>, HandbookError> {
    let document = svg::render(layout);

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&document, &options)
        .map_err(|err| HandbookError::render(layout.name(), err.to_string()))?;

    let (width, height) = pixel_size(layout.size().width(), layout.size().height());
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        let message = format!("invalid image size {width}x{height}");
        HandbookError::render(layout.name(), message)
    })?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(PIXEL_SCALE, PIXEL_SCALE),
        &mut pixmap.as_mut(),
    );

    let png = pixmap
        .encode_png()
        .map_err(|err| HandbookError::render(layout.name(), err.to_string()))?;
    debug!(diagram = layout.name(), width, height, bytes = png.len(); "PNG rendered");
    Ok(png)
}

fn pixel_size(width: f32, height: f32) -> (u32, u32) {
    let scale = |length: f32| (length * PIXEL_SCALE).ceil().max(0.0) as u32;
    (scale(width), scale(height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandbookBuilder, content};

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_pixel_size_rounds_up() {
        assert_eq!(pixel_size(100.0, 50.2), (200, 101));
        assert_eq!(pixel_size(0.0, 10.0), (0, 20));
    }

    #[test]
    fn test_render_architecture() {
        let layout = HandbookBuilder::default()
            .layout_diagram(&content::ARCHITECTURE)
            .unwrap();

        let png = render(&layout).unwrap();

        assert!(png.starts_with(PNG_SIGNATURE));
        // IHDR holds the big-endian width and height right after the chunk type.
        let width = u32::from_be_bytes(png[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(png[20..24].try_into().unwrap());
        assert_eq!(
            (width, height),
            pixel_size(layout.size().width(), layout.size().height())
        );
    }
}
