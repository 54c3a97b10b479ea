//! ProofPass handbook generator.
//!
//! Lays out the platform diagrams, writes them as PNG images and renders the
//! developer handbook to a paginated A4 PDF.

pub mod config;
pub mod content;
pub mod diagram;
pub mod document;
pub mod export;

mod error;

pub use proofpass_core::{color, draw, geometry};

pub use error::HandbookError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info, warn};

use config::HandbookConfig;
use diagram::{DiagramGraph, DiagramLayout, DiagramSpec, LayoutEngine};
use document::Document;

/// Summary of a finished handbook build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pdf_path: PathBuf,
    pub page_count: usize,
    pub pdf_bytes: usize,
    /// Diagram images left on disk; empty when diagrams are not kept.
    pub diagrams: Vec<PathBuf>,
}

/// Builder for laying out diagrams and rendering the handbook.
///
/// # Examples
///
/// ```rust,no_run
/// use proofpass_handbook::{HandbookBuilder, config::HandbookConfig, content};
///
/// let builder = HandbookBuilder::new(HandbookConfig::default());
/// let report = builder
///     .build(&content::proofpass_handbook(), content::OUTPUT_FILE)
///     .expect("Failed to build handbook");
/// println!("{} pages", report.page_count);
/// ```
#[derive(Debug, Default)]
pub struct HandbookBuilder {
    config: HandbookConfig,
}

impl HandbookBuilder {
    pub fn new(config: HandbookConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HandbookConfig {
        &self.config
    }

    /// Validates a diagram description and computes its layout.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::Layout`] for invalid descriptions and
    /// [`HandbookError::Config`] for an invalid background color.
    pub fn layout_diagram<'a>(
        &self,
        spec: &'a DiagramSpec<'a>,
    ) -> Result<DiagramLayout<'a>, HandbookError> {
        debug!(diagram = spec.name; "Laying out diagram");
        let background = self
            .config
            .style()
            .background_color()
            .map_err(HandbookError::Config)?;

        let graph = DiagramGraph::from_spec(spec)?;
        let layout = LayoutEngine::new()
            .with_background(background)
            .calculate(&graph)?;

        info!(
            diagram = spec.name,
            width = layout.size().width(),
            height = layout.size().height();
            "Diagram laid out"
        );
        Ok(layout)
    }

    /// Renders a laid-out diagram to an SVG document.
    ///
    /// # Errors
    ///
    /// Rendering itself cannot fail; the `Result` keeps the signature in line
    /// with the other stages.
    pub fn render_svg(&self, layout: &DiagramLayout<'_>) -> Result<String, HandbookError> {
        let svg = export::svg::render(layout);
        debug!(diagram = layout.name(), bytes = svg.len(); "SVG rendered");
        Ok(svg)
    }

    /// Rasterizes a laid-out diagram to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::Render`] if the image cannot be produced.
    pub fn render_png(&self, layout: &DiagramLayout<'_>) -> Result<Vec<u8>, HandbookError> {
        export::png::render(layout)
    }

    /// Renders `document` to PDF bytes, laying out every diagram it contains.
    ///
    /// # Errors
    ///
    /// Returns an error if a diagram cannot be laid out.
    pub fn render_pdf(&self, document: &Document<'_>) -> Result<Vec<u8>, HandbookError> {
        let layouts: Vec<DiagramLayout<'_>> = self
            .layout_all(document)?
            .into_values()
            .map(|(_, layout)| layout)
            .collect();
        Ok(export::pdf::render(document, &layouts)?.bytes)
    }

    /// Runs the whole pipeline: writes one PNG per diagram next to
    /// `output`, renders the PDF to `output` (replacing any previous file)
    /// and removes the PNGs again unless the configuration keeps them.
    ///
    /// # Errors
    ///
    /// Any layout, render or I/O failure aborts the build.
    pub fn build(
        &self,
        document: &Document<'_>,
        output: impl AsRef<Path>,
    ) -> Result<BuildReport, HandbookError> {
        let output = output.as_ref();
        info!(output = output.display().to_string(); "Building handbook");

        let directory = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let layouts = self.layout_all(document)?;

        let mut diagrams = Vec::with_capacity(layouts.len());
        for (spec, layout) in layouts.values() {
            let path = directory.join(spec.file_name());
            let png = self.render_png(layout)?;
            fs::write(&path, png).map_err(|err| HandbookError::io(&path, err))?;
            info!(path = path.display().to_string(); "Diagram written");
            diagrams.push(path);
        }

        let layouts: Vec<DiagramLayout<'_>> =
            layouts.into_values().map(|(_, layout)| layout).collect();
        let pdf = export::pdf::render(document, &layouts)?;
        fs::write(output, &pdf.bytes).map_err(|err| HandbookError::io(output, err))?;
        info!(
            path = output.display().to_string(),
            pages = pdf.page_count;
            "Handbook written"
        );

        if !self.config.keep_diagrams() {
            for path in diagrams.drain(..) {
                match fs::remove_file(&path) {
                    Ok(()) => debug!(path = path.display().to_string(); "Diagram removed"),
                    Err(err) => {
                        warn!(path = path.display().to_string(), err:% = err; "Could not remove diagram");
                        return Err(HandbookError::io(path, err));
                    }
                }
            }
        }

        Ok(BuildReport {
            pdf_path: output.to_path_buf(),
            page_count: pdf.page_count,
            pdf_bytes: pdf.bytes.len(),
            diagrams,
        })
    }

    /// Lays out each distinct diagram once, in document order.
    fn layout_all<'a>(
        &self,
        document: &Document<'a>,
    ) -> Result<IndexMap<&'a str, (&'a DiagramSpec<'a>, DiagramLayout<'a>)>, HandbookError> {
        let mut layouts = IndexMap::new();
        for spec in document.diagrams() {
            if !layouts.contains_key(spec.name) {
                layouts.insert(spec.name, (spec, self.layout_diagram(spec)?));
            }
        }
        Ok(layouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;

    #[test]
    fn test_layout_architecture() {
        let builder = HandbookBuilder::default();
        let layout = builder.layout_diagram(&content::ARCHITECTURE).unwrap();
        assert_eq!(layout.nodes().len(), 7);
        assert_eq!(layout.edges().len(), 6);
    }

    #[test]
    fn test_invalid_background_is_config_error() {
        let config = HandbookConfig::new(true, StyleConfig::new(Some("nope".to_string())));
        let builder = HandbookBuilder::new(config);
        let err = builder.layout_diagram(&content::SEQUENCE_FLOW).unwrap_err();
        assert!(matches!(err, HandbookError::Config(_)));
    }

    #[test]
    fn test_render_svg() {
        let builder = HandbookBuilder::default();
        let layout = builder.layout_diagram(&content::SEQUENCE_FLOW).unwrap();
        let svg = builder.render_svg(&layout).unwrap();
        assert!(svg.contains("POST /attestations"));
    }

    #[test]
    fn test_render_png() {
        let builder = HandbookBuilder::default();
        let layout = builder.layout_diagram(&content::SEQUENCE_FLOW).unwrap();
        let png = builder.render_png(&layout).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_render_pdf_is_deterministic() {
        let builder = HandbookBuilder::default();
        let document = content::proofpass_handbook();
        let first = builder.render_pdf(&document).unwrap();
        let second = builder.render_pdf(&document).unwrap();
        assert!(first.starts_with(b"%PDF-"));
        assert_eq!(first, second);
    }
}
