//! Error types for handbook generation.
//!
//! Every failure while laying out, rendering or writing the handbook is
//! fatal and surfaces as a [`HandbookError`].

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for handbook operations.
#[derive(Debug, Error)]
pub enum HandbookError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The diagram description cannot be laid out (unknown node, duplicate id, ...).
    #[error("Layout error in diagram `{diagram}`: {message}")]
    Layout { diagram: String, message: String },

    /// A laid-out diagram cannot be rasterized.
    #[error("Render error in diagram `{diagram}`: {message}")]
    Render { diagram: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HandbookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn layout(diagram: &str, message: impl Into<String>) -> Self {
        Self::Layout {
            diagram: diagram.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn render(diagram: &str, message: impl Into<String>) -> Self {
        Self::Render {
            diagram: diagram.to_string(),
            message: message.into(),
        }
    }
}
