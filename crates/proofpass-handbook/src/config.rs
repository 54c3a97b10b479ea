//! Configuration for handbook generation.
//!
//! Loaded from the `[handbook]` table of the ProofPass configuration file.
//! Every field has a default, so an empty table (or none at all) is valid.
//!
//! ```
//! # use proofpass_handbook::config::HandbookConfig;
//! let config = HandbookConfig::default();
//! assert!(config.keep_diagrams());
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use proofpass_core::color::Color;

/// Handbook generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HandbookConfig {
    /// Keep the intermediate diagram PNG files next to the PDF.
    #[serde(default = "default_keep_diagrams")]
    keep_diagrams: bool,

    #[serde(default)]
    style: StyleConfig,
}

impl HandbookConfig {
    pub fn new(keep_diagrams: bool, style: StyleConfig) -> Self {
        Self {
            keep_diagrams,
            style,
        }
    }

    pub fn keep_diagrams(&self) -> bool {
        self.keep_diagrams
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

impl Default for HandbookConfig {
    fn default() -> Self {
        Self::new(default_keep_diagrams(), StyleConfig::default())
    }
}

fn default_keep_diagrams() -> bool {
    true
}

/// Visual styling of the rendered diagrams.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Diagram background as a CSS color string; `None` leaves it transparent.
    #[serde(default = "default_background_color")]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid CSS color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new(default_background_color())
    }
}

fn default_background_color() -> Option<String> {
    Some("white".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_background_is_white() {
        let color = StyleConfig::default().background_color().unwrap();
        assert_eq!(color, Some(Color::new("white").unwrap()));
    }

    #[test]
    fn test_missing_background_is_transparent() {
        let style = StyleConfig::new(None);
        assert_eq!(style.background_color().unwrap(), None);
    }

    #[test]
    fn test_invalid_background_is_rejected() {
        let style = StyleConfig::new(Some("not-a-color".to_string()));
        let err = style.background_color().unwrap_err();
        assert!(err.contains("Invalid background color"));
    }
}
