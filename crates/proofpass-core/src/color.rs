//! Color handling for ProofPass diagrams and documents
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors are written as CSS strings into SVG output and
//! as sRGB components into PDF content streams.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use proofpass_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a sanitized, ID-safe string representation of this color.
    ///
    /// The result is suitable for SVG `id` attributes such as arrow marker
    /// definitions: only alphanumeric characters and underscores, starting
    /// with a letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use proofpass_core::color::Color;
    ///
    /// let color = Color::new("#ff8000").unwrap();
    /// let id_str = color.to_id_safe_string();
    /// assert!(id_str.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let color_str = self.to_string();
        let mut sanitized = color_str
            .replace('#', "hex")
            .replace(['(', ')', ',', ' ', ';', '.', '%', '/'], "_");

        if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }

    /// Returns the alpha (transparency) component, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the red, green and blue components in the sRGB color space,
    /// each clamped to `0.0..=1.0`.
    ///
    /// PDF `rg`/`RG` operators take exactly these values.
    ///
    /// # Examples
    ///
    /// ```
    /// use proofpass_core::color::Color;
    ///
    /// let [r, g, b] = Color::new("#ff0000").unwrap().to_rgb();
    /// assert_eq!((r, g, b), (1.0, 0.0, 0.0));
    /// ```
    pub fn to_rgb(&self) -> [f32; 3] {
        let srgb = self.color.to_alpha_color::<Srgb>();
        let [r, g, b, _] = srgb.components;
        [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

/// Formats as `rgb(r, g, b)` with integer 8-bit channels, or `rgba(...)`
/// when the color is not opaque.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb().map(|channel| (channel * 255.0).round() as u8);
        let alpha = self.alpha().clamp(0.0, 1.0);
        if alpha >= 1.0 {
            write!(f, "rgb({r}, {g}, {b})")
        } else {
            let alpha = (alpha * 1000.0).round() / 1000.0;
            write!(f, "rgba({r}, {g}, {b}, {alpha})")
        }
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
