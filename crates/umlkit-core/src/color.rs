//! Color handling for rendered UML elements
//!
//! [`Color`] wraps the `DynamicColor` type from the color crate so that
//! presentation tables and configuration can share one parsed representation
//! of CSS color strings.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use thiserror::Error;

/// Error returned when a CSS color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{input}`: {reason}")]
pub struct ColorError {
    input: String,
    reason: String,
}

/// A parsed CSS color
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
    /// Parse a CSS color string such as `"#cc0000"`, `"rgb(0, 128, 0)"` or `"blue"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use umlkit_core::color::Color;
    ///
    /// let red = Color::new("#cc0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, ColorError> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| ColorError {
                input: color_str.to_string(),
                reason: err.to_string(),
            })
    }

    /// Returns a string usable inside an SVG `id` attribute.
    ///
    /// The result contains only alphanumeric characters and underscores and
    /// always starts with a letter, so it can be embedded in marker ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use umlkit_core::color::Color;
    ///
    /// let id = Color::new("#0000FF").unwrap().to_id_safe_string();
    /// assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let mut sanitized: String = self
            .to_string()
            .replace('#', "hex")
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        if !sanitized.starts_with(|c: char| c.is_ascii_alphabetic()) {
            sanitized.insert_str(0, "c_");
        }

        sanitized
    }

    /// Returns a copy of this color with the given alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Alpha component between 0.0 (transparent) and 1.0 (opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
