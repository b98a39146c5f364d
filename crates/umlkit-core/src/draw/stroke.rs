//! Stroke definitions for outlines and connection lines.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width and dash style of a line
//! - [`StrokeStyle`]: line pattern (solid, dashed, dotted)
//! - [`apply_stroke!`](crate::apply_stroke!): applies a stroke to an SVG element
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#cc0000"`, `1` |
//! | `width` | `stroke-width` | `2` |
//! | `style` | `stroke-dasharray` | `"6,4"`, `"2,3"` |

use crate::color::Color;

/// Line pattern of a stroke.
///
/// Realization and dependency edges are dashed, comment connections dotted,
/// everything else solid.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// 6px dash, 4px gap
    Dashed,
    /// 2px dot, 3px gap
    Dotted,
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6,4".to_string()),
            Self::Dotted => Some("2,3".to_string()),
        }
    }
}

/// A stroke used for shape outlines and connection lines.
///
/// # Examples
///
/// ```
/// use umlkit_core::{color::Color, draw::{StrokeDefinition, StrokeStyle}};
///
/// let stroke = StrokeDefinition::dashed(Color::new("#008000").unwrap(), 2.0);
/// assert_eq!(*stroke.style(), StrokeStyle::Dashed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn dotted(color: Color, width: f32) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dotted)
    }

    /// Returns a copy with a different style.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 2.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity and width, plus the dash pattern when the stroke is
/// not solid.
///
/// # Examples
///
/// ```
/// use umlkit_core::{color::Color, draw::StrokeDefinition};
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
/// let rect = svg_element::Rectangle::new().set("width", 100).set("height", 80);
///
/// let rect = umlkit_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
