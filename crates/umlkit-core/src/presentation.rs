//! Presentation tables: per-kind color and default size.
//!
//! Both tables are plain lookups with a declared fallback. Kinds that are not
//! listed take the fallback, which is configurable through [`Presentation`].

use crate::{
    color::Color,
    geometry::Size,
    kind::{ConnectionKind, ElementKind, NodeKind},
};

/// A named color from the color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    name: &'static str,
    code: &'static str,
}

impl ColorEntry {
    const RED: Self = Self::new("red", "#cc0000");
    const GREEN: Self = Self::new("green", "#008000");
    const BLUE: Self = Self::new("blue", "#0000FF");
    const ORANGE: Self = Self::new("orange", "#FF8C00");

    const fn new(name: &'static str, code: &'static str) -> Self {
        Self { name, code }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Hex color code, e.g. `"#cc0000"`.
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn color(&self) -> Color {
        Color::new(self.code).expect("color table entries are valid hex codes")
    }
}

/// Color table lookup. `None` means the kind uses the fallback color.
pub fn color_entry(kind: &ElementKind) -> Option<ColorEntry> {
    match kind {
        ElementKind::Node(node) => match node {
            NodeKind::Class | NodeKind::NAryAssociationDiamond => Some(ColorEntry::RED),
            NodeKind::Interface => Some(ColorEntry::GREEN),
            NodeKind::AbstractClass => Some(ColorEntry::BLUE),
            NodeKind::Enumeration => Some(ColorEntry::ORANGE),
            _ => None,
        },
        ElementKind::Edge(edge) => match edge {
            ConnectionKind::Association
            | ConnectionKind::Aggregation
            | ConnectionKind::Composition => Some(ColorEntry::RED),
            ConnectionKind::Extension | ConnectionKind::Dependency => Some(ColorEntry::BLUE),
            ConnectionKind::Realization => Some(ColorEntry::GREEN),
            ConnectionKind::CommentConnection => None,
        },
        ElementKind::Root | ElementKind::Foreign(_) => None,
    }
}

/// Size table lookup. `None` means the kind uses the fallback size.
pub fn size_entry(kind: &ElementKind) -> Option<Size> {
    let node = kind.node()?;
    let (width, height) = match node {
        NodeKind::Class
        | NodeKind::Interface
        | NodeKind::AbstractClass
        | NodeKind::Enumeration
        | NodeKind::Object
        | NodeKind::Utility
        | NodeKind::Library => (100.0, 80.0),
        NodeKind::Package => (600.0, 400.0),
        NodeKind::Qualifier => (50.0, 20.0),
        NodeKind::NAryAssociationDiamond => (70.0, 70.0),
        NodeKind::Comment => (50.0, 80.0),
        NodeKind::Label => (90.0, 20.0),
    };
    Some(Size::new(width, height))
}

/// Lookup-with-default over the color and size tables.
///
/// # Examples
///
/// ```
/// use umlkit_core::{
///     color::Color,
///     geometry::Size,
///     kind::{ElementKind, NodeKind},
///     presentation::Presentation,
/// };
///
/// let presentation = Presentation::default();
/// let package = ElementKind::Node(NodeKind::Package);
/// assert_eq!(presentation.size_of(&package), Size::new(600.0, 400.0));
///
/// let foreign = ElementKind::Foreign("bpmn:Task".into());
/// assert_eq!(presentation.color_of(&foreign), Color::default());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    default_color: Color,
    default_size: Size,
}

impl Presentation {
    /// Fallback size when no configuration overrides it.
    pub const DEFAULT_SIZE: Size = Size::new(100.0, 80.0);

    pub fn new(default_color: Color, default_size: Size) -> Self {
        Self {
            default_color,
            default_size,
        }
    }

    /// Stroke color for the kind, or the fallback color.
    pub fn color_of(&self, kind: &ElementKind) -> Color {
        color_entry(kind)
            .map(|entry| entry.color())
            .unwrap_or(self.default_color)
    }

    /// Default creation size for the kind, or the fallback size.
    pub fn size_of(&self, kind: &ElementKind) -> Size {
        size_entry(kind).unwrap_or(self.default_size)
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    pub fn default_size(&self) -> Size {
        self.default_size
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new(Color::default(), Self::DEFAULT_SIZE)
    }
}
