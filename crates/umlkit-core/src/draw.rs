//! Drawable components for UML diagram rendering.
//!
//! Nodes implement the [`Drawable`] trait and render into a [`LayeredOutput`];
//! connections render through [`ConnectionLine`], which also records the
//! markers it references in a [`MarkerRegistry`].
//!
//! # Layer-Based Rendering
//!
//! Drawables render to one or more [`RenderLayer`]s, which are ordered during
//! final SVG generation so packages stay beneath their contents.
mod connection;
mod layer;
mod marker;
mod shape;
mod stroke;

pub use connection::{ConnectionLine, connection_path, decorations, line_style};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use marker::{Decoration, Marker, MarkerRegistry};
pub use shape::{HEADER_HEIGHT, NameStyle, NodeShape, shape_path};
pub use stroke::{StrokeDefinition, StrokeStyle};

use crate::geometry::{Point, Size};

/// Trait for drawable diagram elements that can be rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable centered at `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}
