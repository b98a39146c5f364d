//! Z-ordered rendering layers.
//!
//! Packages must sit underneath the classes nested in them, connections above
//! nodes, and labels above everything else. Drawables add their SVG nodes to a
//! [`RenderLayer`] of a [`LayeredOutput`]; rendering emits one `<g>` per
//! non-empty layer from bottom to top.
//!
//! # Example
//!
//! ```
//! # use umlkit_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Rectangle, Text};
//!
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Label, Box::new(Text::new("name")));
//! output.add_to_layer(RenderLayer::Container, Box::new(Rectangle::new()));
//!
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom first.
///
/// The `Ord` derive follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Packages and other shapes that may contain nodes
    Container,
    /// Classifiers, diamonds, qualifiers, comments
    Node,
    /// Connections
    Edge,
    /// Free text labels
    Label,
}

impl RenderLayer {
    /// Value of the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Label => "label",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to the given layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Moves every node of `other` into this output.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the output and returns one `<g data-layer=…>` per non-empty
    /// layer in bottom-to-top order. Insertion order is kept inside a layer.
    pub fn render(mut self) -> Vec<SvgNode> {
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut groups: Vec<(RenderLayer, svg_element::Group)> = Vec::new();
        for (layer, node) in self.items {
            match groups.last_mut() {
                Some((current, group)) if *current == layer => {
                    let taken = std::mem::take(group);
                    *group = taken.add(node);
                }
                _ => {
                    let group = svg_element::Group::new()
                        .set("data-layer", layer.name())
                        .add(node);
                    groups.push((layer, group));
                }
            }
        }

        groups
            .into_iter()
            .map(|(_, group)| Box::new(group) as SvgNode)
            .collect()
    }
}
