//! Connection end decorations and their SVG marker definitions.
//!
//! A connection references markers by id. [`MarkerRegistry`] collects every
//! (decoration, color) pair used while drawing so the definitions can be
//! emitted once in the document's `<defs>`.

use std::collections::BTreeMap;

use log::trace;
use svg::node::element as svg_element;

use crate::{color::Color, kind::MarkerKind};

/// Visual decoration drawn at one end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Decoration {
    /// Open `>` arrowhead (directed associations, dependencies).
    OpenArrow,
    /// Hollow triangle (extension, realization).
    HollowTriangle,
    /// Hollow diamond (aggregation).
    HollowDiamond,
    /// Filled diamond (composition).
    FilledDiamond,
    /// `×` mark for a non-navigable end.
    Cross,
}

impl Decoration {
    fn name(self) -> &'static str {
        match self {
            Self::OpenArrow => "open-arrow",
            Self::HollowTriangle => "hollow-triangle",
            Self::HollowDiamond => "hollow-diamond",
            Self::FilledDiamond => "filled-diamond",
            Self::Cross => "cross",
        }
    }

    /// Path drawn in a 20×20 marker box, pointing towards +X.
    fn path_data(self) -> &'static str {
        match self {
            Self::OpenArrow => "M 2 2 L 18 10 L 2 18",
            Self::HollowTriangle => "M 2 2 L 18 10 L 2 18 Z",
            Self::HollowDiamond | Self::FilledDiamond => "M 0 10 L 10 4 L 20 10 L 10 16 Z",
            Self::Cross => "M 6 4 L 14 16 M 14 4 L 6 16",
        }
    }

    fn is_filled(self) -> bool {
        matches!(self, Self::FilledDiamond)
    }

    fn is_closed(self) -> bool {
        matches!(
            self,
            Self::HollowTriangle | Self::HollowDiamond | Self::FilledDiamond
        )
    }

    /// Reference point on the path that sits on the connection end.
    fn ref_x(self, end: MarkerKind) -> f32 {
        match (self, end) {
            (Self::HollowDiamond | Self::FilledDiamond, MarkerKind::Start) => 0.0,
            (Self::Cross, _) => 10.0,
            _ => 18.0,
        }
    }
}

/// A decoration placed at a specific end with a specific color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    decoration: Decoration,
    end: MarkerKind,
    color: Color,
}

impl Marker {
    pub fn new(decoration: Decoration, end: MarkerKind, color: Color) -> Self {
        Self {
            decoration,
            end,
            color,
        }
    }

    pub fn decoration(&self) -> Decoration {
        self.decoration
    }

    pub fn end(&self) -> MarkerKind {
        self.end
    }

    /// Unique marker element id, e.g. `marker-hollow-triangle-end-hex008000`.
    pub fn id(&self) -> String {
        format!(
            "marker-{}-{}-{}",
            self.decoration.name(),
            self.end.name(),
            self.color.to_id_safe_string()
        )
    }

    /// Value for `marker-start` / `marker-end` attributes.
    pub fn reference(&self) -> String {
        format!("url(#{})", self.id())
    }

    fn to_svg(self) -> svg_element::Marker {
        let fill = if self.decoration.is_filled() {
            self.color.to_string()
        } else if self.decoration.is_closed() {
            "white".to_string()
        } else {
            "none".to_string()
        };

        let path = svg_element::Path::new()
            .set("d", self.decoration.path_data())
            .set("fill", fill)
            .set("stroke", self.color.to_string())
            .set("stroke-width", 1.5);

        svg_element::Marker::new()
            .set("id", self.id())
            .set("viewBox", "0 0 20 20")
            .set("refX", self.decoration.ref_x(self.end))
            .set("refY", 10)
            .set("markerWidth", 12)
            .set("markerHeight", 12)
            .set("markerUnits", "userSpaceOnUse")
            .set(
                "orient",
                match self.end {
                    MarkerKind::Start => "auto-start-reverse",
                    MarkerKind::End => "auto",
                },
            )
            .add(path)
    }
}

/// Collects the markers used by rendered connections.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: BTreeMap<String, Marker>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a marker and returns its attribute reference.
    pub fn register(&mut self, marker: Marker) -> String {
        let reference = marker.reference();
        self.markers.entry(marker.id()).or_insert_with_key(|id| {
            trace!(id = id.as_str(); "Registered marker");
            marker
        });
        reference
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// `<defs>` element holding every registered marker, sorted by id.
    pub fn definitions(&self) -> svg_element::Definitions {
        self.markers
            .values()
            .fold(svg_element::Definitions::new(), |defs, marker| {
                defs.add(marker.to_svg())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_ids_are_distinct_per_end_and_color() {
        let red = Color::new("#cc0000").unwrap();
        let blue = Color::new("#0000FF").unwrap();

        let a = Marker::new(Decoration::HollowTriangle, MarkerKind::End, red);
        let b = Marker::new(Decoration::HollowTriangle, MarkerKind::End, blue);
        let c = Marker::new(Decoration::HollowTriangle, MarkerKind::Start, red);

        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert!(a.reference().starts_with("url(#marker-hollow-triangle-end-"));
    }

    #[test]
    fn test_registry_deduplicates() {
        let red = Color::new("#cc0000").unwrap();
        let mut registry = MarkerRegistry::new();

        let first = registry.register(Marker::new(Decoration::OpenArrow, MarkerKind::End, red));
        let second = registry.register(Marker::new(Decoration::OpenArrow, MarkerKind::End, red));
        registry.register(Marker::new(Decoration::FilledDiamond, MarkerKind::Start, red));

        assert_eq!(first, second);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_filled_diamond_is_filled_with_stroke_color() {
        let red = Color::new("#cc0000").unwrap();
        let mut registry = MarkerRegistry::new();
        registry.register(Marker::new(Decoration::FilledDiamond, MarkerKind::Start, red));
        registry.register(Marker::new(Decoration::HollowDiamond, MarkerKind::Start, red));

        let defs = registry.definitions().to_string();
        assert!(defs.contains(&format!("fill=\"{red}\"")));
        assert!(defs.contains("fill=\"white\""));
        assert!(defs.contains("auto-start-reverse"));
    }
}
