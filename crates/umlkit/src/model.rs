//! Diagram elements as seen by the extension.
//!
//! The host owns element geometry and lifetime. The extension reads an
//! element's [`ElementKind`] and [`BusinessObject`] and changes the business
//! object only through [`PropertyUpdate`]s routed via the host.

use umlkit_core::{
    geometry::{Bounds, Point, Size},
    identifier::ElementId,
    kind::{ConnectionKind, ElementKind, LabelKind},
};

/// Semantic payload of an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessObject {
    directed: bool,
    crossed: bool,
    belongs_to: Option<ElementId>,
    label_type: Option<LabelKind>,
    text: Option<String>,
}

impl BusinessObject {
    /// Navigability flag of association-family edges.
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Non-navigable source end of association-family edges.
    pub fn crossed(&self) -> bool {
        self.crossed
    }

    /// Element a label or qualifier annotates.
    pub fn belongs_to(&self) -> Option<ElementId> {
        self.belongs_to
    }

    pub fn label_type(&self) -> Option<LabelKind> {
        self.label_type
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn apply(&mut self, update: &PropertyUpdate) {
        match update {
            PropertyUpdate::Directed(value) => self.directed = *value,
            PropertyUpdate::Crossed(value) => self.crossed = *value,
            PropertyUpdate::BelongsTo(owner) => self.belongs_to = Some(*owner),
            PropertyUpdate::LabelType(kind) => self.label_type = Some(*kind),
            PropertyUpdate::Text(text) => self.text = Some(text.clone()),
        }
    }
}

/// A single business object property change.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyUpdate {
    Directed(bool),
    Crossed(bool),
    BelongsTo(ElementId),
    LabelType(LabelKind),
    Text(String),
}

/// Where an element sits on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Nodes, labels and foreign shapes.
    Shape(Bounds),
    /// Connections between two elements, drawn through the waypoints.
    Edge {
        source: ElementId,
        target: ElementId,
        waypoints: Vec<Point>,
    },
    /// The diagram root has no geometry.
    Root,
}

/// A diagram element: node, edge, label, root or foreign element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    geometry: Geometry,
    business_object: BusinessObject,
}

impl Element {
    /// A shape of the given size, placed at the origin.
    pub fn shape(id: ElementId, kind: impl Into<ElementKind>, size: Size) -> Self {
        Self {
            id,
            kind: kind.into(),
            geometry: Geometry::Shape(Bounds::new_from_top_left(Point::default(), size)),
            business_object: BusinessObject::default(),
        }
    }

    /// A connection from `source` to `target`.
    pub fn edge(
        id: ElementId,
        kind: impl Into<ElementKind>,
        source: ElementId,
        target: ElementId,
        waypoints: Vec<Point>,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            geometry: Geometry::Edge {
                source,
                target,
                waypoints,
            },
            business_object: BusinessObject::default(),
        }
    }

    /// The diagram root.
    pub fn root(id: ElementId) -> Self {
        Self {
            id,
            kind: ElementKind::Root,
            geometry: Geometry::Root,
            business_object: BusinessObject::default(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Relationship kind, for UML edges.
    pub fn connection_kind(&self) -> Option<ConnectionKind> {
        self.kind.connection()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn business_object(&self) -> &BusinessObject {
        &self.business_object
    }

    /// Bounds of a shape.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.geometry {
            Geometry::Shape(bounds) => Some(bounds),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<ElementId> {
        match self.geometry {
            Geometry::Edge { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<ElementId> {
        match self.geometry {
            Geometry::Edge { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn waypoints(&self) -> &[Point] {
        match &self.geometry {
            Geometry::Edge { waypoints, .. } => waypoints,
            _ => &[],
        }
    }

    /// Applies a property update to the business object.
    ///
    /// Returns false, leaving the element unchanged, when the update does not
    /// apply: `directed` and `crossed` outside association-family edges, a
    /// label type on anything but a label, and an owner or label type that is
    /// already set.
    pub fn update(&mut self, update: &PropertyUpdate) -> bool {
        let applies = match update {
            PropertyUpdate::Directed(_) | PropertyUpdate::Crossed(_) => self
                .connection_kind()
                .is_some_and(ConnectionKind::is_association_family),
            PropertyUpdate::BelongsTo(_) => self.business_object.belongs_to.is_none(),
            PropertyUpdate::LabelType(_) => {
                self.kind.is_label() && self.business_object.label_type.is_none()
            }
            PropertyUpdate::Text(_) => true,
        };
        if applies {
            self.business_object.apply(update);
        }
        applies
    }

    /// Changes the relationship kind of an edge. Leaving the association
    /// family clears `directed` and `crossed`. No effect on other elements.
    pub fn set_connection_kind(&mut self, kind: ConnectionKind) {
        if !self.kind.is_edge() {
            return;
        }
        self.kind = kind.into();
        if !kind.is_association_family() {
            self.business_object.directed = false;
            self.business_object.crossed = false;
        }
    }

    /// Moves or resizes a shape. No effect on edges and the root.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        if let Geometry::Shape(current) = &mut self.geometry {
            *current = bounds;
        }
    }

    /// Replaces the endpoints and route of an edge. No effect on other elements.
    pub fn set_route(&mut self, source: ElementId, target: ElementId, waypoints: Vec<Point>) {
        if let Geometry::Edge {
            source: current_source,
            target: current_target,
            waypoints: current_waypoints,
        } = &mut self.geometry
        {
            *current_source = source;
            *current_target = target;
            *current_waypoints = waypoints;
        }
    }
}
