//! In-memory reference host.
//!
//! [`Canvas`] stores diagram elements, runs the connect and create gestures
//! and asks registered rule providers for every edit, highest priority first.
//! It implements every contract the extension consumes, so the extension can
//! be driven end to end without a graphical editor.

use std::{cmp::Reverse, collections::HashMap, fmt, rc::Rc};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};

use umlkit_core::{
    geometry::{Bounds, Point, Size},
    identifier::ElementId,
    kind::ElementKind,
};

use crate::{
    UmlError,
    actions::{ActionEntry, ActionId},
    host::{
        ContextMenuProvider, ExtensionRegistry, GestureEvent, IdPolicy, Modeling, PaletteProvider,
        ResizePolicy, RuleContext, RuleName, RuleOutcome, RuleProvider,
    },
    model::{Element, PropertyUpdate},
};

/// Id prefix for kinds without an [`IdPolicy`] override.
pub const DEFAULT_ID_PREFIX: &str = "Shape_";

/// Minimum size of shapes while resizing, unless a [`ResizePolicy`] says otherwise.
pub const DEFAULT_MIN_DIMENSIONS: Size = Size::new(20.0, 20.0);

/// Id of the diagram root.
pub const ROOT_ID: &str = "root";

/// Which end of a connection is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEnd {
    Start,
    End,
}

/// A gesture waiting for its second click.
#[derive(Debug, Clone)]
enum Gesture {
    Connect {
        source: ElementId,
        origin: Point,
        auto_activate: bool,
    },
    Create {
        shape: Element,
        origin: Point,
    },
}

impl Gesture {
    fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Create { .. } => "create",
        }
    }

    /// True when the gesture starts at, or creates a shape owned by, one of `ids`.
    fn references(&self, ids: &IndexSet<ElementId>) -> bool {
        match self {
            Self::Connect { source, .. } => ids.contains(source),
            Self::Create { shape, .. } => shape
                .business_object()
                .belongs_to()
                .is_some_and(|owner| ids.contains(&owner)),
        }
    }
}

/// Reference diagram host.
pub struct Canvas {
    elements: IndexMap<ElementId, Element>,
    root: ElementId,
    counters: HashMap<String, usize>,
    gesture: Option<Gesture>,
    rule_providers: Vec<Rc<dyn RuleProvider>>,
    menu_providers: Vec<Rc<dyn ContextMenuProvider>>,
    palette_providers: Vec<Rc<dyn PaletteProvider>>,
    id_policy: Option<Rc<dyn IdPolicy>>,
    resize_policy: Option<Rc<dyn ResizePolicy>>,
}

impl Canvas {
    /// An empty diagram holding only the root.
    pub fn new() -> Self {
        let root = ElementId::new(ROOT_ID);
        let mut elements = IndexMap::new();
        elements.insert(root, Element::root(root));

        Self {
            elements,
            root,
            counters: HashMap::new(),
            gesture: None,
            rule_providers: Vec::new(),
            menu_providers: Vec::new(),
            palette_providers: Vec::new(),
            id_policy: None,
            resize_policy: None,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Elements in insertion order, root first.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Number of elements, root included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1
    }

    /// Edges starting or ending at `id`.
    pub fn connections_of(&self, id: ElementId) -> Vec<ElementId> {
        self.elements
            .values()
            .filter(|element| element.source() == Some(id) || element.target() == Some(id))
            .map(Element::id)
            .collect()
    }

    fn get(&self, id: ElementId) -> Result<&Element, UmlError> {
        self.elements.get(&id).ok_or(UmlError::UnknownElement(id))
    }

    fn next_id(&mut self, kind: &ElementKind) -> ElementId {
        let prefix = self
            .id_policy
            .as_ref()
            .and_then(|policy| policy.id_prefix(kind))
            .unwrap_or_else(|| DEFAULT_ID_PREFIX.to_string());

        let counter = self.counters.entry(prefix.clone()).or_default();
        loop {
            *counter += 1;
            let id = ElementId::prefixed(&prefix, *counter);
            if !self.elements.contains_key(&id) {
                return id;
            }
        }
    }

    /// Asks rule providers about `rule`, highest priority first. The first
    /// answer other than [`RuleOutcome::NoOpinion`] wins.
    pub fn evaluate_rule(&self, rule: RuleName, context: &RuleContext<'_>) -> RuleOutcome {
        self.rule_providers
            .iter()
            .map(|provider| provider.evaluate(rule, context))
            .find(|outcome| *outcome != RuleOutcome::NoOpinion)
            .unwrap_or(RuleOutcome::NoOpinion)
    }

    /// True while a connect or create gesture waits for completion.
    pub fn gesture_in_progress(&self) -> bool {
        self.gesture.is_some()
    }

    /// The shape a create gesture is about to place.
    pub fn pending_shape(&self) -> Option<&Element> {
        match &self.gesture {
            Some(Gesture::Create { shape, .. }) => Some(shape),
            _ => None,
        }
    }

    /// Abandons the current gesture, if any.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            debug!(gesture = gesture.name(); "Gesture cancelled");
        }
    }

    /// Finishes a connect gesture on `target`.
    ///
    /// Returns the id of the new edge, or `None` when the rules refused the
    /// connection. Connections nobody has an opinion on are refused.
    pub fn complete_connect(&mut self, target: ElementId) -> Result<Option<ElementId>, UmlError> {
        let Some(Gesture::Connect {
            source,
            origin,
            auto_activate,
        }) = self.gesture.take()
        else {
            return Err(UmlError::NoGesture("connect"));
        };

        let outcome = {
            let context = RuleContext::new()
                .with_source(self.get(source)?)
                .with_target(self.get(target)?);
            self.evaluate_rule(RuleName::ConnectionCreate, &context)
        };

        let RuleOutcome::AllowedAs(kind) = outcome else {
            debug!(source:%, target:%, outcome:?; "Connection refused");
            return Ok(None);
        };

        let id = self.next_id(&kind.into());
        let waypoints = self.route(source, target)?;
        self.elements
            .insert(id, Element::edge(id, kind, source, target, waypoints));

        debug!(id:%, kind:%, source:%, target:%, origin:?, auto_activate; "Connection created");
        Ok(Some(id))
    }

    /// Finishes a create gesture by placing the pending shape centered at
    /// `position` inside `target` (the root when `None`).
    ///
    /// Returns the id of the placed shape, or `None` when placement was refused.
    pub fn complete_create(
        &mut self,
        position: Point,
        target: Option<ElementId>,
    ) -> Result<Option<ElementId>, UmlError> {
        let Some(Gesture::Create { mut shape, origin }) = self.gesture.take() else {
            return Err(UmlError::NoGesture("create"));
        };
        let target = target.unwrap_or(self.root);

        if let Some(owner) = shape.business_object().belongs_to() {
            if !self.elements.contains_key(&owner) {
                debug!(kind:% = shape.kind(), owner:%; "Owner gone, placement dropped");
                return Ok(None);
            }
        }

        let outcome = {
            let context = RuleContext::new()
                .with_shape(&shape)
                .with_target(self.get(target)?);
            self.evaluate_rule(RuleName::ShapeCreate, &context)
        };
        if outcome == RuleOutcome::Refused {
            debug!(kind:% = shape.kind(), target:%; "Placement refused");
            return Ok(None);
        }

        let size = shape.bounds().map(Bounds::to_size).unwrap_or_default();
        shape.set_bounds(Bounds::new_from_center(position, size));
        let id = shape.id();
        debug!(id:%, kind:% = shape.kind(), origin:?, position:?; "Shape placed");
        self.elements.insert(id, shape);

        Ok(Some(id))
    }

    /// Moves shapes by `delta`, dropping them into `target` (the root when
    /// `None`). Returns false when the move was refused.
    pub fn move_elements(
        &mut self,
        ids: &[ElementId],
        delta: Point,
        target: Option<ElementId>,
    ) -> Result<bool, UmlError> {
        let target = target.unwrap_or(self.root);
        let outcome = {
            let shapes = ids
                .iter()
                .map(|id| self.get(*id))
                .collect::<Result<Vec<_>, _>>()?;
            let context = RuleContext::new()
                .with_shapes(shapes)
                .with_target(self.get(target)?);
            self.evaluate_rule(RuleName::ElementsMove, &context)
        };
        if outcome == RuleOutcome::Refused {
            debug!(elements = ids.len(), target:%; "Move refused");
            return Ok(false);
        }

        for id in ids {
            if let Some(element) = self.elements.get_mut(id) {
                if let Some(bounds) = element.bounds() {
                    element.set_bounds(bounds.translate(delta));
                }
            }
        }
        for id in ids {
            self.reroute_connections(*id)?;
        }

        Ok(true)
    }

    /// Resizes a shape, keeping its top-left corner. The size is clamped to
    /// the minimum dimensions. Returns false when the resize was refused.
    pub fn resize(&mut self, id: ElementId, size: Size) -> Result<bool, UmlError> {
        let (outcome, minimum) = {
            let shape = self.get(id)?;
            let context = RuleContext::new().with_shape(shape);
            let minimum = self
                .resize_policy
                .as_ref()
                .and_then(|policy| policy.min_dimensions(shape))
                .unwrap_or(DEFAULT_MIN_DIMENSIONS);
            (self.evaluate_rule(RuleName::ShapeResize, &context), minimum)
        };
        if outcome == RuleOutcome::Refused {
            debug!(id:%; "Resize refused");
            return Ok(false);
        }

        let Some(element) = self.elements.get_mut(&id) else {
            return Err(UmlError::UnknownElement(id));
        };
        let Some(bounds) = element.bounds() else {
            return Ok(false);
        };
        let size = size.max(minimum);
        element.set_bounds(bounds.with_size(size));
        debug!(id:%, size:?; "Shape resized");

        self.reroute_connections(id)?;
        Ok(true)
    }

    /// Moves one end of `connection` onto `hover`. Returns false when the
    /// rules refused the new endpoint.
    pub fn reconnect(
        &mut self,
        connection: ElementId,
        end: ConnectionEnd,
        hover: ElementId,
    ) -> Result<bool, UmlError> {
        let edge = self.get(connection)?;
        let (Some(source), Some(target)) = (edge.source(), edge.target()) else {
            return Err(UmlError::UnknownElement(connection));
        };
        let rule = match end {
            ConnectionEnd::Start => RuleName::ConnectionReconnectStart,
            ConnectionEnd::End => RuleName::ConnectionReconnectEnd,
        };

        let outcome = {
            let context = RuleContext::new()
                .with_connection(edge, self.get(source)?, self.get(target)?)
                .with_hover(self.get(hover)?);
            self.evaluate_rule(rule, &context)
        };
        if !outcome.is_allowed() {
            debug!(connection:%, rule:%, hover:%, outcome:?; "Reconnect refused");
            return Ok(false);
        }

        let (source, target) = match end {
            ConnectionEnd::Start => (hover, target),
            ConnectionEnd::End => (source, hover),
        };
        let waypoints = self.route(source, target)?;
        if let Some(edge) = self.elements.get_mut(&connection) {
            edge.set_route(source, target, waypoints);
            // The edge takes the kind the rules decided for its new ends.
            if let RuleOutcome::AllowedAs(kind) = outcome {
                edge.set_connection_kind(kind);
            }
        }
        debug!(connection:%, source:%, target:%, outcome:?; "Connection reconnected");

        Ok(true)
    }

    /// Context-menu entries of every provider for an element.
    pub fn context_menu(&self, id: ElementId) -> Result<IndexMap<ActionId, ActionEntry>, UmlError> {
        let element = self.get(id)?;
        Ok(self
            .menu_providers
            .iter()
            .flat_map(|provider| provider.entries(element))
            .collect())
    }

    /// Runs a context-menu entry of an element.
    pub fn trigger_menu(
        &mut self,
        id: ElementId,
        action: &ActionId,
        event: GestureEvent,
    ) -> Result<(), UmlError> {
        let element = self.get(id)?.clone();
        let provider = self
            .menu_providers
            .iter()
            .find(|provider| provider.entries(&element).contains_key(action))
            .cloned()
            .ok_or_else(|| UmlError::UnknownAction {
                kind: element.kind().to_string(),
                action: action.clone(),
            })?;

        provider.trigger(action, &element, &event, self)
    }

    /// Palette entries of every provider.
    pub fn palette(&self) -> IndexMap<ActionId, ActionEntry> {
        self.palette_providers
            .iter()
            .flat_map(|provider| provider.entries())
            .collect()
    }

    /// Runs a palette entry.
    pub fn trigger_palette(&mut self, action: &ActionId, event: GestureEvent) -> Result<(), UmlError> {
        let provider = self
            .palette_providers
            .iter()
            .find(|provider| provider.entries().contains_key(action))
            .cloned()
            .ok_or_else(|| UmlError::UnknownAction {
                kind: "palette".to_string(),
                action: action.clone(),
            })?;

        provider.trigger(action, &event, self)
    }

    /// Sets the text shown by a label or a node.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), UmlError> {
        self.update_properties(id, PropertyUpdate::Text(text.to_string()))
    }

    /// Area an edge attaches to. Edges attach to the midpoint of their route.
    fn anchor(&self, id: ElementId) -> Result<Bounds, UmlError> {
        let element = self.get(id)?;
        if let Some(bounds) = element.bounds() {
            return Ok(bounds);
        }

        let center = match element.waypoints() {
            [first, .., last] => first.midpoint(*last),
            [only] => *only,
            [] => Point::default(),
        };
        Ok(Bounds::new_from_center(center, Size::default()))
    }

    /// Straight route between the outlines of two elements.
    fn route(&self, source: ElementId, target: ElementId) -> Result<Vec<Point>, UmlError> {
        let source = self.anchor(source)?;
        let target = self.anchor(target)?;
        Ok(vec![
            source.boundary_towards(target.center()),
            target.boundary_towards(source.center()),
        ])
    }

    fn reroute_connections(&mut self, id: ElementId) -> Result<(), UmlError> {
        for edge_id in self.connections_of(id) {
            let edge = self.get(edge_id)?;
            let (Some(source), Some(target)) = (edge.source(), edge.target()) else {
                continue;
            };
            let waypoints = self.route(source, target)?;
            if let Some(edge) = self.elements.get_mut(&edge_id) {
                edge.set_route(source, target, waypoints);
            }
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("elements", &self.elements.len())
            .field("gesture", &self.gesture)
            .field("rule_providers", &self.rule_providers.len())
            .field("menu_providers", &self.menu_providers.len())
            .field("palette_providers", &self.palette_providers.len())
            .finish()
    }
}

impl Modeling for Canvas {
    fn create_shape(&mut self, kind: ElementKind, size: Size) -> Result<Element, UmlError> {
        let id = self.next_id(&kind);
        debug!(id:%, kind:%; "Shape created");
        Ok(Element::shape(id, kind, size))
    }

    fn update_properties(&mut self, id: ElementId, update: PropertyUpdate) -> Result<(), UmlError> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(UmlError::UnknownElement(id))?;
        if element.update(&update) {
            debug!(id:%, update:?; "Properties updated");
        } else {
            debug!(id:%, kind:% = element.kind(), update:?; "Property update does not apply, ignored");
        }
        Ok(())
    }

    fn remove_elements(&mut self, ids: &[ElementId]) -> Result<(), UmlError> {
        let mut removed: IndexSet<ElementId> = IndexSet::new();
        for id in ids {
            self.get(*id)?;
            if *id != self.root {
                removed.insert(*id);
            }
        }

        // Edges and annotations of removed elements go with them.
        loop {
            let attached: Vec<ElementId> = self
                .elements
                .values()
                .filter(|element| !removed.contains(&element.id()))
                .filter(|element| {
                    [element.source(), element.target(), element.business_object().belongs_to()]
                        .into_iter()
                        .flatten()
                        .any(|id| removed.contains(&id))
                })
                .map(Element::id)
                .collect();
            if attached.is_empty() {
                break;
            }
            removed.extend(attached);
        }

        for id in &removed {
            self.elements.shift_remove(id);
        }
        if self
            .gesture
            .as_ref()
            .is_some_and(|gesture| gesture.references(&removed))
        {
            self.cancel_gesture();
        }
        debug!(requested = ids.len(), removed = removed.len(); "Elements removed");
        Ok(())
    }

    fn begin_connect(
        &mut self,
        event: &GestureEvent,
        source: ElementId,
        auto_activate: bool,
    ) -> Result<(), UmlError> {
        self.get(source)?;
        debug!(source:%, auto_activate; "Connect gesture started");
        self.gesture = Some(Gesture::Connect {
            source,
            origin: event.position(),
            auto_activate,
        });
        Ok(())
    }

    fn begin_create(&mut self, event: &GestureEvent, shape: Element) -> Result<(), UmlError> {
        debug!(id:% = shape.id(), kind:% = shape.kind(); "Create gesture started");
        self.gesture = Some(Gesture::Create {
            shape,
            origin: event.position(),
        });
        Ok(())
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }
}

impl ExtensionRegistry for Canvas {
    fn register_rule_provider(&mut self, provider: Rc<dyn RuleProvider>) {
        info!(priority = provider.priority(); "Rule provider registered");
        self.rule_providers.push(provider);
        self.rule_providers
            .sort_by_key(|provider| Reverse(provider.priority()));
    }

    fn register_context_menu_provider(&mut self, provider: Rc<dyn ContextMenuProvider>) {
        self.menu_providers.push(provider);
    }

    fn register_palette_provider(&mut self, provider: Rc<dyn PaletteProvider>) {
        self.palette_providers.push(provider);
    }

    fn register_id_policy(&mut self, policy: Rc<dyn IdPolicy>) {
        self.id_policy = Some(policy);
    }

    fn register_resize_policy(&mut self, policy: Rc<dyn ResizePolicy>) {
        self.resize_policy = Some(policy);
    }
}
