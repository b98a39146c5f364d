//! Contracts between the extension and the hosting diagram editor.
//!
//! The host owns the canvas, element storage and gestures. It calls into the
//! extension through provider traits ([`RuleProvider`],
//! [`ContextMenuProvider`], [`PaletteProvider`], [`IdPolicy`],
//! [`ResizePolicy`]) that are registered on its [`ExtensionRegistry`]. The
//! extension calls back into the host through [`Modeling`].

use std::{fmt, rc::Rc, str::FromStr};

use indexmap::IndexMap;

use umlkit_core::{
    geometry::{Point, Size},
    identifier::ElementId,
    kind::{ConnectionKind, ElementKind},
};

use crate::{
    UmlError,
    actions::{ActionEntry, ActionId},
    model::{Element, PropertyUpdate},
};

/// Pointer event that started an action or gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureEvent {
    position: Point,
}

impl GestureEvent {
    pub fn at(position: Point) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Element operations the host exposes to the extension.
pub trait Modeling {
    /// Creates a detached shape of the given kind and size with a fresh id.
    fn create_shape(&mut self, kind: ElementKind, size: Size) -> Result<Element, UmlError>;

    /// Changes one business object property of an element on the canvas.
    fn update_properties(&mut self, id: ElementId, update: PropertyUpdate) -> Result<(), UmlError>;

    /// Removes elements and everything attached to them.
    fn remove_elements(&mut self, ids: &[ElementId]) -> Result<(), UmlError>;

    /// Starts an interactive connect gesture from `source`.
    fn begin_connect(
        &mut self,
        event: &GestureEvent,
        source: ElementId,
        auto_activate: bool,
    ) -> Result<(), UmlError>;

    /// Starts an interactive create gesture that places `shape`.
    fn begin_create(&mut self, event: &GestureEvent, shape: Element) -> Result<(), UmlError>;

    /// Looks up an element on the canvas.
    fn element(&self, id: ElementId) -> Option<&Element>;
}

/// Rules the host asks providers about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleName {
    ConnectionCreate,
    ConnectionReconnectStart,
    ConnectionReconnectEnd,
    ConnectionReconnect,
    ShapeCreate,
    ElementsMove,
    ShapeResize,
}

impl RuleName {
    pub const ALL: [RuleName; 7] = [
        Self::ConnectionCreate,
        Self::ConnectionReconnectStart,
        Self::ConnectionReconnectEnd,
        Self::ConnectionReconnect,
        Self::ShapeCreate,
        Self::ElementsMove,
        Self::ShapeResize,
    ];

    /// Rule name as used by the host, e.g. `"connection.reconnectStart"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::ConnectionCreate => "connection.create",
            Self::ConnectionReconnectStart => "connection.reconnectStart",
            Self::ConnectionReconnectEnd => "connection.reconnectEnd",
            Self::ConnectionReconnect => "connection.reconnect",
            Self::ShapeCreate => "shape.create",
            Self::ElementsMove => "elements.move",
            Self::ShapeResize => "shape.resize",
        }
    }

    /// True for the rules that answer with a relationship kind.
    pub fn is_connection_rule(self) -> bool {
        matches!(
            self,
            Self::ConnectionCreate
                | Self::ConnectionReconnectStart
                | Self::ConnectionReconnectEnd
                | Self::ConnectionReconnect
        )
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| format!("unknown rule `{s}`"))
    }
}

/// Elements involved in a rule query. Which fields are set depends on the rule.
///
/// For the reconnect rules `connection` carries the edge together with the
/// elements at its current ends. The end that stays in place is read from
/// there; the dragged end is `hover`, or `source`/`target` when no element is
/// hovered.
#[derive(Debug, Clone, Default)]
pub struct RuleContext<'a> {
    source: Option<&'a Element>,
    target: Option<&'a Element>,
    shape: Option<&'a Element>,
    shapes: Vec<&'a Element>,
    connection: Option<ConnectionRef<'a>>,
    hover: Option<&'a Element>,
}

/// An edge and the elements at its two ends.
#[derive(Debug, Clone, Copy)]
struct ConnectionRef<'a> {
    edge: &'a Element,
    source: &'a Element,
    target: &'a Element,
}

impl<'a> RuleContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: &'a Element) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: &'a Element) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_shape(mut self, shape: &'a Element) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_shapes(mut self, shapes: Vec<&'a Element>) -> Self {
        self.shapes = shapes;
        self
    }

    /// The edge being reconnected, with the elements at its current source
    /// and target.
    pub fn with_connection(
        mut self,
        connection: &'a Element,
        source: &'a Element,
        target: &'a Element,
    ) -> Self {
        self.connection = Some(ConnectionRef {
            edge: connection,
            source,
            target,
        });
        self
    }

    pub fn with_hover(mut self, hover: &'a Element) -> Self {
        self.hover = Some(hover);
        self
    }

    pub fn source(&self) -> Option<&'a Element> {
        self.source
    }

    pub fn target(&self) -> Option<&'a Element> {
        self.target
    }

    pub fn shape(&self) -> Option<&'a Element> {
        self.shape
    }

    pub fn shapes(&self) -> &[&'a Element] {
        &self.shapes
    }

    pub fn connection(&self) -> Option<&'a Element> {
        self.connection.map(|connection| connection.edge)
    }

    /// Elements at the current source and target of `connection`.
    pub fn connection_ends(&self) -> Option<(&'a Element, &'a Element)> {
        self.connection
            .map(|connection| (connection.source, connection.target))
    }

    pub fn hover(&self) -> Option<&'a Element> {
        self.hover
    }
}

/// Answer of a rule provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The provider does not decide; the host asks the next one.
    NoOpinion,
    Refused,
    Allowed,
    /// A connection rule allowed the connection with this kind.
    AllowedAs(ConnectionKind),
}

impl RuleOutcome {
    pub fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Refused }
    }

    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed | Self::AllowedAs(_))
    }
}

/// Legality decisions consulted by the host, highest priority first.
pub trait RuleProvider {
    fn priority(&self) -> u32;

    fn evaluate(&self, rule: RuleName, context: &RuleContext<'_>) -> RuleOutcome;
}

/// Context-menu entries for an element.
pub trait ContextMenuProvider {
    /// Entries in display order. Unknown kinds yield an empty map.
    fn entries(&self, element: &Element) -> IndexMap<ActionId, ActionEntry>;

    /// Runs one of the element's entries.
    fn trigger(
        &self,
        action: &ActionId,
        element: &Element,
        event: &GestureEvent,
        host: &mut dyn Modeling,
    ) -> Result<(), UmlError>;
}

/// Palette entries that create new shapes.
pub trait PaletteProvider {
    fn entries(&self) -> IndexMap<ActionId, ActionEntry>;

    fn trigger(
        &self,
        action: &ActionId,
        event: &GestureEvent,
        host: &mut dyn Modeling,
    ) -> Result<(), UmlError>;
}

/// Overrides the host's id prefixes for some element kinds.
pub trait IdPolicy {
    /// Prefix for new ids of `kind`, or `None` for the host default.
    fn id_prefix(&self, kind: &ElementKind) -> Option<String>;
}

/// Overrides the host's minimum dimensions while resizing.
pub trait ResizePolicy {
    /// Minimum size for `shape`, or `None` for the host default.
    fn min_dimensions(&self, shape: &Element) -> Option<Size>;
}

/// Extension points of the host.
pub trait ExtensionRegistry {
    fn register_rule_provider(&mut self, provider: Rc<dyn RuleProvider>);

    fn register_context_menu_provider(&mut self, provider: Rc<dyn ContextMenuProvider>);

    fn register_palette_provider(&mut self, provider: Rc<dyn PaletteProvider>);

    fn register_id_policy(&mut self, policy: Rc<dyn IdPolicy>);

    fn register_resize_policy(&mut self, policy: Rc<dyn ResizePolicy>);
}
