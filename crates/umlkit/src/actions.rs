//! Context-menu action catalog.
//!
//! Two declarative tables drive the context menu: which actions each element
//! kind offers, in display order, and what every action does. The catalog
//! checks at construction that every listed action has a behavior.
//!
//! Connect actions first announce the chosen relationship kind on the
//! [`EventBus`] and only then start the host's connect gesture, so the rule
//! engine already sees the new mode when the gesture asks for its first
//! decision.

use std::{borrow::Borrow, collections::HashMap, fmt, rc::Rc};

use indexmap::IndexMap;
use log::{debug, info};

use umlkit_core::{
    kind::{ConnectionKind, ElementKind, LabelKind, NodeKind},
    presentation::{Presentation, color_entry},
};

use crate::{
    UmlError,
    event::{EventBus, UmlEvent},
    host::{ContextMenuProvider, GestureEvent, Modeling},
    model::{BusinessObject, Element, PropertyUpdate},
};

/// Identifier of a context-menu or palette action, e.g. `"addAttribute"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What the host shows for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    group: String,
    class_name: String,
    title: String,
}

impl ActionEntry {
    pub fn new(group: &str, class_name: &str, title: &str) -> Self {
        Self {
            group: group.to_string(),
            class_name: class_name.to_string(),
            title: title.to_string(),
        }
    }

    /// Group the host clusters entries by.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Icon class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Boolean business object flags of association-family edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Directed,
    Crossed,
}

impl Flag {
    fn get(self, business_object: &BusinessObject) -> bool {
        match self {
            Self::Directed => business_object.directed(),
            Self::Crossed => business_object.crossed(),
        }
    }

    fn update(self, value: bool) -> PropertyUpdate {
        match self {
            Self::Directed => PropertyUpdate::Directed(value),
            Self::Crossed => PropertyUpdate::Crossed(value),
        }
    }
}

/// What triggering an action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Remove the element.
    Remove,
    /// Select the relationship kind, then start connecting from the element.
    Connect(ConnectionKind),
    /// Create a label of this kind belonging to the element.
    AddLabel(LabelKind),
    /// Flip a flag of the element.
    Toggle(Flag),
    /// Create a qualifier belonging to the element.
    AttachQualifier,
}

/// An action: its menu entry and its behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    entry: ActionEntry,
    behavior: Behavior,
}

impl Action {
    pub fn new(entry: ActionEntry, behavior: Behavior) -> Self {
        Self { entry, behavior }
    }

    pub fn entry(&self) -> &ActionEntry {
        &self.entry
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }
}

fn connect_action(kind: ConnectionKind) -> Action {
    let group = if kind.is_association_family() {
        "association"
    } else {
        "otherEdge"
    };
    let color = color_entry(&kind.into()).map_or("", |entry| entry.name());
    let class_name = format!("uml-icon-{} {color}", kind.name().to_lowercase());

    Action::new(
        ActionEntry::new(group, class_name.trim_end(), &format!("Connect using UML {kind}")),
        Behavior::Connect(kind),
    )
}

fn label_action(kind: LabelKind) -> Action {
    Action::new(
        ActionEntry::new("addLabel", "uml-icon-label", &format!("Add {}", kind.title())),
        Behavior::AddLabel(kind),
    )
}

/// Every action the default catalog knows, keyed by id.
pub fn default_actions() -> IndexMap<ActionId, Action> {
    let mut actions = IndexMap::new();

    actions.insert(
        ActionId::from("remove"),
        Action::new(
            ActionEntry::new("remove", "uml-icon-trash", "Remove UML element"),
            Behavior::Remove,
        ),
    );
    for kind in [
        ConnectionKind::Association,
        ConnectionKind::Aggregation,
        ConnectionKind::Composition,
        ConnectionKind::Dependency,
        ConnectionKind::Extension,
        ConnectionKind::Realization,
    ] {
        actions.insert(ActionId::new(kind.name().to_lowercase()), connect_action(kind));
    }
    for (id, kind) in [
        ("addClassName", LabelKind::ClassName),
        ("addAttribute", LabelKind::Attribute),
        ("addMethod", LabelKind::Method),
        ("addEnumValue", LabelKind::EnumValue),
        ("addSourceMultiplicity", LabelKind::SourceMultiplicity),
        ("addTargetMultiplicity", LabelKind::TargetMultiplicity),
        ("addEdgeLabeling", LabelKind::EdgeLabeling),
    ] {
        actions.insert(ActionId::from(id), label_action(kind));
    }
    actions.insert(
        ActionId::from("changeDirected"),
        Action::new(
            ActionEntry::new(
                "changeDirected",
                "uml-icon-directed",
                "Change connection to directed or undirected",
            ),
            Behavior::Toggle(Flag::Directed),
        ),
    );
    actions.insert(
        ActionId::from("changeCrossed"),
        Action::new(
            ActionEntry::new(
                "changeCrossed",
                "uml-icon-crossed",
                "Change connection to crossed or uncrossed",
            ),
            Behavior::Toggle(Flag::Crossed),
        ),
    );
    actions.insert(
        ActionId::from("addQualifier"),
        Action::new(
            ActionEntry::new("addQualifier", "uml-icon-qualifier", "Attach qualifier"),
            Behavior::AttachQualifier,
        ),
    );

    actions
}

const CONNECT: [&str; 4] = ["association", "aggregation", "composition", "dependency"];
const CLASS_LABELS: [&str; 3] = ["addClassName", "addAttribute", "addMethod"];

/// Ordered action ids per element kind. Every kind starts with `remove`.
pub fn default_table() -> Vec<(ElementKind, Vec<ActionId>)> {
    fn ids(groups: &[&[&str]]) -> Vec<ActionId> {
        std::iter::once("remove")
            .chain(groups.iter().flat_map(|group| group.iter().copied()))
            .map(ActionId::from)
            .collect()
    }

    let mut table = Vec::new();

    for kind in [NodeKind::Class, NodeKind::AbstractClass] {
        table.push((
            kind.into(),
            ids(&[&CONNECT, &["extension", "realization"], &CLASS_LABELS, &["addQualifier"]]),
        ));
    }
    table.push((
        NodeKind::Interface.into(),
        ids(&[&CONNECT, &["extension"], &CLASS_LABELS, &["addQualifier"]]),
    ));
    table.push((
        NodeKind::Enumeration.into(),
        ids(&[&CONNECT, &["addClassName", "addEnumValue"]]),
    ));
    for kind in [
        NodeKind::Object,
        NodeKind::Utility,
        NodeKind::Library,
        NodeKind::Package,
        NodeKind::NAryAssociationDiamond,
        NodeKind::Comment,
    ] {
        table.push((kind.into(), ids(&[&CONNECT])));
    }
    for kind in [NodeKind::Qualifier, NodeKind::Label] {
        table.push((kind.into(), ids(&[])));
    }
    for kind in ConnectionKind::ALL {
        if kind.is_association_family() {
            table.push((
                kind.into(),
                ids(&[&[
                    "changeDirected",
                    "changeCrossed",
                    "addSourceMultiplicity",
                    "addTargetMultiplicity",
                    "addEdgeLabeling",
                ]]),
            ));
        } else {
            table.push((kind.into(), ids(&[&["addEdgeLabeling"]])));
        }
    }

    table
}

/// Context-menu provider for UML elements.
#[derive(Debug)]
pub struct ActionCatalog {
    actions: IndexMap<ActionId, Action>,
    table: HashMap<ElementKind, Vec<ActionId>>,
    bus: Rc<EventBus>,
    presentation: Presentation,
}

impl ActionCatalog {
    /// Catalog with the default tables.
    pub fn new(bus: Rc<EventBus>, presentation: Presentation) -> Result<Self, UmlError> {
        Self::with_tables(bus, presentation, default_actions(), default_table())
    }

    /// Catalog with custom tables.
    ///
    /// # Errors
    ///
    /// Returns [`UmlError::DanglingAction`] if the kind table lists an action
    /// id that `actions` does not define.
    pub fn with_tables(
        bus: Rc<EventBus>,
        presentation: Presentation,
        actions: IndexMap<ActionId, Action>,
        table: impl IntoIterator<Item = (ElementKind, Vec<ActionId>)>,
    ) -> Result<Self, UmlError> {
        let table: HashMap<_, _> = table.into_iter().collect();

        for (kind, ids) in &table {
            if let Some(action) = ids.iter().find(|id| !actions.contains_key(*id)) {
                return Err(UmlError::DanglingAction {
                    kind: kind.to_string(),
                    action: action.clone(),
                });
            }
        }

        info!(actions = actions.len(), kinds = table.len(); "Action catalog built");
        Ok(Self {
            actions,
            table,
            bus,
            presentation,
        })
    }

    /// Action ids offered for `kind`, in display order.
    pub fn actions_for(&self, kind: &ElementKind) -> &[ActionId] {
        self.table.get(kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    fn create_attached(
        &self,
        element: &Element,
        kind: NodeKind,
        label_type: Option<LabelKind>,
        event: &GestureEvent,
        host: &mut dyn Modeling,
    ) -> Result<(), UmlError> {
        let owner_kind = element.kind();
        if !owner_kind.is_uml() || owner_kind.is_label() {
            return Err(UmlError::InvalidLabelOwner {
                owner: element.id(),
                kind: owner_kind.to_string(),
                shape: kind.name(),
            });
        }

        let shape_kind = ElementKind::Node(kind);
        let size = self.presentation.size_of(&shape_kind);
        let mut shape = host.create_shape(shape_kind, size)?;
        shape.update(&PropertyUpdate::BelongsTo(element.id()));
        if let Some(label_type) = label_type {
            shape.update(&PropertyUpdate::LabelType(label_type));
        }
        host.begin_create(event, shape)
    }
}

impl ContextMenuProvider for ActionCatalog {
    fn entries(&self, element: &Element) -> IndexMap<ActionId, ActionEntry> {
        self.actions_for(element.kind())
            .iter()
            .filter_map(|id| {
                self.actions
                    .get(id)
                    .map(|action| (id.clone(), action.entry().clone()))
            })
            .collect()
    }

    fn trigger(
        &self,
        action: &ActionId,
        element: &Element,
        event: &GestureEvent,
        host: &mut dyn Modeling,
    ) -> Result<(), UmlError> {
        let unknown = || UmlError::UnknownAction {
            kind: element.kind().to_string(),
            action: action.clone(),
        };
        if !self.actions_for(element.kind()).contains(action) {
            return Err(unknown());
        }
        let behavior = self.actions.get(action).ok_or_else(unknown)?.behavior();

        debug!(action:% = action, element:% = element.id(), behavior:?; "Triggering action");

        match behavior {
            Behavior::Remove => host.remove_elements(&[element.id()]),
            Behavior::Connect(kind) => {
                self.bus.publish(UmlEvent::RelationshipKindSelected(kind));
                host.begin_connect(event, element.id(), true)
            }
            Behavior::AddLabel(label_type) => {
                self.create_attached(element, NodeKind::Label, Some(label_type), event, host)
            }
            Behavior::AttachQualifier => {
                self.create_attached(element, NodeKind::Qualifier, None, event, host)
            }
            Behavior::Toggle(flag) => {
                let value = !flag.get(element.business_object());
                host.update_properties(element.id(), flag.update(value))
            }
        }
    }
}
