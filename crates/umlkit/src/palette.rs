//! Palette of creatable UML shapes.

use indexmap::IndexMap;
use log::debug;

use umlkit_core::{
    kind::{ElementKind, NodeKind},
    presentation::Presentation,
};

use crate::{
    UmlError,
    actions::{ActionEntry, ActionId},
    host::{GestureEvent, Modeling, PaletteProvider},
};

/// Palette rows: node kind, group, display name.
const PALETTE: [(NodeKind, &str, &str); 10] = [
    (NodeKind::Class, "classifier", "Class"),
    (NodeKind::Interface, "classifier", "Interface"),
    (NodeKind::AbstractClass, "classifier", "Abstract Class"),
    (NodeKind::Enumeration, "classifier", "Enumeration"),
    (NodeKind::Object, "classifier", "Object"),
    (NodeKind::Utility, "classifier", "Utility"),
    (NodeKind::Library, "classifier", "Library"),
    (NodeKind::Package, "container", "Package"),
    (NodeKind::NAryAssociationDiamond, "association", "N-ary Association"),
    (NodeKind::Comment, "annotation", "Comment"),
];

/// Palette id of a node kind, e.g. `create.abstract-class`.
pub fn palette_id(kind: NodeKind) -> ActionId {
    let mut id = String::from("create.");
    for (idx, ch) in kind.name().chars().enumerate() {
        if ch.is_ascii_uppercase() && idx > 0 {
            id.push('-');
        }
        id.push(ch.to_ascii_lowercase());
    }
    ActionId::new(id)
}

#[derive(Debug, Clone)]
struct PaletteItem {
    kind: NodeKind,
    entry: ActionEntry,
}

/// One creation entry per creatable node kind.
#[derive(Debug, Clone)]
pub struct PaletteCatalog {
    items: IndexMap<ActionId, PaletteItem>,
    presentation: Presentation,
}

impl PaletteCatalog {
    pub fn new(presentation: Presentation) -> Self {
        let items = PALETTE
            .into_iter()
            .map(|(kind, group, name)| {
                let class_name = format!("uml-icon-{}", kind.name().to_lowercase());
                let entry = ActionEntry::new(group, &class_name, &format!("Create UML {name}"));
                (palette_id(kind), PaletteItem { kind, entry })
            })
            .collect();

        Self {
            items,
            presentation,
        }
    }

    /// Node kind created by a palette entry.
    pub fn kind_of(&self, action: &str) -> Option<NodeKind> {
        self.items.get(action).map(|item| item.kind)
    }
}

impl PaletteProvider for PaletteCatalog {
    fn entries(&self) -> IndexMap<ActionId, ActionEntry> {
        self.items
            .iter()
            .map(|(id, item)| (id.clone(), item.entry.clone()))
            .collect()
    }

    fn trigger(
        &self,
        action: &ActionId,
        event: &GestureEvent,
        host: &mut dyn Modeling,
    ) -> Result<(), UmlError> {
        let kind = self
            .kind_of(action.as_str())
            .ok_or_else(|| UmlError::UnknownAction {
                kind: "palette".to_string(),
                action: action.clone(),
            })?;

        let kind = ElementKind::Node(kind);
        let size = self.presentation.size_of(&kind);
        debug!(action:% = action, kind:%; "Creating shape from palette");

        let shape = host.create_shape(kind, size)?;
        host.begin_create(event, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_ids() {
        assert_eq!(palette_id(NodeKind::Class).as_str(), "create.class");
        assert_eq!(palette_id(NodeKind::AbstractClass).as_str(), "create.abstract-class");
        assert_eq!(
            palette_id(NodeKind::NAryAssociationDiamond).as_str(),
            "create.n-ary-association-diamond"
        );
    }

    #[test]
    fn test_palette_entries() {
        let palette = PaletteCatalog::new(Presentation::default());
        let entries = palette.entries();

        assert_eq!(entries.len(), 10);
        assert_eq!(entries["create.package"].group(), "container");
        assert_eq!(entries["create.comment"].group(), "annotation");
        assert_eq!(entries["create.interface"].title(), "Create UML Interface");
        assert_eq!(palette.kind_of("create.label"), None);
        assert_eq!(palette.kind_of("create.qualifier"), None);
    }
}
