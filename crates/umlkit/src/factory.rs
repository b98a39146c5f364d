//! Element id policy.
//!
//! Connections and packages get ids prefixed with their type name
//! (`Association_3`, `Package_1`); everything else keeps the host's default.

use umlkit_core::kind::{ElementKind, NodeKind};

use crate::host::IdPolicy;

/// Prefixes ids of UML connections and packages with their type name.
#[derive(Debug, Default, Clone, Copy)]
pub struct UmlIdPolicy;

impl IdPolicy for UmlIdPolicy {
    fn id_prefix(&self, kind: &ElementKind) -> Option<String> {
        match kind {
            ElementKind::Edge(edge) => Some(format!("{}_", edge.name())),
            ElementKind::Node(NodeKind::Package) => Some(format!("{}_", NodeKind::Package.name())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use umlkit_core::kind::ConnectionKind;

    use super::*;

    #[test]
    fn test_edge_and_package_prefixes() {
        let policy = UmlIdPolicy;

        for kind in ConnectionKind::ALL {
            assert_eq!(
                policy.id_prefix(&kind.into()),
                Some(format!("{}_", kind.name()))
            );
        }
        assert_eq!(
            policy.id_prefix(&NodeKind::Package.into()).as_deref(),
            Some("Package_")
        );
    }

    #[test]
    fn test_other_kinds_use_host_default() {
        let policy = UmlIdPolicy;

        assert_eq!(policy.id_prefix(&NodeKind::Class.into()), None);
        assert_eq!(policy.id_prefix(&NodeKind::Label.into()), None);
        assert_eq!(policy.id_prefix(&ElementKind::Foreign("bpmn:Task".into())), None);
        assert_eq!(policy.id_prefix(&ElementKind::Root), None);
    }
}
