//! Relationship rule engine.
//!
//! Decides whether a connection between two elements is legal under the
//! current relationship mode, and which relationship kind it gets. Placement,
//! move and resize legality are decided here as well.
//!
//! A connection decision happens in two steps. [`RelationshipRules::evaluate`]
//! only reads the mode and returns a [`ConnectionVerdict`], which may ask for
//! the mode to change (an extension onto an interface becomes a realization, a
//! connection touching a comment becomes a comment connection).
//! [`RelationshipRules::apply_mode_override`] performs that change.
//! [`RelationshipRules::decide_connection`] runs both, unless the mode override
//! is switched off in [`RulesConfig`].

use std::fmt;

use log::debug;

use umlkit_core::kind::{ConnectionKind, ElementKind, NodeKind};

use crate::{
    config::RulesConfig,
    event::ModeState,
    host::{RuleContext, RuleName, RuleOutcome, RuleProvider},
    model::Element,
};

/// Why a connection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// An element cannot extend itself.
    SelfExtension,
    /// Interfaces only extend interfaces.
    InterfaceExtendsNonInterface,
    /// Enumerations neither extend nor get extended.
    EnumerationExtension,
    /// Only interfaces can be realized.
    RealizationTargetNotInterface,
    /// Enumerations cannot realize interfaces.
    EnumerationRealization,
    /// Only association-family edges attach to an n-ary association diamond.
    DiamondRequiresAssociation,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::SelfExtension => "an element cannot extend itself",
            Self::InterfaceExtendsNonInterface => "an interface can only extend an interface",
            Self::EnumerationExtension => "enumerations cannot take part in an extension",
            Self::RealizationTargetNotInterface => "only interfaces can be realized",
            Self::EnumerationRealization => "enumerations cannot realize an interface",
            Self::DiamondRequiresAssociation => {
                "an n-ary association diamond only accepts associations"
            }
        };
        f.write_str(reason)
    }
}

/// Result of a connection legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionVerdict {
    /// At least one endpoint is not a UML element.
    NoOpinion,
    Refused(Refusal),
    /// The connection is legal and will be created as `kind`. When
    /// `mode_override` is set, the mode state should become that kind.
    Allowed {
        kind: ConnectionKind,
        mode_override: Option<ConnectionKind>,
    },
}

impl ConnectionVerdict {
    /// Relationship kind of an allowed connection.
    pub fn kind(&self) -> Option<ConnectionKind> {
        match self {
            Self::Allowed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, Self::Refused(_))
    }

    pub fn to_outcome(self) -> RuleOutcome {
        match self {
            Self::NoOpinion => RuleOutcome::NoOpinion,
            Self::Refused(_) => RuleOutcome::Refused,
            Self::Allowed { kind, .. } => RuleOutcome::AllowedAs(kind),
        }
    }
}

/// Connection, placement and resize rules of UML class diagrams.
#[derive(Debug, Clone)]
pub struct RelationshipRules {
    mode: ModeState,
    config: RulesConfig,
}

impl RelationshipRules {
    pub fn new(mode: ModeState, config: RulesConfig) -> Self {
        Self { mode, config }
    }

    /// The mode state this engine reads and overrides.
    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Checks a connection from `source` to `target` under the current mode.
    ///
    /// Does not change the mode state.
    pub fn evaluate(&self, source: &Element, target: &Element) -> ConnectionVerdict {
        let (Some(source_kind), Some(target_kind)) = (uml_kind(source), uml_kind(target)) else {
            return ConnectionVerdict::NoOpinion;
        };

        let current = self.mode.current();
        if self.config.ignore_connection_rules() {
            return ConnectionVerdict::Allowed {
                kind: current,
                mode_override: None,
            };
        }

        let mut kind = current;
        if let Err(refusal) = check_inheritance(&mut kind, source, target, source_kind, target_kind) {
            return ConnectionVerdict::Refused(refusal);
        }

        if !kind.is_association_family()
            && (source_kind.is_node(NodeKind::NAryAssociationDiamond)
                || target_kind.is_node(NodeKind::NAryAssociationDiamond))
        {
            return ConnectionVerdict::Refused(Refusal::DiamondRequiresAssociation);
        }

        if source_kind.is_node(NodeKind::Comment) || target_kind.is_node(NodeKind::Comment) {
            kind = ConnectionKind::CommentConnection;
        }

        ConnectionVerdict::Allowed {
            kind,
            mode_override: (kind != current).then_some(kind),
        }
    }

    /// Writes the mode change requested by `verdict`, if any.
    pub fn apply_mode_override(&self, verdict: &ConnectionVerdict) {
        if let ConnectionVerdict::Allowed {
            mode_override: Some(kind),
            ..
        } = verdict
        {
            self.mode.set(*kind);
        }
    }

    /// Evaluates a connection and, when configured, applies the requested
    /// mode change.
    pub fn decide_connection(&self, source: &Element, target: &Element) -> ConnectionVerdict {
        let verdict = self.evaluate(source, target);
        debug!(
            source:% = source.id(),
            target:% = target.id(),
            mode:% = self.mode.current(),
            verdict:?;
            "Connection decided"
        );
        if self.config.carry_mode_override() {
            self.apply_mode_override(&verdict);
        }
        verdict
    }

    /// Labels may be placed anywhere; other shapes only on packages and the root.
    pub fn can_place(&self, shape: &Element, target: &Element) -> bool {
        shape.kind().is_label()
            || target.kind().is_node(NodeKind::Package)
            || *target.kind() == ElementKind::Root
    }

    /// Every moved shape must be placeable on `target`.
    pub fn can_move(&self, shapes: &[&Element], target: &Element) -> bool {
        shapes.iter().all(|shape| self.can_place(shape, target))
    }

    /// Shapes can be resized; edges and the root cannot.
    pub fn can_resize(&self, shape: &Element) -> bool {
        shape.kind().is_shape()
    }

    fn connection_outcome(&self, source: Option<&Element>, target: Option<&Element>) -> RuleOutcome {
        match (source, target) {
            (Some(source), Some(target)) => self.decide_connection(source, target).to_outcome(),
            _ => RuleOutcome::NoOpinion,
        }
    }
}

impl RuleProvider for RelationshipRules {
    fn priority(&self) -> u32 {
        self.config.priority()
    }

    fn evaluate(&self, rule: RuleName, context: &RuleContext<'_>) -> RuleOutcome {
        let outcome = match rule {
            RuleName::ConnectionCreate => self.connection_outcome(context.source(), context.target()),
            RuleName::ConnectionReconnectStart => match context.connection_ends() {
                Some((_, fixed)) => {
                    self.connection_outcome(context.hover().or(context.source()), Some(fixed))
                }
                None => RuleOutcome::NoOpinion,
            },
            RuleName::ConnectionReconnectEnd | RuleName::ConnectionReconnect => {
                match context.connection_ends() {
                    Some((fixed, _)) => {
                        self.connection_outcome(Some(fixed), context.hover().or(context.target()))
                    }
                    None => RuleOutcome::NoOpinion,
                }
            }
            RuleName::ShapeCreate => match (context.shape(), context.target()) {
                (Some(shape), Some(target)) => RuleOutcome::from_bool(self.can_place(shape, target)),
                _ => RuleOutcome::NoOpinion,
            },
            RuleName::ElementsMove => match context.target() {
                Some(target) => RuleOutcome::from_bool(self.can_move(context.shapes(), target)),
                None => RuleOutcome::NoOpinion,
            },
            RuleName::ShapeResize => match context.shape() {
                Some(shape) => RuleOutcome::from_bool(self.can_resize(shape)),
                None => RuleOutcome::NoOpinion,
            },
        };

        debug!(rule:% = rule, outcome:?; "Rule evaluated");
        outcome
    }
}

fn uml_kind(element: &Element) -> Option<&ElementKind> {
    element.kind().is_uml().then(|| element.kind())
}

/// Extension and realization constraints. May turn an extension into a
/// realization.
fn check_inheritance(
    kind: &mut ConnectionKind,
    source: &Element,
    target: &Element,
    source_kind: &ElementKind,
    target_kind: &ElementKind,
) -> Result<(), Refusal> {
    let is = |element: &ElementKind, node: NodeKind| element.is_node(node);

    match kind {
        ConnectionKind::Extension => {
            if source.id() == target.id() {
                Err(Refusal::SelfExtension)
            } else if is(source_kind, NodeKind::Interface) && !is(target_kind, NodeKind::Interface) {
                Err(Refusal::InterfaceExtendsNonInterface)
            } else if (is(source_kind, NodeKind::Class) || is(source_kind, NodeKind::AbstractClass))
                && is(target_kind, NodeKind::Interface)
            {
                *kind = ConnectionKind::Realization;
                Ok(())
            } else if is(source_kind, NodeKind::Enumeration) || is(target_kind, NodeKind::Enumeration) {
                Err(Refusal::EnumerationExtension)
            } else {
                Ok(())
            }
        }
        ConnectionKind::Realization => {
            if !is(target_kind, NodeKind::Interface) {
                Err(Refusal::RealizationTargetNotInterface)
            } else if is(source_kind, NodeKind::Enumeration) {
                Err(Refusal::EnumerationRealization)
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use umlkit_core::{geometry::Size, identifier::ElementId};

    use super::*;

    fn node(id: &str, kind: NodeKind) -> Element {
        Element::shape(ElementId::new(id), kind, Size::new(100.0, 80.0))
    }

    fn rules_in(mode: ConnectionKind) -> RelationshipRules {
        RelationshipRules::new(ModeState::new(mode), RulesConfig::default())
    }

    #[test]
    fn test_association_between_classes() {
        let rules = rules_in(ConnectionKind::Association);
        let verdict = rules.decide_connection(&node("a", NodeKind::Class), &node("b", NodeKind::Class));

        assert_eq!(
            verdict,
            ConnectionVerdict::Allowed {
                kind: ConnectionKind::Association,
                mode_override: None
            }
        );
    }

    #[test]
    fn test_self_extension_refused() {
        let rules = rules_in(ConnectionKind::Extension);
        let class = node("a", NodeKind::Class);

        assert_eq!(
            rules.decide_connection(&class, &class),
            ConnectionVerdict::Refused(Refusal::SelfExtension)
        );
    }

    #[test]
    fn test_class_extending_interface_becomes_realization() {
        let rules = rules_in(ConnectionKind::Extension);
        let verdict = rules.decide_connection(
            &node("a", NodeKind::AbstractClass),
            &node("b", NodeKind::Interface),
        );

        assert_eq!(verdict.kind(), Some(ConnectionKind::Realization));
        assert_eq!(rules.mode().current(), ConnectionKind::Realization);
    }

    #[test]
    fn test_evaluate_does_not_touch_mode() {
        let rules = rules_in(ConnectionKind::Extension);
        let verdict = rules.evaluate(&node("a", NodeKind::Class), &node("b", NodeKind::Interface));

        assert_eq!(
            verdict,
            ConnectionVerdict::Allowed {
                kind: ConnectionKind::Realization,
                mode_override: Some(ConnectionKind::Realization)
            }
        );
        assert_eq!(rules.mode().current(), ConnectionKind::Extension);

        rules.apply_mode_override(&verdict);
        assert_eq!(rules.mode().current(), ConnectionKind::Realization);
    }

    #[test]
    fn test_mode_override_can_be_disabled() {
        let rules = RelationshipRules::new(
            ModeState::new(ConnectionKind::Extension),
            RulesConfig::new(false, false, 2000),
        );
        let verdict = rules.decide_connection(&node("a", NodeKind::Class), &node("b", NodeKind::Interface));

        assert_eq!(verdict.kind(), Some(ConnectionKind::Realization));
        assert_eq!(rules.mode().current(), ConnectionKind::Extension);
    }

    #[test]
    fn test_extension_with_enumeration_refused() {
        let rules = rules_in(ConnectionKind::Extension);
        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Class), &node("b", NodeKind::Enumeration)),
            ConnectionVerdict::Refused(Refusal::EnumerationExtension)
        );
        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Enumeration), &node("b", NodeKind::Class)),
            ConnectionVerdict::Refused(Refusal::EnumerationExtension)
        );
    }

    #[test]
    fn test_interface_extends_only_interfaces() {
        let rules = rules_in(ConnectionKind::Extension);
        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Interface), &node("b", NodeKind::Class)),
            ConnectionVerdict::Refused(Refusal::InterfaceExtendsNonInterface)
        );
        assert_eq!(
            rules
                .decide_connection(&node("a", NodeKind::Interface), &node("b", NodeKind::Interface))
                .kind(),
            Some(ConnectionKind::Extension)
        );
    }

    #[test]
    fn test_realization_constraints() {
        let rules = rules_in(ConnectionKind::Realization);
        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Class), &node("b", NodeKind::Class)),
            ConnectionVerdict::Refused(Refusal::RealizationTargetNotInterface)
        );
        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Enumeration), &node("b", NodeKind::Interface)),
            ConnectionVerdict::Refused(Refusal::EnumerationRealization)
        );
        assert_eq!(
            rules
                .decide_connection(&node("a", NodeKind::Class), &node("b", NodeKind::Interface))
                .kind(),
            Some(ConnectionKind::Realization)
        );
    }

    #[test]
    fn test_diamond_requires_association_family() {
        let rules = rules_in(ConnectionKind::Dependency);
        assert_eq!(
            rules.decide_connection(
                &node("a", NodeKind::Class),
                &node("b", NodeKind::NAryAssociationDiamond)
            ),
            ConnectionVerdict::Refused(Refusal::DiamondRequiresAssociation)
        );

        rules.mode().set(ConnectionKind::Composition);
        assert_eq!(
            rules
                .decide_connection(
                    &node("a", NodeKind::NAryAssociationDiamond),
                    &node("b", NodeKind::Class)
                )
                .kind(),
            Some(ConnectionKind::Composition)
        );
    }

    #[test]
    fn test_comment_forces_comment_connection_and_carries_over() {
        let rules = rules_in(ConnectionKind::Aggregation);
        let verdict = rules.decide_connection(&node("a", NodeKind::Comment), &node("b", NodeKind::Class));

        assert_eq!(verdict.kind(), Some(ConnectionKind::CommentConnection));
        assert_eq!(rules.mode().current(), ConnectionKind::CommentConnection);

        let next = rules.decide_connection(&node("c", NodeKind::Class), &node("d", NodeKind::Class));
        assert_eq!(next.kind(), Some(ConnectionKind::CommentConnection));
    }

    #[test]
    fn test_foreign_endpoint_has_no_opinion() {
        let rules = rules_in(ConnectionKind::Association);
        let foreign = Element::shape(ElementId::new("Task_1"), ElementKind::Foreign("bpmn:Task".into()), Size::new(100.0, 80.0));

        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Class), &foreign),
            ConnectionVerdict::NoOpinion
        );
        assert_eq!(
            rules.decide_connection(&node("a", NodeKind::Class), &Element::root(ElementId::new("root"))),
            ConnectionVerdict::NoOpinion
        );
    }

    #[test]
    fn test_ignore_connection_rules() {
        let rules = RelationshipRules::new(
            ModeState::new(ConnectionKind::Extension),
            RulesConfig::new(true, true, 2000),
        );
        let class = node("a", NodeKind::Class);

        assert_eq!(
            rules.decide_connection(&class, &class),
            ConnectionVerdict::Allowed {
                kind: ConnectionKind::Extension,
                mode_override: None
            }
        );
    }

    #[test]
    fn test_placement() {
        let rules = rules_in(ConnectionKind::Association);
        let root = Element::root(ElementId::new("root"));
        let package = node("p", NodeKind::Package);
        let class = node("c", NodeKind::Class);
        let label = node("l", NodeKind::Label);

        assert!(rules.can_place(&class, &root));
        assert!(rules.can_place(&class, &package));
        assert!(!rules.can_place(&class, &node("other", NodeKind::Class)));
        assert!(rules.can_place(&label, &class));
        assert!(rules.can_move(&[], &class));
        assert!(!rules.can_move(&[&label, &class], &class));
    }

    #[test]
    fn test_resize() {
        let rules = rules_in(ConnectionKind::Association);
        let edge = Element::edge(
            ElementId::new("Association_1"),
            ConnectionKind::Association,
            ElementId::new("a"),
            ElementId::new("b"),
            vec![],
        );

        assert!(rules.can_resize(&node("l", NodeKind::Label)));
        assert!(rules.can_resize(&node("p", NodeKind::Package)));
        assert!(!rules.can_resize(&edge));
        assert!(!rules.can_resize(&Element::root(ElementId::new("root"))));
    }

    #[test]
    fn test_reconnect_endpoint_selection() {
        let rules = rules_in(ConnectionKind::Realization);
        let class = node("class", NodeKind::Class);
        let interface = node("interface", NodeKind::Interface);
        let other_class = node("other", NodeKind::Class);
        let connection = Element::edge(
            ElementId::new("Realization_1"),
            ConnectionKind::Realization,
            class.id(),
            interface.id(),
            vec![],
        );

        // Moving the start onto another class keeps the interface target.
        let start = RuleContext::new()
            .with_connection(&connection, &class, &interface)
            .with_hover(&other_class);
        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ConnectionReconnectStart, &start),
            RuleOutcome::AllowedAs(ConnectionKind::Realization)
        );

        // Moving the end onto a class is not a realization any more.
        let end = RuleContext::new()
            .with_connection(&connection, &class, &interface)
            .with_hover(&other_class);
        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ConnectionReconnectEnd, &end),
            RuleOutcome::Refused
        );
    }

    #[test]
    fn test_reconnect_fixed_end_comes_from_connection() {
        let rules = rules_in(ConnectionKind::Realization);
        let class = node("class", NodeKind::Class);
        let interface = node("interface", NodeKind::Interface);
        let other_interface = node("other-interface", NodeKind::Interface);
        let enumeration = node("enum", NodeKind::Enumeration);
        let drop_target = node("drop", NodeKind::Class);
        let connection = Element::edge(
            ElementId::new("Realization_1"),
            ConnectionKind::Realization,
            class.id(),
            interface.id(),
            vec![],
        );

        // `target` names the drop position, not the edge's target.
        let start = RuleContext::new()
            .with_connection(&connection, &class, &interface)
            .with_target(&drop_target)
            .with_hover(&drop_target);
        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ConnectionReconnectStart, &start),
            RuleOutcome::AllowedAs(ConnectionKind::Realization)
        );

        let end = RuleContext::new()
            .with_connection(&connection, &class, &interface)
            .with_source(&enumeration)
            .with_target(&other_interface);
        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ConnectionReconnectEnd, &end),
            RuleOutcome::AllowedAs(ConnectionKind::Realization)
        );
    }

    #[test]
    fn test_reconnect_without_connection_has_no_opinion() {
        let rules = rules_in(ConnectionKind::Association);
        let (a, b) = (node("a", NodeKind::Class), node("b", NodeKind::Class));
        let context = RuleContext::new().with_source(&a).with_target(&b);

        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ConnectionReconnect, &context),
            RuleOutcome::NoOpinion
        );
    }

    #[test]
    fn test_rule_provider_shape_rules() {
        let rules = rules_in(ConnectionKind::Association);
        let class = node("c", NodeKind::Class);
        let root = Element::root(ElementId::new("root"));

        let create = RuleContext::new().with_shape(&class).with_target(&root);
        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ShapeCreate, &create),
            RuleOutcome::Allowed
        );

        let resize = RuleContext::new().with_shape(&root);
        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ShapeResize, &resize),
            RuleOutcome::Refused
        );

        assert_eq!(
            RuleProvider::evaluate(&rules, RuleName::ElementsMove, &RuleContext::new()),
            RuleOutcome::NoOpinion
        );
        assert_eq!(rules.priority(), 2000);
    }
}
