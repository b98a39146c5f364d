//! UML element vocabulary.
//!
//! Every element on a UML class diagram carries one of the kinds defined here.
//! The kinds are closed enums; the host's schema names (`uml:Class`,
//! `uml:Association`, `className`, …) are resolved into them once, when an
//! element is created, and never re-derived from strings afterwards.
//!
//! # Overview
//!
//! - [`NodeKind`] - Shapes that occupy area on the canvas, including labels
//! - [`ConnectionKind`] - Relationship kinds drawn as edges
//! - [`LabelKind`] - The role a text label plays for the element it annotates
//! - [`MarkerKind`] - Which end of a connection carries a decoration
//! - [`ElementKind`] - Any element the host may hand to the extension

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Namespace prefix shared by all UML schema type names.
pub const UML_PREFIX: &str = "uml:";

/// Error returned when a schema name does not belong to the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {vocabulary} `{name}`")]
pub struct UnknownKindError {
    vocabulary: &'static str,
    name: String,
}

impl UnknownKindError {
    fn new(vocabulary: &'static str, name: &str) -> Self {
        Self {
            vocabulary,
            name: name.to_string(),
        }
    }
}

/// Shapes of a UML class diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum NodeKind {
    Class,
    Interface,
    AbstractClass,
    Enumeration,
    Object,
    Utility,
    Library,
    /// Free text attached to another element via `belongs_to`.
    Label,
    Package,
    /// Hub of an association between more than two classifiers.
    NAryAssociationDiamond,
    /// Small box attached to a class end of an association.
    Qualifier,
    Comment,
}

impl NodeKind {
    /// All node kinds, in schema order.
    pub const ALL: [NodeKind; 12] = [
        Self::Class,
        Self::Interface,
        Self::AbstractClass,
        Self::Enumeration,
        Self::Object,
        Self::Utility,
        Self::Library,
        Self::Label,
        Self::Package,
        Self::NAryAssociationDiamond,
        Self::Qualifier,
        Self::Comment,
    ];

    /// Type name without namespace, e.g. `"AbstractClass"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::AbstractClass => "AbstractClass",
            Self::Enumeration => "Enumeration",
            Self::Object => "Object",
            Self::Utility => "Utility",
            Self::Library => "Library",
            Self::Label => "Label",
            Self::Package => "Package",
            Self::NAryAssociationDiamond => "NAryAssociationDiamond",
            Self::Qualifier => "Qualifier",
            Self::Comment => "Comment",
        }
    }

    /// Schema type name, e.g. `"uml:AbstractClass"`.
    pub fn type_name(self) -> String {
        format!("{UML_PREFIX}{}", self.name())
    }

    /// Rectangular nodes carrying a name header.
    pub fn is_classifier(self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Interface
                | Self::AbstractClass
                | Self::Enumeration
                | Self::Object
                | Self::Utility
                | Self::Library
        )
    }

    /// Stereotype shown above the name, if the kind has one.
    pub fn stereotype(self) -> Option<&'static str> {
        match self {
            Self::Interface => Some("interface"),
            Self::Enumeration => Some("enumeration"),
            Self::Utility => Some("utility"),
            Self::Library => Some("library"),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = UnknownKindError;

    /// Accepts both `"uml:Class"` and `"Class"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(UML_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownKindError::new("node kind", s))
    }
}

/// Relationship kinds of a UML class diagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ConnectionKind {
    #[default]
    Association,
    Aggregation,
    Composition,
    Extension,
    Realization,
    Dependency,
    CommentConnection,
}

impl ConnectionKind {
    /// All connection kinds, in schema order.
    pub const ALL: [ConnectionKind; 7] = [
        Self::Association,
        Self::Aggregation,
        Self::Composition,
        Self::Extension,
        Self::Realization,
        Self::Dependency,
        Self::CommentConnection,
    ];

    /// Type name without namespace, e.g. `"Realization"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Association => "Association",
            Self::Aggregation => "Aggregation",
            Self::Composition => "Composition",
            Self::Extension => "Extension",
            Self::Realization => "Realization",
            Self::Dependency => "Dependency",
            Self::CommentConnection => "CommentConnection",
        }
    }

    /// Schema type name, e.g. `"uml:Realization"`.
    pub fn type_name(self) -> String {
        format!("{UML_PREFIX}{}", self.name())
    }

    /// Association, Aggregation and Composition.
    ///
    /// Only these kinds carry the `directed` and `crossed` flags and only
    /// these may touch an n-ary association diamond.
    pub fn is_association_family(self) -> bool {
        matches!(
            self,
            Self::Association | Self::Aggregation | Self::Composition
        )
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConnectionKind {
    type Err = UnknownKindError;

    /// Accepts both `"uml:Extension"` and `"Extension"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(UML_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownKindError::new("connection kind", s))
    }
}

/// The role a label plays for the element it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelKind {
    ClassName,
    Attribute,
    Method,
    EdgeLabeling,
    SourceMultiplicity,
    TargetMultiplicity,
    EnumValue,
}

impl LabelKind {
    pub const ALL: [LabelKind; 7] = [
        Self::ClassName,
        Self::Attribute,
        Self::Method,
        Self::EdgeLabeling,
        Self::SourceMultiplicity,
        Self::TargetMultiplicity,
        Self::EnumValue,
    ];

    /// Schema value, e.g. `"sourceMultiplicity"`.
    pub fn schema_name(self) -> &'static str {
        match self {
            Self::ClassName => "className",
            Self::Attribute => "attribute",
            Self::Method => "method",
            Self::EdgeLabeling => "edgeLabeling",
            Self::SourceMultiplicity => "sourceMultiplicity",
            Self::TargetMultiplicity => "targetMultiplicity",
            Self::EnumValue => "enumValue",
        }
    }

    /// Human readable name used in action titles.
    pub fn title(self) -> &'static str {
        match self {
            Self::ClassName => "class name",
            Self::Attribute => "attribute",
            Self::Method => "method",
            Self::EdgeLabeling => "edge labeling",
            Self::SourceMultiplicity => "source multiplicity",
            Self::TargetMultiplicity => "target multiplicity",
            Self::EnumValue => "enum value",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

impl FromStr for LabelKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.schema_name() == s)
            .ok_or_else(|| UnknownKindError::new("label kind", s))
    }
}

/// Which end of a connection a marker decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }

    /// SVG attribute that references a marker at this end.
    pub fn svg_attribute(self) -> &'static str {
        match self {
            Self::Start => "marker-start",
            Self::End => "marker-end",
        }
    }
}

/// The kind of any element the host hands to the extension.
///
/// Elements whose schema name is outside the UML vocabulary are kept as
/// [`ElementKind::Foreign`] so the extension can decline to give an opinion
/// about them. The diagram root is [`ElementKind::Root`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node(NodeKind),
    Edge(ConnectionKind),
    Root,
    Foreign(String),
}

impl ElementKind {
    /// Resolve a host schema type name.
    ///
    /// Names without the UML prefix, and prefixed names that are not part of
    /// the vocabulary, become [`ElementKind::Foreign`].
    ///
    /// # Examples
    ///
    /// ```
    /// use umlkit_core::kind::{ConnectionKind, ElementKind, NodeKind};
    ///
    /// assert_eq!(ElementKind::resolve("uml:Class"), ElementKind::Node(NodeKind::Class));
    /// assert_eq!(
    ///     ElementKind::resolve("uml:Dependency"),
    ///     ElementKind::Edge(ConnectionKind::Dependency)
    /// );
    /// assert!(!ElementKind::resolve("bpmn:Task").is_uml());
    /// ```
    pub fn resolve(type_name: &str) -> Self {
        if !type_name.starts_with(UML_PREFIX) {
            return Self::Foreign(type_name.to_string());
        }
        if let Ok(node) = type_name.parse::<NodeKind>() {
            return Self::Node(node);
        }
        if let Ok(edge) = type_name.parse::<ConnectionKind>() {
            return Self::Edge(edge);
        }
        Self::Foreign(type_name.to_string())
    }

    /// True for nodes and edges of the UML vocabulary.
    pub fn is_uml(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Edge(_))
    }

    pub fn node(&self) -> Option<NodeKind> {
        match self {
            Self::Node(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn connection(&self) -> Option<ConnectionKind> {
        match self {
            Self::Edge(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_node(&self, kind: NodeKind) -> bool {
        self.node() == Some(kind)
    }

    pub fn is_label(&self) -> bool {
        self.is_node(NodeKind::Label)
    }

    /// True for anything drawn as a shape: UML nodes, labels and foreign shapes.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Foreign(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge(_))
    }

    /// Full schema type name.
    pub fn type_name(&self) -> String {
        match self {
            Self::Node(kind) => kind.type_name(),
            Self::Edge(kind) => kind.type_name(),
            Self::Root => "root".to_string(),
            Self::Foreign(name) => name.clone(),
        }
    }
}

impl From<NodeKind> for ElementKind {
    fn from(kind: NodeKind) -> Self {
        Self::Node(kind)
    }
}

impl From<ConnectionKind> for ElementKind {
    fn from(kind: ConnectionKind) -> Self {
        Self::Edge(kind)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}
