//! UMLKit Core Types and Definitions
//!
//! This crate provides the foundational types for the UML class diagram
//! extension. It includes:
//!
//! - **Kinds**: The closed UML vocabulary of nodes, connections and labels ([`kind`] module)
//! - **Presentation**: Per-kind color and size tables ([`presentation`] module)
//! - **Identifiers**: Efficient string-interned element ids ([`identifier::ElementId`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: SVG drawing of UML shapes and connections ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod kind;
pub mod presentation;
