//! Error types for umlkit operations.
//!
//! Refusing a connection or a placement is not an error: rule decisions are
//! returned as values. [`UmlError`] covers genuine failures such as invalid
//! configuration, a corrupt action table or misuse of the reference host.

use std::io;

use thiserror::Error;

use umlkit_core::{color::ColorError, identifier::ElementId};

use crate::actions::ActionId;

/// The main error type for umlkit operations.
#[derive(Debug, Error)]
pub enum UmlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("action `{action}` listed for `{kind}` has no behavior")]
    DanglingAction { kind: String, action: ActionId },

    #[error("unknown element `{0}`")]
    UnknownElement(ElementId),

    #[error("action `{action}` is not offered for `{kind}`")]
    UnknownAction { kind: String, action: ActionId },

    #[error("`{owner}` ({kind}) cannot own a {shape}")]
    InvalidLabelOwner {
        owner: ElementId,
        kind: String,
        shape: &'static str,
    },

    #[error("no {0} gesture in progress")]
    NoGesture(&'static str),

    #[error("Session error: {0}")]
    Script(String),
}

impl From<ColorError> for UmlError {
    fn from(err: ColorError) -> Self {
        Self::Config(err.to_string())
    }
}
