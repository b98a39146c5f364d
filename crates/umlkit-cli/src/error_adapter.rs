//! Error adapter for converting UmlError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use umlkit::UmlError;

/// Adapter giving a [`UmlError`] a stable diagnostic code and help text.
pub struct ErrorAdapter(pub UmlError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            UmlError::Io(_) => "umlkit::io",
            UmlError::Config(_) => "umlkit::config",
            UmlError::DanglingAction { .. } | UmlError::UnknownAction { .. } => "umlkit::action",
            UmlError::UnknownElement(_) | UmlError::InvalidLabelOwner { .. } => "umlkit::element",
            UmlError::NoGesture(_) => "umlkit::gesture",
            UmlError::Script(_) => "umlkit::session",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            UmlError::Io(_) => return None,
            UmlError::Config(_) => "check the [rules] and [style] sections of the configuration file",
            UmlError::DanglingAction { .. } => "every action listed for a kind needs a behavior",
            UmlError::UnknownAction { .. } => "only the entries of the element's context menu can be triggered",
            UmlError::UnknownElement(_) => "the element may have been removed by an earlier step",
            UmlError::InvalidLabelOwner { .. } => "labels and qualifiers belong to UML nodes and edges",
            UmlError::NoGesture(_) => "start the gesture with a `palette`, `menu` or `connect` step first",
            UmlError::Script(_) => "see the session script format in the umlkit-cli README",
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
