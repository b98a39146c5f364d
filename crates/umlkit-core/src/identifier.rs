//! Element identifiers backed by a string interner
//!
//! Diagram elements are referenced constantly (rule queries, `belongs_to`
//! back-references, removal lists), so [`ElementId`] is a `Copy` handle into a
//! process-wide interner rather than an owned string.

use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for element identifiers.
///
/// # Thread Safety
///
/// Access is serialized through a `Mutex`.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Identifier of a diagram element.
///
/// # Examples
///
/// ```
/// use umlkit_core::identifier::ElementId;
///
/// let class_id = ElementId::new("Shape_1");
/// let edge_id = ElementId::prefixed("Association_", 3);
///
/// assert_eq!(edge_id, "Association_3");
/// assert_ne!(class_id, edge_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(DefaultSymbol);

impl ElementId {
    /// Creates an `ElementId` from its textual form.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an id of the form `{prefix}{index}`.
    pub fn prefixed(prefix: &str, index: usize) -> Self {
        Self::new(&format!("{prefix}{index}"))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = interner();
        let name = guard.resolve(self.0).unwrap_or_default();
        f.write_str(name)
    }
}

impl FromStr for ElementId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ElementId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        interner()
            .resolve(self.0)
            .is_some_and(|name| name == other)
    }
}

impl PartialEq<&str> for ElementId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
