//! Per-editor signal bus and relationship mode state.
//!
//! A context-menu connect action announces the relationship kind it is about
//! to draw on the [`EventBus`]; the rule engine listens and stores the kind in
//! the shared [`ModeState`]. Both live inside one editor instance and are
//! shared through `Rc`, never across threads.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use log::debug;

use umlkit_core::kind::ConnectionKind;

/// Signals published by the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UmlEvent {
    /// The user picked the relationship kind for the next connection.
    RelationshipKindSelected(ConnectionKind),
}

type Listener = Box<dyn Fn(&UmlEvent)>;

/// Synchronous publish/subscribe bus.
///
/// Listeners run in subscription order on the publishing call stack.
///
/// # Examples
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use umlkit::event::{EventBus, UmlEvent};
/// use umlkit_core::kind::ConnectionKind;
///
/// let bus = EventBus::new();
/// let seen = Rc::new(Cell::new(None));
/// let sink = Rc::clone(&seen);
/// bus.subscribe(move |event| {
///     let UmlEvent::RelationshipKindSelected(kind) = event;
///     sink.set(Some(*kind));
/// });
///
/// bus.publish(UmlEvent::RelationshipKindSelected(ConnectionKind::Dependency));
/// assert_eq!(seen.get(), Some(ConnectionKind::Dependency));
/// ```
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for every published event.
    pub fn subscribe(&self, listener: impl Fn(&UmlEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Delivers `event` to every listener.
    ///
    /// Listeners must not subscribe while being notified.
    pub fn publish(&self, event: UmlEvent) {
        debug!(event:?; "Publishing event");
        for listener in self.listeners.borrow().iter() {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// The relationship kind the next connection will be created with.
///
/// Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct ModeState(Rc<Cell<ConnectionKind>>);

impl ModeState {
    pub fn new(kind: ConnectionKind) -> Self {
        Self(Rc::new(Cell::new(kind)))
    }

    pub fn current(&self) -> ConnectionKind {
        self.0.get()
    }

    pub fn set(&self, kind: ConnectionKind) {
        let previous = self.0.replace(kind);
        if previous != kind {
            debug!(from:% = previous, to:% = kind; "Relationship mode changed");
        }
    }

    /// Keeps this state in sync with relationship kind selections on `bus`.
    pub fn follow(&self, bus: &EventBus) {
        let mode = self.clone();
        bus.subscribe(move |event| match event {
            UmlEvent::RelationshipKindSelected(kind) => mode.set(*kind),
        });
    }
}
