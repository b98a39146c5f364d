//! Session scripts: editing steps replayed against the reference canvas.
//!
//! A session is a TOML file holding an ordered list of `[[step]]` tables.
//! Each step names its operation in `op`. Elements are referred to by names
//! local to the script, bound by the steps that create them.
//!
//! ```toml
//! [[step]]
//! op = "create"
//! kind = "Class"
//! name = "order"
//! at = [100, 100]
//!
//! [[step]]
//! op = "connect"
//! source = "order"
//! action = "composition"
//! target = "line"
//! name = "lines"
//! ```
//!
//! Steps that the rules may refuse accept an `expect` of `"allowed"` or
//! `"refused"`; a different outcome aborts the replay.

use std::collections::HashMap;

use log::{debug, info};
use serde::Deserialize;

use umlkit::{
    UmlError,
    actions::ActionId,
    canvas::{Canvas, ConnectionEnd},
    geometry::{Point, Size},
    host::{GestureEvent, Modeling},
    identifier::ElementId,
    kind::NodeKind,
    palette::palette_id,
};

/// A parsed session script.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(default, rename = "step")]
    steps: Vec<Step>,
}

impl Session {
    /// Parses a session script.
    ///
    /// # Errors
    ///
    /// Returns [`UmlError::Script`] for malformed TOML or unknown operations.
    pub fn parse(source: &str) -> Result<Self, UmlError> {
        toml::from_str(source).map_err(|err| UmlError::Script(err.to_string()))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Expected rule decision for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expect {
    Allowed,
    Refused,
}

/// Which end of a connection a `reconnect` step moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum End {
    Start,
    End,
}

impl From<End> for ConnectionEnd {
    fn from(end: End) -> Self {
        match end {
            End::Start => Self::Start,
            End::End => Self::End,
        }
    }
}

/// One editing step.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    /// Pick a node kind from the palette and place it.
    Create {
        kind: NodeKind,
        name: String,
        at: [f32; 2],
        into: Option<String>,
        expect: Option<Expect>,
    },
    /// Trigger a palette entry; a `place` step finishes it.
    Palette { entry: String },
    /// Finish the pending create gesture.
    Place {
        name: String,
        at: [f32; 2],
        into: Option<String>,
        expect: Option<Expect>,
    },
    /// Trigger a context-menu entry of an element.
    Menu { element: String, action: String },
    /// Connect two elements. With `action`, the source's context-menu entry
    /// starts the gesture; without it the gesture uses the current mode.
    /// Without `source` the pending connect gesture is finished.
    Connect {
        source: Option<String>,
        action: Option<String>,
        target: String,
        name: Option<String>,
        expect: Option<Expect>,
    },
    /// Set the text of an element.
    Text { element: String, text: String },
    /// Move elements by an offset.
    Move {
        elements: Vec<String>,
        by: [f32; 2],
        into: Option<String>,
        expect: Option<Expect>,
    },
    /// Resize a shape.
    Resize {
        element: String,
        size: [f32; 2],
        expect: Option<Expect>,
    },
    /// Move one end of a connection onto another element.
    Reconnect {
        connection: String,
        end: End,
        to: String,
        expect: Option<Expect>,
    },
}

impl Step {
    fn op(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Palette { .. } => "palette",
            Self::Place { .. } => "place",
            Self::Menu { .. } => "menu",
            Self::Connect { .. } => "connect",
            Self::Text { .. } => "text",
            Self::Move { .. } => "move",
            Self::Resize { .. } => "resize",
            Self::Reconnect { .. } => "reconnect",
        }
    }
}

/// Replays session steps on a canvas.
#[derive(Debug)]
pub struct Replay<'a> {
    canvas: &'a mut Canvas,
    names: HashMap<String, ElementId>,
}

impl<'a> Replay<'a> {
    pub fn new(canvas: &'a mut Canvas) -> Self {
        Self {
            canvas,
            names: HashMap::new(),
        }
    }

    /// Element bound to a script name.
    pub fn lookup(&self, name: &str) -> Result<ElementId, UmlError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| UmlError::Script(format!("unknown element name `{name}`")))
    }

    /// Runs every step in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step. Errors of the steps are prefixed with
    /// their position in the script.
    pub fn run(&mut self, session: &Session) -> Result<(), UmlError> {
        for (index, step) in session.steps().iter().enumerate() {
            debug!(step = index + 1, op = step.op(); "Replaying step");
            self.step(step).map_err(|err| match err {
                UmlError::Script(msg) => UmlError::Script(format!("step {}: {msg}", index + 1)),
                other => other,
            })?;
        }

        info!(steps = session.steps().len(), elements = self.canvas.len(); "Session replayed");
        Ok(())
    }

    fn step(&mut self, step: &Step) -> Result<(), UmlError> {
        match step {
            Step::Create {
                kind,
                name,
                at,
                into,
                expect,
            } => {
                self.canvas
                    .trigger_palette(&palette_id(*kind), GestureEvent::at(point(*at)))?;
                self.place(name, *at, into.as_deref(), *expect)
            }
            Step::Palette { entry } => self
                .canvas
                .trigger_palette(&ActionId::from(entry.as_str()), GestureEvent::default()),
            Step::Place {
                name,
                at,
                into,
                expect,
            } => self.place(name, *at, into.as_deref(), *expect),
            Step::Menu { element, action } => {
                let id = self.lookup(element)?;
                let event = self.event_at(id);
                self.canvas
                    .trigger_menu(id, &ActionId::from(action.as_str()), event)
            }
            Step::Connect {
                source,
                action,
                target,
                name,
                expect,
            } => self.connect(
                source.as_deref(),
                action.as_deref(),
                target,
                name.as_deref(),
                *expect,
            ),
            Step::Text { element, text } => {
                let id = self.lookup(element)?;
                self.canvas.set_text(id, text)
            }
            Step::Move {
                elements,
                by,
                into,
                expect,
            } => {
                let ids = elements
                    .iter()
                    .map(|name| self.lookup(name))
                    .collect::<Result<Vec<_>, _>>()?;
                let target = into.as_deref().map(|name| self.lookup(name)).transpose()?;
                let moved = self.canvas.move_elements(&ids, point(*by), target)?;
                check("move", moved, *expect)
            }
            Step::Resize {
                element,
                size,
                expect,
            } => {
                let id = self.lookup(element)?;
                let resized = self.canvas.resize(id, Size::new(size[0], size[1]))?;
                check("resize", resized, *expect)
            }
            Step::Reconnect {
                connection,
                end,
                to,
                expect,
            } => {
                let connection = self.lookup(connection)?;
                let hover = self.lookup(to)?;
                let reconnected = self.canvas.reconnect(connection, (*end).into(), hover)?;
                check("reconnect", reconnected, *expect)
            }
        }
    }

    fn place(
        &mut self,
        name: &str,
        at: [f32; 2],
        into: Option<&str>,
        expect: Option<Expect>,
    ) -> Result<(), UmlError> {
        let target = into.map(|name| self.lookup(name)).transpose()?;
        if let Some(shape) = self.canvas.pending_shape() {
            debug!(name, kind:% = shape.kind(), into:?; "Placing shape");
        }
        let placed = self.canvas.complete_create(point(at), target)?;
        self.bind(name, placed);
        check("placement", placed.is_some(), expect)
    }

    fn connect(
        &mut self,
        source: Option<&str>,
        action: Option<&str>,
        target: &str,
        name: Option<&str>,
        expect: Option<Expect>,
    ) -> Result<(), UmlError> {
        match (source, action) {
            (Some(source), Some(action)) => {
                let id = self.lookup(source)?;
                let event = self.event_at(id);
                self.canvas.trigger_menu(id, &ActionId::from(action), event)?;
            }
            (Some(source), None) => {
                let id = self.lookup(source)?;
                let event = self.event_at(id);
                self.canvas.begin_connect(&event, id, true)?;
            }
            (None, Some(_)) => {
                return Err(UmlError::Script(
                    "a connect action needs a `source`".to_string(),
                ));
            }
            (None, None) => {}
        }

        let target = self.lookup(target)?;
        let created = self.canvas.complete_connect(target)?;
        if let Some(name) = name {
            self.bind(name, created);
        }
        check("connection", created.is_some(), expect)
    }

    fn bind(&mut self, name: &str, id: Option<ElementId>) {
        if let Some(id) = id {
            debug!(name, id:%; "Bound element name");
            self.names.insert(name.to_string(), id);
        }
    }

    fn event_at(&self, id: ElementId) -> GestureEvent {
        let position = self
            .canvas
            .element(id)
            .and_then(|element| element.bounds())
            .map(|bounds| bounds.center())
            .unwrap_or_default();
        GestureEvent::at(position)
    }
}

fn point(at: [f32; 2]) -> Point {
    Point::new(at[0], at[1])
}

/// Compares a rule decision with the step's expectation. Unexpected refusals
/// without an expectation are only logged.
fn check(what: &str, allowed: bool, expect: Option<Expect>) -> Result<(), UmlError> {
    match (expect, allowed) {
        (Some(Expect::Allowed), false) => Err(UmlError::Script(format!("{what} was refused"))),
        (Some(Expect::Refused), true) => Err(UmlError::Script(format!("{what} was allowed"))),
        (None, false) => {
            info!(what; "Refused by the rules");
            Ok(())
        }
        _ => Ok(()),
    }
}
