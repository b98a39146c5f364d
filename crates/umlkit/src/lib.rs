//! umlkit - UML class diagram modeling for diagram editors.
//!
//! This library plugs UML semantics into a generic diagram editor (the host):
//! which shapes exist and how they look, which relationships between them are
//! legal, which context-menu and palette actions each element offers, and how
//! new elements are named.
//!
//! The host is reached through the traits of [`host`]. [`canvas::Canvas`] is
//! an in-memory host that runs the whole extension without a graphical editor.

pub mod actions;
pub mod behavior;
pub mod canvas;
pub mod config;
pub mod event;
pub mod factory;
pub mod host;
pub mod model;
pub mod palette;
pub mod render;
pub mod rules;

mod error;

pub use umlkit_core::{color, draw, geometry, identifier, kind, presentation};

pub use error::UmlError;

use std::{path::Path, rc::Rc};

use log::{debug, info};

use actions::ActionCatalog;
use behavior::UmlResizeBehavior;
use config::AppConfig;
use event::{EventBus, ModeState};
use factory::UmlIdPolicy;
use host::ExtensionRegistry;
use model::Element;
use palette::PaletteCatalog;
use render::UmlRenderer;
use rules::RelationshipRules;

/// The UML extension of one editor instance.
///
/// Owns the editor's event bus and relationship mode, and the providers that
/// share them. Two modelers never share mode state.
///
/// # Examples
///
/// ```
/// use umlkit::{
///     UmlModeler,
///     canvas::Canvas,
///     config::AppConfig,
///     geometry::Point,
///     host::{GestureEvent, Modeling},
///     kind::ConnectionKind,
/// };
///
/// let modeler = UmlModeler::new(AppConfig::default()).unwrap();
/// let mut canvas = Canvas::new();
/// modeler.install(&mut canvas);
///
/// canvas
///     .trigger_palette(&"create.class".into(), GestureEvent::default())
///     .unwrap();
/// let class = canvas.complete_create(Point::new(100.0, 100.0), None).unwrap().unwrap();
///
/// canvas
///     .trigger_palette(&"create.interface".into(), GestureEvent::default())
///     .unwrap();
/// let interface = canvas.complete_create(Point::new(400.0, 100.0), None).unwrap().unwrap();
///
/// canvas
///     .trigger_menu(class, &"extension".into(), GestureEvent::default())
///     .unwrap();
/// let edge = canvas.complete_connect(interface).unwrap().unwrap();
///
/// assert_eq!(
///     canvas.element(edge).unwrap().connection_kind(),
///     Some(ConnectionKind::Realization)
/// );
/// assert_eq!(modeler.mode().current(), ConnectionKind::Realization);
/// ```
#[derive(Debug, Clone)]
pub struct UmlModeler {
    bus: Rc<EventBus>,
    mode: ModeState,
    rules: Rc<RelationshipRules>,
    actions: Rc<ActionCatalog>,
    palette: Rc<PaletteCatalog>,
    renderer: UmlRenderer,
}

impl UmlModeler {
    /// Builds and wires the extension from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`UmlError::Config`] for invalid style settings.
    pub fn new(config: AppConfig) -> Result<Self, UmlError> {
        let style = config.style();
        let presentation = style.presentation()?;

        let bus = Rc::new(EventBus::new());
        let mode = ModeState::default();
        mode.follow(&bus);

        let rules = Rc::new(RelationshipRules::new(mode.clone(), config.rules().clone()));
        let actions = Rc::new(ActionCatalog::new(Rc::clone(&bus), presentation.clone())?);
        let palette = Rc::new(PaletteCatalog::new(presentation.clone()));
        let renderer = UmlRenderer::new(presentation).with_background(style.background_color()?);

        debug!(rules:? = config.rules(); "UML modeler built");
        Ok(Self {
            bus,
            mode,
            rules,
            actions,
            palette,
            renderer,
        })
    }

    /// Registers every provider and policy with the host.
    pub fn install(&self, registry: &mut impl ExtensionRegistry) {
        registry.register_rule_provider(self.rules.clone());
        registry.register_context_menu_provider(self.actions.clone());
        registry.register_palette_provider(self.palette.clone());
        registry.register_id_policy(Rc::new(UmlIdPolicy));
        registry.register_resize_policy(Rc::new(UmlResizeBehavior));

        info!(priority = self.rules.config().priority(); "UML modeler installed");
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// The relationship kind the next connection is created with.
    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn rules(&self) -> &RelationshipRules {
        &self.rules
    }

    pub fn actions(&self) -> &ActionCatalog {
        &self.actions
    }

    pub fn palette(&self) -> &PaletteCatalog {
        &self.palette
    }

    pub fn renderer(&self) -> &UmlRenderer {
        &self.renderer
    }

    /// Renders elements to an SVG string.
    pub fn render_svg<'a>(&self, elements: impl IntoIterator<Item = &'a Element>) -> String {
        self.renderer.render_document(elements).to_string()
    }

    /// Renders elements and writes the SVG document to `path`.
    pub fn export_svg<'a>(
        &self,
        elements: impl IntoIterator<Item = &'a Element>,
        path: impl AsRef<Path>,
    ) -> Result<(), UmlError> {
        let doc = self.renderer.render_document(elements);
        self.renderer.write_document(&doc, path)?;
        info!("SVG exported");
        Ok(())
    }
}
