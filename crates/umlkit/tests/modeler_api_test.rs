//! Integration tests for the UmlModeler API on the reference canvas.

use std::rc::Rc;

use umlkit::{
    UmlError, UmlModeler,
    actions::ActionId,
    canvas::{Canvas, ConnectionEnd},
    config::{AppConfig, RulesConfig, StyleConfig},
    event::UmlEvent,
    geometry::{Point, Size},
    host::{ExtensionRegistry, GestureEvent, Modeling, RuleContext, RuleName, RuleOutcome, RuleProvider},
    identifier::ElementId,
    kind::{ConnectionKind, ElementKind, LabelKind},
};

fn setup_with(config: AppConfig) -> (UmlModeler, Canvas) {
    let modeler = UmlModeler::new(config).expect("valid config");
    let mut canvas = Canvas::new();
    modeler.install(&mut canvas);
    (modeler, canvas)
}

fn setup() -> (UmlModeler, Canvas) {
    setup_with(AppConfig::default())
}

fn place(canvas: &mut Canvas, palette_id: &str, x: f32, y: f32) -> ElementId {
    canvas
        .trigger_palette(&ActionId::from(palette_id), GestureEvent::default())
        .expect("palette entry exists");
    canvas
        .complete_create(Point::new(x, y), None)
        .expect("create gesture pending")
        .expect("placement allowed")
}

fn connect(canvas: &mut Canvas, source: ElementId, action: &str, target: ElementId) -> Option<ElementId> {
    canvas
        .trigger_menu(source, &ActionId::from(action), GestureEvent::default())
        .expect("menu entry exists");
    canvas.complete_connect(target).expect("connect gesture pending")
}

fn kind_of(canvas: &Canvas, id: ElementId) -> Option<ConnectionKind> {
    canvas.element(id).and_then(|element| element.connection_kind())
}

#[test]
fn test_interface_cannot_extend_class() {
    let (_modeler, mut canvas) = setup();
    let interface = place(&mut canvas, "create.interface", 100.0, 100.0);
    let class = place(&mut canvas, "create.class", 400.0, 100.0);

    assert_eq!(connect(&mut canvas, interface, "extension", class), None);
}

#[test]
fn test_realization_override_carries_to_next_connection() {
    let (modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let interface = place(&mut canvas, "create.interface", 400.0, 100.0);
    let other_class = place(&mut canvas, "create.class", 100.0, 400.0);
    let other_interface = place(&mut canvas, "create.interface", 400.0, 400.0);

    let edge = connect(&mut canvas, class, "extension", interface).unwrap();
    assert_eq!(kind_of(&canvas, edge), Some(ConnectionKind::Realization));
    assert_eq!(modeler.mode().current(), ConnectionKind::Realization);

    // A connect gesture started without the menu uses the current mode.
    canvas
        .begin_connect(&GestureEvent::default(), other_class, true)
        .unwrap();
    let next = canvas.complete_connect(other_interface).unwrap().unwrap();
    assert_eq!(kind_of(&canvas, next), Some(ConnectionKind::Realization));
}

#[test]
fn test_comment_override_carries_over() {
    let (modeler, mut canvas) = setup();
    let comment = place(&mut canvas, "create.comment", 100.0, 100.0);
    let class = place(&mut canvas, "create.class", 400.0, 100.0);
    let other = place(&mut canvas, "create.class", 400.0, 400.0);

    let edge = connect(&mut canvas, comment, "association", class).unwrap();
    assert_eq!(kind_of(&canvas, edge), Some(ConnectionKind::CommentConnection));
    assert_eq!(modeler.mode().current(), ConnectionKind::CommentConnection);

    canvas.begin_connect(&GestureEvent::default(), class, true).unwrap();
    let next = canvas.complete_connect(other).unwrap().unwrap();
    assert_eq!(kind_of(&canvas, next), Some(ConnectionKind::CommentConnection));
}

#[test]
fn test_diamond_requires_association_family() {
    let (_modeler, mut canvas) = setup();
    let diamond = place(&mut canvas, "create.n-ary-association-diamond", 100.0, 100.0);
    let class = place(&mut canvas, "create.class", 400.0, 100.0);

    assert_eq!(connect(&mut canvas, diamond, "dependency", class), None);
    let edge = connect(&mut canvas, diamond, "composition", class).unwrap();
    assert_eq!(kind_of(&canvas, edge), Some(ConnectionKind::Composition));
}

#[test]
fn test_self_extension_refused() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);

    assert_eq!(connect(&mut canvas, class, "extension", class), None);
}

#[test]
fn test_ignore_connection_rules() {
    let config = AppConfig::new(RulesConfig::new(true, true, 2000), StyleConfig::default());
    let (_modeler, mut canvas) = setup_with(config);
    let interface = place(&mut canvas, "create.interface", 100.0, 100.0);
    let class = place(&mut canvas, "create.class", 400.0, 100.0);

    let edge = connect(&mut canvas, interface, "extension", class).unwrap();
    assert_eq!(kind_of(&canvas, edge), Some(ConnectionKind::Extension));
}

#[test]
fn test_add_label_sets_owner_and_type() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);

    canvas
        .trigger_menu(class, &ActionId::from("addAttribute"), GestureEvent::default())
        .unwrap();
    let label = canvas
        .complete_create(Point::new(100.0, 110.0), Some(class))
        .unwrap()
        .expect("labels may be placed anywhere");

    let label = canvas.element(label).unwrap();
    let business_object = label.business_object();
    assert!(label.kind().is_label());
    assert_eq!(business_object.belongs_to(), Some(class));
    assert_eq!(business_object.label_type(), Some(LabelKind::Attribute));
    assert_eq!(business_object.text(), None);
    assert!(!business_object.directed());
    assert!(!business_object.crossed());
}

#[test]
fn test_class_cannot_be_placed_inside_class() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let package = place(&mut canvas, "create.package", 400.0, 400.0);

    canvas
        .trigger_palette(&ActionId::from("create.class"), GestureEvent::default())
        .unwrap();
    assert_eq!(canvas.complete_create(Point::new(110.0, 110.0), Some(class)).unwrap(), None);

    canvas
        .trigger_palette(&ActionId::from("create.class"), GestureEvent::default())
        .unwrap();
    assert!(canvas.complete_create(Point::new(400.0, 400.0), Some(package)).unwrap().is_some());
}

#[test]
fn test_toggle_directed_twice_restores() {
    let (_modeler, mut canvas) = setup();
    let a = place(&mut canvas, "create.class", 100.0, 100.0);
    let b = place(&mut canvas, "create.class", 400.0, 100.0);
    let edge = connect(&mut canvas, a, "association", b).unwrap();
    let toggle = ActionId::from("changeDirected");

    canvas.trigger_menu(edge, &toggle, GestureEvent::default()).unwrap();
    assert!(canvas.element(edge).unwrap().business_object().directed());

    canvas.trigger_menu(edge, &toggle, GestureEvent::default()).unwrap();
    assert!(!canvas.element(edge).unwrap().business_object().directed());
}

#[test]
fn test_foreign_element_has_no_entries() {
    let (_modeler, mut canvas) = setup();
    let task = canvas
        .create_shape(ElementKind::resolve("bpmn:Task"), Size::new(100.0, 80.0))
        .unwrap();
    canvas.begin_create(&GestureEvent::default(), task).unwrap();
    let task = canvas.complete_create(Point::new(100.0, 100.0), None).unwrap().unwrap();

    assert!(canvas.context_menu(task).unwrap().is_empty());
}

#[test]
fn test_label_offers_only_remove() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    canvas
        .trigger_menu(class, &ActionId::from("addClassName"), GestureEvent::default())
        .unwrap();
    let label = canvas.complete_create(Point::new(100.0, 85.0), None).unwrap().unwrap();

    let entries = canvas.context_menu(label).unwrap();
    assert_eq!(entries.keys().map(ActionId::as_str).collect::<Vec<_>>(), ["remove"]);

    let err = canvas
        .trigger_menu(label, &ActionId::from("addQualifier"), GestureEvent::default())
        .unwrap_err();
    assert!(matches!(err, UmlError::UnknownAction { .. }));
}

#[test]
fn test_ids_are_prefixed_per_kind() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let package = place(&mut canvas, "create.package", 400.0, 100.0);
    let other = place(&mut canvas, "create.class", 100.0, 400.0);
    let edge = connect(&mut canvas, class, "dependency", other).unwrap();

    assert_eq!(class, "Shape_1");
    assert_eq!(package, "Package_1");
    assert_eq!(other, "Shape_2");
    assert_eq!(edge, "Dependency_1");
}

#[test]
fn test_editors_do_not_share_mode() {
    let (first, mut canvas) = setup();
    let (second, _other_canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let other = place(&mut canvas, "create.class", 400.0, 100.0);

    connect(&mut canvas, class, "aggregation", other).unwrap();

    assert_eq!(first.mode().current(), ConnectionKind::Aggregation);
    assert_eq!(second.mode().current(), ConnectionKind::Association);
}

#[test]
fn test_higher_priority_provider_overrides_uml_rules() {
    struct NoResize;

    impl RuleProvider for NoResize {
        fn priority(&self) -> u32 {
            3000
        }

        fn evaluate(&self, rule: RuleName, _context: &RuleContext<'_>) -> RuleOutcome {
            match rule {
                RuleName::ShapeResize => RuleOutcome::Refused,
                _ => RuleOutcome::NoOpinion,
            }
        }
    }

    let (_modeler, mut canvas) = setup();
    canvas.register_rule_provider(Rc::new(NoResize));
    let a = place(&mut canvas, "create.class", 100.0, 100.0);
    let b = place(&mut canvas, "create.class", 400.0, 100.0);

    assert!(!canvas.resize(a, Size::new(200.0, 200.0)).unwrap());
    assert!(connect(&mut canvas, a, "association", b).is_some());
}

#[test]
fn test_resize_minimum_dimensions() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    canvas
        .trigger_menu(class, &ActionId::from("addMethod"), GestureEvent::default())
        .unwrap();
    let label = canvas.complete_create(Point::new(100.0, 130.0), None).unwrap().unwrap();

    assert!(canvas.resize(label, Size::new(2.0, 2.0)).unwrap());
    assert!(canvas.resize(class, Size::new(2.0, 2.0)).unwrap());

    let size_of = |id| canvas.element(id).unwrap().bounds().unwrap().to_size();
    assert_eq!(size_of(label), Size::new(10.0, 10.0));
    assert_eq!(size_of(class), Size::new(20.0, 20.0));
}

#[test]
fn test_reconnect_end_follows_rules() {
    let (_modeler, mut canvas) = setup();
    let a = place(&mut canvas, "create.class", 100.0, 100.0);
    let b = place(&mut canvas, "create.class", 400.0, 100.0);
    let c = place(&mut canvas, "create.class", 400.0, 400.0);
    let enumeration = place(&mut canvas, "create.enumeration", 100.0, 400.0);
    let edge = connect(&mut canvas, a, "extension", b).unwrap();

    assert!(!canvas.reconnect(edge, ConnectionEnd::End, enumeration).unwrap());
    assert_eq!(canvas.element(edge).unwrap().target(), Some(b));

    assert!(canvas.reconnect(edge, ConnectionEnd::End, c).unwrap());
    assert_eq!(canvas.element(edge).unwrap().target(), Some(c));

    assert!(!canvas.reconnect(edge, ConnectionEnd::Start, c).unwrap());
    assert_eq!(canvas.element(edge).unwrap().source(), Some(a));
}

#[test]
fn test_reconnect_takes_the_decided_kind() {
    let (modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let interface = place(&mut canvas, "create.interface", 400.0, 100.0);
    let other = place(&mut canvas, "create.class", 400.0, 400.0);
    let edge = connect(&mut canvas, class, "realization", interface).unwrap();

    modeler
        .bus()
        .publish(UmlEvent::RelationshipKindSelected(ConnectionKind::Association));
    assert!(canvas.reconnect(edge, ConnectionEnd::End, other).unwrap());

    assert_eq!(canvas.element(edge).unwrap().target(), Some(other));
    assert_eq!(kind_of(&canvas, edge), Some(ConnectionKind::Association));
}

#[test]
fn test_reconnect_onto_comment_becomes_comment_connection() {
    let (modeler, mut canvas) = setup();
    let a = place(&mut canvas, "create.class", 100.0, 100.0);
    let b = place(&mut canvas, "create.class", 400.0, 100.0);
    let note = place(&mut canvas, "create.comment", 400.0, 400.0);
    let edge = connect(&mut canvas, a, "composition", b).unwrap();
    canvas.trigger_menu(edge, &ActionId::from("changeDirected"), GestureEvent::default()).unwrap();

    assert!(canvas.reconnect(edge, ConnectionEnd::End, note).unwrap());

    let edge = canvas.element(edge).unwrap();
    assert_eq!(edge.connection_kind(), Some(ConnectionKind::CommentConnection));
    assert_eq!(modeler.mode().current(), ConnectionKind::CommentConnection);
    assert!(!edge.business_object().directed());
}

#[test]
fn test_label_of_removed_owner_is_not_placed() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);

    canvas.trigger_menu(class, &ActionId::from("addAttribute"), GestureEvent::default()).unwrap();
    canvas.remove_elements(&[class]).unwrap();

    assert!(!canvas.gesture_in_progress());
    assert!(matches!(
        canvas.complete_create(Point::new(100.0, 100.0), None),
        Err(UmlError::NoGesture("create"))
    ));
    assert!(canvas.is_empty());
}

#[test]
fn test_pending_label_keeps_surviving_owner() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let other = place(&mut canvas, "create.class", 400.0, 100.0);

    canvas.trigger_menu(class, &ActionId::from("addMethod"), GestureEvent::default()).unwrap();
    canvas.remove_elements(&[other]).unwrap();

    assert_eq!(
        canvas.pending_shape().and_then(|shape| shape.business_object().belongs_to()),
        Some(class)
    );
    let label = canvas.complete_create(Point::new(100.0, 120.0), None).unwrap().unwrap();
    assert_eq!(canvas.element(label).unwrap().business_object().belongs_to(), Some(class));
}

#[test]
fn test_flag_update_on_class_is_ignored() {
    let (_modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);

    canvas
        .update_properties(class, umlkit::model::PropertyUpdate::Directed(true))
        .unwrap();

    assert!(!canvas.element(class).unwrap().business_object().directed());
}

#[test]
fn test_remove_action_cascades() {
    let (_modeler, mut canvas) = setup();
    let a = place(&mut canvas, "create.class", 100.0, 100.0);
    let b = place(&mut canvas, "create.class", 400.0, 100.0);
    let edge = connect(&mut canvas, a, "association", b).unwrap();

    canvas.trigger_menu(b, &ActionId::from("remove"), GestureEvent::default()).unwrap();

    assert!(canvas.element(b).is_none());
    assert!(canvas.element(edge).is_none());
    assert!(canvas.element(a).is_some());
}

#[test]
fn test_render_svg() {
    let (modeler, mut canvas) = setup();
    let class = place(&mut canvas, "create.class", 100.0, 100.0);
    let interface = place(&mut canvas, "create.interface", 400.0, 100.0);
    connect(&mut canvas, class, "realization", interface).unwrap();
    canvas.set_text(interface, "Comparable").unwrap();

    let svg = modeler.render_svg(canvas.elements());

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("«interface»"));
    assert!(svg.contains("Comparable"));
    assert!(svg.contains("stroke-dasharray=\"6,4\""));
    assert!(svg.contains("<marker"));
}

#[test]
fn test_invalid_style_is_config_error() {
    let style = StyleConfig::new("not-a-color", Size::new(100.0, 80.0), None);
    let result = UmlModeler::new(AppConfig::new(RulesConfig::default(), style));

    assert!(matches!(result, Err(UmlError::Config(_))));
}
