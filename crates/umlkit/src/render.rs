//! Render engine for UML elements.
//!
//! Nodes are drawn through [`NodeShape`], connections through
//! [`ConnectionLine`]. Stroke colors come from the [`Presentation`] tables.
//! [`UmlRenderer::render_document`] assembles a whole diagram into an SVG
//! document, packages underneath classes, connections above nodes and labels
//! on top.

use std::{collections::HashMap, fs::File, io::Write, path::Path};

use log::{debug, error, info, trace};
use svg::{Document, node::element as svg_element};

use umlkit_core::{
    color::Color,
    draw::{
        self, ConnectionLine, Drawable, LayeredOutput, MarkerRegistry, NameStyle, NodeShape,
        StrokeDefinition,
    },
    geometry::{Bounds, Size},
    identifier::ElementId,
    kind::{ElementKind, LabelKind, NodeKind},
    presentation::Presentation,
};

use crate::{UmlError, model::Element};

/// Width of outlines and connection lines.
pub const STROKE_WIDTH: f32 = 1.5;

/// Space around the diagram content.
const MARGIN: f32 = 50.0;

/// Draws UML shapes and connections.
#[derive(Debug, Clone)]
pub struct UmlRenderer {
    presentation: Presentation,
    background: Option<Color>,
}

impl UmlRenderer {
    pub fn new(presentation: Presentation) -> Self {
        Self {
            presentation,
            background: None,
        }
    }

    /// Sets the document background. Without one the background is white.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Only UML nodes and edges are drawn; foreign elements and the root are
    /// left to the host.
    pub fn can_render(&self, element: &Element) -> bool {
        element.kind().is_uml()
    }

    fn stroke(&self, kind: &ElementKind) -> StrokeDefinition {
        StrokeDefinition::new(self.presentation.color_of(kind), STROKE_WIDTH)
    }

    /// The drawable for a UML node. `owner` is the element a label belongs to.
    pub fn node_shape(&self, element: &Element, owner: Option<&Element>) -> Option<NodeShape> {
        let kind = element.kind().node()?;
        let bounds = element.bounds()?;
        let business_object = element.business_object();
        let shape = NodeShape::new(kind, bounds.to_size(), self.stroke(element.kind()));

        let shape = match kind {
            NodeKind::Label => {
                let label_type = business_object.label_type();
                let text = business_object
                    .text()
                    .map(str::to_string)
                    .or_else(|| label_type.map(|label| label.title().to_string()))
                    .unwrap_or_default();
                shape
                    .with_name(text)
                    .with_name_style(label_style(label_type, owner))
            }
            _ => match business_object.text() {
                Some(text) => shape.with_name(text),
                None => shape,
            },
        };

        Some(shape)
    }

    /// Draws a node centered in its bounds. Non-nodes draw nothing.
    pub fn draw_shape(&self, element: &Element, owner: Option<&Element>) -> LayeredOutput {
        let (Some(shape), Some(bounds)) = (self.node_shape(element, owner), element.bounds()) else {
            return LayeredOutput::new();
        };
        trace!(id:% = element.id(), kind:% = element.kind(); "Drawing shape");
        shape.render_to_layers(bounds.center())
    }

    /// The drawable for a UML edge.
    pub fn connection_line(&self, element: &Element) -> Option<ConnectionLine> {
        let kind = element.connection_kind()?;
        let business_object = element.business_object();
        Some(
            ConnectionLine::new(kind, element.waypoints().to_vec(), self.stroke(element.kind()))
                .with_flags(business_object.directed(), business_object.crossed()),
        )
    }

    /// Draws an edge, registering the markers it references.
    pub fn draw_connection(&self, element: &Element, markers: &mut MarkerRegistry) -> LayeredOutput {
        let Some(line) = self.connection_line(element) else {
            return LayeredOutput::new();
        };
        trace!(id:% = element.id(), kind:% = element.kind(); "Drawing connection");
        line.render_to_layers(markers)
    }

    /// Outline path data of a node.
    pub fn shape_path(&self, element: &Element) -> Option<String> {
        let kind = element.kind().node()?;
        element.bounds().map(|bounds| draw::shape_path(kind, bounds))
    }

    /// Path data through the waypoints of an edge.
    pub fn connection_path(&self, element: &Element) -> Option<String> {
        element
            .connection_kind()
            .map(|_| draw::connection_path(element.waypoints()))
    }

    /// Renders every drawable element into one SVG document.
    pub fn render_document<'a>(&self, elements: impl IntoIterator<Item = &'a Element>) -> Document {
        let elements: Vec<&Element> = elements.into_iter().collect();
        let by_id: HashMap<ElementId, &Element> = elements.iter().map(|e| (e.id(), *e)).collect();

        let mut markers = MarkerRegistry::new();
        let mut output = LayeredOutput::new();
        let mut content_bounds: Option<Bounds> = None;

        for element in elements.iter().filter(|element| self.can_render(element)) {
            let bounds = element_bounds(element);
            if let Some(bounds) = bounds {
                content_bounds = Some(match content_bounds {
                    Some(current) => current.merge(&bounds),
                    None => bounds,
                });
            }

            if element.kind().is_edge() {
                output.merge(self.draw_connection(element, &mut markers));
            } else {
                let owner = element
                    .business_object()
                    .belongs_to()
                    .and_then(|owner| by_id.get(&owner).copied());
                output.merge(self.draw_shape(element, owner));
            }
        }

        let content_bounds = content_bounds.unwrap_or_default();
        let svg_size = document_size(content_bounds.to_size());

        let doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());

        let background = self.background.map_or_else(|| "white".to_string(), |c| c.to_string());
        let mut doc = doc.add(
            svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", svg_size.width())
                .set("height", svg_size.height())
                .set("fill", background),
        );

        if !markers.is_empty() {
            doc = doc.add(markers.definitions());
        }

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - content_bounds.min_x(),
                MARGIN - content_bounds.min_y()
            ),
        );
        for node in output.render() {
            main_group = main_group.add(node);
        }

        debug!(elements = elements.len(), markers = markers.len(); "SVG document rendered");
        doc.add(main_group)
    }

    /// Writes a rendered document to `path`.
    pub fn write_document(&self, doc: &Document, path: impl AsRef<Path>) -> Result<(), UmlError> {
        let path = path.as_ref();
        info!(file_name:% = path.display(); "Creating SVG file");

        let f = File::create(path).inspect_err(|err| {
            error!(file_name:% = path.display(), err:%; "Failed to create SVG file");
        })?;
        write!(&f, "{doc}").inspect_err(|err| {
            error!(file_name:% = path.display(), err:%; "Failed to write SVG content");
        })?;

        Ok(())
    }
}

/// Class names of abstract classes are italic, of objects underlined.
fn label_style(label_type: Option<LabelKind>, owner: Option<&Element>) -> NameStyle {
    match (label_type, owner.and_then(|owner| owner.kind().node())) {
        (Some(LabelKind::ClassName), Some(owner_kind)) => NameStyle::for_kind(owner_kind),
        _ => NameStyle::Plain,
    }
}

fn element_bounds(element: &Element) -> Option<Bounds> {
    if let Some(bounds) = element.bounds() {
        return Some(bounds);
    }
    element
        .waypoints()
        .iter()
        .map(|point| Bounds::new_from_top_left(*point, Size::default()))
        .reduce(|acc, bounds| acc.merge(&bounds))
}

fn document_size(content_size: Size) -> Size {
    let width = MARGIN.mul_add(2.0, content_size.width());
    let height = MARGIN.mul_add(2.0, content_size.height());

    debug!("Final SVG dimensions: {width}x{height}");
    Size::new(width, height)
}

#[cfg(test)]
mod tests {
    use umlkit_core::{
        geometry::Point,
        kind::{ConnectionKind, NodeKind},
    };

    use super::*;
    use crate::model::PropertyUpdate;

    fn renderer() -> UmlRenderer {
        UmlRenderer::new(Presentation::default())
    }

    fn placed(id: &str, kind: NodeKind, top_left: Point, size: Size) -> Element {
        let mut element = Element::shape(ElementId::new(id), kind, size);
        element.set_bounds(Bounds::new_from_top_left(top_left, size));
        element
    }

    fn rendered(output: LayeredOutput) -> String {
        output.render().iter().map(|node| node.to_string()).collect()
    }

    #[test]
    fn test_can_render_only_uml() {
        let renderer = renderer();
        let class = placed("Shape_1", NodeKind::Class, Point::default(), Size::new(100.0, 80.0));
        let foreign = Element::shape(
            ElementId::new("Shape_2"),
            ElementKind::Foreign("bpmn:Task".into()),
            Size::new(100.0, 80.0),
        );
        let root = Element::root(ElementId::new("root"));

        assert!(renderer.can_render(&class));
        assert!(!renderer.can_render(&foreign));
        assert!(!renderer.can_render(&root));
    }

    #[test]
    fn test_interface_shows_stereotype() {
        let mut interface = placed("Shape_1", NodeKind::Interface, Point::default(), Size::new(100.0, 80.0));
        interface.update(&PropertyUpdate::Text("Repository".into()));

        let svg = rendered(renderer().draw_shape(&interface, None));
        assert!(svg.contains("«interface»"));
        assert!(svg.contains("Repository"));
    }

    #[test]
    fn test_class_name_label_of_abstract_class_is_italic() {
        let owner = placed("Shape_1", NodeKind::AbstractClass, Point::default(), Size::new(100.0, 80.0));
        let mut label = placed("Shape_2", NodeKind::Label, Point::new(10.0, 5.0), Size::new(90.0, 20.0));
        label.update(&PropertyUpdate::BelongsTo(owner.id()));
        label.update(&PropertyUpdate::LabelType(LabelKind::ClassName));

        let svg = rendered(renderer().draw_shape(&label, Some(&owner)));
        assert!(svg.contains("font-style=\"italic\""));
        assert!(svg.contains("class name"));
    }

    #[test]
    fn test_label_without_type_or_text_is_plain() {
        let label = placed("Shape_1", NodeKind::Label, Point::default(), Size::new(90.0, 20.0));
        let shape = renderer().node_shape(&label, None).unwrap();

        assert_eq!(shape.name(), Some(""));
        assert_eq!(shape.name_style(), NameStyle::Plain);
    }

    #[test]
    fn test_connection_uses_kind_color_and_dash() {
        let edge = Element::edge(
            ElementId::new("Realization_1"),
            ConnectionKind::Realization,
            ElementId::new("Shape_1"),
            ElementId::new("Shape_2"),
            vec![Point::new(0.0, 0.0), Point::new(0.0, 100.0)],
        );
        let mut markers = MarkerRegistry::new();

        let svg = rendered(renderer().draw_connection(&edge, &mut markers));
        assert!(svg.contains("stroke-dasharray=\"6,4\""));
        assert!(svg.contains("marker-end"));
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_paths() {
        let renderer = renderer();
        let diamond = placed(
            "Shape_1",
            NodeKind::NAryAssociationDiamond,
            Point::default(),
            Size::new(70.0, 70.0),
        );
        let edge = Element::edge(
            ElementId::new("Association_1"),
            ConnectionKind::Association,
            ElementId::new("Shape_1"),
            ElementId::new("Shape_2"),
            vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)],
        );

        assert_eq!(
            renderer.shape_path(&diamond).as_deref(),
            Some("M 35 0 L 70 35 L 35 70 L 0 35 Z")
        );
        assert_eq!(renderer.connection_path(&edge).as_deref(), Some("M 0 0 L 50 0"));
        assert_eq!(renderer.shape_path(&edge), None);
        assert_eq!(renderer.connection_path(&diamond), None);
    }

    #[test]
    fn test_document_layers_and_defs() {
        let source = placed("Shape_1", NodeKind::Class, Point::default(), Size::new(100.0, 80.0));
        let target = placed("Shape_2", NodeKind::Interface, Point::new(0.0, 200.0), Size::new(100.0, 80.0));
        let package = placed("Package_1", NodeKind::Package, Point::new(-20.0, -20.0), Size::new(300.0, 400.0));
        let edge = Element::edge(
            ElementId::new("Realization_1"),
            ConnectionKind::Realization,
            source.id(),
            target.id(),
            vec![Point::new(50.0, 80.0), Point::new(50.0, 200.0)],
        );

        let doc = renderer()
            .with_background(Some(Color::new("#fafafa").unwrap()))
            .render_document([&source, &target, &package, &edge])
            .to_string();

        assert!(doc.contains("viewBox=\"0 0 400 500\""));
        assert!(doc.contains("<defs>"));
        assert!(doc.contains("translate(70, 70)"));

        let container = doc.find("data-layer=\"container\"").unwrap();
        let node = doc.find("data-layer=\"node\"").unwrap();
        let edge = doc.find("data-layer=\"edge\"").unwrap();
        assert!(container < node && node < edge);
    }
}
