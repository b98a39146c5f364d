//! UML node shapes.
//!
//! [`NodeShape`] draws one node of a class diagram: classifiers as a box with a
//! header compartment, packages as a folder, comments as a note with a folded
//! corner, the n-ary association hub as a diamond and labels as bare text.
//!
//! [`shape_path`] returns the outline of the same shapes as SVG path data,
//! which hosts use for hit testing and selection outlines.

use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Bounds, Point, Size},
    kind::NodeKind,
};

/// Height of the name compartment of classifier boxes.
pub const HEADER_HEIGHT: f32 = 30.0;

const FONT_FAMILY: &str = "Arial";
const FONT_SIZE: f32 = 12.0;
const STEREOTYPE_FONT_SIZE: f32 = 10.0;
const FOLDER_TAB_HEIGHT: f32 = 15.0;
const FOLDER_TAB_MAX_WIDTH: f32 = 100.0;
const NOTE_FOLD: f32 = 10.0;

/// How the name text of a node is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    #[default]
    Plain,
    /// Abstract class names
    Italic,
    /// Object (instance) names
    Underlined,
}

impl NameStyle {
    /// Name style used for the given node kind.
    pub fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::AbstractClass => Self::Italic,
            NodeKind::Object => Self::Underlined,
            _ => Self::Plain,
        }
    }

    fn apply(self, text: svg_element::Text) -> svg_element::Text {
        match self {
            Self::Plain => text,
            Self::Italic => text.set("font-style", "italic"),
            Self::Underlined => text.set("text-decoration", "underline"),
        }
    }
}

/// A renderable UML node.
///
/// # Examples
///
/// ```
/// use umlkit_core::{
///     draw::{Drawable, NodeShape, StrokeDefinition},
///     geometry::{Point, Size},
///     kind::NodeKind,
/// };
///
/// let shape = NodeShape::new(NodeKind::Interface, Size::new(100.0, 80.0), StrokeDefinition::default())
///     .with_name("Serializable");
/// let output = shape.render_to_layers(Point::new(50.0, 40.0));
/// assert!(!output.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct NodeShape {
    kind: NodeKind,
    size: Size,
    stroke: StrokeDefinition,
    fill: Color,
    name: Option<String>,
    name_style: NameStyle,
}

impl NodeShape {
    pub fn new(kind: NodeKind, size: Size, stroke: StrokeDefinition) -> Self {
        Self {
            kind,
            size,
            stroke,
            fill: Color::new("white").expect("'white' is a valid CSS color"),
            name: None,
            name_style: NameStyle::for_kind(kind),
        }
    }

    /// Sets the text drawn inside the shape (or as the shape, for labels).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_name_style(mut self, style: NameStyle) -> Self {
        self.name_style = style;
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn name_style(&self) -> NameStyle {
        self.name_style
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Layer the shape is drawn on.
    pub fn layer(&self) -> RenderLayer {
        match self.kind {
            NodeKind::Package => RenderLayer::Container,
            NodeKind::Label => RenderLayer::Label,
            _ => RenderLayer::Node,
        }
    }

    fn outline(&self, bounds: Bounds) -> svg_element::Path {
        let path = svg_element::Path::new()
            .set("d", shape_path(self.kind, bounds))
            .set("fill", self.fill.to_string())
            .set("fill-opacity", self.fill.alpha());
        crate::apply_stroke!(path, &self.stroke)
    }

    fn header_separator(&self, bounds: Bounds) -> svg_element::Line {
        let y = bounds.min_y() + HEADER_HEIGHT.min(bounds.height());
        crate::apply_stroke!(
            svg_element::Line::new()
                .set("x1", bounds.min_x())
                .set("y1", y)
                .set("x2", bounds.max_x())
                .set("y2", y),
            &self.stroke
        )
    }

    fn text(&self, content: &str, anchor: Point, font_size: f32) -> svg_element::Text {
        svg_element::Text::new("")
            .set("x", anchor.x())
            .set("y", anchor.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", FONT_FAMILY)
            .set("font-size", font_size)
            .add(SvgText::new(content))
    }

    /// Stereotype and name, stacked in the header compartment.
    fn header_text(&self, bounds: Bounds) -> Vec<svg_element::Text> {
        let center_x = bounds.center().x();
        let header_mid = bounds.min_y() + HEADER_HEIGHT.min(bounds.height()) / 2.0;
        let mut texts = Vec::new();

        match (self.kind.stereotype(), self.name.as_deref()) {
            (Some(stereotype), Some(name)) => {
                texts.push(self.text(
                    &format!("«{stereotype}»"),
                    Point::new(center_x, header_mid - STEREOTYPE_FONT_SIZE / 2.0 - 1.0),
                    STEREOTYPE_FONT_SIZE,
                ));
                let name_text = self.text(
                    name,
                    Point::new(center_x, header_mid + FONT_SIZE / 2.0),
                    FONT_SIZE,
                );
                texts.push(self.name_style.apply(name_text));
            }
            (Some(stereotype), None) => {
                texts.push(self.text(
                    &format!("«{stereotype}»"),
                    Point::new(center_x, header_mid),
                    STEREOTYPE_FONT_SIZE,
                ));
            }
            (None, Some(name)) => {
                let name_text = self.text(name, Point::new(center_x, header_mid), FONT_SIZE);
                texts.push(self.name_style.apply(name_text));
            }
            (None, None) => {}
        }

        texts
    }
}

impl Drawable for NodeShape {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let bounds = Bounds::new_from_center(position, self.size);
        let mut output = LayeredOutput::new();
        let mut group = svg_element::Group::new().set("data-kind", self.kind.type_name());

        match self.kind {
            NodeKind::Label => {
                if let Some(name) = &self.name {
                    let text = self.text(name, position, FONT_SIZE);
                    group = group.add(self.name_style.apply(text));
                }
            }
            kind if kind.is_classifier() => {
                group = group.add(self.outline(bounds));
                group = group.add(self.header_separator(bounds));
                for text in self.header_text(bounds) {
                    group = group.add(text);
                }
            }
            NodeKind::Package => {
                group = group.add(self.outline(bounds));
                if let Some(name) = &self.name {
                    let anchor = Point::new(
                        bounds.min_x() + tab_width(bounds) / 2.0,
                        bounds.min_y() + FOLDER_TAB_HEIGHT / 2.0,
                    );
                    group = group.add(self.text(name, anchor, FONT_SIZE));
                }
            }
            _ => {
                group = group.add(self.outline(bounds));
                if let Some(name) = &self.name {
                    group = group.add(self.text(name, position, FONT_SIZE));
                }
            }
        }

        output.add_to_layer(self.layer(), Box::new(group));
        output
    }

    fn size(&self) -> Size {
        self.size
    }
}

fn tab_width(bounds: Bounds) -> f32 {
    (bounds.width() * 0.4).min(FOLDER_TAB_MAX_WIDTH)
}

fn rectangle_path(bounds: Bounds) -> String {
    format!(
        "M {x0} {y0} L {x1} {y0} L {x1} {y1} L {x0} {y1} Z",
        x0 = bounds.min_x(),
        y0 = bounds.min_y(),
        x1 = bounds.max_x(),
        y1 = bounds.max_y(),
    )
}

/// SVG path data of the visual outline of a node kind within `bounds`.
///
/// # Examples
///
/// ```
/// use umlkit_core::{
///     draw::shape_path,
///     geometry::{Bounds, Point, Size},
///     kind::NodeKind,
/// };
///
/// let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(70.0, 70.0));
/// assert_eq!(
///     shape_path(NodeKind::NAryAssociationDiamond, bounds),
///     "M 35 0 L 70 35 L 35 70 L 0 35 Z"
/// );
/// ```
pub fn shape_path(kind: NodeKind, bounds: Bounds) -> String {
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let center = bounds.center();

    match kind {
        NodeKind::NAryAssociationDiamond => format!(
            "M {cx} {y0} L {x1} {cy} L {cx} {y1} L {x0} {cy} Z",
            cx = center.x(),
            cy = center.y(),
        ),
        NodeKind::Package => {
            let tab_right = x0 + tab_width(bounds);
            let body_top = (y0 + FOLDER_TAB_HEIGHT).min(y1);
            format!(
                "M {x0} {y0} L {tab_right} {y0} L {tab_right} {body_top} L {x1} {body_top} \
                 L {x1} {y1} L {x0} {y1} Z"
            )
        }
        NodeKind::Comment => {
            let fold = NOTE_FOLD.min(bounds.width()).min(bounds.height());
            format!(
                "M {x0} {y0} L {fx} {y0} L {x1} {fy} L {x1} {y1} L {x0} {y1} Z \
                 M {fx} {y0} L {fx} {fy} L {x1} {fy}",
                fx = x1 - fold,
                fy = y0 + fold,
            )
        }
        _ => rectangle_path(bounds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(shape: &NodeShape) -> String {
        shape
            .render_to_layers(Point::new(50.0, 40.0))
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_stereotypes_are_rendered() {
        for (kind, stereotype) in [
            (NodeKind::Interface, "«interface»"),
            (NodeKind::Enumeration, "«enumeration»"),
            (NodeKind::Utility, "«utility»"),
            (NodeKind::Library, "«library»"),
        ] {
            let shape = NodeShape::new(kind, Size::new(100.0, 80.0), StrokeDefinition::default());
            assert!(render(&shape).contains(stereotype), "{kind}");
        }

        let class = NodeShape::new(NodeKind::Class, Size::new(100.0, 80.0), StrokeDefinition::default());
        assert!(!render(&class).contains('«'));
    }

    #[test]
    fn test_name_styles() {
        let size = Size::new(100.0, 80.0);
        let abstract_class = NodeShape::new(NodeKind::AbstractClass, size, StrokeDefinition::default())
            .with_name("Shape");
        assert!(render(&abstract_class).contains("font-style=\"italic\""));

        let object = NodeShape::new(NodeKind::Object, size, StrokeDefinition::default())
            .with_name("circle");
        assert!(render(&object).contains("text-decoration=\"underline\""));

        let class = NodeShape::new(NodeKind::Class, size, StrokeDefinition::default()).with_name("Circle");
        let rendered = render(&class);
        assert!(!rendered.contains("italic"));
        assert!(!rendered.contains("underline"));
    }

    #[test]
    fn test_label_is_text_only() {
        let label = NodeShape::new(NodeKind::Label, Size::new(90.0, 20.0), StrokeDefinition::default())
            .with_name("+ radius: f32");
        let rendered = render(&label);

        assert!(rendered.contains("+ radius: f32"));
        assert!(!rendered.contains("<path"));
        assert!(rendered.contains("data-layer=\"label\""));
    }

    #[test]
    fn test_package_is_on_container_layer() {
        let package = NodeShape::new(NodeKind::Package, Size::new(600.0, 400.0), StrokeDefinition::default());
        assert_eq!(package.layer(), RenderLayer::Container);
        assert!(render(&package).contains("data-layer=\"container\""));
    }

    #[test]
    fn test_rectangle_path() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(50.0, 20.0));
        assert_eq!(
            shape_path(NodeKind::Qualifier, bounds),
            "M 10 20 L 60 20 L 60 40 L 10 40 Z"
        );
    }

    #[test]
    fn test_package_path_has_tab() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(600.0, 400.0));
        assert_eq!(
            shape_path(NodeKind::Package, bounds),
            "M 0 0 L 100 0 L 100 15 L 600 15 L 600 400 L 0 400 Z"
        );
    }

    #[test]
    fn test_comment_path_has_fold() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(50.0, 80.0));
        let path = shape_path(NodeKind::Comment, bounds);
        assert!(path.starts_with("M 0 0 L 40 0 L 50 10"));
        assert!(path.ends_with("M 40 0 L 40 10 L 50 10"));
    }
}
