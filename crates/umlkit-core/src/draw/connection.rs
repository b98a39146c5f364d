//! UML relationship lines.
//!
//! A [`ConnectionLine`] is a polyline through the waypoints of an edge, dashed
//! or dotted according to its [`ConnectionKind`], with decorations at either
//! end. Decorations are drawn through SVG markers collected in a
//! [`MarkerRegistry`].

use svg::node::element as svg_element;

use crate::{
    draw::{Decoration, LayeredOutput, Marker, MarkerRegistry, RenderLayer, StrokeDefinition, StrokeStyle},
    geometry::Point,
    kind::{ConnectionKind, MarkerKind},
};

/// Line pattern of a connection kind.
pub fn line_style(kind: ConnectionKind) -> StrokeStyle {
    match kind {
        ConnectionKind::Realization | ConnectionKind::Dependency => StrokeStyle::Dashed,
        ConnectionKind::CommentConnection => StrokeStyle::Dotted,
        ConnectionKind::Association
        | ConnectionKind::Aggregation
        | ConnectionKind::Composition
        | ConnectionKind::Extension => StrokeStyle::Solid,
    }
}

/// Decorations of a connection, at most one per end.
///
/// `directed` adds an open arrow at the end and `crossed` a cross at the
/// start; both only apply to the association family. The ownership diamond of
/// aggregation and composition occupies the start, so `crossed` has no visible
/// effect there.
///
/// # Examples
///
/// ```
/// use umlkit_core::{
///     draw::{Decoration, decorations},
///     kind::{ConnectionKind, MarkerKind},
/// };
///
/// assert_eq!(
///     decorations(ConnectionKind::Realization, false, false),
///     vec![(MarkerKind::End, Decoration::HollowTriangle)]
/// );
/// assert!(decorations(ConnectionKind::Extension, true, true).len() == 1);
/// ```
pub fn decorations(
    kind: ConnectionKind,
    directed: bool,
    crossed: bool,
) -> Vec<(MarkerKind, Decoration)> {
    let mut start = match kind {
        ConnectionKind::Aggregation => Some(Decoration::HollowDiamond),
        ConnectionKind::Composition => Some(Decoration::FilledDiamond),
        _ => None,
    };
    let mut end = match kind {
        ConnectionKind::Extension | ConnectionKind::Realization => Some(Decoration::HollowTriangle),
        ConnectionKind::Dependency => Some(Decoration::OpenArrow),
        _ => None,
    };

    if kind.is_association_family() {
        if crossed && start.is_none() {
            start = Some(Decoration::Cross);
        }
        if directed {
            end = Some(Decoration::OpenArrow);
        }
    }

    start
        .map(|decoration| (MarkerKind::Start, decoration))
        .into_iter()
        .chain(end.map(|decoration| (MarkerKind::End, decoration)))
        .collect()
}

/// SVG path data through the given waypoints.
///
/// Returns an empty string when there are no waypoints.
pub fn connection_path(waypoints: &[Point]) -> String {
    waypoints
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let command = if idx == 0 { 'M' } else { 'L' };
            format!("{command} {} {}", point.x(), point.y())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A renderable UML connection.
#[derive(Debug, Clone)]
pub struct ConnectionLine {
    kind: ConnectionKind,
    waypoints: Vec<Point>,
    stroke: StrokeDefinition,
    directed: bool,
    crossed: bool,
}

impl ConnectionLine {
    /// Creates a line for `kind`. The stroke style is replaced by the
    /// kind's line pattern.
    pub fn new(kind: ConnectionKind, waypoints: Vec<Point>, stroke: StrokeDefinition) -> Self {
        Self {
            kind,
            waypoints,
            stroke: stroke.with_style(line_style(kind)),
            directed: false,
            crossed: false,
        }
    }

    pub fn with_flags(mut self, directed: bool, crossed: bool) -> Self {
        self.directed = directed;
        self.crossed = crossed;
        self
    }

    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Renders the line on the edge layer, registering its markers.
    pub fn render_to_layers(&self, markers: &mut MarkerRegistry) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.waypoints.len() < 2 {
            return output;
        }

        let mut path = svg_element::Path::new()
            .set("d", connection_path(&self.waypoints))
            .set("fill", "none")
            .set("data-kind", self.kind.type_name());
        path = crate::apply_stroke!(path, &self.stroke);

        for (end, decoration) in decorations(self.kind, self.directed, self.crossed) {
            let reference = markers.register(Marker::new(decoration, end, self.stroke.color()));
            path = path.set(end.svg_attribute(), reference);
        }

        output.add_to_layer(RenderLayer::Edge, Box::new(path));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn straight() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]
    }

    fn render(line: &ConnectionLine) -> (String, MarkerRegistry) {
        let mut markers = MarkerRegistry::new();
        let rendered = line
            .render_to_layers(&mut markers)
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();
        (rendered, markers)
    }

    #[test]
    fn test_line_styles() {
        assert_eq!(line_style(ConnectionKind::Association), StrokeStyle::Solid);
        assert_eq!(line_style(ConnectionKind::Extension), StrokeStyle::Solid);
        assert_eq!(line_style(ConnectionKind::Realization), StrokeStyle::Dashed);
        assert_eq!(line_style(ConnectionKind::Dependency), StrokeStyle::Dashed);
        assert_eq!(line_style(ConnectionKind::CommentConnection), StrokeStyle::Dotted);
    }

    #[test]
    fn test_kind_decorations() {
        assert_eq!(
            decorations(ConnectionKind::Aggregation, false, false),
            vec![(MarkerKind::Start, Decoration::HollowDiamond)]
        );
        assert_eq!(
            decorations(ConnectionKind::Composition, false, false),
            vec![(MarkerKind::Start, Decoration::FilledDiamond)]
        );
        assert_eq!(
            decorations(ConnectionKind::Dependency, false, false),
            vec![(MarkerKind::End, Decoration::OpenArrow)]
        );
        assert!(decorations(ConnectionKind::Association, false, false).is_empty());
        assert!(decorations(ConnectionKind::CommentConnection, true, true).is_empty());
    }

    #[test]
    fn test_association_flags() {
        assert_eq!(
            decorations(ConnectionKind::Association, true, true),
            vec![
                (MarkerKind::Start, Decoration::Cross),
                (MarkerKind::End, Decoration::OpenArrow)
            ]
        );
        assert_eq!(
            decorations(ConnectionKind::Composition, true, true),
            vec![
                (MarkerKind::Start, Decoration::FilledDiamond),
                (MarkerKind::End, Decoration::OpenArrow)
            ]
        );
    }

    #[test]
    fn test_connection_path() {
        let waypoints = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 25.5),
        ];
        assert_eq!(connection_path(&waypoints), "M 0 0 L 50 0 L 50 25.5");
        assert_eq!(connection_path(&[]), "");
    }

    #[test]
    fn test_realization_is_dashed_with_marker() {
        let green = Color::new("#008000").unwrap();
        let line = ConnectionLine::new(
            ConnectionKind::Realization,
            straight(),
            StrokeDefinition::solid(green, 2.0),
        );
        let (rendered, markers) = render(&line);

        assert!(rendered.contains("stroke-dasharray=\"6,4\""));
        assert!(rendered.contains("marker-end=\"url(#marker-hollow-triangle-end-"));
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_single_waypoint_renders_nothing() {
        let line = ConnectionLine::new(
            ConnectionKind::Association,
            vec![Point::new(0.0, 0.0)],
            StrokeDefinition::default(),
        );
        let (rendered, markers) = render(&line);
        assert!(rendered.is_empty());
        assert!(markers.is_empty());
    }
}
