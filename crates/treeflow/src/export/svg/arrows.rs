use svg::node::element::{Definitions, Marker, Path};

use treeflow_core::{apply_stroke, color::Color, draw::StrokeDefinition, geometry::Point};

/// Marker id of the arrowhead drawn in `color`.
fn marker_id(color: Color) -> String {
    format!("arrow-{}", color.to_id_safe_string())
}

/// Creates one arrowhead marker per palette color.
pub fn create_marker_definitions<'a, I>(colors: I) -> Definitions
where
    I: Iterator<Item = &'a Color>,
{
    let mut defs = Definitions::new();

    for &color in colors {
        let arrow = Marker::new()
            .set("id", marker_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color),
            );
        defs = defs.add(arrow);
    }

    defs
}

/// Create a straight edge from `start` to `end` ending in an arrowhead of the
/// stroke's color.
pub fn create_edge_path(start: Point, end: Point, stroke: &StrokeDefinition) -> Path {
    let data = format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y());

    let path = Path::new().set("d", data).set("fill", "none");
    apply_stroke!(path, stroke).set("marker-end", format!("url(#{})", marker_id(stroke.color())))
}

#[cfg(test)]
mod tests {
    use svg::Document;

    use super::*;

    #[test]
    fn test_markers_per_color() {
        let colors = [Color::new("red").unwrap(), Color::new("blue").unwrap()];
        let defs = Document::new()
            .add(create_marker_definitions(colors.iter()))
            .to_string();
        assert!(defs.contains("arrow-cff0000"));
        assert!(defs.contains("arrow-c0000ff"));
    }

    #[test]
    fn test_edge_path_references_color_marker() {
        let stroke = StrokeDefinition::new(Color::new("red").unwrap(), 2.0);
        let path = Document::new()
            .add(create_edge_path(Point::new(0.0, 0.0), Point::new(10.0, 5.0), &stroke))
            .to_string();
        assert!(path.contains("M 0 0 L 10 5"));
        assert!(path.contains("url(#arrow-cff0000)"));
        assert!(path.contains("stroke=\"#ff0000\""));
    }
}
