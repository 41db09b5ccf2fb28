//! SVG rendering of a [`FlowLayout`].
//!
//! The same scene is used for the interactive canvas and for image export;
//! only the outer transform differs. [`render_viewport`] applies the view's
//! pan and zoom, [`render_export`] fits the whole layout onto a fixed-size
//! canvas with a margin.

mod arrows;
mod node;

use log::debug;
use svg::{
    Document,
    node::element::{Group, Rectangle},
};

use treeflow_core::{
    color::Color,
    draw::{StrokeDefinition, StrokeStyle, TextDefinition},
    geometry::{Bounds, Point, Size},
};

use crate::{config::StyleConfig, layout::FlowLayout};

/// Resolved drawing style shared by every SVG surface.
#[derive(Debug, Clone)]
pub struct SvgStyle {
    background: Option<Color>,
    text: TextDefinition,
    stroke_width: f32,
    edge_style: StrokeStyle,
    node_fill_opacity: f32,
    corner_radius: f32,
}

impl SvgStyle {
    /// Resolve colors and fonts from a [`StyleConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if a configured color cannot be parsed.
    pub fn from_config(config: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            background: config.background_color()?,
            text: TextDefinition::new(
                config.font_family(),
                config.font_size(),
                config.text_color()?,
            ),
            stroke_width: config.stroke_width(),
            edge_style: config.edge_style().clone(),
            node_fill_opacity: config.node_fill_opacity(),
            corner_radius: config.corner_radius(),
        })
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    /// Stroke of an edge drawn in `color`.
    fn edge_stroke(&self, color: Color) -> StrokeDefinition {
        StrokeDefinition::new(color, self.stroke_width).with_style(self.edge_style.clone())
    }
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            background: Color::new("white").ok(),
            text: TextDefinition::default(),
            stroke_width: 2.0,
            edge_style: StrokeStyle::Solid,
            node_fill_opacity: 0.12,
            corner_radius: 8.0,
        }
    }
}

/// Uniform scale fitting `bounds` into `canvas` minus `margin` on every side.
///
/// Never enlarges: the result is at most `1.0`. An empty layout renders at
/// scale `1.0`. If the margin leaves no room the usable area is taken to be
/// one pixel, so the result stays positive.
pub fn export_scale(bounds: Option<Bounds>, canvas: Size, margin: f32) -> f32 {
    let Some(bounds) = bounds else {
        return 1.0;
    };

    let available_width = (canvas.width() - 2.0 * margin).max(1.0);
    let available_height = (canvas.height() - 2.0 * margin).max(1.0);

    let mut scale = 1.0f32;
    if bounds.width() > 0.0 {
        scale = scale.min(available_width / bounds.width());
    }
    if bounds.height() > 0.0 {
        scale = scale.min(available_height / bounds.height());
    }
    scale
}

/// Render the layout as seen through a viewport of `size`, with the layout
/// scaled by `zoom` and then shifted by `pan`.
pub fn render_viewport(
    layout: &FlowLayout,
    style: &SvgStyle,
    size: Size,
    pan: Point,
    zoom: f32,
) -> Document {
    render_document(layout, style, size, pan, zoom)
}

/// Render the whole layout onto a `canvas` of fixed size for export.
///
/// The layout is scaled by [`export_scale`] and its bounding box is centred
/// on the canvas.
pub fn render_export(layout: &FlowLayout, style: &SvgStyle, canvas: Size, margin: f32) -> Document {
    let bounds = layout.bounds();
    let scale = export_scale(bounds, canvas, margin);

    let translate = match bounds {
        Some(bounds) => {
            let canvas_center = Point::new(canvas.width() / 2.0, canvas.height() / 2.0);
            canvas_center.sub_point(bounds.center().scale(scale))
        }
        None => Point::default(),
    };

    debug!(
        scale,
        translate_x = translate.x(),
        translate_y = translate.y();
        "Export transform calculated"
    );

    render_document(layout, style, canvas, translate, scale)
}

fn render_document(
    layout: &FlowLayout,
    style: &SvgStyle,
    size: Size,
    translate: Point,
    scale: f32,
) -> Document {
    let mut doc = Document::new()
        .set("width", size.width())
        .set("height", size.height())
        .set("viewBox", format!("0 0 {} {}", size.width(), size.height()));

    doc = doc.add(arrows::create_marker_definitions(layout.palette().iter()));

    if let Some(background) = style.background() {
        doc = doc.add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height())
                .set("fill", background),
        );
    }

    let scene = render_scene(layout, style).set(
        "transform",
        format!(
            "translate({} {}) scale({scale})",
            translate.x(),
            translate.y()
        ),
    );

    doc.add(scene)
}

/// Edges below nodes, so arrowheads end on the node outline.
fn render_scene(layout: &FlowLayout, style: &SvgStyle) -> Group {
    let mut edges = Group::new().set("class", "edges");
    for edge in layout.edges() {
        let Some((start, end)) = layout.edge_endpoints(edge) else {
            continue;
        };
        edges = edges.add(arrows::create_edge_path(
            start,
            end,
            &style.edge_stroke(edge.color()),
        ));
    }

    let mut nodes = Group::new().set("class", "nodes");
    for node in layout.nodes() {
        nodes = nodes.add(node::render_node(
            node,
            layout.node_bounds(node),
            layout.level_color(node.level()),
            style,
        ));
    }

    Group::new().add(edges).add(nodes)
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use treeflow_core::semantic::{Flowchart, FlowchartNode};

    use super::*;
    use crate::layout::LayoutEngine;

    fn sample_layout() -> FlowLayout {
        LayoutEngine::default().calculate(&Flowchart::new(
            "Photosynthesis",
            vec![
                FlowchartNode::new("Light", vec![1, 2]),
                FlowchartNode::leaf("Water"),
                FlowchartNode::leaf("CO2"),
            ],
        ))
    }

    #[test]
    fn test_scale_never_enlarges() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let scale = export_scale(Some(bounds), Size::new(1000.0, 1000.0), 10.0);
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn test_scale_shrinks_to_fit_limiting_axis() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(2000.0, 500.0));
        let scale = export_scale(Some(bounds), Size::new(1020.0, 1020.0), 10.0);
        assert!(approx_eq!(f32, scale, 0.5, epsilon = 0.0001));
    }

    #[test]
    fn test_empty_layout_scale_is_one() {
        assert_eq!(export_scale(None, Size::new(100.0, 100.0), 10.0), 1.0);
    }

    #[test]
    fn test_export_document_contains_nodes_edges_and_markers() {
        let layout = sample_layout();
        let doc = render_export(&layout, &SvgStyle::default(), Size::new(800.0, 600.0), 20.0)
            .to_string();

        assert!(doc.contains("width=\"800\""));
        assert!(doc.contains("Light"));
        assert!(doc.contains("Water"));
        assert_eq!(doc.matches("marker-end=").count(), 2);
        assert!(doc.contains("<marker"));
        assert!(doc.contains("scale(1)"));
    }

    #[test]
    fn test_empty_layout_renders_blank_canvas() {
        let layout = LayoutEngine::default().calculate(&Flowchart::default());
        let doc = render_export(&layout, &SvgStyle::default(), Size::new(300.0, 200.0), 20.0)
            .to_string();

        assert!(doc.contains("height=\"200\""));
        assert!(!doc.contains("<text"));
        assert!(!doc.contains("marker-end="));
    }

    #[test]
    fn test_viewport_transform_is_applied() {
        let doc = render_viewport(
            &sample_layout(),
            &SvgStyle::default(),
            Size::new(640.0, 480.0),
            Point::new(12.0, 34.0),
            1.5,
        )
        .to_string();
        assert!(doc.contains("translate(12 34) scale(1.5)"));
    }

    #[test]
    fn test_transparent_background_has_no_fill_rect() {
        let mut style = SvgStyle::from_config(&StyleConfig::default()).unwrap();
        style.background = None;

        let layout = LayoutEngine::default().calculate(&Flowchart::default());
        let doc = render_export(&layout, &style, Size::new(10.0, 10.0), 0.0).to_string();
        assert!(!doc.contains("<rect"));
    }
}
