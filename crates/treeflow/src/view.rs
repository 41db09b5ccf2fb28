//! Interactive view model.
//!
//! [`FlowchartView`] owns everything derived from one source flowchart: the
//! layout, per-node drag offsets and the [`Viewport`]. A new source is
//! detected by pointer identity of its [`Arc`], so handing the view the same
//! document again is free and keeps the user's pan, zoom and drags.
//!
//! Fit-to-view runs exactly once per fresh load, on the first
//! [`FlowchartView::frame`] after the load. Later frames leave the viewport
//! alone.

use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};

use log::{debug, info, warn};

use treeflow_core::{
    geometry::{Point, Size},
    semantic::Flowchart,
};

use crate::{
    config::ViewConfig,
    export::{ExportSession, ExportTrigger, Exporter, svg::{self as svg_export, SvgStyle}},
    layout::{FlowLayout, LayoutEngine},
};

/// Smallest share of the viewport fit-to-view may use for the graph.
const MIN_FIT_SHARE: f32 = 0.05;

/// Pan and zoom of the interactive canvas.
///
/// A layout point `p` is shown on screen at `p * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pan: Point,
    zoom: f32,
}

impl Viewport {
    pub fn new(pan: Point, zoom: f32) -> Self {
        Self { pan, zoom }
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Screen position of a layout point.
    pub fn to_screen(&self, point: Point) -> Point {
        point.scale(self.zoom).add_point(self.pan)
    }

    /// Layout position of a screen point.
    pub fn to_layout(&self, point: Point) -> Point {
        point.sub_point(self.pan).scale(1.0 / self.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Point::default(), 1.0)
    }
}

type ExportReadyCallback = Box<dyn FnMut(ExportTrigger)>;

/// View model of one interactive flowchart canvas.
pub struct FlowchartView {
    engine: LayoutEngine,
    style: SvgStyle,
    config: ViewConfig,

    source: Option<Arc<Flowchart>>,
    layout: FlowLayout,
    offsets: HashMap<usize, Point>,

    viewport: Viewport,
    viewport_size: Option<Size>,
    fit_pending: bool,

    session: Rc<RefCell<ExportSession>>,
    on_export_ready: Option<ExportReadyCallback>,
}

impl FlowchartView {
    pub fn new(engine: LayoutEngine, style: SvgStyle, config: ViewConfig, exporter: Exporter) -> Self {
        let layout = engine.calculate(&Flowchart::default());
        Self {
            engine,
            style,
            config,
            source: None,
            layout,
            offsets: HashMap::new(),
            viewport: Viewport::default(),
            viewport_size: None,
            fit_pending: false,
            session: Rc::new(RefCell::new(ExportSession::new(exporter))),
            on_export_ready: None,
        }
    }

    /// The current source document, if any.
    pub fn flowchart(&self) -> Option<&Arc<Flowchart>> {
        self.source.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the next [`frame`](Self::frame) will fit the graph to view.
    pub fn is_fit_pending(&self) -> bool {
        self.fit_pending
    }

    /// Replace the source document.
    ///
    /// Re-runs layout only when `flowchart` is a different allocation from the
    /// current one; returns whether it did. A fresh layout discards drag
    /// offsets, arms the one-shot fit-to-view and announces a new export
    /// trigger.
    pub fn set_flowchart(&mut self, flowchart: Arc<Flowchart>) -> bool {
        if self
            .source
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &flowchart))
        {
            debug!("Same flowchart instance, layout kept");
            return false;
        }

        info!(title = flowchart.title(); "Loading flowchart into view");
        self.layout = self.engine.calculate(&flowchart);
        self.source = Some(flowchart);
        self.offsets.clear();
        self.fit_pending = true;

        self.sync_export_source();
        self.announce_export();
        true
    }

    /// Register the callback that receives an [`ExportTrigger`] whenever a
    /// fresh layout is ready. Called right away if one already is.
    pub fn on_export_ready(&mut self, callback: impl FnMut(ExportTrigger) + 'static) {
        self.on_export_ready = Some(Box::new(callback));
        if self.source.is_some() {
            self.announce_export();
        }
    }

    /// A trigger exporting the current layout, drags included.
    pub fn export_trigger(&self) -> ExportTrigger {
        ExportTrigger::new(Rc::clone(&self.session))
    }

    /// Prepare a frame for a viewport of `viewport_size`.
    ///
    /// Performs the pending fit-to-view, if any, and returns the viewport to
    /// draw with.
    pub fn frame(&mut self, viewport_size: Size) -> Viewport {
        self.viewport_size = Some(viewport_size);
        if self.fit_pending {
            self.fit_pending = false;
            self.fit_view(viewport_size);
        }
        self.viewport
    }

    /// Zoom and pan so the whole graph is centred in a viewport of
    /// `viewport_size`. Does nothing for an empty layout.
    pub fn fit_view(&mut self, viewport_size: Size) {
        let Some(bounds) = self.current_layout().bounds() else {
            debug!("Nothing to fit");
            return;
        };

        let share = (1.0 - 2.0 * self.config.fit_padding()).max(MIN_FIT_SHARE);
        let zoom_x = viewport_size.width() * share / bounds.width().max(f32::EPSILON);
        let zoom_y = viewport_size.height() * share / bounds.height().max(f32::EPSILON);
        let zoom = self.clamp_zoom(zoom_x.min(zoom_y));

        let viewport_center = Point::new(viewport_size.width() / 2.0, viewport_size.height() / 2.0);
        let pan = viewport_center.sub_point(bounds.center().scale(zoom));

        debug!(zoom, pan_x = pan.x(), pan_y = pan.y(); "Fit to view");
        self.viewport = Viewport::new(pan, zoom);
    }

    /// Move the canvas by a screen-space `delta`.
    pub fn pan_by(&mut self, delta: Point) {
        self.viewport.pan = self.viewport.pan.add_point(delta);
    }

    /// Zoom in by one step around the viewport center.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.config.zoom_step(), self.viewport_center());
    }

    /// Zoom out by one step around the viewport center.
    pub fn zoom_out(&mut self) {
        self.zoom_at(1.0 / self.config.zoom_step(), self.viewport_center());
    }

    /// Multiply the zoom by `factor`, keeping the layout point under the
    /// screen position `anchor` in place. The result is clamped to the
    /// configured zoom range.
    pub fn zoom_at(&mut self, factor: f32, anchor: Point) {
        let zoom = self.clamp_zoom(self.viewport.zoom * factor);
        let under_anchor = self.viewport.to_layout(anchor);
        let pan = anchor.sub_point(under_anchor.scale(zoom));
        self.viewport = Viewport::new(pan, zoom);
    }

    /// Move node `id` by a screen-space `delta`. Edges follow the node.
    ///
    /// Returns `false` if the node is not part of the layout.
    pub fn drag_node(&mut self, id: usize, delta: Point) -> bool {
        if self.layout.node(id).is_none() {
            debug!(id; "Drag of unknown node ignored");
            return false;
        }

        let delta = delta.scale(1.0 / self.viewport.zoom);
        let offset = self.offsets.entry(id).or_default();
        *offset = offset.add_point(delta);

        self.sync_export_source();
        true
    }

    /// The computed layout with drag offsets applied.
    pub fn current_layout(&self) -> FlowLayout {
        self.layout.with_offsets(&self.offsets)
    }

    /// SVG of the canvas as seen through the current viewport.
    pub fn render_svg(&self, viewport_size: Size) -> String {
        svg_export::render_viewport(
            &self.current_layout(),
            &self.style,
            viewport_size,
            self.viewport.pan,
            self.viewport.zoom,
        )
        .to_string()
    }

    /// Unlike [`f32::clamp`], never panics on an inverted or NaN range.
    fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.max(self.config.min_zoom()).min(self.config.max_zoom())
    }

    fn viewport_center(&self) -> Point {
        self.viewport_size
            .map(|size| Point::new(size.width() / 2.0, size.height() / 2.0))
            .unwrap_or_default()
    }

    fn sync_export_source(&self) {
        let Some(source) = &self.source else {
            return;
        };
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.set_source(self.current_layout(), source.title()),
            Err(_) => warn!("Export in progress, export source not updated"),
        }
    }

    fn announce_export(&mut self) {
        let trigger = self.export_trigger();
        if let Some(callback) = self.on_export_ready.as_mut() {
            callback(trigger);
        }
    }
}
