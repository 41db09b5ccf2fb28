//! Treeflow - leveled left-to-right flowchart layout and export.
//!
//! Takes a tree-shaped flowchart document, assigns every node reachable
//! from the root a breadth-first level, lays levels out as columns, and
//! renders the result either through an interactive [`view::FlowchartView`]
//! (pan, zoom, drag, fit-to-view) or as a static SVG/PNG export.

pub mod config;
pub mod export;
pub mod layout;
pub mod view;

mod error;

pub use treeflow_core::{color, draw, geometry, semantic};
pub use treeflow_parser::error::{Diagnostic, ParseError};

pub use error::TreeflowError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{Exporter, svg::SvgStyle};
use layout::{FlowLayout, LayoutEngine};
use view::FlowchartView;

/// Builder for parsing, laying out and rendering flowcharts.
///
/// # Examples
///
/// ```rust,no_run
/// use treeflow::{FlowchartBuilder, config::AppConfig};
///
/// let source = r#"{
///     "title": "Photosynthesis",
///     "flowchart": { "nodes": [
///         { "label": "Light", "children": [1, 2] },
///         { "label": "Water" },
///         { "label": "CO2" }
///     ] }
/// }"#;
///
/// let builder = FlowchartBuilder::new(AppConfig::default());
///
/// let flowchart = builder.parse(source)
///     .expect("Failed to parse");
///
/// let svg = builder.render_svg(&flowchart)
///     .expect("Failed to render");
/// ```
#[derive(Debug, Default)]
pub struct FlowchartBuilder {
    config: AppConfig,
}

impl FlowchartBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a flowchart JSON document.
    ///
    /// Structural problems (missing nodes, wrong field types, invalid child
    /// references) are logged as warnings and repaired; only malformed JSON
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Parse`] if `source` is not valid JSON.
    pub fn parse(&self, source: &str) -> Result<semantic::Flowchart, TreeflowError> {
        info!("Parsing flowchart");

        let flowchart = treeflow_parser::parse(source)
            .map_err(|err| TreeflowError::new_parse_error(err, source))?;

        debug!(nodes_count = flowchart.nodes().len(); "Flowchart parsed successfully");
        trace!(flowchart:?; "Parsed flowchart");

        Ok(flowchart)
    }

    /// A layout engine configured from this builder's settings.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Config`] if the configured palette is invalid.
    pub fn layout_engine(&self) -> Result<LayoutEngine, TreeflowError> {
        let palette = self.config.style().palette().map_err(TreeflowError::Config)?;
        Ok(LayoutEngine::new(self.config.layout(), palette))
    }

    /// Compute the leveled layout of `flowchart`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Config`] if the configured palette is invalid.
    pub fn layout(&self, flowchart: &semantic::Flowchart) -> Result<FlowLayout, TreeflowError> {
        Ok(self.layout_engine()?.calculate(flowchart))
    }

    /// Render `flowchart` as a static SVG document on the export canvas.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Config`] for invalid style settings.
    pub fn render_svg(&self, flowchart: &semantic::Flowchart) -> Result<String, TreeflowError> {
        let layout = self.layout(flowchart)?;
        let svg = self.exporter()?.render_svg(&layout);

        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render `flowchart` as PNG bytes on the export canvas.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Config`] for invalid style settings and
    /// [`TreeflowError::Export`] if rasterization fails.
    pub fn render_png(&self, flowchart: &semantic::Flowchart) -> Result<Vec<u8>, TreeflowError> {
        let layout = self.layout(flowchart)?;
        let png = self.exporter()?.render_png(&layout)?;

        info!(bytes = png.len(); "PNG rendered successfully");
        Ok(png)
    }

    /// A single-flight PNG exporter writing to the configured output
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Config`] for invalid style settings.
    pub fn exporter(&self) -> Result<Exporter, TreeflowError> {
        Ok(Exporter::new(self.svg_style()?, self.config.export()))
    }

    /// An interactive view model using this builder's settings.
    ///
    /// # Errors
    ///
    /// Returns [`TreeflowError::Config`] for invalid style or view settings.
    pub fn view(&self) -> Result<FlowchartView, TreeflowError> {
        self.config.view().validate().map_err(TreeflowError::Config)?;
        Ok(FlowchartView::new(
            self.layout_engine()?,
            self.svg_style()?,
            self.config.view().clone(),
            self.exporter()?,
        ))
    }

    fn svg_style(&self) -> Result<SvgStyle, TreeflowError> {
        SvgStyle::from_config(self.config.style()).map_err(TreeflowError::Config)
    }
}
