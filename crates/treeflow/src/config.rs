//! Configuration types for flowchart layout, styling, viewing and export.
//!
//! All types implement [`serde::Deserialize`] and every section and field is
//! optional, so an empty document yields [`AppConfig::default`].
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Column width, row spacing and node box size.
//! - [`StyleConfig`] - Palette, colors and fonts.
//! - [`ViewConfig`] - Zoom limits and fit padding of the interactive view.
//! - [`ExportConfig`] - Export canvas, margin, cooldown and output directory.
//!
//! # Example
//!
//! ```
//! # use treeflow::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().palette().is_ok());
//! assert_eq!(config.layout().column_width(), 250.0);
//! ```

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use treeflow_core::{
    color::{Color, Palette},
    draw::StrokeStyle,
    geometry::Size,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Interactive view configuration section.
    #[serde(default)]
    view: ViewConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        style: StyleConfig,
        view: ViewConfig,
        export: ExportConfig,
    ) -> Self {
        Self {
            layout,
            style,
            view,
            export,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the view configuration.
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// Geometry of the leveled layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive levels.
    column_width: f32,

    /// Vertical space given to a node with at most two children.
    row_spacing: f32,

    /// Extra vertical space per child beyond the second.
    fan_out_padding: f32,

    /// Width of a node box.
    node_width: f32,

    /// Height of a node box.
    node_height: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    pub fn new(
        column_width: f32,
        row_spacing: f32,
        fan_out_padding: f32,
        node_size: Size,
    ) -> Self {
        Self {
            column_width,
            row_spacing,
            fan_out_padding,
            node_width: node_size.width(),
            node_height: node_size.height(),
        }
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn fan_out_padding(&self) -> f32 {
        self.fan_out_padding
    }

    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 250.0,
            row_spacing: 80.0,
            fan_out_padding: 20.0,
            node_width: 180.0,
            node_height: 50.0,
        }
    }
}

/// Visual styling configuration.
///
/// Colors are kept as strings and parsed on access, so a bad value is
/// reported when the style is resolved rather than when the file is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color; transparent when unset.
    background_color: Option<String>,

    /// Per-level colors; the built-in palette when unset.
    palette: Option<Vec<String>>,

    /// Label text color.
    text_color: String,

    /// Label font family.
    font_family: String,

    /// Label font size in pixels.
    font_size: f32,

    /// Width of edge lines and node outlines.
    stroke_width: f32,

    /// Pattern of edge lines.
    edge_style: StrokeStyle,

    /// Opacity of the level-colored node fill.
    node_fill_opacity: f32,

    /// Corner radius of node boxes.
    corner_radius: f32,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the per-level [`Palette`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured palette is empty or has an invalid entry.
    pub fn palette(&self) -> Result<Palette, String> {
        match &self.palette {
            Some(colors) => Palette::from_css(colors)
                .map_err(|err| format!("Invalid palette in config: {err}")),
            None => Ok(Palette::default()),
        }
    }

    /// Returns the parsed label text [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn text_color(&self) -> Result<Color, String> {
        Color::new(&self.text_color).map_err(|err| format!("Invalid text color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn edge_style(&self) -> &StrokeStyle {
        &self.edge_style
    }

    pub fn node_fill_opacity(&self) -> f32 {
        self.node_fill_opacity
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: Some("white".to_string()),
            palette: None,
            text_color: "#1f2937".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
            stroke_width: 2.0,
            edge_style: StrokeStyle::Solid,
            node_fill_opacity: 0.12,
            corner_radius: 8.0,
        }
    }
}

/// Interactive view settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    min_zoom: f32,
    max_zoom: f32,

    /// Multiplicative step used by zoom-in / zoom-out controls.
    zoom_step: f32,

    /// Fraction of the viewport left empty around the graph by fit-to-view.
    fit_padding: f32,
}

impl ViewConfig {
    pub fn new(min_zoom: f32, max_zoom: f32, zoom_step: f32, fit_padding: f32) -> Self {
        Self {
            min_zoom,
            max_zoom,
            zoom_step,
            fit_padding,
        }
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }

    pub fn fit_padding(&self) -> f32 {
        self.fit_padding
    }

    /// Checks the zoom range and step.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < min_zoom <= max_zoom` with both finite,
    /// and `zoom_step` is finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        let finite_positive = |value: f32| value.is_finite() && value > 0.0;
        if !finite_positive(self.min_zoom) || !finite_positive(self.max_zoom) {
            return Err(format!(
                "Invalid view config: zoom limits must be finite and positive, got {}..{}",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "Invalid view config: min_zoom {} is greater than max_zoom {}",
                self.min_zoom, self.max_zoom
            ));
        }
        if !finite_positive(self.zoom_step) {
            return Err(format!(
                "Invalid view config: zoom_step must be finite and positive, got {}",
                self.zoom_step
            ));
        }
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 2.0,
            zoom_step: 1.2,
            fit_padding: 0.1,
        }
    }
}

/// Static export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    canvas_width: f32,
    canvas_height: f32,

    /// Empty border kept around the graph on the export canvas.
    margin: f32,

    /// How long the export guard stays closed after a successful export.
    cooldown_ms: u64,

    /// Directory exported files are written to; the working directory when unset.
    output_dir: Option<PathBuf>,
}

impl ExportConfig {
    pub fn new(canvas_size: Size, margin: f32, cooldown: Duration) -> Self {
        Self {
            canvas_width: canvas_size.width(),
            canvas_height: canvas_size.height(),
            margin,
            cooldown_ms: u64::try_from(cooldown.as_millis()).unwrap_or(u64::MAX),
            output_dir: None,
        }
    }

    /// Returns a copy with the output directory set.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            margin: 40.0,
            cooldown_ms: 1000,
            output_dir: None,
        }
    }
}
