//! Export of flowchart layouts to SVG and PNG.
//!
//! # Pipeline Position
//!
//! ```text
//! Flowchart
//!     ↓ layout
//! FlowLayout (positions, plus any dragged offsets)
//!     ↓ export (this module)
//! SVG document → PNG bytes → file named after the title
//! ```
//!
//! PNG export is split in two phases so the rasterization step can run
//! outside of the caller's state: [`Exporter::begin`] snapshots the layout
//! into an [`ExportJob`] and claims the [`ExportGuard`], the job is
//! rasterized, and [`Exporter::finish`] writes the file and releases the
//! guard. A job that will not be finished must be handed to
//! [`Exporter::abandon`], otherwise the guard stays claimed.
//! [`Exporter::export`] runs the three steps back to back.

pub mod svg;

mod file_name;
mod guard;
mod png;

pub use file_name::{DEFAULT_FILE_NAME, file_name_for_title};
pub use guard::{ExportGuard, GuardState};

use std::{cell::RefCell, fs, io, path::PathBuf, rc::Rc, time::Instant};

use log::{error, info};
use thiserror::Error;

use treeflow_core::geometry::Size;

use crate::{config::ExportConfig, layout::FlowLayout};

use self::svg::SvgStyle;

/// Errors of the export pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode rendered SVG: {0}")]
    Decode(#[from] resvg::usvg::Error),

    #[error("failed to allocate a {width}x{height} pixmap")]
    Allocate { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
}

/// Result of one export request.
#[derive(Debug)]
pub enum ExportOutcome {
    /// The image was written to this path.
    Written(PathBuf),
    /// Another export was in flight or cooling down; nothing was done.
    Skipped,
    /// The export failed and no file was written.
    Failed(Error),
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// A snapshot of one export: the static SVG and the file it should produce.
#[derive(Debug, Clone)]
pub struct ExportJob {
    svg: String,
    file_name: String,
    font_family: String,
}

impl ExportJob {
    /// The rendered static SVG document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Decode the SVG and rasterize it into PNG bytes.
    ///
    /// # Errors
    ///
    /// See [`Error`]; every variant except `Io` can come from here.
    pub fn rasterize(&self) -> Result<Vec<u8>, Error> {
        png::rasterize(&self.svg, &self.font_family)
    }
}

/// Renders layouts onto a fixed-size canvas and writes PNG files, one at a
/// time.
#[derive(Debug, Clone)]
pub struct Exporter {
    style: SvgStyle,
    canvas_size: Size,
    margin: f32,
    output_dir: PathBuf,
    guard: ExportGuard,
}

impl Exporter {
    pub fn new(style: SvgStyle, config: &ExportConfig) -> Self {
        Self {
            style,
            canvas_size: config.canvas_size(),
            margin: config.margin(),
            output_dir: config.output_dir(),
            guard: ExportGuard::new(config.cooldown()),
        }
    }

    /// Set the directory PNG files are written to
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn guard(&self) -> &ExportGuard {
        &self.guard
    }

    /// Render the static export SVG of `layout` without touching the guard.
    pub fn render_svg(&self, layout: &FlowLayout) -> String {
        svg::render_export(layout, &self.style, self.canvas_size, self.margin).to_string()
    }

    /// Render and rasterize `layout` to PNG bytes without touching the guard.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the rendered document cannot be rasterized.
    pub fn render_png(&self, layout: &FlowLayout) -> Result<Vec<u8>, Error> {
        png::rasterize(&self.render_svg(layout), self.style.text().font_family())
    }

    /// Start an export of `layout` named after `title`.
    ///
    /// Returns `None` when the guard is not idle at `now`. The returned job
    /// holds the guard until it is passed to [`finish`](Self::finish) or
    /// [`abandon`](Self::abandon).
    pub fn begin(&mut self, layout: &FlowLayout, title: &str, now: Instant) -> Option<ExportJob> {
        if !self.guard.try_begin(now) {
            info!(title; "Export already in progress, request skipped");
            return None;
        }

        let file_name = file_name_for_title(title);
        info!(file_name, nodes_count = layout.nodes().len(); "Starting export");

        Some(ExportJob {
            svg: self.render_svg(layout),
            file_name,
            font_family: self.style.text().font_family().to_string(),
        })
    }

    /// Write the rasterized `result` of `job` and release the guard.
    ///
    /// Failures are logged; no retry is attempted.
    pub fn finish(
        &mut self,
        job: ExportJob,
        result: Result<Vec<u8>, Error>,
        now: Instant,
    ) -> ExportOutcome {
        let path = self.output_dir.join(&job.file_name);

        let written = result.and_then(|png| fs::write(&path, png).map_err(Error::from));
        match written {
            Ok(()) => {
                self.guard.complete(now);
                info!(path:? = path; "Export written");
                ExportOutcome::Written(path)
            }
            Err(err) => {
                self.guard.fail();
                error!(file_name = job.file_name, err:err; "Export failed");
                ExportOutcome::Failed(err)
            }
        }
    }

    /// Drop a job that will not be finished and release the guard.
    pub fn abandon(&mut self, job: ExportJob) {
        self.guard.fail();
        info!(file_name = job.file_name; "Export abandoned");
    }

    /// Begin, rasterize and finish an export in one call.
    pub fn export(&mut self, layout: &FlowLayout, title: &str, now: Instant) -> ExportOutcome {
        let Some(job) = self.begin(layout, title, now) else {
            return ExportOutcome::Skipped;
        };
        let result = job.rasterize();
        self.finish(job, result, now)
    }
}

/// An exporter together with the layout it should export when triggered.
#[derive(Debug)]
pub struct ExportSession {
    exporter: Exporter,
    source: Option<(FlowLayout, String)>,
}

impl ExportSession {
    pub fn new(exporter: Exporter) -> Self {
        Self {
            exporter,
            source: None,
        }
    }

    /// Replace the layout and title the next export will use.
    pub fn set_source(&mut self, layout: FlowLayout, title: impl Into<String>) {
        self.source = Some((layout, title.into()));
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    fn export_at(&mut self, now: Instant) -> ExportOutcome {
        match &self.source {
            Some((layout, title)) => self.exporter.export(layout, title, now),
            None => {
                info!("Nothing to export yet, request skipped");
                ExportOutcome::Skipped
            }
        }
    }
}

/// Zero-argument handle that exports the session's current layout.
///
/// Clones share one session, so they share one guard.
#[derive(Debug, Clone)]
pub struct ExportTrigger {
    session: Rc<RefCell<ExportSession>>,
}

impl ExportTrigger {
    pub fn new(session: Rc<RefCell<ExportSession>>) -> Self {
        Self { session }
    }

    /// Export now.
    pub fn trigger(&self) -> ExportOutcome {
        self.trigger_at(Instant::now())
    }

    /// Export as if called at `now`.
    ///
    /// A trigger fired from inside a running export is skipped.
    pub fn trigger_at(&self, now: Instant) -> ExportOutcome {
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.export_at(now),
            Err(_) => {
                info!("Export already in progress, request skipped");
                ExportOutcome::Skipped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use treeflow_core::semantic::{Flowchart, FlowchartNode};

    use super::*;
    use crate::layout::LayoutEngine;

    fn layout() -> FlowLayout {
        LayoutEngine::default().calculate(&Flowchart::new(
            "Photosynthesis",
            vec![
                FlowchartNode::new("Light", vec![1, 2]),
                FlowchartNode::leaf("Water"),
                FlowchartNode::leaf("CO2"),
            ],
        ))
    }

    fn exporter(dir: &std::path::Path) -> Exporter {
        let config = ExportConfig::new(Size::new(400.0, 300.0), 20.0, Duration::from_secs(1));
        Exporter::new(SvgStyle::default(), &config).with_output_dir(dir)
    }

    #[test]
    fn test_export_writes_png_named_after_title() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(dir.path());

        let outcome = exporter.export(&layout(), "Photosynthesis Process", Instant::now());
        let ExportOutcome::Written(path) = outcome else {
            panic!("expected a written file, got {outcome:?}");
        };
        assert_eq!(path, dir.path().join("photosynthesis_process.png"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_rapid_double_export_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(dir.path());
        let now = Instant::now();

        let first = exporter.export(&layout(), "Twice", now);
        let second = exporter.export(&layout(), "Twice", now + Duration::from_millis(50));

        assert!(first.is_written());
        assert!(matches!(second, ExportOutcome::Skipped));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_begin_while_in_flight_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(dir.path());
        let now = Instant::now();

        let job = exporter.begin(&layout(), "A", now).unwrap();
        assert!(exporter.begin(&layout(), "A", now).is_none());

        let result = job.rasterize();
        assert!(exporter.finish(job, result, now).is_written());
    }

    #[test]
    fn test_rasterize_failure_releases_guard() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(dir.path());
        let now = Instant::now();

        let job = exporter.begin(&layout(), "Broken", now).unwrap();
        let outcome = exporter.finish(job, Err(Error::Encode("boom".to_string())), now);

        assert!(matches!(outcome, ExportOutcome::Failed(Error::Encode(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(exporter.guard().state_at(now), GuardState::Idle);
        assert!(exporter.begin(&layout(), "Broken", now).is_some());
    }

    #[test]
    fn test_abandoned_job_releases_guard() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(dir.path());
        let now = Instant::now();

        let job = exporter.begin(&layout(), "Dropped", now).unwrap();
        exporter.abandon(job);

        assert_eq!(exporter.guard().state_at(now), GuardState::Idle);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(exporter.export(&layout(), "Dropped", now).is_written());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(&dir.path().join("missing"));

        let outcome = exporter.export(&layout(), "Lost", Instant::now());
        assert!(matches!(outcome, ExportOutcome::Failed(Error::Io(_))));
    }

    #[test]
    fn test_empty_layout_exports_blank_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(dir.path());
        let empty = LayoutEngine::default().calculate(&Flowchart::default());

        assert!(exporter.export(&empty, "", Instant::now()).is_written());
        assert!(dir.path().join(DEFAULT_FILE_NAME).exists());
    }

    #[test]
    fn test_trigger_without_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let session = Rc::new(RefCell::new(ExportSession::new(exporter(dir.path()))));
        let trigger = ExportTrigger::new(session);

        assert!(matches!(trigger.trigger(), ExportOutcome::Skipped));
    }

    #[test]
    fn test_cloned_triggers_share_guard() {
        let dir = tempfile::tempdir().unwrap();
        let session = Rc::new(RefCell::new(ExportSession::new(exporter(dir.path()))));
        session.borrow_mut().set_source(layout(), "Shared");

        let a = ExportTrigger::new(Rc::clone(&session));
        let b = a.clone();
        let now = Instant::now();

        assert!(a.trigger_at(now).is_written());
        assert!(matches!(b.trigger_at(now), ExportOutcome::Skipped));
        assert!(b.trigger_at(now + Duration::from_secs(1)).is_written());
    }
}
