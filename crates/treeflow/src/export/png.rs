//! PNG rasterization of rendered SVG documents.

use std::sync::{Arc, OnceLock};

use log::{debug, info};
use resvg::{tiny_skia, usvg};

use super::Error;

/// System fonts, loaded once per process.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            info!(faces_count = db.len(); "Font database loaded");
            Arc::new(db)
        })
        .clone()
}

/// Decode `svg` and rasterize it at its own size into PNG bytes.
///
/// `font_family` is used for text that names no family the system knows.
///
/// # Errors
///
/// Returns [`Error::Decode`] for invalid SVG, [`Error::Allocate`] when the
/// document size is zero or too large for a pixmap and [`Error::Encode`] if
/// PNG encoding fails.
pub fn rasterize(svg: &str, font_family: &str) -> Result<Vec<u8>, Error> {
    let options = usvg::Options {
        font_family: font_family.to_string(),
        fontdb: font_database(),
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    debug!(width, height; "Rasterizing SVG");

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(Error::Allocate { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|err| Error::Encode(err.to_string()))
}
