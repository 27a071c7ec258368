//! PNG rendition of the report page.
//!
//! The page is composed as one SVG document by
//! [`survey_map_report::render_report_svg`] and rasterized with `resvg` at
//! [`PIXEL_RATIO`] times the on-screen frame size. Text is shaped against
//! the system font database, loaded once per rasterizer.
//!
//! Like a screen capture, the drawing honors the layout's display transform,
//! so callers strip it first to get a full-size page.

use std::sync::Arc;

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use survey_map_report::{ReportLayout, render_report_svg};
use survey_map_state::{REPORT_FRAME_HEIGHT_PX, REPORT_FRAME_WIDTH_PX};

use crate::ExportError;

/// Output pixels per frame pixel.
pub const PIXEL_RATIO: u32 = 2;

/// Family used when an element names none.
const DEFAULT_FAMILY: &str = "DejaVu Sans";

/// Turns a composed report into image bytes.
pub trait Rasterizer: Send + Sync {
    /// File extension of the produced image.
    fn extension(&self) -> &'static str;

    /// Renders `layout`.
    ///
    /// # Errors
    ///
    /// * If the page cannot be drawn or encoded
    fn rasterize(&self, layout: &ReportLayout) -> Result<Vec<u8>, ExportError>;
}

/// `resvg` rasterizer producing PNG.
#[derive(Clone)]
pub struct ImageRasterizer {
    pixel_ratio: u32,
    fonts: Arc<fontdb::Database>,
}

impl std::fmt::Debug for ImageRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRasterizer")
            .field("pixel_ratio", &self.pixel_ratio)
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl Default for ImageRasterizer {
    fn default() -> Self {
        Self::with_pixel_ratio(PIXEL_RATIO)
    }
}

impl ImageRasterizer {
    /// Rasterizer drawing at `pixel_ratio` output pixels per frame pixel.
    #[must_use]
    pub fn with_pixel_ratio(pixel_ratio: u32) -> Self {
        Self {
            pixel_ratio: pixel_ratio.max(1),
            fonts: Arc::new(system_fonts()),
        }
    }

    /// Output size in pixels.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (
            REPORT_FRAME_WIDTH_PX * self.pixel_ratio,
            REPORT_FRAME_HEIGHT_PX * self.pixel_ratio,
        )
    }

    /// Number of font faces available for report text.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn draw(&self, layout: &ReportLayout) -> Result<Pixmap, ExportError> {
        let svg = render_report_svg(layout);
        let options = usvg::Options {
            font_family: DEFAULT_FAMILY.to_string(),
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options)?;

        let (width, height) = self.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Canvas { width, height })?;
        pixmap.fill(Color::WHITE);

        #[allow(clippy::cast_precision_loss)]
        let ratio = self.pixel_ratio as f32;
        resvg::render(&tree, Transform::from_scale(ratio, ratio), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl Rasterizer for ImageRasterizer {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn rasterize(&self, layout: &ReportLayout) -> Result<Vec<u8>, ExportError> {
        let pixmap = self.draw(layout)?;
        let bytes = pixmap
            .encode_png()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        log::debug!(
            "rasterize: {}x{} -> {} bytes",
            pixmap.width(),
            pixmap.height(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// System fonts, with the generic families pointed at an installed face
/// when the defaults are missing.
fn system_fonts() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    log::debug!("system_fonts: {} faces", db.len());

    let fallback = db
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(family, _)| family.clone());
    let Some(fallback) = fallback else {
        log::warn!("system_fonts: no fonts found, report text will be missing from PNG exports");
        return db;
    };

    if !has_family(&db, fontdb::Family::SansSerif) {
        db.set_sans_serif_family(fallback.clone());
    }
    if !has_family(&db, fontdb::Family::Monospace) {
        db.set_monospace_family(fallback);
    }
    db
}

fn has_family(db: &fontdb::Database, family: fontdb::Family<'_>) -> bool {
    db.query(&fontdb::Query {
        families: &[family],
        ..fontdb::Query::default()
    })
    .is_some()
}
