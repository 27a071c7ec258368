#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey exports.
//!
//! Two artifacts leave the application: a KMZ archive built from the raw
//! point state ([`kml`], [`kmz`]) and a PNG of the composed report page
//! ([`raster`]). [`ExportPipeline`] runs either one off the async runtime,
//! keeps the store's exporting flag honest, and writes the result into the
//! output directory ([`output`]). A printable HTML page can be written the
//! same way.

pub mod kml;
pub mod kmz;
pub mod output;
pub mod pipeline;
pub mod raster;

pub use pipeline::{ExportPipeline, timestamp_millis};
pub use raster::{ImageRasterizer, Rasterizer};

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Archive could not be assembled.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Report page SVG could not be parsed.
    #[error("SVG error: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// Output canvas could not be allocated.
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// PNG could not be encoded.
    #[error("PNG encoding error: {0}")]
    Encode(String),

    /// I/O error while writing an export.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The blocking export task panicked or was cancelled.
    #[error("Export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
