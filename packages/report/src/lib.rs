#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report composition for the print view.
//!
//! Once the report maps are framed, [`compose_report`] gathers everything
//! the printed page shows (legend, coordinate listing, graticule labels,
//! overlays, and the on-screen display transform) into a [`ReportLayout`].
//! The [`html`] module renders that layout as a standalone printable page
//! and [`sheet`] renders it as one SVG document, which the export crate
//! rasterizes. Both draw their map panels through [`panel`], which clips
//! every overlay to the panel box.

pub mod clip;
pub mod coordinates;
pub mod grid;
pub mod html;
pub mod layout;
pub mod legend;
pub mod markup;
pub mod panel;
pub mod review;
pub mod sheet;

pub use layout::{ReportFrame, ReportLayout, StrippedLayout, compose_report, scale_text};
pub use legend::{LegendEntry, compose_legend};
pub use markup::escape_markup;
pub use review::{FieldReadout, field_readout};
pub use sheet::render_report_svg;
