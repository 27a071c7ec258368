//! The composed report and its on-screen display transform.

use survey_map_map::controller::PrintSurfaces;
use survey_map_map::framing::INSET_SCALE;
use survey_map_map::{MapSurface, OverlayShape, PrintFrame};
use survey_map_state::SurveyState;
use survey_map_survey_models::{BoundaryStyle, DerivedStats, LatLng, LatLngBounds, ReportMetadata};

use crate::coordinates::{CoordinateRow, coordinate_listing};
use crate::grid::{GridLabels, grid_labels};
use crate::legend::{LegendEntry, compose_legend};

/// Text printed in the report footer badge.
pub const REPORT_BADGE: &str = "SURVEY MAP GIS";

/// Minimum on-screen height of the report frame, in CSS pixels.
pub const REPORT_MIN_HEIGHT_PX: f64 = 842.0;

/// Groups the digits of `value` in threes, e.g. `25,000`.
#[must_use]
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Scale caption: `AUTO` or `1:25,000`.
#[must_use]
pub fn scale_text(scale: u32) -> String {
    if scale == 0 {
        "AUTO".to_string()
    } else {
        format!("1:{}", group_thousands(scale))
    }
}

/// Everything needed to render or rasterize one report.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    /// Header, footer, and legend configuration.
    pub metadata: ReportMetadata,
    /// Scale caption for the main map.
    pub scale_text: String,
    /// Scale caption for the inset.
    pub inset_scale_text: String,
    /// Legend rows.
    pub legend: Vec<LegendEntry>,
    /// Coordinate listing.
    pub coordinates: Vec<CoordinateRow>,
    /// Edge labels of the main map.
    pub grid: GridLabels,
    /// Framing of the main map and inset.
    pub frame: PrintFrame,
    /// Overlays drawn on the main map.
    pub main_overlays: Vec<OverlayShape>,
    /// Overlays drawn on the inset.
    pub inset_overlays: Vec<OverlayShape>,
    /// Active theme.
    pub theme: BoundaryStyle,
    /// Derived measurements.
    pub stats: DerivedStats,
    /// On-screen display transform.
    pub display: ReportFrame,
}

/// Composes the report from the state and the built report surfaces.
#[must_use]
pub fn compose_report<S: MapSurface>(state: &SurveyState, print: &PrintSurfaces<S>) -> ReportLayout {
    let stats = state.derivation().stats;
    let legend = compose_legend(
        &state.points,
        state.mode,
        &stats,
        &state.theme,
        &state.metadata,
    );
    log::debug!(
        "compose_report: {} legend rows, {} points",
        legend.len(),
        state.points.len()
    );

    ReportLayout {
        metadata: state.metadata.clone(),
        scale_text: scale_text(state.metadata.scale),
        inset_scale_text: scale_text(INSET_SCALE),
        legend,
        coordinates: coordinate_listing(&state.points),
        grid: grid_labels(&print.frame.main_bounds),
        frame: print.frame,
        main_overlays: print.main.overlays().to_vec(),
        inset_overlays: print.inset.overlays().to_vec(),
        theme: state.theme.clone(),
        stats,
        display: ReportFrame::new(state.display_scale()),
    }
}

impl ReportLayout {
    /// Removes the display transform for capture until the returned guard
    /// is dropped.
    pub const fn strip_transform(&mut self) -> StrippedLayout<'_> {
        self.display.strip();
        StrippedLayout { layout: self }
    }
}

/// A [`ReportLayout`] shown at full scale; restores the transform when
/// dropped.
#[derive(Debug)]
pub struct StrippedLayout<'a> {
    layout: &'a mut ReportLayout,
}

impl std::ops::Deref for StrippedLayout<'_> {
    type Target = ReportLayout;

    fn deref(&self) -> &ReportLayout {
        self.layout
    }
}

impl Drop for StrippedLayout<'_> {
    fn drop(&mut self) {
        self.layout.display.restore();
    }
}

/// Scale transform applied to the report frame on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportFrame {
    scale: f64,
    applied: bool,
}

impl ReportFrame {
    /// A frame shown at `scale`.
    #[must_use]
    pub const fn new(scale: f64) -> Self {
        Self {
            scale,
            applied: true,
        }
    }

    /// Scale currently in effect (`1.0` while stripped).
    #[must_use]
    pub const fn effective_scale(&self) -> f64 {
        if self.applied { self.scale } else { 1.0 }
    }

    /// Negative bottom margin that collapses the space freed by scaling.
    #[must_use]
    pub fn margin_bottom(&self) -> f64 {
        (1.0 - self.effective_scale()) * -REPORT_MIN_HEIGHT_PX
    }

    /// CSS `transform` value.
    #[must_use]
    pub fn css_transform(&self) -> String {
        let scale = self.effective_scale();
        if (scale - 1.0).abs() < f64::EPSILON {
            "none".to_string()
        } else {
            format!("scale({scale:.4})")
        }
    }

    /// Removes the transform; the frame renders at full scale.
    pub const fn strip(&mut self) {
        self.applied = false;
    }

    /// Re-applies the transform.
    pub const fn restore(&mut self) {
        self.applied = true;
    }
}

/// Linear mapping from a geographic box onto a pixel panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelProjection {
    bounds: LatLngBounds,
    width: f64,
    height: f64,
}

impl PanelProjection {
    /// Maps `bounds` onto a `width` x `height` panel.
    #[must_use]
    pub const fn new(bounds: LatLngBounds, width: f64, height: f64) -> Self {
        Self {
            bounds,
            width,
            height,
        }
    }

    /// Panel pixel of `coord`; north-west is the origin.
    #[must_use]
    pub fn project(&self, coord: LatLng) -> (f64, f64) {
        let lng_span = self.bounds.lng_span();
        let lat_span = self.bounds.lat_span();
        let x = if lng_span > 0.0 {
            (coord.lng - self.bounds.west) / lng_span * self.width
        } else {
            self.width / 2.0
        };
        let y = if lat_span > 0.0 {
            (self.bounds.north - coord.lat) / lat_span * self.height
        } else {
            self.height / 2.0
        };
        (x, y)
    }
}
