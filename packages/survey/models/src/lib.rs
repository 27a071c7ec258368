#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey data types shared across the survey-map workspace.
//!
//! A survey is an ordered list of [`SurveyPoint`]s plus the drawing mode
//! that decides whether the points form a path or a polygon. Report
//! configuration lives in [`ReportMetadata`]; derived measurements in
//! [`DerivedStats`].

pub mod bounds;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use bounds::{LatLng, LatLngBounds};

/// Icon id used when a point carries no symbol.
pub const DEFAULT_SYMBOL_ICON: &str = "fa-location-dot";

/// Label used when a point has neither an override nor a stored label.
pub const DEFAULT_POINT_LABEL: &str = "Marker";

/// Print scale denominators offered by the report configuration.
/// `0` means "fit all points automatically".
pub const SCALE_PRESETS: &[u32] = &[0, 5_000, 10_000, 25_000, 50_000];

/// How the point list is interpreted when deriving overlays.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawingMode {
    /// Plain markers, nothing derived.
    #[default]
    None,
    /// Individual points of interest.
    Point,
    /// Points form an open path; total length is measured.
    Distance,
    /// Points form a closed ring; area and perimeter are measured.
    Area,
}

impl DrawingMode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::None, Self::Point, Self::Distance, Self::Area]
    }
}

/// Base tile layer shown under the survey overlays.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MapLayer {
    /// Standard street tiles.
    #[default]
    Street,
    /// Satellite imagery tiles.
    Satellite,
}

impl MapLayer {
    /// The other layer of the two-valued toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Street => Self::Satellite,
            Self::Satellite => Self::Street,
        }
    }
}

/// Which screen the user is on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    /// Map editing.
    #[default]
    Field,
    /// Report title, scale, and legend configuration.
    Config,
    /// Printable report preview.
    Print,
}

/// A surveyed location. Order within the survey defines path and ring
/// vertex order, and the display index `P{i+1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Label of the symbol active when the point was placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Icon id of the symbol active when the point was placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Stroke color of the theme active when the point was placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SurveyPoint {
    /// Creates a bare point with no label, symbol, or color.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            label: None,
            symbol: None,
            color: None,
        }
    }

    /// Creates a point stamped with the given theme and symbol.
    #[must_use]
    pub fn stamped(position: LatLng, theme: &BoundaryStyle, symbol: &PointSymbol) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
            label: Some(symbol.label.clone()),
            symbol: Some(symbol.icon.clone()),
            color: Some(theme.color.clone()),
        }
    }

    /// The point's coordinate.
    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Icon id, falling back to [`DEFAULT_SYMBOL_ICON`].
    #[must_use]
    pub fn symbol_or_default(&self) -> &str {
        self.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL_ICON)
    }
}

/// Visual theme applied to survey overlays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryStyle {
    /// Stroke color (`#rrggbb`).
    pub color: String,
    /// Fill color (CSS `rgba(...)`).
    pub fill_color: String,
    /// Display name, e.g. `"Forest"`.
    pub label: String,
}

/// A marker symbol that can be stamped onto new points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointSymbol {
    /// Icon id, e.g. `"fa-tree"`.
    pub icon: String,
    /// Display label, e.g. `"Tree"`.
    pub label: String,
    /// Grouping category, e.g. `"Nature"`.
    pub category: String,
}

/// Report header and legend configuration. Lives for the session only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Report title (upper-case).
    pub title: String,
    /// Report subtitle (upper-case).
    pub subtitle: String,
    /// Surveyor name (upper-case).
    pub surveyor: String,
    /// Print scale denominator; `0` = auto-fit.
    pub scale: u32,
    /// Human-readable report date.
    pub date: String,
    /// 1-based point index -> replacement label.
    #[serde(default)]
    pub legend_overrides: BTreeMap<usize, String>,
}

impl ReportMetadata {
    /// Default metadata dated `date`.
    #[must_use]
    pub fn dated(date: chrono::NaiveDate) -> Self {
        Self {
            title: "SURVEY RESULT REPORT".to_string(),
            subtitle: "INTEGRATED GEOSPATIAL ANALYSIS".to_string(),
            surveyor: "GIS_SURVEYOR".to_string(),
            scale: 0,
            date: format_report_date(date),
            legend_overrides: BTreeMap::new(),
        }
    }

    /// Non-empty override for the point at 0-based `index`, if any.
    #[must_use]
    pub fn override_for(&self, index: usize) -> Option<&str> {
        self.legend_overrides
            .get(&(index + 1))
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    /// Label shown for the point at 0-based `index`: override, then the
    /// point's own label, then [`DEFAULT_POINT_LABEL`].
    #[must_use]
    pub fn effective_label<'a>(&'a self, index: usize, point: &'a SurveyPoint) -> &'a str {
        self.override_for(index)
            .or_else(|| point.label.as_deref().filter(|label| !label.is_empty()))
            .unwrap_or(DEFAULT_POINT_LABEL)
    }

    /// Whether the report frames all points automatically.
    #[must_use]
    pub const fn is_auto_scale(&self) -> bool {
        self.scale == 0
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self::dated(chrono::Local::now().date_naive())
    }
}

/// Formats a report date as `"05 March 2025"`.
#[must_use]
pub fn format_report_date(date: chrono::NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Measurements derived from the point list and drawing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    /// Path length in meters (DISTANCE mode).
    pub distance_m: f64,
    /// Enclosed area in square meters (AREA mode).
    pub area_m2: f64,
    /// Closed-ring perimeter in meters (AREA mode).
    pub perimeter_m: f64,
}

impl DerivedStats {
    /// All measurements zero.
    pub const ZERO: Self = Self {
        distance_m: 0.0,
        area_m2: 0.0,
        perimeter_m: 0.0,
    };
}
