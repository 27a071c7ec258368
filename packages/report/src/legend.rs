//! Dynamic legend built from the symbols actually used.

use serde::Serialize;
use survey_map_geometry::{MIN_PATH_POINTS, MIN_POLYGON_POINTS, units};
use survey_map_survey_models::{
    BoundaryStyle, DerivedStats, DrawingMode, ReportMetadata, SurveyPoint,
};

/// Title of the path legend row.
pub const PATH_LEGEND_LABEL: &str = "Survey Path";

/// One row of the report legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LegendEntry {
    /// A marker symbol with its (possibly overridden) label.
    Symbol {
        /// Icon id.
        icon: String,
        /// Display label.
        label: String,
    },
    /// The measured survey path.
    Distance {
        /// Swatch color.
        color: String,
        /// Row title.
        label: String,
        /// Whole meters.
        meters: String,
    },
    /// The measured survey area.
    Area {
        /// Swatch color.
        color: String,
        /// Row title, `"{theme} Zone"`.
        label: String,
        /// Hectares to two decimals.
        hectares: String,
        /// Whole meters.
        perimeter_m: String,
    },
}

impl LegendEntry {
    /// Row title.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Symbol { label, .. } | Self::Distance { label, .. } | Self::Area { label, .. } => {
                label
            }
        }
    }
}

/// Builds legend rows: one per distinct `(icon, effective label)` pair in
/// first-occurrence order, then the path or area row when the mode has
/// enough points.
#[must_use]
pub fn compose_legend(
    points: &[SurveyPoint],
    mode: DrawingMode,
    stats: &DerivedStats,
    theme: &BoundaryStyle,
    metadata: &ReportMetadata,
) -> Vec<LegendEntry> {
    let mut seen: Vec<(&str, &str)> = Vec::new();
    let mut entries = Vec::new();

    for (index, point) in points.iter().enumerate() {
        let key = (point.symbol_or_default(), metadata.effective_label(index, point));
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        entries.push(LegendEntry::Symbol {
            icon: key.0.to_string(),
            label: key.1.to_string(),
        });
    }

    match mode {
        DrawingMode::Distance if points.len() >= MIN_PATH_POINTS => {
            entries.push(LegendEntry::Distance {
                color: theme.color.clone(),
                label: PATH_LEGEND_LABEL.to_string(),
                meters: format!("{:.0}", stats.distance_m),
            });
        }
        DrawingMode::Area if points.len() >= MIN_POLYGON_POINTS => {
            entries.push(LegendEntry::Area {
                color: theme.color.clone(),
                label: format!("{} Zone", theme.label),
                hectares: format!("{:.2}", units::meters_to_hectares(stats.area_m2)),
                perimeter_m: format!("{:.0}", stats.perimeter_m),
            });
        }
        _ => {}
    }

    entries
}
