//! Live measurement readout shown on the field toolbar.

use serde::Serialize;
use survey_map_geometry::{MIN_PATH_POINTS, MIN_POLYGON_POINTS, units};
use survey_map_survey_models::{DerivedStats, DrawingMode, SurveyPoint};

/// What the toolbar shows for the current mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldReadout {
    /// Last placed coordinate, six decimals.
    LastCoordinate {
        /// Latitude.
        lat: String,
        /// Longitude.
        lng: String,
    },
    /// Path length in meters, two decimals.
    Distance {
        /// Meters.
        meters: String,
    },
    /// Enclosed area.
    Area {
        /// Hectares, four decimals.
        hectares: String,
        /// Square meters, two decimals.
        square_meters: String,
    },
}

impl std::fmt::Display for FieldReadout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastCoordinate { lat, lng } => write!(f, "LAST COORDINATE  {lat}, {lng}"),
            Self::Distance { meters } => write!(f, "DISTANCE REVIEW  {meters} METER"),
            Self::Area {
                hectares,
                square_meters,
            } => write!(f, "AREA REVIEW  {hectares} HA | {square_meters} M²"),
        }
    }
}

/// Readout for `points` under `mode`, or `None` when there is nothing to
/// show.
#[must_use]
pub fn field_readout(
    points: &[SurveyPoint],
    mode: DrawingMode,
    stats: &DerivedStats,
) -> Option<FieldReadout> {
    let last = points.last()?;
    match mode {
        DrawingMode::Point => Some(FieldReadout::LastCoordinate {
            lat: format!("{:.6}", last.lat),
            lng: format!("{:.6}", last.lng),
        }),
        DrawingMode::Distance if points.len() >= MIN_PATH_POINTS => Some(FieldReadout::Distance {
            meters: format!("{:.2}", stats.distance_m),
        }),
        DrawingMode::Area if points.len() >= MIN_POLYGON_POINTS => Some(FieldReadout::Area {
            hectares: format!("{:.4}", units::meters_to_hectares(stats.area_m2)),
            square_meters: format!("{:.2}", stats.area_m2),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_show_without_points() {
        assert!(field_readout(&[], DrawingMode::Point, &DerivedStats::ZERO).is_none());
    }

    #[test]
    fn point_mode_shows_last_coordinate() {
        let points = [SurveyPoint::new(0.0, 0.0), SurveyPoint::new(-6.2, 106.81)];
        let readout = field_readout(&points, DrawingMode::Point, &DerivedStats::ZERO).unwrap();
        assert_eq!(readout.to_string(), "LAST COORDINATE  -6.200000, 106.810000");
    }

    #[test]
    fn distance_mode_shows_meters() {
        let points = [SurveyPoint::new(0.0, 0.0), SurveyPoint::new(0.0, 1.0)];
        let stats = DerivedStats {
            distance_m: 111_195.0811,
            ..DerivedStats::ZERO
        };
        let readout = field_readout(&points, DrawingMode::Distance, &stats).unwrap();
        assert_eq!(
            readout,
            FieldReadout::Distance {
                meters: "111195.08".to_string()
            }
        );
    }

    #[test]
    fn area_mode_shows_hectares_and_square_meters() {
        let points = [
            SurveyPoint::new(0.0, 0.0),
            SurveyPoint::new(0.0, 1.0),
            SurveyPoint::new(1.0, 1.0),
        ];
        let stats = DerivedStats {
            distance_m: 0.0,
            area_m2: 12_345.678,
            perimeter_m: 0.0,
        };
        let readout = field_readout(&points, DrawingMode::Area, &stats).unwrap();
        assert_eq!(
            readout,
            FieldReadout::Area {
                hectares: "1.2346".to_string(),
                square_meters: "12345.68".to_string(),
            }
        );
    }

    #[test]
    fn none_mode_and_short_paths_show_nothing() {
        let points = [SurveyPoint::new(0.0, 0.0)];
        assert!(field_readout(&points, DrawingMode::None, &DerivedStats::ZERO).is_none());
        assert!(field_readout(&points, DrawingMode::Distance, &DerivedStats::ZERO).is_none());
    }
}
