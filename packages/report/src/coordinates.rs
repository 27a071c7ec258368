//! Coordinate listing printed under the legend.

use serde::Serialize;
use survey_map_survey_models::SurveyPoint;

/// One `P{n}: lat, lng` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateRow {
    /// `P{n}` tag.
    pub tag: String,
    /// Latitude to six decimals.
    pub lat: String,
    /// Longitude to six decimals.
    pub lng: String,
}

impl std::fmt::Display for CoordinateRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}, {}", self.tag, self.lat, self.lng)
    }
}

/// Rows for every point, in survey order.
#[must_use]
pub fn coordinate_listing(points: &[SurveyPoint]) -> Vec<CoordinateRow> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| CoordinateRow {
            tag: format!("P{}", i + 1),
            lat: format!("{:.6}", point.lat),
            lng: format!("{:.6}", point.lng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_points_with_six_decimals() {
        let rows = coordinate_listing(&[
            SurveyPoint::new(-6.2, 106.81),
            SurveyPoint::new(-6.123_456_78, 106.000_000_4),
        ]);
        assert_eq!(rows[0].to_string(), "P1: -6.200000, 106.810000");
        assert_eq!(rows[1].to_string(), "P2: -6.123457, 106.000000");
    }

    #[test]
    fn empty_survey_has_no_rows() {
        assert!(coordinate_listing(&[]).is_empty());
    }
}
