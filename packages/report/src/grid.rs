//! Graticule labels along the edges of the main report map.

use serde::Serialize;
use survey_map_survey_models::LatLngBounds;

/// Positions along each edge where a label is placed.
pub const GRID_FRACTIONS: [f64; 2] = [0.25, 0.75];

/// Coordinate labels for the four map edges, four decimals each.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GridLabels {
    /// Longitudes along the top edge.
    pub top: Vec<String>,
    /// Longitudes along the bottom edge.
    pub bottom: Vec<String>,
    /// Latitudes along the left edge.
    pub left: Vec<String>,
    /// Latitudes along the right edge.
    pub right: Vec<String>,
}

/// Samples `bounds` at [`GRID_FRACTIONS`] of each edge.
#[must_use]
pub fn grid_labels(bounds: &LatLngBounds) -> GridLabels {
    let longitudes: Vec<String> = GRID_FRACTIONS
        .iter()
        .map(|&f| format!("{:.4}", bounds.lng_at(f)))
        .collect();
    let latitudes: Vec<String> = GRID_FRACTIONS
        .iter()
        .map(|&f| format!("{:.4}", bounds.lat_at(f)))
        .collect();

    GridLabels {
        top: longitudes.clone(),
        bottom: longitudes,
        left: latitudes.clone(),
        right: latitudes,
    }
}
