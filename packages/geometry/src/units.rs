//! Display formatting for derived measurements.

/// Square meters per hectare.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Converts square meters to hectares.
#[must_use]
pub fn meters_to_hectares(area_m2: f64) -> f64 {
    area_m2 / SQUARE_METERS_PER_HECTARE
}

/// Whole meters, e.g. `"1234 m"`.
#[must_use]
pub fn format_meters(distance_m: f64) -> String {
    format!("{distance_m:.0} m")
}

/// Hectares to two decimals, e.g. `"1.25 ha"`.
#[must_use]
pub fn format_hectares(area_m2: f64) -> String {
    format!("{:.2} ha", meters_to_hectares(area_m2))
}
