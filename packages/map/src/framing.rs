//! Print framing: which ground area the report map and inset show.
//!
//! At a fixed scale the printed map spans `PRINT_MAP_WIDTH_MM` of paper, so
//! its ground width is `width_mm * scale / 1000` meters. The height is 0.7
//! of the width. Degrees are derived with a flat 111,320 m per degree of
//! latitude and `cos(lat)` shrinkage for longitude.

use survey_map_survey_models::{LatLng, LatLngBounds, SurveyPoint};

/// Paper width of the main report map, in millimeters.
pub const PRINT_MAP_WIDTH_MM: f64 = 210.0;

/// Paper width of the locator inset, in millimeters.
pub const INSET_MAP_WIDTH_MM: f64 = 100.0;

/// Fixed scale denominator of the locator inset.
pub const INSET_SCALE: u32 = 50_000;

/// Pixel padding around the points when the report scale is automatic.
pub const AUTO_FIT_PADDING_PX: u32 = 50;

/// Meters per degree of latitude.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Height of a printed map relative to its width.
pub const PRINT_ASPECT: f64 = 0.7;

/// Map center used before any point exists.
pub const DEFAULT_CENTER: LatLng = LatLng::new(-6.2, 106.81);

/// Initial zoom of the field map.
pub const DEFAULT_FIELD_ZOOM: u8 = 13;

/// Ground box covering `width_mm` of paper at `1:scale`, centered on
/// `center`.
#[must_use]
pub fn scale_bounds(center: LatLng, scale: u32, width_mm: f64) -> LatLngBounds {
    let ground_width_m = width_mm * f64::from(scale) / 1000.0;
    let lat_span = ground_width_m * PRINT_ASPECT / METERS_PER_DEGREE;
    let lng_span = ground_width_m / (METERS_PER_DEGREE * center.lat.to_radians().cos());
    LatLngBounds::centered(center, lat_span, lng_span)
}

/// Bounds of every point, or a degenerate box at [`DEFAULT_CENTER`] when
/// there are none.
#[must_use]
pub fn points_bounds(points: &[SurveyPoint]) -> LatLngBounds {
    LatLngBounds::from_points(points.iter().map(SurveyPoint::position))
        .unwrap_or_else(|| LatLngBounds::from_corners(DEFAULT_CENTER, DEFAULT_CENTER))
}

/// How the main report map is framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MainFraming {
    /// Fit the points with padding; the visible area is whatever the
    /// surface ends up showing.
    Auto {
        /// Bounds of the points.
        bounds: LatLngBounds,
        /// Padding in pixels.
        padding_px: u32,
    },
    /// Fit a fixed ground box derived from the scale.
    Scaled {
        /// Requested ground box.
        bounds: LatLngBounds,
    },
}

impl MainFraming {
    /// Picks the framing for `points` at `scale` (`0` = auto).
    #[must_use]
    pub fn for_points(points: &[SurveyPoint], scale: u32) -> Self {
        let bounds = points_bounds(points);
        if scale == 0 {
            Self::Auto {
                bounds,
                padding_px: AUTO_FIT_PADDING_PX,
            }
        } else {
            Self::Scaled {
                bounds: scale_bounds(bounds.center(), scale, PRINT_MAP_WIDTH_MM),
            }
        }
    }
}

/// Ground box shown by the locator inset around `center`.
#[must_use]
pub fn inset_bounds(center: LatLng) -> LatLngBounds {
    scale_bounds(center, INSET_SCALE, INSET_MAP_WIDTH_MM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_box_at_equator_matches_paper_size() {
        let bounds = scale_bounds(LatLng::new(0.0, 0.0), 10_000, PRINT_MAP_WIDTH_MM);
        // 2100 m wide, 1470 m tall.
        assert!((bounds.lng_span() - 2100.0 / 111_320.0).abs() < 1e-12);
        assert!((bounds.lat_span() - 1470.0 / 111_320.0).abs() < 1e-12);
        assert_eq!(bounds.center(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn longitude_span_widens_away_from_equator() {
        let equator = scale_bounds(LatLng::new(0.0, 10.0), 25_000, PRINT_MAP_WIDTH_MM);
        let north = scale_bounds(LatLng::new(60.0, 10.0), 25_000, PRINT_MAP_WIDTH_MM);
        assert!((north.lng_span() / equator.lng_span() - 2.0).abs() < 1e-9);
        assert!((north.lat_span() - equator.lat_span()).abs() < 1e-12);
    }

    #[test]
    fn inset_covers_five_kilometers() {
        let bounds = inset_bounds(LatLng::new(0.0, 0.0));
        assert!((bounds.lng_span() * METERS_PER_DEGREE - 5_000.0).abs() < 1e-6);
    }

    #[test]
    fn auto_framing_pads_point_bounds() {
        let points = vec![SurveyPoint::new(1.0, 2.0), SurveyPoint::new(3.0, 4.0)];
        let MainFraming::Auto { bounds, padding_px } = MainFraming::for_points(&points, 0) else {
            panic!("expected auto framing");
        };
        assert_eq!(padding_px, 50);
        assert_eq!(bounds.south_west(), LatLng::new(1.0, 2.0));
        assert_eq!(bounds.north_east(), LatLng::new(3.0, 4.0));
    }

    #[test]
    fn scaled_framing_centers_on_point_bounds() {
        let points = vec![SurveyPoint::new(1.0, 2.0), SurveyPoint::new(3.0, 4.0)];
        let MainFraming::Scaled { bounds } = MainFraming::for_points(&points, 5_000) else {
            panic!("expected scaled framing");
        };
        let center = bounds.center();
        assert!((center.lat - 2.0).abs() < 1e-12);
        assert!((center.lng - 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_points_frame_the_default_center() {
        assert_eq!(points_bounds(&[]).center(), DEFAULT_CENTER);
    }
}
