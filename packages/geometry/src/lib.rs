#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry derived from an ordered list of survey points.
//!
//! [`derive`] is a pure function of the points and the drawing mode: in
//! DISTANCE mode the points form an open path whose great-circle length is
//! measured; in AREA mode they form a ring that is closed by repeating the
//! first vertex, and its spherical area and perimeter are measured. Below
//! the mode's point threshold nothing is derived and only markers are drawn.

pub mod units;

use geo::{
    Centroid, ChamberlainDuquetteArea, Distance, Haversine, LineString, MultiPoint, Point, Polygon,
};
use survey_map_survey_models::{DerivedStats, DrawingMode, LatLng, SurveyPoint};

/// Minimum number of points for a DISTANCE path.
pub const MIN_PATH_POINTS: usize = 2;

/// Minimum number of points for an AREA polygon.
pub const MIN_POLYGON_POINTS: usize = 3;

/// The derived overlay drawn on top of the point markers.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Markers only.
    None,
    /// Open path through every point, in order.
    Path {
        /// Path vertices.
        vertices: Vec<LatLng>,
        /// Where the length label is placed.
        label_anchor: LatLng,
    },
    /// Closed ring through every point.
    Polygon {
        /// Ring vertices; the last vertex repeats the first.
        ring: Vec<LatLng>,
        /// Where the area label is placed.
        label_anchor: LatLng,
    },
}

/// Measurements plus the overlay they describe.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Length, area, and perimeter.
    pub stats: DerivedStats,
    /// Geometry to draw.
    pub overlay: Overlay,
}

impl Derivation {
    const fn empty() -> Self {
        Self {
            stats: DerivedStats::ZERO,
            overlay: Overlay::None,
        }
    }
}

/// Derives stats and overlay geometry for `points` under `mode`.
///
/// Identical inputs always yield identical output.
#[must_use]
pub fn derive(points: &[SurveyPoint], mode: DrawingMode) -> Derivation {
    let vertices: Vec<LatLng> = points.iter().map(SurveyPoint::position).collect();

    match mode {
        DrawingMode::Distance if vertices.len() >= MIN_PATH_POINTS => {
            let distance_m = path_length_m(&vertices);
            let label_anchor = midpoint_anchor(&vertices);
            log::trace!("derive: path of {} vertices, {distance_m:.2} m", vertices.len());

            Derivation {
                stats: DerivedStats {
                    distance_m,
                    ..DerivedStats::ZERO
                },
                overlay: Overlay::Path {
                    vertices,
                    label_anchor,
                },
            }
        }
        DrawingMode::Area if vertices.len() >= MIN_POLYGON_POINTS => {
            let ring = close_ring(&vertices);
            let area_m2 = ring_area_m2(&ring);
            let perimeter_m = path_length_m(&ring);
            let label_anchor = vertex_centroid(&vertices);
            log::trace!(
                "derive: ring of {} vertices, {area_m2:.2} m2, {perimeter_m:.2} m",
                vertices.len()
            );

            Derivation {
                stats: DerivedStats {
                    distance_m: 0.0,
                    area_m2,
                    perimeter_m,
                },
                overlay: Overlay::Polygon { ring, label_anchor },
            }
        }
        _ => Derivation::empty(),
    }
}

fn to_point(coord: LatLng) -> Point<f64> {
    Point::new(coord.lng, coord.lat)
}

/// Sum of great-circle leg lengths along `vertices`, in meters.
#[must_use]
pub fn path_length_m(vertices: &[LatLng]) -> f64 {
    vertices
        .windows(2)
        .map(|leg| Haversine.distance(to_point(leg[0]), to_point(leg[1])))
        .sum()
}

/// Appends the first vertex so the ring is explicitly closed.
///
/// Rings that are already closed, and empty input, are returned unchanged.
#[must_use]
pub fn close_ring(vertices: &[LatLng]) -> Vec<LatLng> {
    let mut ring = vertices.to_vec();
    match vertices {
        [] => {}
        [first] => ring.push(*first),
        [first, .., last] if first != last => ring.push(*first),
        _ => {}
    }
    ring
}

/// Spherical area enclosed by a closed `ring`, in square meters.
#[must_use]
pub fn ring_area_m2(ring: &[LatLng]) -> f64 {
    let exterior: LineString<f64> = ring.iter().map(|c| (c.lng, c.lat)).collect();
    Polygon::new(exterior, vec![]).chamberlain_duquette_unsigned_area()
}

/// Mean of the distinct ring vertices.
///
/// A trailing vertex equal to the first is ignored, so open and closed
/// rings give the same anchor. Empty input yields `(0, 0)`.
#[must_use]
pub fn vertex_centroid(vertices: &[LatLng]) -> LatLng {
    let distinct = match vertices {
        [first, rest @ .., last] if !rest.is_empty() && first == last => &vertices[..vertices.len() - 1],
        _ => vertices,
    };
    let points: MultiPoint<f64> = distinct.iter().copied().map(to_point).collect();
    points
        .centroid()
        .map_or(LatLng::new(0.0, 0.0), |c| LatLng::new(c.y(), c.x()))
}

/// The vertex at the middle index of the list (`len / 2`).
///
/// This is an index midpoint, not a spatial one.
///
/// # Panics
///
/// Panics if `vertices` is empty.
#[must_use]
pub fn midpoint_anchor(vertices: &[LatLng]) -> LatLng {
    vertices[vertices.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<SurveyPoint> {
        coords
            .iter()
            .map(|&(lat, lng)| SurveyPoint::new(lat, lng))
            .collect()
    }

    #[test]
    fn zero_or_one_point_yields_zero_stats_in_every_mode() {
        for points in [pts(&[]), pts(&[(-6.2, 106.8)])] {
            for mode in DrawingMode::all() {
                let derivation = derive(&points, *mode);
                assert_eq!(derivation.stats, DerivedStats::ZERO, "mode {mode}");
                assert_eq!(derivation.overlay, Overlay::None);
            }
        }
    }

    #[test]
    fn point_and_none_modes_never_derive_overlays() {
        let points = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(derive(&points, DrawingMode::None).overlay, Overlay::None);
        assert_eq!(derive(&points, DrawingMode::Point).overlay, Overlay::None);
    }

    #[test]
    fn area_needs_three_points() {
        let points = pts(&[(0.0, 0.0), (0.0, 1.0)]);
        let derivation = derive(&points, DrawingMode::Area);
        assert_eq!(derivation.stats, DerivedStats::ZERO);
        assert_eq!(derivation.overlay, Overlay::None);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let derivation = derive(&pts(&[(0.0, 0.0), (0.0, 1.0)]), DrawingMode::Distance);
        assert!(
            (derivation.stats.distance_m - 111_195.08).abs() < 1.0,
            "got {}",
            derivation.stats.distance_m
        );
        assert!(derivation.stats.area_m2.abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_non_decreasing_as_points_are_appended() {
        let all = pts(&[
            (-6.200, 106.810),
            (-6.201, 106.812),
            (-6.199, 106.815),
            (-6.205, 106.809),
            (-6.200, 106.810),
            (-6.210, 106.820),
        ]);

        let mut previous = 0.0;
        for n in MIN_PATH_POINTS..=all.len() {
            let distance = derive(&all[..n], DrawingMode::Distance).stats.distance_m;
            assert!(distance >= previous, "{distance} < {previous} at {n} points");
            previous = distance;
        }
    }

    #[test]
    fn perimeter_equals_length_of_closed_ring() {
        let points = pts(&[(-6.2, 106.8), (-6.21, 106.81), (-6.19, 106.83), (-6.18, 106.805)]);
        let area = derive(&points, DrawingMode::Area);

        let mut closed = points.clone();
        closed.push(points[0].clone());
        let distance = derive(&closed, DrawingMode::Distance);

        assert!((area.stats.perimeter_m - distance.stats.distance_m).abs() < 1e-6);
    }

    #[test]
    fn triangle_area_matches_spherical_estimate() {
        let derivation = derive(&pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]), DrawingMode::Area);
        // Half a square degree at the equator, equatorial radius.
        let expected = 0.5 * 111_319.49 * 111_319.49;
        let ratio = derivation.stats.area_m2 / expected;
        assert!((0.99..1.01).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn polygon_overlay_ring_is_closed() {
        let derivation = derive(&pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]), DrawingMode::Area);
        let Overlay::Polygon { ring, label_anchor } = derivation.overlay else {
            panic!("expected polygon overlay");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert!((label_anchor.lat - 1.0 / 3.0).abs() < 1e-12);
        assert!((label_anchor.lng - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn path_label_sits_on_middle_index() {
        let points = pts(&[(0.0, 0.0), (0.0, 1.0), (0.0, 5.0), (0.0, 6.0)]);
        let Overlay::Path { label_anchor, .. } = derive(&points, DrawingMode::Distance).overlay
        else {
            panic!("expected path overlay");
        };
        assert_eq!(label_anchor, LatLng::new(0.0, 5.0));
    }

    #[test]
    fn derivation_is_idempotent() {
        let points = pts(&[(-6.2, 106.8), (-6.21, 106.81), (-6.19, 106.83)]);
        assert_eq!(
            derive(&points, DrawingMode::Area),
            derive(&points, DrawingMode::Area)
        );
    }

    #[test]
    fn close_ring_leaves_closed_rings_alone() {
        let open = vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0)];
        let closed = close_ring(&open);
        assert_eq!(closed.len(), 4);
        assert_eq!(close_ring(&closed), closed);
        assert!(close_ring(&[]).is_empty());
    }

    #[test]
    fn centroid_ignores_closing_vertex() {
        let open = vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 2.0), LatLng::new(2.0, 2.0), LatLng::new(2.0, 0.0)];
        assert_eq!(vertex_centroid(&open), vertex_centroid(&close_ring(&open)));
        assert_eq!(vertex_centroid(&open), LatLng::new(1.0, 1.0));
    }
}
