//! Geographic coordinate and bounding-box primitives.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The coordinate with longitude wrapped into `[-180, 180]`, or `None`
    /// when either value is not finite or latitude lies beyond the poles.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        if !self.lat.is_finite() || !self.lng.is_finite() || self.lat.abs() > 90.0 {
            return None;
        }
        let lng = if self.lng.abs() <= 180.0 {
            self.lng
        } else {
            (self.lng + 180.0).rem_euclid(360.0) - 180.0
        };
        Some(Self::new(self.lat, lng))
    }
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// Southern edge latitude.
    pub south: f64,
    /// Western edge longitude.
    pub west: f64,
    /// Northern edge latitude.
    pub north: f64,
    /// Eastern edge longitude.
    pub east: f64,
}

impl LatLngBounds {
    /// Creates bounds from two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    /// Creates a box of the given spans centered on `center`.
    #[must_use]
    pub fn centered(center: LatLng, lat_span: f64, lng_span: f64) -> Self {
        Self {
            south: center.lat - lat_span / 2.0,
            west: center.lng - lng_span / 2.0,
            north: center.lat + lat_span / 2.0,
            east: center.lng + lng_span / 2.0,
        }
    }

    /// Smallest bounds containing every coordinate, or `None` when empty.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_corners(first, first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grows the bounds to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.west = self.west.min(point.lng);
        self.north = self.north.max(point.lat);
        self.east = self.east.max(point.lng);
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Whether `point` lies inside or on the edge of the box.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    /// Whether `other` lies entirely inside this box.
    #[must_use]
    pub fn contains_bounds(&self, other: &Self) -> bool {
        self.contains(LatLng::new(other.south, other.west))
            && self.contains(LatLng::new(other.north, other.east))
    }

    /// Longitude at `fraction` (0.0 = west, 1.0 = east) along the box.
    #[must_use]
    pub fn lng_at(&self, fraction: f64) -> f64 {
        self.lng_span().mul_add(fraction, self.west)
    }

    /// Latitude at `fraction` (0.0 = south, 1.0 = north) along the box.
    #[must_use]
    pub fn lat_at(&self, fraction: f64) -> f64 {
        self.lat_span().mul_add(fraction, self.south)
    }

    /// South-west corner.
    #[must_use]
    pub const fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    /// North-east corner.
    #[must_use]
    pub const fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_wraps_longitude_and_refuses_bad_latitude() {
        assert_eq!(
            LatLng::new(-6.2, 106.8).normalized(),
            Some(LatLng::new(-6.2, 106.8))
        );
        assert_eq!(
            LatLng::new(90.0, 180.0).normalized(),
            Some(LatLng::new(90.0, 180.0))
        );
        assert_eq!(
            LatLng::new(10.0, 500.0).normalized(),
            Some(LatLng::new(10.0, 140.0))
        );
        assert_eq!(
            LatLng::new(10.0, -190.0).normalized(),
            Some(LatLng::new(10.0, 170.0))
        );
        assert_eq!(LatLng::new(90.5, 0.0).normalized(), None);
        assert_eq!(LatLng::new(f64::NAN, 0.0).normalized(), None);
        assert_eq!(LatLng::new(0.0, f64::INFINITY).normalized(), None);
    }

    #[test]
    fn from_points_is_none_when_empty() {
        assert!(LatLngBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn from_points_covers_all_points() {
        let bounds = LatLngBounds::from_points([
            LatLng::new(-6.2, 106.8),
            LatLng::new(-6.1, 106.9),
            LatLng::new(-6.3, 106.85),
        ])
        .unwrap();

        assert!((bounds.south - -6.3).abs() < 1e-12);
        assert!((bounds.north - -6.1).abs() < 1e-12);
        assert!((bounds.west - 106.8).abs() < 1e-12);
        assert!((bounds.east - 106.9).abs() < 1e-12);
    }

    #[test]
    fn centered_box_has_requested_spans() {
        let bounds = LatLngBounds::centered(LatLng::new(10.0, 20.0), 2.0, 4.0);
        assert!((bounds.lat_span() - 2.0).abs() < 1e-12);
        assert!((bounds.lng_span() - 4.0).abs() < 1e-12);
        assert_eq!(bounds.center(), LatLng::new(10.0, 20.0));
    }

    #[test]
    fn samples_fractional_positions() {
        let bounds = LatLngBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(4.0, 8.0));
        assert!((bounds.lng_at(0.25) - 2.0).abs() < 1e-12);
        assert!((bounds.lat_at(0.75) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn contains_bounds_checks_both_corners() {
        let outer = LatLngBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(4.0, 4.0));
        let inner = LatLngBounds::from_corners(LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0));
        assert!(outer.contains_bounds(&inner));
        assert!(!inner.contains_bounds(&outer));
    }
}
