//! Headless [`MapSurface`] backed by Web-Mercator math.
//!
//! The surface keeps its view as a center and an integer zoom, the way a
//! slippy-map widget with whole-level zoom snapping does. Fitting picks the
//! largest zoom at which the requested box (plus padding) fits in the
//! container, so the visible bounds always contain the requested bounds.

use std::f64::consts::PI;

use survey_map_survey_models::{LatLng, LatLngBounds};

use crate::{ContainerSize, MapError, MapSurface, OverlayShape, SurfaceFactory, SurfaceId};

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Highest zoom of the interactive field map.
pub const FIELD_MAX_ZOOM: u8 = 20;

/// Highest zoom of the report maps.
pub const PRINT_MAX_ZOOM: u8 = 18;

const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Projects to normalized Web-Mercator coordinates in `0.0..=1.0`.
fn project(coord: LatLng) -> (f64, f64) {
    let x = (coord.lng + 180.0) / 360.0;
    let sin = coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().sin();
    let y = 0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI);
    (x, y)
}

fn unproject(x: f64, y: f64) -> LatLng {
    let lng = x.mul_add(360.0, -180.0);
    let lat = (2.0 * PI).mul_add(-y, PI).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// An in-memory map surface.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    id: SurfaceId,
    size: ContainerSize,
    tile_url: String,
    overlays: Vec<OverlayShape>,
    max_zoom: u8,
    view: Option<(LatLng, u8)>,
}

impl MemorySurface {
    /// Creates a surface with no view set.
    #[must_use]
    pub fn new(id: SurfaceId, tile_url: &str, size: ContainerSize, max_zoom: u8) -> Self {
        Self {
            id,
            size,
            tile_url: tile_url.to_string(),
            overlays: Vec::new(),
            max_zoom,
            view: None,
        }
    }

    /// Current view center, once a view has been set.
    #[must_use]
    pub fn center(&self) -> Option<LatLng> {
        self.view.map(|(center, _)| center)
    }

    fn world_size(zoom: u8) -> f64 {
        TILE_SIZE * 2f64.powi(i32::from(zoom))
    }

    fn visible_bounds(&self, center: LatLng, zoom: u8) -> LatLngBounds {
        let world = Self::world_size(zoom);
        let (cx, cy) = project(center);
        let half_w = f64::from(self.size.width) / 2.0 / world;
        let half_h = f64::from(self.size.height) / 2.0 / world;
        LatLngBounds::from_corners(
            unproject(cx - half_w, cy - half_h),
            unproject(cx + half_w, cy + half_h),
        )
    }

    /// Largest whole zoom at which `bounds` fit inside the padded container.
    fn bounds_zoom(&self, bounds: &LatLngBounds, padding_px: u32) -> u8 {
        let (west, north, east, south) = projected_extent(bounds);
        let dx = east - west;
        let dy = south - north;

        let avail_w = f64::from(self.size.width.saturating_sub(2 * padding_px).max(1));
        let avail_h = f64::from(self.size.height.saturating_sub(2 * padding_px).max(1));

        let mut fit = f64::from(self.max_zoom);
        if dx > 0.0 {
            fit = fit.min((avail_w / (dx * TILE_SIZE)).log2());
        }
        if dy > 0.0 {
            fit = fit.min((avail_h / (dy * TILE_SIZE)).log2());
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let zoom = fit.floor().clamp(0.0, f64::from(self.max_zoom)) as u8;
        zoom
    }
}

/// `(west, north, east, south)` in projected coordinates.
fn projected_extent(bounds: &LatLngBounds) -> (f64, f64, f64, f64) {
    let (west, north) = project(LatLng::new(bounds.north, bounds.west));
    let (east, south) = project(LatLng::new(bounds.south, bounds.east));
    (west, north, east, south)
}

impl MapSurface for MemorySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn container_size(&self) -> ContainerSize {
        self.size
    }

    fn resize(&mut self, size: ContainerSize) {
        self.size = size;
    }

    fn tile_layer(&self) -> &str {
        &self.tile_url
    }

    fn set_tile_layer(&mut self, url: &str) {
        url.clone_into(&mut self.tile_url);
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.view = Some((center, zoom.min(self.max_zoom)));
    }

    fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    fn add_overlay(&mut self, overlay: OverlayShape) {
        self.overlays.push(overlay);
    }

    fn overlays(&self) -> &[OverlayShape] {
        &self.overlays
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding_px: u32) -> LatLngBounds {
        let zoom = self.bounds_zoom(&bounds, padding_px);
        let (west, north, east, south) = projected_extent(&bounds);
        let center = unproject(f64::midpoint(west, east), f64::midpoint(north, south));

        log::trace!("{}: fit {bounds:?} at zoom {zoom}", self.id);
        self.view = Some((center, zoom));
        self.visible_bounds(center, zoom)
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        self.view
            .map(|(center, zoom)| self.visible_bounds(center, zoom))
    }

    fn zoom(&self) -> Option<u8> {
        self.view.map(|(_, zoom)| zoom)
    }
}

/// Creates [`MemorySurface`]s with the zoom cap appropriate for each
/// surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySurfaceFactory;

impl SurfaceFactory for MemorySurfaceFactory {
    type Surface = MemorySurface;

    fn create(
        &mut self,
        id: SurfaceId,
        tile_url: &str,
        size: ContainerSize,
    ) -> Result<MemorySurface, MapError> {
        if size.is_empty() {
            return Err(MapError::EmptyContainer {
                id,
                width: size.width,
                height: size.height,
            });
        }
        let max_zoom = match id {
            SurfaceId::Field => FIELD_MAX_ZOOM,
            SurfaceId::PrintMain | SurfaceId::PrintInset => PRINT_MAX_ZOOM,
        };
        Ok(MemorySurface::new(id, tile_url, size, max_zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(width: u32, height: u32) -> MemorySurface {
        MemorySurface::new(
            SurfaceId::PrintMain,
            "https://tiles.test/{z}/{x}/{y}.png",
            ContainerSize::new(width, height),
            PRINT_MAX_ZOOM,
        )
    }

    #[test]
    fn projection_round_trips() {
        let coord = LatLng::new(-6.2, 106.81);
        let (x, y) = project(coord);
        let back = unproject(x, y);
        assert!((back.lat - coord.lat).abs() < 1e-9);
        assert!((back.lng - coord.lng).abs() < 1e-9);
    }

    #[test]
    fn fitted_view_contains_requested_bounds() {
        let requested =
            LatLngBounds::from_corners(LatLng::new(-6.21, 106.80), LatLng::new(-6.19, 106.83));
        let mut map = surface(800, 560);
        let visible = map.fit_bounds(requested, 50);

        assert!(visible.contains_bounds(&requested), "{visible:?} vs {requested:?}");
        assert_eq!(map.bounds(), Some(visible));
    }

    #[test]
    fn padding_never_increases_zoom() {
        let requested = LatLngBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(0.05, 0.05));
        let mut tight = surface(800, 560);
        let mut padded = surface(800, 560);
        tight.fit_bounds(requested, 0);
        padded.fit_bounds(requested, 50);
        assert!(padded.zoom() <= tight.zoom());
    }

    #[test]
    fn degenerate_bounds_fit_at_max_zoom() {
        let point = LatLng::new(-6.2, 106.81);
        let mut map = surface(800, 560);
        map.fit_bounds(LatLngBounds::from_corners(point, point), 50);
        assert_eq!(map.zoom(), Some(PRINT_MAX_ZOOM));
    }

    #[test]
    fn tile_layer_swaps_in_place() {
        let mut map = surface(100, 100);
        map.set_view(LatLng::new(0.0, 0.0), 13);
        map.add_overlay(OverlayShape::Label {
            position: LatLng::new(0.0, 0.0),
            text: "x".to_string(),
            class: crate::LabelClass::AreaLabel,
        });
        map.set_tile_layer("https://other.test/{z}/{y}/{x}");

        assert_eq!(map.tile_layer(), "https://other.test/{z}/{y}/{x}");
        assert_eq!(map.overlays().len(), 1);
        assert_eq!(map.zoom(), Some(13));
    }

    #[test]
    fn factory_rejects_empty_containers() {
        let result =
            MemorySurfaceFactory.create(SurfaceId::PrintInset, "u", ContainerSize::new(0, 168));
        assert!(matches!(result, Err(MapError::EmptyContainer { .. })));
    }

    #[test]
    fn field_surfaces_allow_deeper_zoom() {
        let mut map = MemorySurfaceFactory
            .create(SurfaceId::Field, "u", ContainerSize::new(400, 400))
            .unwrap();
        map.set_view(LatLng::new(0.0, 0.0), 25);
        assert_eq!(map.zoom(), Some(FIELD_MAX_ZOOM));
    }
}
