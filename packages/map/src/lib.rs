#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map surfaces and the controller that keeps them in sync with the survey.
//!
//! A [`MapSurface`] is anything that can show a tile layer, frame a bounding
//! box, and hold a list of [`OverlayShape`]s. The rendering backend sits
//! behind [`SurfaceFactory`]; [`memory::MemorySurface`] is a headless
//! Web-Mercator implementation used by the CLI and the tests.
//!
//! [`controller::SurfaceController`] owns up to three surfaces (field,
//! print main, print inset) and rebuilds them from [`survey_map_state`]
//! transitions.

pub mod controller;
pub mod framing;
pub mod memory;
pub mod overlays;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use survey_map_survey_models::{LatLng, LatLngBounds};

pub use controller::{PrintFrame, PrintLayoutSizes, PrintRequest, SurfaceController};

/// Errors from surface creation and print layout.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A container was measured with zero width or height.
    #[error("Surface {id} has an empty container ({width}x{height})")]
    EmptyContainer {
        /// Which surface.
        id: SurfaceId,
        /// Measured width in pixels.
        width: u32,
        /// Measured height in pixels.
        height: u32,
    },

    /// The rendering backend could not create a surface.
    #[error("Failed to create surface {id}: {message}")]
    Backend {
        /// Which surface.
        id: SurfaceId,
        /// Backend-specific description.
        message: String,
    },
}

/// Identifies one of the three surfaces the application shows.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum SurfaceId {
    /// Interactive editing map.
    Field,
    /// Main report map.
    PrintMain,
    /// Locator inset on the report.
    PrintInset,
}

/// Pixel size of a surface container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ContainerSize {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Line and fill styling for vector overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Line color (`#rrggbb`).
    pub color: String,
    /// Line weight in pixels.
    pub weight: u32,
    /// Dash pattern such as `"10, 10"`; solid when absent.
    pub dash: Option<String>,
    /// Fill color; defaults to the line color when absent.
    pub fill_color: Option<String>,
    /// Fill opacity in `0.0..=1.0`.
    pub fill_opacity: f64,
}

impl Stroke {
    /// Solid line with the default fill opacity of 0.2.
    #[must_use]
    pub fn solid(color: impl Into<String>, weight: u32) -> Self {
        Self {
            color: color.into(),
            weight,
            dash: None,
            fill_color: None,
            fill_opacity: 0.2,
        }
    }

    /// Same stroke with a dash pattern.
    #[must_use]
    pub fn dashed(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    /// Same stroke with a fill opacity, keeping the fill color.
    #[must_use]
    pub const fn fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    /// Same stroke with an explicit fill color.
    #[must_use]
    pub fn fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    /// Effective fill color.
    #[must_use]
    pub fn fill(&self) -> &str {
        self.fill_color.as_deref().unwrap_or(&self.color)
    }
}

/// Marker rendering variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerStyle {
    /// Rounded tile filled with the point color, white icon.
    Field,
    /// White square with black border and black icon.
    Print,
}

/// Text label variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LabelClass {
    /// Path length next to the path midpoint.
    DistanceLabel,
    /// Area at the polygon centroid.
    AreaLabel,
    /// `P{n} : label` tag beside a print marker.
    PrintLabel,
}

/// Something drawn on top of the tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayShape {
    /// A point marker.
    Marker {
        /// Marker position.
        position: LatLng,
        /// Icon id.
        icon: String,
        /// Background color.
        color: String,
        /// Hover tooltip.
        tooltip: Option<String>,
        /// 0-based point index.
        index: usize,
        /// Rendering variant.
        style: MarkerStyle,
    },
    /// Free-standing text.
    Label {
        /// Anchor position.
        position: LatLng,
        /// Label text.
        text: String,
        /// Rendering variant.
        class: LabelClass,
    },
    /// Open polyline.
    Polyline {
        /// Vertices in order.
        vertices: Vec<LatLng>,
        /// Styling.
        stroke: Stroke,
    },
    /// Filled polygon.
    Polygon {
        /// Closed ring.
        ring: Vec<LatLng>,
        /// Styling.
        stroke: Stroke,
    },
    /// Axis-aligned rectangle.
    Rectangle {
        /// Rectangle extent.
        bounds: LatLngBounds,
        /// Styling.
        stroke: Stroke,
    },
}

/// A rendering surface that shows tiles and overlays.
pub trait MapSurface: Send {
    /// Which surface this is.
    fn id(&self) -> SurfaceId;

    /// Current container size.
    fn container_size(&self) -> ContainerSize;

    /// Notifies the surface that its container changed size.
    fn resize(&mut self, size: ContainerSize);

    /// Tile URL template currently shown.
    fn tile_layer(&self) -> &str;

    /// Replaces the tile layer in place, keeping overlays and view.
    fn set_tile_layer(&mut self, url: &str);

    /// Centers the view on `center` at `zoom`.
    fn set_view(&mut self, center: LatLng, zoom: u8);

    /// Removes every overlay.
    fn clear_overlays(&mut self);

    /// Adds one overlay on top of the existing ones.
    fn add_overlay(&mut self, overlay: OverlayShape);

    /// Overlays in insertion order.
    fn overlays(&self) -> &[OverlayShape];

    /// Frames `bounds` with `padding_px` on every side and returns the
    /// visible bounds after fitting.
    fn fit_bounds(&mut self, bounds: LatLngBounds, padding_px: u32) -> LatLngBounds;

    /// Visible bounds, once a view has been set.
    fn bounds(&self) -> Option<LatLngBounds>;

    /// Current zoom level, once a view has been set.
    fn zoom(&self) -> Option<u8>;
}

/// Creates surfaces for the controller.
pub trait SurfaceFactory {
    /// Surface type produced.
    type Surface: MapSurface;

    /// Creates a surface showing `tile_url` in a container of `size`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the backend cannot create the surface.
    fn create(
        &mut self,
        id: SurfaceId,
        tile_url: &str,
        size: ContainerSize,
    ) -> Result<Self::Surface, MapError>;
}
