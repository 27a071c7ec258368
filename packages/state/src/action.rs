//! User actions that drive every state transition.

use serde::{Deserialize, Serialize};
use survey_map_survey_models::{BoundaryStyle, DrawingMode, LatLng, MapLayer, PointSymbol, ViewMode};

use crate::ExportKind;

/// A discrete user action. Actions are serializable so a session can be
/// recorded and replayed deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Switch between field, configuration, and print views.
    SetView {
        /// Target view.
        view: ViewMode,
    },
    /// Change the active drawing mode.
    SetMode {
        /// New mode.
        mode: DrawingMode,
    },
    /// The field surface was clicked at `position`.
    MapClicked {
        /// Clicked coordinate.
        position: LatLng,
    },
    /// A point marker was clicked; `index` is 0-based.
    SelectPoint {
        /// 0-based point index.
        index: usize,
    },
    /// Close the point detail view.
    DismissSelection,
    /// Remove the most recently placed point.
    Undo,
    /// Open the reset confirmation gate.
    RequestReset,
    /// Close the reset confirmation gate without clearing anything.
    CancelReset,
    /// Clear every point after confirmation.
    ConfirmReset,
    /// Flip between street and satellite tiles.
    ToggleLayer,
    /// Select a specific base layer.
    SetLayer {
        /// New base layer.
        layer: MapLayer,
    },
    /// Change the theme stamped onto new points and used for overlays.
    SetTheme {
        /// New theme.
        theme: BoundaryStyle,
    },
    /// Change the symbol stamped onto new points.
    SetSymbol {
        /// New symbol.
        symbol: PointSymbol,
    },
    /// Edit the report title.
    SetTitle {
        /// New title.
        title: String,
    },
    /// Edit the report subtitle.
    SetSubtitle {
        /// New subtitle.
        subtitle: String,
    },
    /// Edit the surveyor name.
    SetSurveyor {
        /// New surveyor name.
        surveyor: String,
    },
    /// Choose the print scale denominator (`0` = auto).
    SetScale {
        /// Scale denominator.
        scale: u32,
    },
    /// Override the legend label of a point; an empty label removes it.
    SetLegendOverride {
        /// 1-based point index.
        index: usize,
        /// Replacement label.
        label: String,
    },
    /// Collapse or expand the field toolbar.
    SetHudMinimized {
        /// Whether the toolbar is collapsed.
        minimized: bool,
    },
    /// The viewport width changed.
    ViewportResized {
        /// Width in CSS pixels.
        width: u32,
    },
    /// An export task started.
    ExportStarted {
        /// Which export.
        kind: ExportKind,
    },
    /// The running export task finished, successfully or not.
    ExportFinished,
    /// Show the onboarding walkthrough.
    ShowWalkthrough,
    /// Hide the onboarding walkthrough.
    DismissWalkthrough,
}

impl Action {
    /// Convenience constructor for a map click.
    #[must_use]
    pub const fn click(lat: f64, lng: f64) -> Self {
        Self::MapClicked {
            position: LatLng::new(lat, lng),
        }
    }
}
