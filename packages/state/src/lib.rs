#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey session state and the reducer that evolves it.
//!
//! All mutable application state lives in one [`SurveyState`] value. User
//! input is expressed as [`Action`]s; [`reduce`] maps a state and an action
//! to the next state plus a [`ChangeSet`] describing what was touched, so
//! the map and report layers can redraw only what depends on it. The
//! [`Store`] owns the current state and a log of applied actions.

mod action;
mod reducer;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use survey_map_geometry::Derivation;
use survey_map_survey_models::{
    BoundaryStyle, DrawingMode, MapLayer, PointSymbol, ReportMetadata, SurveyPoint, ViewMode,
};

pub use action::Action;
pub use reducer::{ChangeSet, reduce};

/// Width assumed before the first resize event, in CSS pixels.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Natural width of the report frame, in CSS pixels (A4 landscape at 96 dpi).
pub const REPORT_FRAME_WIDTH_PX: u32 = 1122;

/// Natural height of the report frame, in CSS pixels.
pub const REPORT_FRAME_HEIGHT_PX: u32 = 794;

/// Horizontal gutter kept around the scaled report on narrow viewports.
const REPORT_GUTTER_PX: u32 = 40;

/// Which export task is running.
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
pub enum ExportKind {
    /// Raster image of the report.
    Image,
    /// KMZ archive of the survey.
    Archive,
}

/// The point currently shown in the detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// 0-based index into the point list.
    pub index: usize,
    /// Snapshot of the point at selection time.
    pub point: SurveyPoint,
}

impl Selection {
    /// 1-based display id (`P{id}`).
    #[must_use]
    pub const fn id(&self) -> usize {
        self.index + 1
    }
}

/// Entire application state for one session.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct SurveyState {
    /// Active screen.
    pub view: ViewMode,
    /// Active drawing mode.
    pub mode: DrawingMode,
    /// Surveyed points in placement order.
    pub points: Vec<SurveyPoint>,
    /// Base tile layer.
    pub layer: MapLayer,
    /// Theme stamped onto new points and used for overlays.
    pub theme: BoundaryStyle,
    /// Symbol stamped onto new points.
    pub symbol: PointSymbol,
    /// Report header and legend configuration.
    pub metadata: ReportMetadata,
    /// Point shown in the detail view, if any.
    pub selection: Option<Selection>,
    /// Whether the field toolbar is collapsed.
    pub hud_minimized: bool,
    /// Whether the reset confirmation gate is open.
    pub reset_pending: bool,
    /// Running export, if any.
    pub exporting: Option<ExportKind>,
    /// Whether the onboarding walkthrough is shown.
    pub walkthrough_visible: bool,
    /// Viewport width in CSS pixels.
    pub viewport_width: u32,
}

impl SurveyState {
    /// Fresh session state with the catalog defaults and `metadata`.
    #[must_use]
    pub fn new(metadata: ReportMetadata) -> Self {
        Self {
            view: ViewMode::Field,
            mode: DrawingMode::None,
            points: Vec::new(),
            layer: MapLayer::Street,
            theme: survey_map_catalog::default_theme(),
            symbol: survey_map_catalog::default_symbol(),
            metadata,
            selection: None,
            hud_minimized: false,
            reset_pending: false,
            exporting: None,
            walkthrough_visible: false,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }

    /// Derived stats and overlay geometry for the current points and mode.
    #[must_use]
    pub fn derivation(&self) -> Derivation {
        survey_map_geometry::derive(&self.points, self.mode)
    }

    /// On-screen scale of the report frame for the current viewport.
    ///
    /// Narrow viewports shrink the frame to fit; wide ones show it 1:1.
    #[must_use]
    pub fn display_scale(&self) -> f64 {
        if self.viewport_width >= REPORT_FRAME_WIDTH_PX {
            1.0
        } else {
            f64::from(self.viewport_width.saturating_sub(REPORT_GUTTER_PX))
                / f64::from(REPORT_FRAME_WIDTH_PX)
        }
    }

    /// Whether an export is in progress.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.exporting.is_some()
    }
}

impl Default for SurveyState {
    fn default() -> Self {
        Self::new(ReportMetadata::default())
    }
}

/// Owns the current state and records every applied action.
#[derive(Debug, Default)]
pub struct Store {
    state: SurveyState,
    log: Vec<Action>,
}

impl Store {
    /// Creates a store holding `state`.
    #[must_use]
    pub const fn new(state: SurveyState) -> Self {
        Self {
            state,
            log: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SurveyState {
        &self.state
    }

    /// Actions applied so far, in order, including rejected ones.
    #[must_use]
    pub fn history(&self) -> &[Action] {
        &self.log
    }

    /// Applies `action` and returns what changed.
    pub fn dispatch(&mut self, action: Action) -> ChangeSet {
        let (next, changes) = reduce(&self.state, &action);
        if changes.is_empty() {
            log::trace!("dispatch: {action:?} had no effect");
        } else {
            log::debug!("dispatch: {action:?} -> {changes:?}");
        }
        self.state = next;
        self.log.push(action);
        changes
    }

    /// Replays `actions` against a fresh `initial` state.
    #[must_use]
    pub fn replay(initial: SurveyState, actions: impl IntoIterator<Item = Action>) -> Self {
        let mut store = Self::new(initial);
        for action in actions {
            store.dispatch(action);
        }
        store
    }
}
