//! The pure reducer: `(state, action) -> (state, changes)`.

use survey_map_survey_models::{DrawingMode, SurveyPoint, ViewMode};

use crate::{Action, Selection, SurveyState};

/// Which aspects of the state a transition touched.
///
/// Consumers use this to decide what to redraw: the field overlays depend
/// on points, mode, and theme; the print surfaces additionally on layer and
/// metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ChangeSet {
    /// The active view changed.
    pub view: bool,
    /// The point list changed.
    pub points: bool,
    /// The drawing mode changed.
    pub mode: bool,
    /// The active theme changed.
    pub theme: bool,
    /// The active symbol changed.
    pub symbol: bool,
    /// The base layer changed.
    pub layer: bool,
    /// Report metadata changed.
    pub metadata: bool,
    /// The point selection changed.
    pub selection: bool,
    /// A transient UI flag changed (toolbar, reset gate, export, walkthrough,
    /// viewport).
    pub flags: bool,
}

impl ChangeSet {
    /// Nothing changed.
    pub const NONE: Self = Self {
        view: false,
        points: false,
        mode: false,
        theme: false,
        symbol: false,
        layer: false,
        metadata: false,
        selection: false,
        flags: false,
    };

    /// Whether the transition was a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Whether the field overlay group must be rebuilt.
    #[must_use]
    pub const fn affects_field_overlays(&self) -> bool {
        self.points || self.mode || self.theme
    }

    /// Whether the print and inset surfaces must be rebuilt.
    #[must_use]
    pub const fn affects_print(&self) -> bool {
        self.view || self.points || self.mode || self.theme || self.layer || self.metadata
    }
}

/// Applies `action` to `state`, returning the next state and what changed.
///
/// The input state is never mutated. Actions that are not valid in the
/// current state return an unchanged copy and an empty [`ChangeSet`].
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn reduce(state: &SurveyState, action: &Action) -> (SurveyState, ChangeSet) {
    let mut next = state.clone();
    let mut changes = ChangeSet::NONE;

    match action {
        Action::SetView { view } => {
            let allowed = match (state.view, *view) {
                (from, to) if from == to => false,
                (ViewMode::Field, ViewMode::Config) => !state.points.is_empty(),
                (ViewMode::Config, ViewMode::Print) | (_, ViewMode::Field | ViewMode::Config) => {
                    true
                }
                (ViewMode::Field | ViewMode::Print, ViewMode::Print) => false,
            };
            if allowed {
                next.view = *view;
                changes.view = true;
                if *view != ViewMode::Field && next.selection.take().is_some() {
                    changes.selection = true;
                }
            }
        }
        Action::SetMode { mode } => {
            if state.mode != *mode {
                next.mode = *mode;
                changes.mode = true;
            }
        }
        Action::MapClicked { position } => {
            if state.view != ViewMode::Field {
                log::debug!("reduce: ignoring click outside the field view");
            } else if state.selection.is_some() {
                next.selection = None;
                changes.selection = true;
            } else if state.reset_pending {
                log::debug!("reduce: ignoring click while reset confirmation is open");
            } else if let Some(position) = position.normalized() {
                next.points
                    .push(SurveyPoint::stamped(position, &state.theme, &state.symbol));
                changes.points = true;
            } else {
                log::warn!(
                    "reduce: ignoring click at invalid coordinate ({}, {})",
                    position.lat,
                    position.lng
                );
            }
        }
        Action::SelectPoint { index } => {
            match state.points.get(*index) {
                Some(point) if state.view == ViewMode::Field => {
                    next.selection = Some(Selection {
                        index: *index,
                        point: point.clone(),
                    });
                    changes.selection = true;
                }
                _ => log::debug!("reduce: no point {index} to select"),
            }
        }
        Action::DismissSelection => {
            if next.selection.take().is_some() {
                changes.selection = true;
            }
        }
        Action::Undo => {
            if state.view != ViewMode::Field {
                log::debug!("reduce: ignoring undo outside the field view");
            } else if next.points.pop().is_some() {
                changes.points = true;
                if next
                    .selection
                    .as_ref()
                    .is_some_and(|s| s.index >= next.points.len())
                {
                    next.selection = None;
                    changes.selection = true;
                }
            }
        }
        Action::RequestReset => {
            if state.view == ViewMode::Field && !state.reset_pending {
                next.reset_pending = true;
                changes.flags = true;
            }
        }
        Action::CancelReset => {
            if state.reset_pending {
                next.reset_pending = false;
                changes.flags = true;
            }
        }
        Action::ConfirmReset => {
            if state.reset_pending {
                next.points.clear();
                next.mode = DrawingMode::None;
                next.selection = None;
                next.reset_pending = false;
                changes.points = !state.points.is_empty();
                changes.mode = state.mode != next.mode;
                changes.selection = state.selection.is_some();
                changes.flags = true;
            }
        }
        Action::ToggleLayer => {
            next.layer = state.layer.toggled();
            changes.layer = true;
        }
        Action::SetLayer { layer } => {
            if state.layer != *layer {
                next.layer = *layer;
                changes.layer = true;
            }
        }
        Action::SetTheme { theme } => {
            if state.theme != *theme {
                next.theme = theme.clone();
                changes.theme = true;
            }
        }
        Action::SetSymbol { symbol } => {
            if state.symbol != *symbol {
                next.symbol = symbol.clone();
                changes.symbol = true;
            }
        }
        Action::SetTitle { title } => {
            changes.metadata = set_upper(&mut next.metadata.title, title);
        }
        Action::SetSubtitle { subtitle } => {
            changes.metadata = set_upper(&mut next.metadata.subtitle, subtitle);
        }
        Action::SetSurveyor { surveyor } => {
            changes.metadata = set_upper(&mut next.metadata.surveyor, surveyor);
        }
        Action::SetScale { scale } => {
            if state.metadata.scale != *scale {
                next.metadata.scale = *scale;
                changes.metadata = true;
            }
        }
        Action::SetLegendOverride { index, label } => {
            if *index == 0 {
                log::warn!("reduce: legend override indices are 1-based, ignoring index 0");
            } else if label.is_empty() {
                changes.metadata = next.metadata.legend_overrides.remove(index).is_some();
            } else if state.metadata.legend_overrides.get(index) != Some(label) {
                next.metadata.legend_overrides.insert(*index, label.clone());
                changes.metadata = true;
            }
        }
        Action::SetHudMinimized { minimized } => {
            if state.hud_minimized != *minimized {
                next.hud_minimized = *minimized;
                changes.flags = true;
            }
        }
        Action::ViewportResized { width } => {
            if state.viewport_width != *width {
                next.viewport_width = *width;
                changes.flags = true;
            }
        }
        Action::ExportStarted { kind } => {
            if let Some(running) = state.exporting {
                log::debug!("reduce: {kind} export refused while {running} export is running");
            } else {
                next.exporting = Some(*kind);
                changes.flags = true;
            }
        }
        Action::ExportFinished => {
            if next.exporting.take().is_some() {
                changes.flags = true;
            }
        }
        Action::ShowWalkthrough => {
            if !state.walkthrough_visible {
                next.walkthrough_visible = true;
                changes.flags = true;
            }
        }
        Action::DismissWalkthrough => {
            if state.walkthrough_visible {
                next.walkthrough_visible = false;
                changes.flags = true;
            }
        }
    }

    (next, changes)
}

fn set_upper(field: &mut String, value: &str) -> bool {
    let upper = value.to_uppercase();
    if *field == upper {
        false
    } else {
        *field = upper;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_map_survey_models::{LatLng, MapLayer, ReportMetadata};

    use crate::ExportKind;

    fn state() -> SurveyState {
        SurveyState::new(ReportMetadata::dated(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        ))
    }

    fn apply(state: &SurveyState, actions: &[Action]) -> SurveyState {
        actions.iter().fold(state.clone(), |s, a| reduce(&s, a).0)
    }

    #[test]
    fn click_appends_point_stamped_with_active_theme_and_symbol() {
        let (next, changes) = reduce(&state(), &Action::click(-6.2, 106.8));

        assert!(changes.points);
        assert_eq!(next.points.len(), 1);
        assert_eq!(next.points[0].color.as_deref(), Some("#10b981"));
        assert_eq!(next.points[0].symbol.as_deref(), Some("fa-location-dot"));
        assert_eq!(next.points[0].label.as_deref(), Some("Marker"));
    }

    #[test]
    fn changing_theme_does_not_restyle_existing_points() {
        let hazard = survey_map_catalog::theme_by_label("Hazard").unwrap();
        let next = apply(
            &state(),
            &[
                Action::click(0.0, 0.0),
                Action::SetTheme { theme: hazard },
                Action::click(0.0, 1.0),
            ],
        );

        assert_eq!(next.points[0].color.as_deref(), Some("#10b981"));
        assert_eq!(next.points[1].color.as_deref(), Some("#fbbf24"));
    }

    #[test]
    fn click_with_open_selection_only_dismisses_it() {
        let selected = apply(
            &state(),
            &[Action::click(0.0, 0.0), Action::SelectPoint { index: 0 }],
        );
        assert_eq!(selected.selection.as_ref().map(Selection::id), Some(1));

        let (next, changes) = reduce(&selected, &Action::click(1.0, 1.0));
        assert!(next.selection.is_none());
        assert_eq!(next.points.len(), 1);
        assert!(changes.selection);
        assert!(!changes.points);
    }

    #[test]
    fn click_while_reset_pending_is_a_no_op() {
        let pending = apply(&state(), &[Action::click(0.0, 0.0), Action::RequestReset]);
        let (next, changes) = reduce(&pending, &Action::click(1.0, 1.0));
        assert_eq!(next.points.len(), 1);
        assert!(changes.is_empty());
    }

    #[test]
    fn undo_is_strict_inverse_of_append() {
        let before = apply(&state(), &[Action::click(0.0, 0.0), Action::click(0.0, 1.0)]);
        let after = apply(&before, &[Action::click(1.0, 1.0), Action::Undo]);
        assert_eq!(after.points, before.points);
    }

    #[test]
    fn undo_on_empty_survey_changes_nothing() {
        let (_, changes) = reduce(&state(), &Action::Undo);
        assert!(changes.is_empty());
    }

    #[test]
    fn undo_dismisses_selection_of_removed_point() {
        let selected = apply(
            &state(),
            &[
                Action::click(0.0, 0.0),
                Action::click(0.0, 1.0),
                Action::SelectPoint { index: 1 },
            ],
        );
        let (next, changes) = reduce(&selected, &Action::Undo);
        assert!(next.selection.is_none());
        assert!(changes.selection);
    }

    #[test]
    fn confirmed_reset_clears_points_mode_and_selection_at_once() {
        let busy = apply(
            &state(),
            &[
                Action::SetMode {
                    mode: DrawingMode::Area,
                },
                Action::click(0.0, 0.0),
                Action::click(0.0, 1.0),
                Action::SelectPoint { index: 0 },
                Action::DismissSelection,
                Action::SelectPoint { index: 1 },
            ],
        );
        let pending = SurveyState {
            reset_pending: true,
            ..busy
        };

        let (next, changes) = reduce(&pending, &Action::ConfirmReset);
        assert!(next.points.is_empty());
        assert_eq!(next.mode, DrawingMode::None);
        assert!(next.selection.is_none());
        assert!(!next.reset_pending);
        assert!(changes.points && changes.mode && changes.selection);
    }

    #[test]
    fn reset_requires_confirmation_gate() {
        let surveyed = apply(&state(), &[Action::click(0.0, 0.0)]);
        let (next, changes) = reduce(&surveyed, &Action::ConfirmReset);
        assert_eq!(next.points.len(), 1);
        assert!(changes.is_empty());

        let cancelled = apply(&surveyed, &[Action::RequestReset, Action::CancelReset]);
        assert_eq!(cancelled.points.len(), 1);
        assert!(!cancelled.reset_pending);
    }

    #[test]
    fn config_view_requires_points() {
        let (next, changes) = reduce(
            &state(),
            &Action::SetView {
                view: ViewMode::Config,
            },
        );
        assert_eq!(next.view, ViewMode::Field);
        assert!(changes.is_empty());

        let surveyed = apply(
            &state(),
            &[
                Action::click(0.0, 0.0),
                Action::SetView {
                    view: ViewMode::Config,
                },
                Action::SetView {
                    view: ViewMode::Print,
                },
            ],
        );
        assert_eq!(surveyed.view, ViewMode::Print);
    }

    #[test]
    fn print_view_is_reached_only_through_config() {
        let surveyed = apply(&state(), &[Action::click(0.0, 0.0)]);
        let (next, _) = reduce(
            &surveyed,
            &Action::SetView {
                view: ViewMode::Print,
            },
        );
        assert_eq!(next.view, ViewMode::Field);
    }

    #[test]
    fn clicks_outside_field_view_are_ignored() {
        let config = apply(
            &state(),
            &[
                Action::click(0.0, 0.0),
                Action::SetView {
                    view: ViewMode::Config,
                },
                Action::click(1.0, 1.0),
            ],
        );
        assert_eq!(config.points.len(), 1);
    }

    #[test]
    fn clicks_at_impossible_coordinates_are_refused() {
        let surveyed = apply(&state(), &[Action::click(0.0, 0.0)]);
        for (lat, lng) in [
            (f64::NAN, 106.8),
            (-6.2, f64::INFINITY),
            (f64::NEG_INFINITY, 0.0),
            (91.0, 0.0),
            (-90.5, 0.0),
        ] {
            let (next, changes) = reduce(&surveyed, &Action::click(lat, lng));
            assert!(changes.is_empty(), "({lat}, {lng})");
            assert_eq!(next.points, surveyed.points);
        }
    }

    #[test]
    fn click_longitude_is_wrapped_onto_the_map() {
        let (next, changes) = reduce(&state(), &Action::click(10.0, 500.0));
        assert!(changes.points);
        assert_eq!(next.points[0].position(), LatLng::new(10.0, 140.0));
    }

    #[test]
    fn undo_is_ignored_outside_field_view() {
        let config = apply(
            &state(),
            &[
                Action::click(0.0, 0.0),
                Action::click(0.0, 1.0),
                Action::SetView {
                    view: ViewMode::Config,
                },
            ],
        );
        let (next, changes) = reduce(&config, &Action::Undo);
        assert_eq!(next.points.len(), 2);
        assert!(changes.is_empty());

        let print = apply(
            &config,
            &[Action::SetView {
                view: ViewMode::Print,
            }],
        );
        let (next, changes) = reduce(&print, &Action::Undo);
        assert_eq!(next.points.len(), 2);
        assert!(changes.is_empty());
    }

    #[test]
    fn metadata_text_is_upper_cased() {
        let next = apply(
            &state(),
            &[
                Action::SetTitle {
                    title: "north ridge".to_string(),
                },
                Action::SetSurveyor {
                    surveyor: "a. rahman".to_string(),
                },
            ],
        );
        assert_eq!(next.metadata.title, "NORTH RIDGE");
        assert_eq!(next.metadata.surveyor, "A. RAHMAN");
    }

    #[test]
    fn empty_override_removes_entry() {
        let next = apply(
            &state(),
            &[
                Action::SetLegendOverride {
                    index: 1,
                    label: "Gate".to_string(),
                },
                Action::SetLegendOverride {
                    index: 1,
                    label: String::new(),
                },
            ],
        );
        assert!(next.metadata.legend_overrides.is_empty());
    }

    #[test]
    fn second_export_is_refused_while_one_runs() {
        let running = apply(
            &state(),
            &[Action::ExportStarted {
                kind: ExportKind::Image,
            }],
        );
        let (next, changes) = reduce(
            &running,
            &Action::ExportStarted {
                kind: ExportKind::Archive,
            },
        );
        assert_eq!(next.exporting, Some(ExportKind::Image));
        assert!(changes.is_empty());

        let (finished, _) = reduce(&next, &Action::ExportFinished);
        assert!(finished.exporting.is_none());
    }

    #[test]
    fn layer_toggle_reports_layer_change() {
        let (next, changes) = reduce(&state(), &Action::ToggleLayer);
        assert_eq!(next.layer, MapLayer::Satellite);
        assert!(changes.layer);
        assert!(changes.affects_print());
        assert!(!changes.affects_field_overlays());
    }
}
