//! Keeps map surfaces in step with survey state.
//!
//! The field surface lives only while the field view is active and is
//! redrawn from scratch whenever points, mode, or theme change. Report
//! surfaces are rebuilt on every entry into the print view and on every
//! print-relevant change while there; because their containers must be
//! measured first, [`SurfaceController::sync`] only hands out a numbered
//! [`PrintRequest`]. The front end answers with
//! [`SurfaceController::layout_ready`], and answers to superseded requests
//! are dropped.

use survey_map_state::{ChangeSet, SurveyState};
use survey_map_survey_models::{LatLngBounds, MapLayer, ViewMode};

use crate::framing::{self, MainFraming};
use crate::overlays::{field_overlays, footprint_rectangle, print_overlays};
use crate::{ContainerSize, MapError, MapSurface, SurfaceFactory, SurfaceId};

/// Container size of a freshly created field surface.
pub const FIELD_CONTAINER: ContainerSize = ContainerSize::new(1280, 800);

/// A pending rebuild of the report surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintRequest {
    /// Monotonic request number.
    pub generation: u64,
}

/// Measured container sizes of the report surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintLayoutSizes {
    /// Main report map.
    pub main: ContainerSize,
    /// Locator inset.
    pub inset: ContainerSize,
}

impl Default for PrintLayoutSizes {
    fn default() -> Self {
        Self {
            main: ContainerSize::new(800, 560),
            inset: ContainerSize::new(240, 168),
        }
    }
}

/// What the report maps ended up showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintFrame {
    /// Visible bounds of the main map after fitting.
    pub main_bounds: LatLngBounds,
    /// Visible bounds of the inset after fitting.
    pub inset_bounds: LatLngBounds,
    /// Rectangle drawn on the inset to mark the main map.
    pub footprint: LatLngBounds,
}

/// The main report map and its inset.
#[derive(Debug)]
pub struct PrintSurfaces<S> {
    /// Main report map.
    pub main: S,
    /// Locator inset.
    pub inset: S,
    /// Framing result.
    pub frame: PrintFrame,
}

/// Owns the field and report surfaces.
pub struct SurfaceController<F: SurfaceFactory> {
    factory: F,
    field: Option<F::Surface>,
    print: Option<PrintSurfaces<F::Surface>>,
    generation: u64,
    pending: Option<u64>,
}

impl<F: SurfaceFactory> SurfaceController<F> {
    /// Creates a controller with no surfaces.
    pub const fn new(factory: F) -> Self {
        Self {
            factory,
            field: None,
            print: None,
            generation: 0,
            pending: None,
        }
    }

    /// The field surface, while the field view is active.
    pub const fn field(&self) -> Option<&F::Surface> {
        self.field.as_ref()
    }

    /// The report surfaces, once built for the current print view.
    pub const fn print(&self) -> Option<&PrintSurfaces<F::Surface>> {
        self.print.as_ref()
    }

    /// Generation of the outstanding print request, if any.
    pub const fn pending_generation(&self) -> Option<u64> {
        self.pending
    }

    /// Applies a state transition to the surfaces.
    ///
    /// Returns a [`PrintRequest`] when the report surfaces need rebuilding;
    /// any earlier request becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the field surface cannot be created.
    pub fn sync(
        &mut self,
        state: &SurveyState,
        changes: &ChangeSet,
    ) -> Result<Option<PrintRequest>, MapError> {
        if state.view == ViewMode::Field {
            self.sync_field(state, changes)?;
        } else if self.field.take().is_some() {
            log::debug!("sync: field surface released");
        }

        if state.view != ViewMode::Print {
            if self.print.take().is_some() {
                log::debug!("sync: report surfaces released");
            }
            self.pending = None;
            return Ok(None);
        }

        let entering = changes.view || (self.print.is_none() && self.pending.is_none());
        if entering || changes.affects_print() {
            self.generation += 1;
            self.pending = Some(self.generation);
            log::debug!("sync: print rebuild requested (generation {})", self.generation);
            return Ok(Some(PrintRequest {
                generation: self.generation,
            }));
        }

        Ok(None)
    }

    fn sync_field(&mut self, state: &SurveyState, changes: &ChangeSet) -> Result<(), MapError> {
        let tile_url = survey_map_catalog::tile_url(state.layer);

        let created = if let Some(surface) = self.field.as_mut() {
            if changes.layer {
                surface.set_tile_layer(&tile_url);
            }
            false
        } else {
            let mut surface = self
                .factory
                .create(SurfaceId::Field, &tile_url, FIELD_CONTAINER)?;
            surface.set_view(framing::DEFAULT_CENTER, framing::DEFAULT_FIELD_ZOOM);
            self.field = Some(surface);
            log::debug!("sync: field surface created");
            true
        };

        if created || changes.affects_field_overlays() {
            self.redraw_field(state);
        }
        Ok(())
    }

    fn redraw_field(&mut self, state: &SurveyState) {
        let Some(surface) = self.field.as_mut() else {
            return;
        };
        surface.clear_overlays();
        for shape in field_overlays(&state.points, &state.derivation(), &state.theme) {
            surface.add_overlay(shape);
        }
    }

    /// Builds the report surfaces for `generation` once their containers
    /// have been measured.
    ///
    /// Returns `Ok(None)` when `generation` is not the latest request or the
    /// print view is no longer active.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if a container is empty or a surface cannot be
    /// created. The request stays pending so it can be retried.
    pub fn layout_ready(
        &mut self,
        generation: u64,
        sizes: PrintLayoutSizes,
        state: &SurveyState,
    ) -> Result<Option<PrintFrame>, MapError> {
        if self.pending != Some(generation) {
            log::debug!(
                "layout_ready: ignoring stale generation {generation} (pending {:?})",
                self.pending
            );
            return Ok(None);
        }
        if state.view != ViewMode::Print {
            self.pending = None;
            return Ok(None);
        }

        for (id, size) in [
            (SurfaceId::PrintMain, sizes.main),
            (SurfaceId::PrintInset, sizes.inset),
        ] {
            if size.is_empty() {
                return Err(MapError::EmptyContainer {
                    id,
                    width: size.width,
                    height: size.height,
                });
            }
        }

        let mut main = self.factory.create(
            SurfaceId::PrintMain,
            &survey_map_catalog::tile_url(state.layer),
            sizes.main,
        )?;
        let mut inset = self.factory.create(
            SurfaceId::PrintInset,
            &survey_map_catalog::tile_url(MapLayer::Street),
            sizes.inset,
        )?;

        let framing = MainFraming::for_points(&state.points, state.metadata.scale);
        let (main_bounds, footprint) = match framing {
            MainFraming::Auto { bounds, padding_px } => {
                let visible = main.fit_bounds(bounds, padding_px);
                (visible, visible)
            }
            MainFraming::Scaled { bounds } => (main.fit_bounds(bounds, 0), bounds),
        };

        let center = framing::points_bounds(&state.points).center();
        let inset_bounds = inset.fit_bounds(framing::inset_bounds(center), 0);
        inset.add_overlay(footprint_rectangle(footprint));

        for shape in print_overlays(
            &state.points,
            &state.derivation(),
            &state.theme,
            &state.metadata,
        ) {
            main.add_overlay(shape);
        }

        let frame = PrintFrame {
            main_bounds,
            inset_bounds,
            footprint,
        };
        log::info!(
            "Report maps framed (generation {generation}, zoom {:?})",
            main.zoom()
        );

        self.print = Some(PrintSurfaces { main, inset, frame });
        self.pending = None;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OverlayShape;
    use crate::memory::{MemorySurface, MemorySurfaceFactory};
    use survey_map_state::{Action, Store};
    use survey_map_survey_models::{DrawingMode, ReportMetadata};

    fn store() -> Store {
        Store::new(SurveyState::new(ReportMetadata::dated(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        )))
    }

    fn controller() -> SurfaceController<MemorySurfaceFactory> {
        SurfaceController::new(MemorySurfaceFactory)
    }

    fn step(
        store: &mut Store,
        controller: &mut SurfaceController<MemorySurfaceFactory>,
        action: Action,
    ) -> Option<PrintRequest> {
        let changes = store.dispatch(action);
        controller.sync(store.state(), &changes).unwrap()
    }

    fn to_print(
        store: &mut Store,
        controller: &mut SurfaceController<MemorySurfaceFactory>,
    ) -> PrintRequest {
        step(
            store,
            controller,
            Action::SetView {
                view: ViewMode::Config,
            },
        );
        step(
            store,
            controller,
            Action::SetView {
                view: ViewMode::Print,
            },
        )
        .unwrap()
    }

    fn surveyed() -> (Store, SurfaceController<MemorySurfaceFactory>) {
        let mut store = store();
        let mut controller = controller();
        controller.sync(store.state(), &ChangeSet::NONE).unwrap();
        for action in [
            Action::SetMode { mode: DrawingMode::Area },
            Action::click(-6.200, 106.810),
            Action::click(-6.205, 106.815),
            Action::click(-6.198, 106.818),
        ] {
            step(&mut store, &mut controller, action);
        }
        (store, controller)
    }

    fn markers(surface: &MemorySurface) -> usize {
        surface
            .overlays()
            .iter()
            .filter(|s| matches!(s, OverlayShape::Marker { .. }))
            .count()
    }

    #[test]
    fn field_surface_is_redrawn_on_point_changes() {
        let (mut store, mut controller) = surveyed();
        let field = controller.field().unwrap();
        assert_eq!(markers(field), 3);
        assert_eq!(field.overlays().len(), 5);

        step(&mut store, &mut controller, Action::Undo);
        let field = controller.field().unwrap();
        assert_eq!(markers(field), 2);
        assert_eq!(field.overlays().len(), 2);
    }

    #[test]
    fn layer_toggle_swaps_tiles_in_place() {
        let (mut store, mut controller) = surveyed();
        step(&mut store, &mut controller, Action::ToggleLayer);
        let field = controller.field().unwrap();
        assert!(field.tile_layer().contains("World_Imagery"));
        assert_eq!(field.overlays().len(), 5);
    }

    #[test]
    fn field_surface_is_released_outside_field_view() {
        let (mut store, mut controller) = surveyed();
        step(&mut store, &mut controller, Action::SetView { view: ViewMode::Config });
        assert!(controller.field().is_none());

        step(&mut store, &mut controller, Action::SetView { view: ViewMode::Field });
        assert_eq!(markers(controller.field().unwrap()), 3);
    }

    #[test]
    fn entering_print_requests_a_layout() {
        let (mut store, mut controller) = surveyed();
        let request = to_print(&mut store, &mut controller);
        assert_eq!(controller.pending_generation(), Some(request.generation));

        let frame = controller
            .layout_ready(request.generation, PrintLayoutSizes::default(), store.state())
            .unwrap()
            .unwrap();
        let print = controller.print().unwrap();
        assert_eq!(markers(&print.main), 3);
        assert!(frame.inset_bounds.contains_bounds(&frame.footprint));
        for point in &store.state().points {
            assert!(frame.main_bounds.contains(point.position()));
        }
        assert_eq!(controller.pending_generation(), None);
    }

    #[test]
    fn stale_generations_are_ignored() {
        let (mut store, mut controller) = surveyed();
        let first = to_print(&mut store, &mut controller);
        let second = step(
            &mut store,
            &mut controller,
            Action::SetTitle {
                title: "ridge".to_string(),
            },
        )
        .unwrap();
        assert!(second.generation > first.generation);

        let stale = controller
            .layout_ready(first.generation, PrintLayoutSizes::default(), store.state())
            .unwrap();
        assert!(stale.is_none());
        assert!(controller.print().is_none());

        let fresh = controller
            .layout_ready(second.generation, PrintLayoutSizes::default(), store.state())
            .unwrap();
        assert!(fresh.is_some());
    }

    #[test]
    fn scaled_report_footprint_is_the_requested_box() {
        let (mut store, mut controller) = surveyed();
        step(&mut store, &mut controller, Action::SetScale { scale: 10_000 });
        let request = to_print(&mut store, &mut controller);
        let frame = controller
            .layout_ready(request.generation, PrintLayoutSizes::default(), store.state())
            .unwrap()
            .unwrap();

        let expected = framing::scale_bounds(
            framing::points_bounds(&store.state().points).center(),
            10_000,
            framing::PRINT_MAP_WIDTH_MM,
        );
        assert_eq!(frame.footprint, expected);
        assert!(frame.main_bounds.contains_bounds(&expected));
    }

    #[test]
    fn inset_always_uses_street_tiles() {
        let (mut store, mut controller) = surveyed();
        step(&mut store, &mut controller, Action::ToggleLayer);
        let request = to_print(&mut store, &mut controller);
        controller
            .layout_ready(request.generation, PrintLayoutSizes::default(), store.state())
            .unwrap();
        let print = controller.print().unwrap();
        assert!(print.main.tile_layer().contains("World_Imagery"));
        assert!(print.inset.tile_layer().contains("openstreetmap"));
    }

    #[test]
    fn empty_containers_keep_the_request_pending() {
        let (mut store, mut controller) = surveyed();
        let request = to_print(&mut store, &mut controller);
        let sizes = PrintLayoutSizes {
            main: ContainerSize::new(0, 0),
            ..PrintLayoutSizes::default()
        };
        assert!(controller.layout_ready(request.generation, sizes, store.state()).is_err());
        assert_eq!(controller.pending_generation(), Some(request.generation));
    }

    #[test]
    fn leaving_print_drops_pending_requests() {
        let (mut store, mut controller) = surveyed();
        let request = to_print(&mut store, &mut controller);
        step(&mut store, &mut controller, Action::SetView { view: ViewMode::Config });
        let result = controller
            .layout_ready(request.generation, PrintLayoutSizes::default(), store.state())
            .unwrap();
        assert!(result.is_none());
    }
}
