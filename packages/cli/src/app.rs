//! Wires the store, the map surfaces, the report and the exports together.

use std::path::PathBuf;

use survey_map_cli_utils::{BusyIndicator, MultiProgress, alert};
use survey_map_export::{ExportPipeline, timestamp_millis};
use survey_map_map::memory::MemorySurfaceFactory;
use survey_map_map::{MapError, PrintLayoutSizes, PrintRequest, SurfaceController};
use survey_map_report::{ReportFrame, ReportLayout, compose_report};
use survey_map_state::{Action, ChangeSet, Store, SurveyState};
use survey_map_survey_models::{ReportMetadata, ViewMode};

use crate::config::Config;

/// One running survey session.
pub struct App {
    store: Store,
    surfaces: SurfaceController<MemorySurfaceFactory>,
    layout: Option<ReportLayout>,
    pipeline: ExportPipeline,
    multi: MultiProgress,
}

impl App {
    /// Starts a session with today's report metadata.
    ///
    /// # Errors
    ///
    /// * If the field surface cannot be created
    pub fn new(config: &Config, multi: MultiProgress) -> Result<Self, MapError> {
        Self::with_metadata(config, multi, ReportMetadata::default())
    }

    /// Starts a session with `metadata`.
    ///
    /// # Errors
    ///
    /// * If the field surface cannot be created
    pub fn with_metadata(
        config: &Config,
        multi: MultiProgress,
        metadata: ReportMetadata,
    ) -> Result<Self, MapError> {
        let mut app = Self {
            store: Store::new(SurveyState::new(metadata)),
            surfaces: SurfaceController::new(MemorySurfaceFactory),
            layout: None,
            pipeline: ExportPipeline::new(&config.output_dir),
            multi,
        };
        app.surfaces.sync(app.store.state(), &ChangeSet::NONE)?;
        app.dispatch(Action::ViewportResized {
            width: config.viewport_width,
        })?;
        Ok(app)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SurveyState {
        self.store.state()
    }

    /// Applied actions, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Action] {
        self.store.history()
    }

    /// The composed report while the print view is showing.
    #[must_use]
    pub const fn layout(&self) -> Option<&ReportLayout> {
        self.layout.as_ref()
    }

    /// The map surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &SurfaceController<MemorySurfaceFactory> {
        &self.surfaces
    }

    /// Applies `action`, then brings the surfaces and report up to date.
    ///
    /// # Errors
    ///
    /// * If a map surface cannot be created
    pub fn dispatch(&mut self, action: Action) -> Result<ChangeSet, MapError> {
        let changes = self.store.dispatch(action);

        if self.state().view != ViewMode::Print {
            self.layout = None;
        }
        if let Some(request) = self.surfaces.sync(self.store.state(), &changes)? {
            self.build_report(request)?;
        }
        if let Some(layout) = self.layout.as_mut() {
            layout.display = ReportFrame::new(self.store.state().display_scale());
        }

        Ok(changes)
    }

    /// Lays the report maps out at their nominal sizes; the terminal has no
    /// containers to measure.
    fn build_report(&mut self, request: PrintRequest) -> Result<(), MapError> {
        let frame = self.surfaces.layout_ready(
            request.generation,
            PrintLayoutSizes::default(),
            self.store.state(),
        )?;
        if frame.is_none() {
            return Ok(());
        }
        if let Some(print) = self.surfaces.print() {
            self.layout = Some(compose_report(self.store.state(), print));
        }
        Ok(())
    }

    /// Writes a KMZ of the survey.
    pub async fn export_kmz(&mut self) -> Option<PathBuf> {
        let busy = BusyIndicator::start(&self.multi, "Packaging KMZ...");
        let result = self
            .pipeline
            .export_kmz(&mut self.store, timestamp_millis())
            .await;
        Self::report("KMZ", busy, result)
    }

    /// Writes a PNG of the report. Requires the print view.
    pub async fn export_image(&mut self) -> Option<PathBuf> {
        let Some(layout) = self.layout.as_mut() else {
            log::warn!("export_image: no report composed; open the print view first");
            return None;
        };
        let busy = BusyIndicator::start(&self.multi, "Rendering report image...");
        let result = self
            .pipeline
            .export_image(&mut self.store, layout, timestamp_millis())
            .await;
        Self::report("Image", busy, result)
    }

    /// Writes the printable HTML page. Requires the print view.
    pub async fn export_html(&mut self) -> Option<PathBuf> {
        let Some(layout) = self.layout.as_ref() else {
            log::warn!("export_html: no report composed; open the print view first");
            return None;
        };
        let busy = BusyIndicator::start(&self.multi, "Writing printable page...");
        let result = self.pipeline.export_html(layout, timestamp_millis()).await;
        Self::report("Print", busy, result.map(Some))
    }

    fn report(
        what: &str,
        busy: BusyIndicator,
        result: Result<Option<PathBuf>, survey_map_export::ExportError>,
    ) -> Option<PathBuf> {
        match result {
            Ok(Some(path)) => {
                busy.finish(&format!("{what} saved to {}", path.display()));
                Some(path)
            }
            Ok(None) => {
                busy.clear();
                None
            }
            Err(e) => {
                busy.clear();
                alert(&format!("{what} export failed: {e}"));
                None
            }
        }
    }
}
