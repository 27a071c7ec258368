//! Export orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use survey_map_report::ReportLayout;
use survey_map_report::html::render_html;
use survey_map_state::{Action, ExportKind, Store};

use crate::kml::build_kml;
use crate::kmz::{kmz_file_name, package_kmz, report_file_name};
use crate::output::write_atomic;
use crate::raster::{ImageRasterizer, Rasterizer};
use crate::ExportError;

/// Milliseconds since the Unix epoch, used in export file names.
#[must_use]
pub fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Holds the store's exporting flag; clears it when dropped, whatever the
/// outcome.
struct ExportGuard<'a> {
    store: &'a mut Store,
}

impl<'a> ExportGuard<'a> {
    fn begin(store: &'a mut Store, kind: ExportKind) -> Option<Self> {
        if let Some(running) = store.state().exporting {
            log::debug!("export {kind}: refused, {running} export in progress");
            return None;
        }
        store.dispatch(Action::ExportStarted { kind });
        Some(Self { store })
    }

    fn store(&self) -> &Store {
        self.store
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::ExportFinished);
    }
}

type Joined = Result<Result<PathBuf, ExportError>, tokio::task::JoinError>;

fn settle(what: &str, joined: Joined) -> Result<PathBuf, ExportError> {
    match joined.map_err(ExportError::from).and_then(std::convert::identity) {
        Ok(path) => {
            log::info!("{what} export saved to {}", path.display());
            Ok(path)
        }
        Err(e) => {
            log::error!("{what} export failed: {e}");
            Err(e)
        }
    }
}

/// Produces KMZ, PNG and HTML exports in an output directory.
pub struct ExportPipeline<R = ImageRasterizer> {
    out_dir: PathBuf,
    rasterizer: Arc<R>,
}

impl ExportPipeline {
    /// Pipeline writing into `out_dir` with the default PNG rasterizer.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self::with_rasterizer(out_dir, ImageRasterizer::default())
    }
}

impl<R: Rasterizer + 'static> ExportPipeline<R> {
    /// Pipeline writing into `out_dir` with a custom rasterizer.
    #[must_use]
    pub fn with_rasterizer(out_dir: impl Into<PathBuf>, rasterizer: R) -> Self {
        Self {
            out_dir: out_dir.into(),
            rasterizer: Arc::new(rasterizer),
        }
    }

    /// Directory exports are written to.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Writes the survey as `FIELD_SURVEY_{millis}.kmz`.
    ///
    /// Returns `Ok(None)` without touching the store when there are no
    /// points or another export is running.
    ///
    /// # Errors
    ///
    /// * If the archive cannot be built or written
    /// * If the blocking task fails
    pub async fn export_kmz(
        &self,
        store: &mut Store,
        millis: i64,
    ) -> Result<Option<PathBuf>, ExportError> {
        if store.state().points.is_empty() {
            log::debug!("export_kmz: no points to export");
            return Ok(None);
        }
        let Some(guard) = ExportGuard::begin(store, ExportKind::Archive) else {
            return Ok(None);
        };

        let state = guard.store().state();
        let kml = build_kml(&state.points, state.mode, &state.metadata);
        let dir = self.out_dir.clone();
        let name = kmz_file_name(millis);

        let joined = tokio::task::spawn_blocking(move || {
            let bytes = package_kmz(&kml)?;
            write_atomic(&dir, &name, &bytes)
        })
        .await;

        drop(guard);
        settle("KMZ", joined).map(Some)
    }

    /// Rasterizes the report as `FIELD_SURVEY_REPORT_{millis}.png`.
    ///
    /// The display transform is stripped for the capture and restored
    /// afterwards, also on failure. Returns `Ok(None)` when another export is
    /// running.
    ///
    /// # Errors
    ///
    /// * If rasterization or encoding fails
    /// * If the file cannot be written
    /// * If the blocking task fails
    pub async fn export_image(
        &self,
        store: &mut Store,
        layout: &mut ReportLayout,
        millis: i64,
    ) -> Result<Option<PathBuf>, ExportError> {
        let Some(guard) = ExportGuard::begin(store, ExportKind::Image) else {
            return Ok(None);
        };

        let rasterizer = Arc::clone(&self.rasterizer);
        let dir = self.out_dir.clone();
        let name = report_file_name(millis, rasterizer.extension());

        let joined = {
            let stripped = layout.strip_transform();
            let capture = ReportLayout::clone(&stripped);
            tokio::task::spawn_blocking(move || {
                let bytes = rasterizer.rasterize(&capture)?;
                write_atomic(&dir, &name, &bytes)
            })
            .await
        };

        drop(guard);
        settle("Image", joined).map(Some)
    }

    /// Writes the printable page as `FIELD_SURVEY_REPORT_{millis}.html`.
    ///
    /// # Errors
    ///
    /// * If the file cannot be written
    /// * If the blocking task fails
    pub async fn export_html(
        &self,
        layout: &ReportLayout,
        millis: i64,
    ) -> Result<PathBuf, ExportError> {
        let html = render_html(layout);
        let dir = self.out_dir.clone();
        let name = report_file_name(millis, "html");

        let joined =
            tokio::task::spawn_blocking(move || write_atomic(&dir, &name, html.as_bytes())).await;

        settle("HTML", joined)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Read as _;

    use super::*;
    use survey_map_map::memory::MemorySurfaceFactory;
    use survey_map_map::{PrintLayoutSizes, SurfaceController};
    use survey_map_report::{ReportFrame, compose_report};
    use survey_map_state::SurveyState;
    use survey_map_survey_models::{DrawingMode, ReportMetadata, ViewMode};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("survey_map_export_{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn store_with(actions: Vec<Action>) -> Store {
        let mut store = Store::new(SurveyState::new(ReportMetadata::dated(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        )));
        for action in actions {
            store.dispatch(action);
        }
        store
    }

    fn area_survey() -> Vec<Action> {
        vec![
            Action::SetMode {
                mode: DrawingMode::Area,
            },
            Action::click(0.0, 0.0),
            Action::click(0.0, 1.0),
            Action::click(1.0, 1.0),
        ]
    }

    fn print_layout(store: &mut Store) -> ReportLayout {
        let mut controller = SurfaceController::new(MemorySurfaceFactory);
        let mut request = None;
        for view in [ViewMode::Config, ViewMode::Print] {
            let changes = store.dispatch(Action::SetView { view });
            request = controller.sync(store.state(), &changes).unwrap().or(request);
        }
        controller
            .layout_ready(
                request.unwrap().generation,
                PrintLayoutSizes::default(),
                store.state(),
            )
            .unwrap()
            .unwrap();
        compose_report(store.state(), controller.print().unwrap())
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn extension(&self) -> &'static str {
            "png"
        }

        fn rasterize(&self, layout: &ReportLayout) -> Result<Vec<u8>, ExportError> {
            assert!((layout.display.effective_scale() - 1.0).abs() < f64::EPSILON);
            Err(ExportError::Io {
                path: "canvas".to_string(),
                source: std::io::Error::other("capture failed"),
            })
        }
    }

    #[tokio::test]
    async fn kmz_export_writes_closed_polygon() {
        let dir = scratch("kmz");
        let mut store = store_with(area_survey());
        let pipeline = ExportPipeline::new(&dir);

        let path = pipeline.export_kmz(&mut store, 1_000).await.unwrap().unwrap();
        assert_eq!(path, dir.join("FIELD_SURVEY_1000.kmz"));
        assert!(!store.state().is_exporting());
        assert!(store.history().contains(&Action::ExportStarted {
            kind: ExportKind::Archive
        }));

        let mut archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        let mut kml = String::new();
        archive
            .by_name("doc.kml")
            .unwrap()
            .read_to_string(&mut kml)
            .unwrap();
        assert!(kml.contains("0,0,0 1,0,0 1,1,0 0,0,0"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn kmz_export_without_points_is_refused() {
        let dir = scratch("kmz_empty");
        let mut store = store_with(vec![]);
        let pipeline = ExportPipeline::new(&dir);

        assert!(pipeline.export_kmz(&mut store, 1).await.unwrap().is_none());
        assert!(store.history().is_empty());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn export_while_another_runs_is_refused() {
        let dir = scratch("busy");
        let mut store = store_with(area_survey());
        store.dispatch(Action::ExportStarted {
            kind: ExportKind::Image,
        });
        let pipeline = ExportPipeline::new(&dir);

        assert!(pipeline.export_kmz(&mut store, 1).await.unwrap().is_none());
        assert_eq!(store.state().exporting, Some(ExportKind::Image));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn failed_image_export_clears_flag_and_restores_transform() {
        let dir = scratch("failing");
        let mut store = store_with(area_survey());
        let mut layout = print_layout(&mut store);
        layout.display = ReportFrame::new(0.5);
        let pipeline = ExportPipeline::with_rasterizer(&dir, FailingRasterizer);

        let result = pipeline.export_image(&mut store, &mut layout, 7).await;
        assert!(matches!(result, Err(ExportError::Io { .. })));
        assert!(!store.state().is_exporting());
        assert!((layout.display.effective_scale() - 0.5).abs() < f64::EPSILON);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn image_export_captures_full_size_page() {
        let dir = scratch("png");
        let mut store = store_with(area_survey());
        let mut layout = print_layout(&mut store);
        layout.display = ReportFrame::new(0.5);
        let pipeline = ExportPipeline::new(&dir);

        let path = pipeline
            .export_image(&mut store, &mut layout, 42)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.join("FIELD_SURVEY_REPORT_42.png"));
        assert!((layout.display.effective_scale() - 0.5).abs() < f64::EPSILON);

        let pixmap = resvg::tiny_skia::Pixmap::decode_png(&fs::read(&path).unwrap()).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (2244, 1588));
        let corner = pixmap.pixel(2243, 1587).unwrap();
        assert_eq!(
            [corner.red(), corner.green(), corner.blue(), corner.alpha()],
            [0, 0, 0, 255]
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn html_export_writes_printable_page() {
        let dir = scratch("html");
        let mut store = store_with(area_survey());
        let layout = print_layout(&mut store);
        let pipeline = ExportPipeline::new(&dir);

        let path = pipeline.export_html(&layout, 9).await.unwrap();
        assert_eq!(path, dir.join("FIELD_SURVEY_REPORT_9.html"));
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("size: A4 landscape"));

        let _ = fs::remove_dir_all(&dir);
    }
}
