//! Menu-driven field terminal.
//!
//! Each view gets its own `dialoguer` menu: the field menu places and edits
//! points, the config menu edits the report header and legend, and the print
//! menu previews the composed report and runs the exports.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use survey_map_map::MapSurface as _;
use survey_map_map::overlays::point_tag;
use survey_map_report::{field_readout, scale_text};
use survey_map_state::Action;
use survey_map_survey_models::{DrawingMode, SCALE_PRESETS, ViewMode};

use crate::app::App;
use crate::config::Config;
use crate::onboarding;
use crate::session::Session;

/// Actions available in the field view.
enum FieldAction {
    PlacePoint,
    SetMode,
    InspectPoint,
    Undo,
    Reset,
    ToggleLayer,
    Theme,
    Symbol,
    ToggleHud,
    Configure,
    ExportKmz,
    SaveSession,
    Quit,
}

impl FieldAction {
    const ALL: &[Self] = &[
        Self::PlacePoint,
        Self::SetMode,
        Self::InspectPoint,
        Self::Undo,
        Self::Reset,
        Self::ToggleLayer,
        Self::Theme,
        Self::Symbol,
        Self::ToggleHud,
        Self::Configure,
        Self::ExportKmz,
        Self::SaveSession,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::PlacePoint => "Place point",
            Self::SetMode => "Drawing mode",
            Self::InspectPoint => "Inspect point",
            Self::Undo => "Undo last point",
            Self::Reset => "Reset survey",
            Self::ToggleLayer => "Toggle street / satellite",
            Self::Theme => "Boundary theme",
            Self::Symbol => "Point symbol",
            Self::ToggleHud => "Show / hide toolbar",
            Self::Configure => "Configure report",
            Self::ExportKmz => "Export KMZ",
            Self::SaveSession => "Save session",
            Self::Quit => "Quit",
        }
    }
}

/// Actions available in the config view.
enum ConfigAction {
    Title,
    Subtitle,
    Surveyor,
    Scale,
    LegendLabel,
    Generate,
    Back,
}

impl ConfigAction {
    const ALL: &[Self] = &[
        Self::Title,
        Self::Subtitle,
        Self::Surveyor,
        Self::Scale,
        Self::LegendLabel,
        Self::Generate,
        Self::Back,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Title => "Report title",
            Self::Subtitle => "Subtitle",
            Self::Surveyor => "Surveyor",
            Self::Scale => "Print scale",
            Self::LegendLabel => "Legend label for a point",
            Self::Generate => "Generate report",
            Self::Back => "Back to field",
        }
    }
}

/// Actions available in the print view.
enum PrintAction {
    ExportImage,
    Print,
    ExportKmz,
    Edit,
    Field,
}

impl PrintAction {
    const ALL: &[Self] = &[
        Self::ExportImage,
        Self::Print,
        Self::ExportKmz,
        Self::Edit,
        Self::Field,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ExportImage => "Export PNG",
            Self::Print => "Print (HTML)",
            Self::ExportKmz => "Export KMZ",
            Self::Edit => "Edit report",
            Self::Field => "Back to field",
        }
    }
}

fn select<T>(prompt: &str, items: &[T], label: impl Fn(&T) -> String) -> std::io::Result<usize> {
    let labels: Vec<String> = items.iter().map(label).collect();
    Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .map_err(std::io::Error::other)
}

/// Runs the field terminal until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or a map surface cannot be created.
#[allow(clippy::future_not_send)]
pub async fn run(app: &mut App, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    walkthrough(app, config)?;

    loop {
        let keep_going = match app.state().view {
            ViewMode::Field => field_menu(app).await?,
            ViewMode::Config => {
                config_menu(app)?;
                true
            }
            ViewMode::Print => {
                print_menu(app).await?;
                true
            }
        };
        if !keep_going {
            return Ok(());
        }
    }
}

fn walkthrough(app: &mut App, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if onboarding::guide_seen(&config.data_dir) {
        return Ok(());
    }
    app.dispatch(Action::ShowWalkthrough)?;

    println!("Field Survey Terminal");
    for (i, step) in onboarding::WALKTHROUGH_STEPS.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
    Confirm::new()
        .with_prompt("Start")
        .default(true)
        .show_default(false)
        .interact()?;

    app.dispatch(Action::DismissWalkthrough)?;
    if let Err(e) = onboarding::mark_guide_seen(&config.data_dir) {
        log::warn!("Could not record walkthrough as seen: {e}");
    }
    Ok(())
}

fn print_status(app: &App) {
    let state = app.state();
    println!();
    println!(
        "[{}] {} | {} | theme {} | symbol {} | {} point(s)",
        state.view,
        state.mode,
        state.layer,
        state.theme.label,
        state.symbol.label,
        state.points.len()
    );
    let readout = (!state.hud_minimized)
        .then(|| field_readout(&state.points, state.mode, &state.derivation().stats))
        .flatten();
    if let Some(readout) = readout {
        println!("  {readout}");
    }
    if let Some(field) = app.surfaces().field() {
        log::debug!("field surface shows {} overlays", field.overlays().len());
    }
}

#[allow(clippy::too_many_lines, clippy::future_not_send)]
async fn field_menu(app: &mut App) -> Result<bool, Box<dyn std::error::Error>> {
    print_status(app);

    let idx = select("Field", FieldAction::ALL, |a| a.label().to_string())?;
    match FieldAction::ALL[idx] {
        FieldAction::PlacePoint => {
            let lat: f64 = Input::new()
                .with_prompt("Latitude")
                .validate_with(|value: &f64| check_degrees(*value, 90.0))
                .interact_text()?;
            let lng: f64 = Input::new()
                .with_prompt("Longitude")
                .validate_with(|value: &f64| check_degrees(*value, 180.0))
                .interact_text()?;
            app.dispatch(Action::click(lat, lng))?;
        }
        FieldAction::SetMode => {
            let modes = DrawingMode::all();
            let idx = select("Mode", modes, ToString::to_string)?;
            app.dispatch(Action::SetMode { mode: modes[idx] })?;
        }
        FieldAction::InspectPoint => {
            let points = app.state().points.clone();
            if points.is_empty() {
                println!("No points placed yet.");
                return Ok(true);
            }
            let indices: Vec<usize> = (0..points.len()).collect();
            let index = select("Point", &indices, |&i| {
                format!("{} {:.6}, {:.6}", point_tag(i), points[i].lat, points[i].lng)
            })?;
            app.dispatch(Action::SelectPoint { index })?;
            if let Some(selection) = &app.state().selection {
                let point = &selection.point;
                println!("  P{}", selection.id());
                println!("  Latitude   {:.6}", point.lat);
                println!("  Longitude  {:.6}", point.lng);
                println!(
                    "  Symbol     {} ({})",
                    point.label.as_deref().unwrap_or("-"),
                    point.symbol_or_default()
                );
            }
            Confirm::new()
                .with_prompt("Close")
                .default(true)
                .show_default(false)
                .interact()?;
            app.dispatch(Action::DismissSelection)?;
        }
        FieldAction::Undo => {
            app.dispatch(Action::Undo)?;
        }
        FieldAction::Reset => {
            app.dispatch(Action::RequestReset)?;
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Clear all {} point(s)?",
                    app.state().points.len()
                ))
                .default(false)
                .interact()?;
            app.dispatch(if confirmed {
                Action::ConfirmReset
            } else {
                Action::CancelReset
            })?;
        }
        FieldAction::ToggleLayer => {
            app.dispatch(Action::ToggleLayer)?;
        }
        FieldAction::Theme => {
            let themes = survey_map_catalog::all_themes();
            let idx = select("Theme", &themes, |t| format!("{} {}", t.label, t.color))?;
            app.dispatch(Action::SetTheme {
                theme: themes[idx].clone(),
            })?;
        }
        FieldAction::Symbol => {
            let symbols = survey_map_catalog::all_symbols();
            let idx = select("Symbol", &symbols, |s| format!("{} ({})", s.label, s.category))?;
            app.dispatch(Action::SetSymbol {
                symbol: symbols[idx].clone(),
            })?;
        }
        FieldAction::ToggleHud => {
            let minimized = !app.state().hud_minimized;
            app.dispatch(Action::SetHudMinimized { minimized })?;
        }
        FieldAction::Configure => {
            app.dispatch(Action::SetView {
                view: ViewMode::Config,
            })?;
            if app.state().view == ViewMode::Field {
                println!("Place at least one point before configuring the report.");
            }
        }
        FieldAction::ExportKmz => {
            if app.state().points.is_empty() {
                println!("Nothing to export yet.");
            } else {
                app.export_kmz().await;
            }
        }
        FieldAction::SaveSession => {
            let path: String = Input::new()
                .with_prompt("Session file")
                .default("session.toml".to_string())
                .interact_text()?;
            Session::from_history(app.history()).save(&PathBuf::from(path))?;
        }
        FieldAction::Quit => return Ok(false),
    }
    Ok(true)
}

/// Accepts finite values within `±limit` degrees.
fn check_degrees(value: f64, limit: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err("Enter a number of degrees".to_string());
    }
    if value.abs() > limit {
        return Err(format!("Must be between -{limit} and {limit}"));
    }
    Ok(())
}

fn edit_text(prompt: &str, current: &str) -> Result<String, dialoguer::Error> {
    Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
}

fn config_menu(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = app.state().metadata.clone();
    println!();
    println!("{} / {}", metadata.title, metadata.subtitle);
    println!(
        "Surveyor {} | Scale {} | {}",
        metadata.surveyor,
        scale_text(metadata.scale),
        metadata.date
    );

    let idx = select("Report", ConfigAction::ALL, |a| a.label().to_string())?;
    match ConfigAction::ALL[idx] {
        ConfigAction::Title => {
            let title = edit_text("Title", &metadata.title)?;
            app.dispatch(Action::SetTitle { title })?;
        }
        ConfigAction::Subtitle => {
            let subtitle = edit_text("Subtitle", &metadata.subtitle)?;
            app.dispatch(Action::SetSubtitle { subtitle })?;
        }
        ConfigAction::Surveyor => {
            let surveyor = edit_text("Surveyor", &metadata.surveyor)?;
            app.dispatch(Action::SetSurveyor { surveyor })?;
        }
        ConfigAction::Scale => {
            let idx = select("Scale", SCALE_PRESETS, |&s| scale_text(s))?;
            app.dispatch(Action::SetScale {
                scale: SCALE_PRESETS[idx],
            })?;
        }
        ConfigAction::LegendLabel => {
            let points = app.state().points.clone();
            let indices: Vec<usize> = (0..points.len()).collect();
            let idx = select("Point", &indices, |&i| {
                format!(
                    "{} {}",
                    point_tag(i),
                    metadata.effective_label(i, &points[i])
                )
            })?;
            let current = metadata.override_for(idx).unwrap_or_default();
            let label = edit_text("Legend label (empty to clear)", current)?;
            app.dispatch(Action::SetLegendOverride {
                index: idx + 1,
                label,
            })?;
        }
        ConfigAction::Generate => {
            app.dispatch(Action::SetView {
                view: ViewMode::Print,
            })?;
        }
        ConfigAction::Back => {
            app.dispatch(Action::SetView {
                view: ViewMode::Field,
            })?;
        }
    }
    Ok(())
}

fn print_preview(app: &App) {
    let Some(layout) = app.layout() else {
        return;
    };
    println!();
    println!("{}", layout.metadata.title);
    println!("{}", layout.metadata.subtitle);
    println!(
        "SCALE {} | INSET {} | {}",
        layout.scale_text, layout.inset_scale_text, layout.metadata.date
    );
    println!("Legend:");
    for entry in &layout.legend {
        println!("  {}", entry.label());
    }
    for row in &layout.coordinates {
        println!("  {row}");
    }
    println!(
        "Grid N {} | S {} | W {} | E {}",
        layout.grid.top.join(" "),
        layout.grid.bottom.join(" "),
        layout.grid.left.join(" "),
        layout.grid.right.join(" ")
    );
}

#[allow(clippy::future_not_send)]
async fn print_menu(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    print_preview(app);

    let idx = select("Print", PrintAction::ALL, |a| a.label().to_string())?;
    match PrintAction::ALL[idx] {
        PrintAction::ExportImage => {
            app.export_image().await;
        }
        PrintAction::Print => {
            app.export_html().await;
        }
        PrintAction::ExportKmz => {
            app.export_kmz().await;
        }
        PrintAction::Edit => {
            app.dispatch(Action::SetView {
                view: ViewMode::Config,
            })?;
        }
        PrintAction::Field => {
            app.dispatch(Action::SetView {
                view: ViewMode::Field,
            })?;
        }
    }
    Ok(())
}
