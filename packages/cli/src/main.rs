#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Field survey terminal.
//!
//! Without a subcommand this starts the interactive terminal: place points,
//! measure paths and areas, configure the report, and export KMZ / PNG /
//! printable HTML. `replay` applies a recorded session file and writes the
//! exports without prompting.
//!
//! Uses `indicatif-log-bridge` (via [`survey_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the export spinner never fight for the terminal.

mod app;
mod config;
mod interactive;
mod onboarding;
mod paths;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use survey_map_state::Action;
use survey_map_survey_models::ViewMode;

use crate::app::App;
use crate::config::Config;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "survey_map", about = "Field survey mapping terminal")]
struct Cli {
    /// TOML config file (`data_dir`, `output_dir`, `viewport_width`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive field terminal (default)
    Field,
    /// Replay a recorded session and write its exports
    Replay {
        /// Session file (TOML `[[actions]]` list)
        session: PathBuf,
        /// Output directory (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write a KMZ archive
        #[arg(long)]
        kmz: bool,
        /// Write a PNG of the report
        #[arg(long)]
        png: bool,
        /// Write the printable HTML report
        #[arg(long)]
        html: bool,
    },
    /// List boundary themes, point symbols and tile layers
    Catalog,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = survey_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Field) {
        Commands::Field => {
            let mut app = App::new(&config, multi)?;
            interactive::run(&mut app, &config).await?;
        }
        Commands::Replay {
            session,
            out,
            kmz,
            png,
            html,
        } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            let session = Session::load(&session)?;
            let mut app = App::new(&config, multi)?;
            let all = !(kmz || png || html);
            replay(&mut app, session, all || kmz, all || png, all || html).await?;
        }
        Commands::Catalog => print_catalog(),
    }

    Ok(())
}

#[allow(clippy::fn_params_excessive_bools, clippy::future_not_send)]
async fn replay(
    app: &mut App,
    session: Session,
    kmz: bool,
    png: bool,
    html: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for action in session.actions {
        app.dispatch(action)?;
    }
    log::info!(
        "Replayed session: {} point(s), mode {}, view {}",
        app.state().points.len(),
        app.state().mode,
        app.state().view
    );

    if kmz {
        if let Some(path) = app.export_kmz().await {
            println!("{}", path.display());
        }
    }

    if png || html {
        for view in [ViewMode::Config, ViewMode::Print] {
            if app.state().view != ViewMode::Print {
                app.dispatch(Action::SetView { view })?;
            }
        }
        if app.state().view != ViewMode::Print {
            log::warn!("Report needs at least one point; skipping PNG/HTML");
            return Ok(());
        }
    }

    if png {
        if let Some(path) = app.export_image().await {
            println!("{}", path.display());
        }
    }
    if html {
        if let Some(path) = app.export_html().await {
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn print_catalog() {
    println!("{:<12} {:<10} FILL", "THEME", "COLOR");
    for theme in survey_map_catalog::all_themes() {
        println!("{:<12} {:<10} {}", theme.label, theme.color, theme.fill_color);
    }
    println!();
    println!("{:<26} {:<10} CATEGORY", "SYMBOL", "LABEL");
    for symbol in survey_map_catalog::all_symbols() {
        println!("{:<26} {:<10} {}", symbol.icon, symbol.label, symbol.category);
    }
    println!();
    println!("{:<10} URL", "LAYER");
    for layer in survey_map_catalog::all_layers() {
        println!("{:<10} {}", layer.layer, layer.url);
    }
}
