#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the survey map tools.
//!
//! [`init_logger`] sets up `indicatif-log-bridge` so that `log::info!` and
//! friends are suspended while the busy spinner redraws. [`BusyIndicator`]
//! is the spinner shown while an export runs, and [`alert`] is the blocking
//! message box used to surface export failures.

use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` spinner shown while a long-running task is busy.
pub struct BusyIndicator {
    bar: ProgressBar,
}

impl BusyIndicator {
    /// Adds a spinner labelled `message` to `multi`.
    #[must_use]
    pub fn start(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// Stops the spinner, leaving `message` on screen.
    pub fn finish(self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Stops and removes the spinner.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

/// Shows `message` and waits for the user to acknowledge it.
///
/// When stderr is not a terminal (session replay, CI) the message is only
/// logged.
pub fn alert(message: &str) {
    let term = Term::stderr();
    if !term.is_term() {
        log::error!("{message}");
        return;
    }

    let _ = term.write_line(&format!("{} {message}", style("!").red().bold()));
    let acknowledged = dialoguer::Confirm::new()
        .with_prompt("Continue")
        .default(true)
        .show_default(false)
        .interact_on(&term);
    if let Err(e) = acknowledged {
        log::warn!("alert: prompt failed: {e}");
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}
