//! Recorded sessions: a TOML list of actions that can be replayed.
//!
//! ```toml
//! [[actions]]
//! type = "set_mode"
//! mode = "AREA"
//!
//! [[actions]]
//! type = "map_clicked"
//! position = { lat = -6.2, lng = 106.81 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use survey_map_state::Action;

/// Errors that can occur while loading or saving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Session file is not valid.
    #[error("Invalid session {path}: {source}")]
    Parse {
        /// Path of the session file.
        path: String,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// Session could not be serialized.
    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// An ordered list of user actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Actions in the order they were applied.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Session {
    /// Records `history`, leaving out export bookkeeping.
    #[must_use]
    pub fn from_history(history: &[Action]) -> Self {
        Self {
            actions: history
                .iter()
                .filter(|action| {
                    !matches!(
                        action,
                        Action::ExportStarted { .. } | Action::ExportFinished
                    )
                })
                .cloned()
                .collect(),
        }
    }

    /// Parses session TOML.
    ///
    /// # Errors
    ///
    /// * If `text` is not a valid session
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads a session file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|e| SessionError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let session = Self::parse(&text).map_err(|e| SessionError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        log::info!(
            "Loaded {} actions from {}",
            session.actions.len(),
            path.display()
        );
        Ok(session)
    }

    /// Writes the session to `path`.
    ///
    /// # Errors
    ///
    /// * If serialization or the write fails
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let text = toml::to_string(self)?;
        std::fs::write(path, text).map_err(|e| SessionError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        log::info!("Saved {} actions to {}", self.actions.len(), path.display());
        Ok(())
    }
}
