//! Runtime configuration: optional TOML file plus environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use survey_map_state::DEFAULT_VIEWPORT_WIDTH;

use crate::paths;

/// Overrides the data directory.
pub const ENV_DATA_DIR: &str = "SURVEY_MAP_DATA_DIR";
/// Overrides the export output directory.
pub const ENV_OUTPUT_DIR: &str = "SURVEY_MAP_OUTPUT_DIR";
/// Overrides the simulated viewport width.
pub const ENV_VIEWPORT_WIDTH: &str = "SURVEY_MAP_VIEWPORT_WIDTH";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`Config`].
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the `guide_seen` flag lives.
    pub data_dir: PathBuf,
    /// Where exports are written.
    pub output_dir: PathBuf,
    /// Viewport width used for the report display scale.
    pub viewport_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: paths::data_dir(),
            output_dir: paths::exports_dir(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

impl Config {
    /// Loads `path` (if given), then applies environment overrides.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read or parsed
    /// * If an environment override is invalid
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|var| std::env::var(var).ok())
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses TOML config text; relative paths resolve under `data/`.
    ///
    /// # Errors
    ///
    /// * If `text` is not valid config TOML
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(text)?;
        config.data_dir = paths::resolve(&config.data_dir);
        config.output_dir = paths::resolve(&config.output_dir);
        Ok(config)
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// * If the viewport override is not a number
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = paths::resolve(Path::new(&dir));
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = paths::resolve(Path::new(&dir));
        }
        if let Some(width) = lookup(ENV_VIEWPORT_WIDTH) {
            self.viewport_width = width.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_VIEWPORT_WIDTH,
                value: width,
            })?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_fill_in_defaults() {
        let config = Config::parse("viewport_width = 800\noutput_dir = \"reports\"\n").unwrap();
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.output_dir, paths::data_dir().join("reports"));
        assert_eq!(config.data_dir, paths::data_dir());
    }

    #[test]
    fn environment_overrides_file() {
        let config = Config::default()
            .with_overrides(|var| match var {
                ENV_VIEWPORT_WIDTH => Some(" 600 ".to_string()),
                ENV_OUTPUT_DIR => Some("elsewhere".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.viewport_width, 600);
        assert_eq!(config.output_dir, paths::data_dir().join("elsewhere"));
    }

    #[test]
    fn invalid_viewport_override_is_rejected() {
        let err = Config::default()
            .with_overrides(|var| (var == ENV_VIEWPORT_WIDTH).then(|| "wide".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_VIEWPORT_WIDTH, .. }));
    }

    #[test]
    fn mistyped_values_fail_to_parse() {
        assert!(Config::parse("viewport_width = \"wide\"").is_err());
    }
}
