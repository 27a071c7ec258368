//! Canonical file paths for survey map data and exports.
//!
//! All paths are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
#[must_use]
pub fn project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the `data/exports/` directory for KMZ, PNG and HTML output.
#[must_use]
pub fn exports_dir() -> PathBuf {
    data_dir().join("exports")
}

/// Resolves `path` against `data/` when it is relative.
#[must_use]
pub fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir().join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_live_under_data() {
        assert!(exports_dir().starts_with(data_dir()));
        assert_eq!(data_dir().parent(), Some(project_root().as_path()));
    }

    #[test]
    fn relative_paths_resolve_under_data() {
        assert_eq!(resolve(Path::new("out")), data_dir().join("out"));
        let absolute = std::env::temp_dir().join("survey_map_abs");
        assert_eq!(resolve(&absolute), absolute);
    }
}
