//! Writing export files to the output directory.

use std::path::{Path, PathBuf};

use crate::ExportError;

/// Writes `bytes` to `dir/name`.
///
/// The file is written to a temporary sibling first and then renamed, so an
/// interrupted export never leaves a truncated file behind.
///
/// # Errors
///
/// * If the directory cannot be created
/// * If the file cannot be written or renamed
pub fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let path = dir.join(name);
    let tmp_path = dir.join(format!("{name}.tmp"));

    std::fs::write(&tmp_path, bytes).map_err(|e| ExportError::Io {
        path: tmp_path.display().to_string(),
        source: e,
    })?;

    std::fs::rename(&tmp_path, &path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
