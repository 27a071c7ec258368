//! First-launch walkthrough and its persisted "seen" flag.

use std::path::{Path, PathBuf};

/// Name of the flag file inside the data directory.
pub const GUIDE_SEEN_FILE: &str = "guide_seen";

/// Walkthrough steps shown on first launch.
pub const WALKTHROUGH_STEPS: [&str; 3] = [
    "Choose a survey mode",
    "Set the report title and legend",
    "Export at 1:25,000",
];

fn flag_path(data_dir: &Path) -> PathBuf {
    data_dir.join(GUIDE_SEEN_FILE)
}

/// Whether the walkthrough has been dismissed before.
#[must_use]
pub fn guide_seen(data_dir: &Path) -> bool {
    flag_path(data_dir).exists()
}

/// Records that the walkthrough was dismissed.
///
/// # Errors
///
/// * If the data directory or flag file cannot be written
pub fn mark_guide_seen(data_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    std::fs::write(flag_path(data_dir), b"true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn flag_round_trips_through_the_data_dir() {
        let tmp = std::env::temp_dir().join("survey_map_onboarding_test");
        let _ = fs::remove_dir_all(&tmp);

        assert!(!guide_seen(&tmp));
        mark_guide_seen(&tmp).unwrap();
        assert!(guide_seen(&tmp));

        let _ = fs::remove_dir_all(&tmp);
    }
}
