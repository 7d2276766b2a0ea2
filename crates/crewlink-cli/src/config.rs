//! File locations for the two binaries.
//!
//! An explicit flag (or its environment variable, handled by clap) always
//! wins. Otherwise the tagged roster is read from the working directory if
//! present, then from the per-user data directory.

use std::path::{Path, PathBuf};

/// Harvester output read by `tag-roster`
pub const RAW_ROSTER_FILE: &str = "onepiece_characters.json";
/// Classifier output read by `generate-puzzle`
pub const TAGGED_ROSTER_FILE: &str = "onepiece_characters_tagged.json";

/// Per-user data directory for crewlink files
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crewlink")
}

/// Tagged roster location when no flag or environment variable is given
pub fn default_roster_path() -> PathBuf {
    roster_path_in(Path::new("."), &data_dir())
}

fn roster_path_in(cwd: &Path, data_dir: &Path) -> PathBuf {
    let local = cwd.join(TAGGED_ROSTER_FILE);
    if local.exists() {
        local
    } else {
        data_dir.join(TAGGED_ROSTER_FILE)
    }
}
