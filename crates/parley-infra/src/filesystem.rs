//! Data directory layout for Parley.

use std::path::{Path, PathBuf};

/// File name of the persisted transcript inside the data directory.
pub const MESSAGES_FILE: &str = "messages.json";

/// Path of the transcript document: `{data_dir}/messages.json`.
pub fn messages_path(data_dir: &Path) -> PathBuf {
    data_dir.join(MESSAGES_FILE)
}

/// Path of the optional configuration file: `{data_dir}/config.toml`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLEY_DATA_DIR` environment variable
/// 2. `~/.parley`
/// 3. `.parley` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parley");
    }

    PathBuf::from(".parley")
}
