//! Data directory layout and path resolution
//!
//! Everything Modsmith persists lives under one data directory: the
//! file-backed schema catalog, the audit log and the progress snapshot.

use std::path::{Path, PathBuf};

use crate::error::{Result, config};

/// Default data directory name under the user's data directory
const DATA_DIR: &str = "modsmith";

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "MODSMITH_HOME";

/// Environment variable overriding the acting user id
pub const USER_ENV: &str = "MODSMITH_USER";

/// Settings file name inside the data directory
pub const SETTINGS_FILE: &str = "modsmith.yaml";

/// File-backed storage catalog
pub const STORAGE_FILE: &str = "schema.json";

/// Append-only audit log
pub const AUDIT_LOG_FILE: &str = "install.log";

/// Progress snapshot mirrored during installation runs
pub const PROGRESS_FILE: &str = "progress.json";

/// Get the default data directory path
///
/// Uses the platform's standard data location (XDG on Linux, Application
/// Support on macOS) with a `modsmith` subdirectory. Can be overridden with
/// the `MODSMITH_HOME` environment variable.
pub fn data_dir() -> Result<PathBuf> {
    data_dir_from(std::env::var(HOME_ENV).ok())
}

fn data_dir_from(override_dir: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_dir()
        .ok_or_else(|| config::invalid("Could not determine the user data directory"))?;

    Ok(base.join(DATA_DIR))
}

/// Resolve a configured path against the directory of the file it came from
pub fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
