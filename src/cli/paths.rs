use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const APP_NAME: &str = "desem";
pub const DATA_DIR_ENV: &str = "DESEM_DATA_DIR";
pub const DATABASE_FILE: &str = "desem.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// `$DESEM_DATA_DIR`, else the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("could not determine a data directory; set {DATA_DIR_ENV}"))
}
