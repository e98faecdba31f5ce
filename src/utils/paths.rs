//! Path Utilities
//!
//! Resolves the application directory (~/.bench-verdict/) and the files
//! derived from a machine identifier.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the application directory (~/.bench-verdict/)
pub fn app_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".bench-verdict"))
}

/// Get the default config file path (~/.bench-verdict/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(app_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// File name of the report generated for a machine.
pub fn report_file_name(machine_id: &str) -> String {
    format!("{}_informe.pdf", machine_id)
}
