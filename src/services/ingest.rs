//! Log Ingestion
//!
//! Locates the benchmark log by its naming convention, derives the machine
//! identifier and reads the raw text.

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};

use crate::utils::error::{AppError, AppResult};

/// A located benchmark log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub machine_id: String,
}

impl LogFile {
    /// Describe an explicit log path.
    pub fn from_path(path: impl Into<PathBuf>, suffix: &str) -> Self {
        let path = path.into();
        let machine_id = machine_id_from_path(&path, suffix);
        Self { path, machine_id }
    }

    /// Directory holding the log.
    pub fn directory(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

/// Find the log in `dir` whose name ends with `suffix`.
///
/// Several matches resolve to the lexicographically first path with a
/// warning; none is [`AppError::InputMissing`].
pub fn discover_log_file(dir: &Path, suffix: &str) -> AppResult<LogFile> {
    let pattern = format!(
        "{}/*{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(suffix)
    );

    let mut matches: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| AppError::internal(format!("invalid glob pattern: {}", e)))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    matches.sort();

    let Some(first) = matches.first().cloned() else {
        return Err(AppError::input_missing(format!(
            "no *{} file in {}",
            suffix,
            dir.display()
        )));
    };

    if matches.len() > 1 {
        let others: Vec<String> = matches[1..]
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        tracing::warn!(
            selected = %first.display(),
            ignored = ?others,
            "several log files match, using the first"
        );
    }

    Ok(LogFile::from_path(first, suffix))
}

/// File name minus `suffix`, or minus the extension when it does not end with it.
pub fn machine_id_from_path(path: &Path, suffix: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(suffix) {
        Some(stem) if !suffix.is_empty() => stem.to_string(),
        _ => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name),
    }
}

/// Read the log, replacing invalid UTF-8 sequences.
pub async fn read_log(path: &Path) -> AppResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::input_missing(format!("{} does not exist", path.display()))
        } else {
            AppError::Io(e)
        }
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
