//! JSON Configuration Management
//!
//! Handles reading and writing the run configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{AppConfig, ConfigOverrides};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_dir};

/// Configuration service for loading and persisting run settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load the config at `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults without writing anything.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write a default config file. Refuses to overwrite unless `force`.
    pub fn write_default(path: Option<&Path>, force: bool) -> AppResult<PathBuf> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        if target.exists() && !force {
            return Err(AppError::config(format!(
                "{} already exists (use --force to overwrite)",
                target.display()
            )));
        }
        Self::save_to_file(&target, &AppConfig::default())?;
        Ok(target)
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Consume the service, applying overrides and validating the result
    pub fn into_config(mut self, overrides: ConfigOverrides) -> AppResult<AppConfig> {
        self.config.apply_overrides(overrides);
        self.config.validate().map_err(AppError::validation)?;
        Ok(self.config)
    }

    /// Path the configuration was loaded from
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}
