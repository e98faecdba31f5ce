//! Settings Models
//!
//! Run configuration and the partial update applied on top of it from the
//! command line and environment.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use bench_verdict_core::SectionId;
use bench_verdict_llm::{OracleBackend, OracleConfig};

use crate::services::notify::{ChannelConfig, MAX_MESSAGE_CHARS};

/// Default suffix identifying the benchmark log to ingest
pub const DEFAULT_INPUT_SUFFIX: &str = "_final.txt";

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// File name suffix of the benchmark log (e.g. "_final.txt")
    #[serde(default = "default_input_suffix")]
    pub input_suffix: String,
    /// Where the report is written; the log's directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Language the oracle is asked to answer in
    #[serde(default = "default_report_language")]
    pub report_language: String,
    /// Replacement instruction templates keyed by section label
    #[serde(default)]
    pub prompt_overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

fn default_input_suffix() -> String {
    DEFAULT_INPUT_SUFFIX.to_string()
}

fn default_report_language() -> String {
    "español".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_suffix: default_input_suffix(),
            output_dir: None,
            report_language: default_report_language(),
            prompt_overrides: BTreeMap::new(),
            oracle: OracleConfig::default(),
            channel: ChannelConfig::default(),
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub backend: Option<OracleBackend>,
    pub oracle_url: Option<String>,
    pub bot_token: Option<String>,
    pub parent_channel_id: Option<String>,
    pub escalation_user_id: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(model) = overrides.model {
            self.oracle.model = model;
        }
        if let Some(backend) = overrides.backend {
            self.oracle.backend = backend;
        }
        if let Some(url) = overrides.oracle_url {
            self.oracle.base_url = url;
        }
        if let Some(token) = overrides.bot_token {
            self.channel.bot_token = Some(token);
        }
        if let Some(parent) = overrides.parent_channel_id {
            self.channel.parent_channel_id = parent;
        }
        if let Some(user) = overrides.escalation_user_id {
            self.channel.escalation_user_id = Some(user);
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = Some(dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.input_suffix.trim().is_empty() {
            return Err("input_suffix must not be empty".to_string());
        }

        if self.oracle.model.trim().is_empty() {
            return Err("oracle.model must not be empty".to_string());
        }

        if self.channel.chunk_budget == 0 || self.channel.chunk_budget > MAX_MESSAGE_CHARS {
            return Err(format!(
                "channel.chunk_budget must be between 1 and {}",
                MAX_MESSAGE_CHARS
            ));
        }

        for label in self.prompt_overrides.keys() {
            label
                .parse::<SectionId>()
                .map_err(|e| format!("prompt_overrides: {}", e))?;
        }

        Ok(())
    }

    /// Validate the parts needed to reach the channel.
    pub fn validate_channel(&self) -> Result<(), String> {
        if self.channel.parent_channel_id.trim().is_empty() {
            return Err("channel.parent_channel_id is not configured".to_string());
        }
        match self.channel.bot_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => Err("channel bot token is not configured".to_string()),
        }
    }
}
