//! Notification Types
//!
//! Channel configuration, identifiers and the error type shared by all
//! message channel implementations.

use std::fmt;

use serde::{Deserialize, Serialize};

use bench_verdict_core::ProxyConfig;

/// Hard per-message limit of the channel API.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Default Discord REST endpoint
pub const DISCORD_API_BASE_URL: &str = "https://discord.com/api/v9";

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a posted message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters for creating a thread under the parent channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRequest {
    pub name: String,
    pub auto_archive_minutes: u32,
    pub initial_message: String,
}

/// Result of a channel connectivity test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelTestResult {
    pub success: bool,
    pub latency_ms: Option<u32>,
    pub error: Option<String>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Messaging channel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bot credential. Only supplied through the environment or CLI.
    #[serde(default, skip_serializing)]
    pub bot_token: Option<String>,
    /// Channel the per-run threads are created under
    #[serde(default)]
    pub parent_channel_id: String,
    /// User mentioned when a section is anomalous
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_user_id: Option<String>,
    #[serde(default = "default_auto_archive_minutes")]
    pub auto_archive_minutes: u32,
    #[serde(default = "default_thread_greeting")]
    pub thread_greeting: String,
    /// Maximum characters per posted message
    #[serde(default = "default_chunk_budget")]
    pub chunk_budget: usize,
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    #[serde(default = "default_section_delay_ms")]
    pub section_delay_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_api_base_url() -> String {
    DISCORD_API_BASE_URL.to_string()
}

fn default_auto_archive_minutes() -> u32 {
    1440
}

fn default_thread_greeting() -> String {
    "Hilo de análisis generado automáticamente.".to_string()
}

fn default_chunk_budget() -> usize {
    1900
}

fn default_chunk_delay_ms() -> u64 {
    1000
}

fn default_section_delay_ms() -> u64 {
    2000
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            bot_token: None,
            parent_channel_id: String::new(),
            escalation_user_id: None,
            auto_archive_minutes: default_auto_archive_minutes(),
            thread_greeting: default_thread_greeting(),
            chunk_budget: default_chunk_budget(),
            chunk_delay_ms: default_chunk_delay_ms(),
            section_delay_ms: default_section_delay_ms(),
            proxy: None,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors from message channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The API answered with a status other than 200/201.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for ChannelError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ChannelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
