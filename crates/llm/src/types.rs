//! Oracle Types
//!
//! Configuration and error types for text-analysis oracle interactions.

use serde::{Deserialize, Serialize};

use bench_verdict_core::ProxyConfig;

/// Default Ollama API endpoint
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default model used for section analysis and classification
pub const DEFAULT_MODEL: &str = "qwen2.5";

/// How the oracle is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// Ollama HTTP API through the native SDK.
    #[default]
    Http,
    /// `ollama run <model> <prompt>` as a child process.
    Cli,
}

impl std::fmt::Display for OracleBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleBackend::Http => write!(f, "http"),
            OracleBackend::Cli => write!(f, "cli"),
        }
    }
}

impl std::str::FromStr for OracleBackend {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(OracleBackend::Http),
            "cli" => Ok(OracleBackend::Cli),
            other => Err(LlmError::Other {
                message: format!("unknown oracle backend: {}", other),
            }),
        }
    }
}

/// Configuration for the text-analysis oracle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleConfig {
    #[serde(default)]
    pub backend: OracleBackend,
    /// Model name to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Ollama server URL (http backend)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Executable used by the cli backend
    #[serde(default = "default_command")]
    pub command: String,
    /// Sampling temperature; the model default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    OLLAMA_DEFAULT_URL.to_string()
}

fn default_command() -> String {
    "ollama".to_string()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::Http,
            model: default_model(),
            base_url: default_base_url(),
            command: default_command(),
            temperature: None,
            proxy: None,
        }
    }
}

/// Errors from oracle operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Oracle not reachable (e.g., Ollama not running)
    ProviderUnavailable { message: String },
    /// Model not found or not pulled
    ModelNotFound { model: String },
    /// The oracle child process exited unsuccessfully
    CommandFailed { status: Option<i32>, stderr: String },
    /// Network/connection error
    NetworkError { message: String },
    /// Other error
    Other { message: String },
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::ProviderUnavailable { message } => {
                write!(f, "Oracle unavailable: {}", message)
            }
            LlmError::ModelNotFound { model } => write!(f, "Model not found: {}", model),
            LlmError::CommandFailed { status, stderr } => match status {
                Some(code) => write!(f, "Oracle command exited with {}: {}", code, stderr),
                None => write!(f, "Oracle command terminated by signal: {}", stderr),
            },
            LlmError::NetworkError { message } => write!(f, "Network error: {}", message),
            LlmError::Other { message } => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type for oracle operations
pub type LlmResult<T> = Result<T, LlmError>;
