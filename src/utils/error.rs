//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use bench_verdict_llm::LlmError;

use crate::services::notify::ChannelError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No benchmark log matched the input naming convention (fatal)
    #[error("No input log found: {0}")]
    InputMissing(String),

    /// The discussion thread could not be created (fatal)
    #[error("Thread creation failed: {0}")]
    ThreadCreation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Oracle errors
    #[error("Oracle error: {0}")]
    Oracle(#[from] LlmError),

    /// Messaging channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Report layout or rendering errors
    #[error("Report error: {0}")]
    Report(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an input-missing error
    pub fn input_missing(msg: impl Into<String>) -> Self {
        Self::InputMissing(msg.into())
    }

    /// Create a thread-creation error
    pub fn thread_creation(msg: impl Into<String>) -> Self {
        Self::ThreadCreation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a report error
    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error ends a run with a failure status.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InputMissing(_) | Self::ThreadCreation(_))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        Self::Internal(format!("invalid pattern: {}", err))
    }
}
