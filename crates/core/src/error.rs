//! Core Error Types
//!
//! Foundational error type for the bench-verdict workspace. Only `thiserror`
//! and std are involved so the core crate stays lightweight; the application
//! crate reports these through its own `AppError` or as plain messages.

use thiserror::Error;

/// Core error type for the bench-verdict workspace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value that does not name a known item, such as a section label
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let err = CoreError::parse("unknown section label: Foo");
        assert_eq!(err.to_string(), "Parse error: unknown section label: Foo");
    }
}
