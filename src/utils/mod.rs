//! Utilities
//!
//! Error types and path helpers.

pub mod error;
pub mod paths;

pub use error::{AppError, AppResult};
