//! Data Models
//!
//! Configuration structures. Section and analysis types live in
//! `bench-verdict-core`.

pub mod settings;

pub use settings::{AppConfig, ConfigOverrides, DEFAULT_INPUT_SUFFIX};
