//! Bench Verdict LLM
//!
//! Unified interface for the text-analysis oracle:
//! - Ollama HTTP API (native SDK)
//! - Ollama command line (`ollama run`)
//! - Scripted in-memory oracle for tests
//!
//! Also includes the proxy-aware HTTP client factory shared with the
//! messaging channel.

pub mod command;
pub mod http_client;
pub mod ollama;
pub mod provider;
pub mod scripted;
pub mod types;

// Re-export main types
pub use command::OllamaCliOracle;
pub use http_client::build_http_client;
pub use ollama::OllamaOracle;
pub use provider::{build_oracle, strip_thinking, TextOracle};
pub use scripted::ScriptedOracle;
pub use types::*;
