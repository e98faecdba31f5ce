//! Text Oracle Trait
//!
//! Defines the common interface for every text-analysis oracle.

use std::sync::Arc;

use async_trait::async_trait;

use super::command::OllamaCliOracle;
use super::ollama::OllamaOracle;
use super::types::{LlmResult, OracleBackend, OracleConfig};

/// Trait that all text-analysis oracles must implement.
///
/// An oracle is a black-box text-in/text-out service. Calls are expected to
/// be issued one at a time; implementations need not support concurrent use.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Returns the oracle name for identification.
    fn name(&self) -> &'static str;

    /// Returns the model being used.
    fn model(&self) -> &str;

    /// Send a prompt and return the full text response.
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Check if the oracle is reachable.
    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }
}

/// Build the oracle selected by `config.backend`.
pub fn build_oracle(config: &OracleConfig) -> LlmResult<Arc<dyn TextOracle>> {
    let oracle: Arc<dyn TextOracle> = match config.backend {
        OracleBackend::Http => Arc::new(OllamaOracle::new(config.clone())?),
        OracleBackend::Cli => Arc::new(OllamaCliOracle::new(config.clone())),
    };
    Ok(oracle)
}

/// Remove `<think>...</think>` blocks emitted by reasoning models.
///
/// An unterminated block swallows the rest of the text.
pub fn strip_thinking(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("<think>") {
        out.push_str(&rest[..start]);
        match rest[start..].find("</think>") {
            Some(end) => rest = &rest[start + end + "</think>".len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
