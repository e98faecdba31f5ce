//! Ollama Oracle
//!
//! Text oracle backed by a local Ollama server through the ollama-rs native
//! SDK. Each prompt is sent as a single-turn chat with no system prompt.

use async_trait::async_trait;
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::models::ModelOptions;
use ollama_rs::Ollama;

use super::http_client::build_http_client;
use super::provider::{strip_thinking, TextOracle};
use super::types::{LlmError, LlmResult, OracleConfig};
use bench_verdict_core::ProxyConfig;

/// Oracle backed by the Ollama HTTP API
pub struct OllamaOracle {
    config: OracleConfig,
    client: Ollama,
}

impl OllamaOracle {
    /// Create a new Ollama oracle with the given configuration
    pub fn new(config: OracleConfig) -> LlmResult<Self> {
        let client = Self::create_client(&config.base_url, config.proxy.as_ref())?;
        Ok(Self { config, client })
    }

    /// Create an Ollama SDK client from a base URL string.
    ///
    /// `Ollama::new()` takes host and port separately. An unparsable URL
    /// falls back to `Ollama::default()` (localhost:11434).
    fn create_client(base_url: &str, proxy: Option<&ProxyConfig>) -> LlmResult<Ollama> {
        let Ok(parsed) = url::Url::parse(base_url) else {
            tracing::warn!(base_url, "unparsable Ollama URL, using localhost:11434");
            return Ok(Ollama::default());
        };
        let scheme = parsed.scheme();
        let host = parsed.host_str().unwrap_or("localhost");
        let port = parsed.port().unwrap_or(11434);
        let host_url = format!("{}://{}", scheme, host);
        if proxy.is_some() {
            let http_client = build_http_client(proxy)?;
            Ok(Ollama::new_with_client(host_url, port, http_client))
        } else {
            Ok(Ollama::new(host_url, port))
        }
    }

    /// Base URL of the Ollama server (used in error messages)
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn build_request(&self, prompt: &str) -> ChatMessageRequest {
        let mut request = ChatMessageRequest::new(
            self.config.model.clone(),
            vec![ChatMessage::user(prompt.to_string())],
        );
        if let Some(temperature) = self.config.temperature {
            request = request.options(ModelOptions::default().temperature(temperature));
        }
        request
    }

    fn map_error(&self, msg: String) -> LlmError {
        if msg.contains("connect") || msg.contains("Connection refused") {
            LlmError::ProviderUnavailable {
                message: format!("Cannot connect to Ollama at {}: {}", self.base_url(), msg),
            }
        } else if msg.contains("not found") || msg.contains("404") {
            LlmError::ModelNotFound {
                model: self.config.model.clone(),
            }
        } else {
            LlmError::NetworkError { message: msg }
        }
    }
}

#[async_trait]
impl TextOracle for OllamaOracle {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let request = self.build_request(prompt);
        tracing::debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "sending prompt to Ollama");

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| self.map_error(e.to_string()))?;

        Ok(strip_thinking(&response.message.content))
    }

    async fn health_check(&self) -> LlmResult<()> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| self.map_error(e.to_string()))?;

        let wanted = self.config.model.as_str();
        let present = models
            .iter()
            .any(|m| m.name == wanted || m.name.split(':').next() == Some(wanted));
        if present {
            Ok(())
        } else {
            Err(LlmError::ModelNotFound {
                model: wanted.to_string(),
            })
        }
    }
}
