//! Scripted Oracle
//!
//! In-memory oracle for tests and dry runs. Responses are chosen by the
//! first rule whose needle occurs in the prompt; every prompt is recorded.

use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::TextOracle;
use super::types::{LlmError, LlmResult};

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    reply: Result<String, String>,
}

/// Deterministic oracle driven by substring rules.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    rules: Vec<Rule>,
    default_reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    /// An oracle that answers every prompt with an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used when no rule matches.
    pub fn with_default(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    /// Answer `reply` to prompts containing `needle`.
    pub fn respond_when(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Ok(reply.into()),
        });
        self
    }

    /// Fail prompts containing `needle` with a network error.
    pub fn fail_when(mut self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            reply: Err(message.into()),
        });
        self
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Number of prompts received so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let rule = self.rules.iter().find(|r| prompt.contains(&r.needle));
        match rule.map(|r| &r.reply) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(message)) => Err(LlmError::NetworkError {
                message: message.clone(),
            }),
            None => Ok(self.default_reply.clone()),
        }
    }
}
