//! Ollama CLI Oracle
//!
//! Runs `<command> run <model> <prompt>` as a child process and returns its
//! standard output. Useful on machines where only the ollama binary is
//! available to the validation user.

use async_trait::async_trait;
use tokio::process::Command;

use super::provider::{strip_thinking, TextOracle};
use super::types::{LlmError, LlmResult, OracleConfig};

/// Oracle that shells out to the ollama command line.
pub struct OllamaCliOracle {
    config: OracleConfig,
}

impl OllamaCliOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: &[&str]) -> LlmResult<String> {
        let output = Command::new(&self.config.command)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| LlmError::ProviderUnavailable {
                message: format!("cannot execute {}: {}", self.config.command, e),
            })?;

        if !output.status.success() {
            return Err(LlmError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextOracle for OllamaCliOracle {
    fn name(&self) -> &'static str {
        "ollama-cli"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let stdout = self.run(&["run", &self.config.model, prompt]).await?;
        Ok(strip_thinking(&stdout))
    }

    async fn health_check(&self) -> LlmResult<()> {
        let listing = self.run(&["list"]).await?;
        let wanted = self.config.model.as_str();
        let present = listing
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().next())
            .any(|name| name == wanted || name.split(':').next() == Some(wanted));
        if present {
            Ok(())
        } else {
            Err(LlmError::ModelNotFound {
                model: wanted.to_string(),
            })
        }
    }
}
