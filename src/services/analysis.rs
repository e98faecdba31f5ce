//! Analysis Client
//!
//! Asks the oracle for a section analysis and for a binary anomaly verdict
//! over that analysis. Oracle failures never escape this module.

use std::sync::Arc;

use bench_verdict_core::SectionId;
use bench_verdict_llm::TextOracle;

/// Keyword an anomalous verdict starts with.
pub const ANOMALY_KEYWORD: &str = "ANOMALIA";

const ANOMALY_QUESTION: &str = "A continuación tienes un fragmento de análisis de resultados de benchmark.\n\
¿Este texto indica un error, anomalía o fallo de hardware/configuración?\n\
Responde SOLO con ANOMALIA o OK.\n\n";

/// Oracle-backed analysis and classification.
#[derive(Clone)]
pub struct AnalysisClient {
    oracle: Arc<dyn TextOracle>,
}

impl AnalysisClient {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self { oracle }
    }

    /// Oracle answer for `prompt`, or an empty string on failure.
    pub async fn analyze(&self, prompt: &str) -> String {
        tracing::debug!(
            oracle = self.oracle.name(),
            model = self.oracle.model(),
            prompt_chars = prompt.chars().count(),
            "requesting analysis"
        );
        match self.oracle.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(oracle = self.oracle.name(), error = %e, "analysis failed");
                String::new()
            }
        }
    }

    /// Whether the oracle judges `analysis` to describe an anomaly.
    ///
    /// Any failure or unexpected answer classifies as not anomalous.
    pub async fn classify_anomaly(&self, analysis: &str) -> bool {
        let question = format!("{}{}", ANOMALY_QUESTION, analysis);
        match self.oracle.complete(&question).await {
            Ok(answer) => is_anomaly_verdict(&answer),
            Err(e) => {
                tracing::warn!(oracle = self.oracle.name(), error = %e, "classification failed, assuming OK");
                false
            }
        }
    }
}

/// Whether an oracle answer starts with the anomaly keyword, ignoring case
/// and surrounding whitespace.
pub fn is_anomaly_verdict(answer: &str) -> bool {
    answer.trim().to_uppercase().starts_with(ANOMALY_KEYWORD)
}

/// Text recorded for a section whose analysis came back empty.
pub fn analysis_failed_placeholder(section: SectionId) -> String {
    format!("Error al analizar {}.", section.label())
}
