//! Orchestrator Service
//!
//! Runs the pipeline for one benchmark log: ingestion, thread creation,
//! sectioning, per-section analysis and dispatch, then the report upload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use bench_verdict_core::{AnalysisRecord, SectionId};
use bench_verdict_llm::{build_oracle, TextOracle};

use crate::models::settings::AppConfig;
use crate::services::analysis::{analysis_failed_placeholder, AnalysisClient};
use crate::services::gpu_roster::extract_gpu_roster;
use crate::services::ingest::{discover_log_file, read_log, LogFile};
use crate::services::notify::{DiscordChannel, MessageChannel, NotificationDispatcher, ThreadId};
use crate::services::prompt::{PromptBuilder, PromptContext};
use crate::services::report::ReportBuilder;
use crate::services::sectionizer::Sectionizer;
use crate::utils::error::{AppError, AppResult};

/// Caption sent with the uploaded report.
pub const REPORT_CAPTION: &str = "Adjunto informe completo en PDF.";

/// Process exit status of a completed run.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status of an aborted run or an unusable configuration.
pub const EXIT_FAILURE: u8 = 1;

/// What happened to the report artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Uploaded { path: PathBuf },
    /// Written to disk but the upload failed.
    UploadFailed { path: PathBuf },
    /// Layout, rendering or writing failed.
    Failed { error: String },
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub machine_id: String,
    pub log_path: PathBuf,
    pub thread_id: ThreadId,
    pub records: Vec<AnalysisRecord>,
    pub messages_posted: usize,
    pub report: ReportOutcome,
}

impl RunSummary {
    pub fn anomalies(&self) -> usize {
        self.records.iter().filter(|r| r.is_anomalous).count()
    }
}

/// Exit status for the outcome of a run.
///
/// A run that reached the end succeeds even when the report could not be
/// built or uploaded; any error that ended the run early fails it.
pub fn exit_status(outcome: &AppResult<RunSummary>) -> u8 {
    match outcome {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// Pipeline for one log file.
pub struct Orchestrator {
    config: AppConfig,
    sectionizer: Sectionizer,
    prompts: PromptBuilder,
    analysis: AnalysisClient,
    dispatcher: NotificationDispatcher,
}

impl Orchestrator {
    /// Create an orchestrator from explicit configuration and collaborators.
    pub fn new(
        config: AppConfig,
        oracle: Arc<dyn TextOracle>,
        channel: Arc<dyn MessageChannel>,
    ) -> AppResult<Self> {
        let prompts = PromptBuilder::new(config.report_language.clone())
            .with_overrides(&config.prompt_overrides);
        let dispatcher = NotificationDispatcher::new(channel, &config.channel);

        Ok(Self {
            sectionizer: Sectionizer::new()?,
            prompts,
            analysis: AnalysisClient::new(oracle),
            dispatcher,
            config,
        })
    }

    /// Create an orchestrator talking to the configured oracle and Discord.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let oracle = build_oracle(&config.oracle)?;
        let channel: Arc<dyn MessageChannel> = Arc::new(DiscordChannel::new(&config.channel)?);
        Self::new(config, oracle, channel)
    }

    /// Locate the log in `dir` by its suffix and run it.
    pub async fn run_in_dir(&self, dir: &Path) -> AppResult<RunSummary> {
        let log = discover_log_file(dir, &self.config.input_suffix)?;
        self.run_log(log).await
    }

    /// Run the pipeline for an already located log.
    pub async fn run_log(&self, log: LogFile) -> AppResult<RunSummary> {
        tracing::info!(path = %log.path.display(), machine = %log.machine_id, "processing benchmark log");
        let raw = read_log(&log.path).await?;

        let thread_id = self
            .dispatcher
            .open_thread(&format!("Análisis {}", log.machine_id))
            .await
            .map_err(|e| AppError::thread_creation(e.to_string()))?;

        let sections = self.sectionizer.sectionize(&raw);
        let context = PromptContext {
            gpus: extract_gpu_roster(sections.text(SectionId::HardwareValues)),
        };
        if !context.gpus.is_empty() {
            tracing::info!(gpus = ?context.gpus.names(), "GPU roster detected");
        }

        let mut records = Vec::new();
        let mut messages_posted = 0;
        for (section, text) in sections.non_empty() {
            tracing::info!(section = %section, "analyzing section");
            let prompt = self.prompts.build_prompt(section, text, &context);

            let mut analysis = self.analysis.analyze(&prompt).await;
            if analysis.trim().is_empty() {
                analysis = analysis_failed_placeholder(section);
            }
            let is_anomalous = self.analysis.classify_anomaly(&analysis).await;
            if is_anomalous {
                tracing::warn!(section = %section, "anomaly reported");
            }

            let record = AnalysisRecord::new(section, analysis, is_anomalous);
            messages_posted += self.dispatcher.post_section(&thread_id, &record).await.len();
            records.push(record);
        }

        let report = self.deliver_report(&log, &thread_id, &records).await;

        let summary = RunSummary {
            machine_id: log.machine_id.clone(),
            log_path: log.path.clone(),
            thread_id,
            records,
            messages_posted,
            report,
        };
        tracing::info!(
            machine = %summary.machine_id,
            sections = summary.records.len(),
            anomalies = summary.anomalies(),
            messages = summary.messages_posted,
            "run complete"
        );
        Ok(summary)
    }

    /// Build, write and upload the report. Never fails the run.
    async fn deliver_report(
        &self,
        log: &LogFile,
        thread_id: &ThreadId,
        records: &[AnalysisRecord],
    ) -> ReportOutcome {
        let output_dir = self
            .config
            .output_dir
            .clone()
            .unwrap_or_else(|| log.directory().to_path_buf());

        let written = ReportBuilder::new(log.machine_id.clone())
            .build(records)
            .and_then(|report| report.write_to(&output_dir));

        match written {
            Ok(path) => {
                match self
                    .dispatcher
                    .upload_file(thread_id, &path, Some(REPORT_CAPTION))
                    .await
                {
                    Some(_) => ReportOutcome::Uploaded { path },
                    None => ReportOutcome::UploadFailed { path },
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "report generation failed");
                ReportOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
