//! Services
//!
//! The benchmark pipeline: ingestion, sectioning, prompting, analysis,
//! reporting and notification, wired together by the orchestrator.

pub mod analysis;
pub mod gpu_roster;
pub mod ingest;
pub mod notify;
pub mod orchestrator;
pub mod prompt;
pub mod report;
pub mod sectionizer;

pub use analysis::{is_anomaly_verdict, AnalysisClient};
pub use ingest::{discover_log_file, LogFile};
pub use notify::{DiscordChannel, InMemoryChannel, MessageChannel, NotificationDispatcher};
pub use orchestrator::{Orchestrator, ReportOutcome, RunSummary};
pub use prompt::{PromptBuilder, PromptContext};
pub use report::{ReportBuilder, ReportDocument};
pub use sectionizer::Sectionizer;
