//! Bench Verdict
//!
//! Turns a hardware benchmark log into per-section verdicts from a text
//! analysis oracle, posts them to a discussion thread, and attaches a
//! paginated PDF report.
//!
//! - Services: ingestion, sectionizer, prompt builder, analysis client,
//!   report builder, notification dispatcher and the orchestrator
//! - Storage: JSON configuration
//! - Models and utilities

pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::settings::{AppConfig, ConfigOverrides};
pub use services::orchestrator::{Orchestrator, ReportOutcome, RunSummary};
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
