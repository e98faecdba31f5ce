//! Orchestrator Module
//!
//! Wires ingestion, analysis, dispatch and reporting for one log file.

mod service;

pub use service::{
    exit_status, Orchestrator, ReportOutcome, RunSummary, EXIT_FAILURE, EXIT_SUCCESS, REPORT_CAPTION,
};
