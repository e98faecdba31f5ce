//! Integration Tests Module
//!
//! Integration tests for bench-verdict. Tests cover log sectioning, the
//! notification dispatcher, PDF report generation and full pipeline runs
//! against in-memory collaborators.

// Sectionizer properties over realistic logs
mod sectionizer_test;

// Dispatcher chunking and escalation
mod dispatcher_test;

// Report planning, layout and PDF output
mod report_test;

// End-to-end orchestrator runs
mod pipeline_test;
