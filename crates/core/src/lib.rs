//! Bench Verdict Core
//!
//! Foundational types for the bench-verdict workspace. This crate has no
//! dependency on the oracle client, the messaging channel or the report
//! renderer.
//!
//! ## Module Organization
//!
//! - `error` - Core error type (`CoreError`)
//! - `section` - Section catalog, section accumulator, analysis records
//! - `proxy` - Proxy configuration shared by every HTTP client

pub mod error;
pub mod proxy;
pub mod section;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::CoreError;

// ── Section Catalog ────────────────────────────────────────────────────
pub use section::{AnalysisRecord, GpuRoster, SectionId, SectionMap};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};
