//! Summary generation
//!
//! `SummaryService` runs the summary request flow:
//! - Shared-secret password check
//! - Token budgeting of the transcript prompt
//! - A single completion request to the configured provider

mod service;

pub use service::{SummaryResult, SummaryService};
