//! HTTP API server for the transcript/summary web page
//!
//! This module provides a small JSON API:
//! - POST /api/getTranscript - Fetch the transcript for a YouTube URL
//! - POST /api/getSummary - Summarize a transcript (password protected)
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{GetSummaryRequest, GetTranscriptRequest};
pub use routes::{create_router, MAX_BODY_BYTES};
pub use state::AppState;
