use super::state::AppState;
use crate::error::{Result, SummarizerError};
use crate::summary::SummaryResult;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{error, info};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetTranscriptRequest {
    /// URL pasted by the user
    #[serde(default)]
    pub yturl: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetSummaryRequest {
    /// Flattened transcript returned by `/api/getTranscript`
    #[serde(default)]
    pub transcript: Option<String>,

    /// Shared secret
    #[serde(default, rename = "passwordToSubmitToApi")]
    pub password: Option<String>,
}

/// Parse a JSON body regardless of `Content-Type`.
///
/// Browser clients post `JSON.stringify(...)` without setting a content type,
/// so the `Json` extractor would reject them.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| SummarizerError::InvalidRequest(e.to_string()))
}

// ============================================================================
// Error responses
// ============================================================================

/// All failures are reported as 500 with the message as plain text
impl IntoResponse for SummarizerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/getTranscript
/// Fetch and flatten the transcript for a YouTube URL
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_transcript(State(state): State<AppState>, body: String) -> Response {
    let result: Result<String> = async {
        let req: GetTranscriptRequest = parse_body(&body)?;
        let url = req.yturl.unwrap_or_default();
        state.transcripts.fetch_transcript(&url).await
    }
    .await;

    match result {
        Ok(transcript) => {
            info!("Transcript fetched ({} chars)", transcript.len());
            (StatusCode::OK, Json(transcript)).into_response()
        }
        Err(e) => {
            error!("Failed to fetch transcript: {:?}", e);
            e.into_response()
        }
    }
}

/// POST /api/getSummary
/// Summarize a transcript behind the shared-secret password check
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_summary(State(state): State<AppState>, body: String) -> Response {
    let result: Result<SummaryResult> = async {
        let req: GetSummaryRequest = parse_body(&body)?;
        let transcript = req.transcript.unwrap_or_default();
        let password = req.password.unwrap_or_default();
        state.summaries.summarize(&transcript, &password).await
    }
    .await;

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to generate summary: {:?}", e);
            e.into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
