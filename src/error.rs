use thiserror::Error;

/// Errors surfaced by the transcript and summary pipeline.
///
/// Every variant is terminal for the request that produced it. The HTTP layer
/// renders the `Display` string as the plain-text response body.
#[derive(Error, Debug)]
pub enum SummarizerError {
    /// Caller omitted a required field
    #[error("{0}")]
    MissingInput(String),

    /// Input could not be resolved to a YouTube video id
    #[error("Could not find a YouTube video id in '{0}'")]
    InvalidUrl(String),

    /// Provider has no transcript for the video (captions disabled, wrong language, ...)
    #[error("{0}")]
    TranscriptUnavailable(String),

    /// Response + instruction budget alone exceeds the total token budget
    #[error(
        "Invalid token budget: {max_response_tokens} response tokens plus {suffix_tokens} \
         instruction tokens leave no room for the transcript within {max_total_tokens} total tokens"
    )]
    InvalidBudget {
        max_response_tokens: usize,
        suffix_tokens: usize,
        max_total_tokens: usize,
    },

    #[error("Incorrect API password provided")]
    AuthRejected,

    /// Downstream API failure (transport error or non-success status)
    #[error("{}", provider_message(.status, .message))]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// Request body was not valid JSON
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

impl SummarizerError {
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SummarizerError {
    fn from(e: reqwest::Error) -> Self {
        Self::Provider {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

fn provider_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Provider returned HTTP {}: {}", code, message),
        None => format!("Provider request failed: {}", message),
    }
}

pub type Result<T> = std::result::Result<T, SummarizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_rejection_message_is_fixed() {
        assert_eq!(
            SummarizerError::AuthRejected.to_string(),
            "Incorrect API password provided"
        );
    }

    #[test]
    fn provider_message_includes_status_when_known() {
        let err = SummarizerError::provider(Some(429), "Rate limit reached");
        assert_eq!(
            err.to_string(),
            "Provider returned HTTP 429: Rate limit reached"
        );

        let err = SummarizerError::provider(None, "connection refused");
        assert_eq!(err.to_string(), "Provider request failed: connection refused");
    }

    #[test]
    fn transcript_unavailable_preserves_provider_text() {
        let err = SummarizerError::TranscriptUnavailable("Captions are off".to_string());
        assert_eq!(err.to_string(), "Captions are off");
    }
}
