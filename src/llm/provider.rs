use super::openai::OpenAiClient;
use crate::config::OpenAiConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Model identifiers served by the chat completions endpoint
const CHAT_MODEL_PREFIXES: &[&str] = &["gpt-3.5-turbo", "gpt-4"];

/// Request shape used to talk to the completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    /// `POST /v1/completions` with a bare prompt
    PlainCompletion,
    /// `POST /v1/chat/completions` with the prompt as a single user message
    ChatCompletion,
}

impl CompletionMode {
    /// Infer the request shape from the model identifier
    pub fn for_model(model: &str) -> Self {
        // Instruct variants are served by the plain completions endpoint
        if model.ends_with("-instruct") {
            Self::PlainCompletion
        } else if CHAT_MODEL_PREFIXES.iter().any(|p| model.starts_with(p)) {
            Self::ChatCompletion
        } else {
            Self::PlainCompletion
        }
    }

    /// Parse an explicit override (`chat` / `completion`)
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chat" | "chat_completion" => Some(Self::ChatCompletion),
            "completion" | "plain" | "plain_completion" => Some(Self::PlainCompletion),
            _ => None,
        }
    }
}

/// Completion provider trait
#[async_trait::async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Submit `prompt` and return the generated text
    async fn request_summary(&self, prompt: &str, max_tokens: usize) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Build the completion provider from configuration
pub fn build_provider(config: &OpenAiConfig) -> Result<Arc<dyn SummaryProvider>> {
    Ok(Arc::new(OpenAiClient::from_config(config)?))
}
