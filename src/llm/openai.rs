use super::provider::{CompletionMode, SummaryProvider};
use crate::config::OpenAiConfig;
use crate::error::{Result, SummarizerError};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI client speaking either the plain or the chat completion shape
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    mode: CompletionMode,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        mode: CompletionMode,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizerError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            mode,
        })
    }

    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        Self::new(
            config.api_key.expose(),
            &config.base_url,
            config.model.clone(),
            config.completion_mode,
            config.timeout,
        )
    }

    pub fn mode(&self) -> CompletionMode {
        self.mode
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI request to {} failed: {}", url, e);
                SummarizerError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("OpenAI returned {}: {}", status, body);
            return Err(SummarizerError::provider(
                Some(status.as_u16()),
                api_error_message(&body),
            ));
        }

        response.json::<R>().await.map_err(|e| {
            error!("Failed to parse OpenAI response: {}", e);
            SummarizerError::provider(
                Some(status.as_u16()),
                format!("unexpected response body: {}", e),
            )
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
        };

        let response: CompletionResponse = self.post("/v1/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(empty_response)
    }

    async fn chat(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
        };

        let response: ChatCompletionResponse = self.post("/v1/chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(empty_response)
    }
}

#[async_trait::async_trait]
impl SummaryProvider for OpenAiClient {
    async fn request_summary(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        info!(
            "Requesting summary from {} ({:?}, max_tokens={})",
            self.model, self.mode, max_tokens
        );

        let text = match self.mode {
            CompletionMode::PlainCompletion => self.complete(prompt, max_tokens).await?,
            CompletionMode::ChatCompletion => self.chat(prompt, max_tokens).await?,
        };

        let summary = text.trim();
        if summary.is_empty() {
            return Err(empty_response());
        }

        Ok(summary.to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn empty_response() -> SummarizerError {
    SummarizerError::provider(None, "completion response contained no text")
}

/// Prefer OpenAI's `{"error": {"message": ...}}` text over the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
