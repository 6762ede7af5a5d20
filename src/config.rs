use crate::error::SummarizerError;
use crate::llm::{CompletionMode, DEFAULT_OPENAI_BASE_URL};
use crate::prompt::PromptBudget;
use crate::youtube::{TranscriptLanguage, DEFAULT_YOUTUBE_BASE_URL};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_SERVICE_NAME: &str = "yt-summarizer";
const DEFAULT_HTTP_BIND: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_YOUTUBE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub auth: AuthConfig,
    pub openai: OpenAiConfig,
    pub youtube: YoutubeConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret required by the summary endpoint
    pub api_password: Secret,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret,
    pub model: String,
    pub completion_mode: CompletionMode,
    pub base_url: String,
    pub timeout: Duration,
    pub budget: PromptBudget,
}

#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub language: TranscriptLanguage,
}

/// String value that is never printed by `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(****)")
    }
}

/// Flat view of the settings as they appear in the environment
/// (`API_PASSWORD` -> `api_password`) or in the optional config file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    service_name: Option<String>,
    http_bind: Option<String>,
    http_port: Option<String>,

    api_password: Option<String>,

    openai_api_key: Option<String>,
    openai_model: Option<String>,
    openai_max_response_tokens: Option<String>,
    openai_max_total_tokens: Option<String>,
    openai_completion_mode: Option<String>,
    openai_base_url: Option<String>,
    openai_timeout_secs: Option<String>,

    youtube_base_url: Option<String>,
    youtube_timeout_secs: Option<String>,
    transcript_lang: Option<String>,
    transcript_country: Option<String>,
}

fn invalid(message: String) -> SummarizerError {
    SummarizerError::Config(message)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, key: &str) -> std::result::Result<String, SummarizerError> {
    non_empty(value).ok_or_else(|| invalid(format!("{} is required", key)))
}

fn parse_positive<T>(raw: &str, key: &str) -> std::result::Result<T, SummarizerError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(invalid(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}

fn required_positive(value: Option<String>, key: &str) -> std::result::Result<usize, SummarizerError> {
    let raw = required(value, key)?;
    parse_positive(&raw, key)
}

fn optional_positive<T>(value: Option<String>, key: &str, default: T) -> std::result::Result<T, SummarizerError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match non_empty(value) {
        Some(raw) => parse_positive(&raw, key),
        None => Ok(default),
    }
}

impl Config {
    /// Load settings from an optional config file, overridden by the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::default())
            .build()
            .context("Failed to read configuration")?;

        Self::from_settings(settings)
    }

    /// Build from explicit `NAME=value` pairs, using the environment variable names
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = config::Config::builder();
        for (key, value) in vars {
            let value: String = value.into();
            builder = builder.set_override(key.as_ref().to_ascii_lowercase(), value)?;
        }

        Self::from_settings(builder.build()?)
    }

    fn from_settings(settings: config::Config) -> Result<Self> {
        let raw: RawConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(Self::validate(raw)?)
    }

    fn validate(raw: RawConfig) -> std::result::Result<Self, SummarizerError> {
        let model = required(raw.openai_model, "OPENAI_MODEL")?;

        let completion_mode = match non_empty(raw.openai_completion_mode) {
            Some(mode) => CompletionMode::from_setting(&mode).ok_or_else(|| {
                invalid(format!(
                    "OPENAI_COMPLETION_MODE must be 'chat' or 'completion', got '{}'",
                    mode
                ))
            })?,
            None => CompletionMode::for_model(&model),
        };

        let budget = PromptBudget {
            max_response_tokens: required_positive(
                raw.openai_max_response_tokens,
                "OPENAI_MAX_RESPONSE_TOKENS",
            )?,
            max_total_tokens: required_positive(
                raw.openai_max_total_tokens,
                "OPENAI_MAX_TOTAL_TOKENS",
            )?,
        };

        Ok(Self {
            service: ServiceConfig {
                name: non_empty(raw.service_name)
                    .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
                http: HttpConfig {
                    bind: non_empty(raw.http_bind).unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string()),
                    port: optional_positive(raw.http_port, "HTTP_PORT", DEFAULT_HTTP_PORT)?,
                },
            },
            auth: AuthConfig {
                api_password: Secret::new(required(raw.api_password, "API_PASSWORD")?),
            },
            openai: OpenAiConfig {
                api_key: Secret::new(required(raw.openai_api_key, "OPENAI_API_KEY")?),
                model,
                completion_mode,
                base_url: non_empty(raw.openai_base_url)
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                timeout: Duration::from_secs(optional_positive(
                    raw.openai_timeout_secs,
                    "OPENAI_TIMEOUT_SECS",
                    DEFAULT_OPENAI_TIMEOUT_SECS,
                )?),
                budget,
            },
            youtube: YoutubeConfig {
                base_url: non_empty(raw.youtube_base_url)
                    .unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.to_string()),
                timeout: Duration::from_secs(optional_positive(
                    raw.youtube_timeout_secs,
                    "YOUTUBE_TIMEOUT_SECS",
                    DEFAULT_YOUTUBE_TIMEOUT_SECS,
                )?),
                language: TranscriptLanguage::new(
                    non_empty(raw.transcript_lang).unwrap_or_else(|| "en".to_string()),
                    non_empty(raw.transcript_country).unwrap_or_else(|| "US".to_string()),
                ),
            },
        })
    }

    /// Socket address string for the HTTP listener
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.http.bind, self.service.http.port)
    }
}
