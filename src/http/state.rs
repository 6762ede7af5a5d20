use crate::config::Config;
use crate::llm::build_provider;
use crate::prompt::PromptBudgeter;
use crate::summary::SummaryService;
use crate::tokens::TokenCounter;
use crate::youtube::{TranscriptService, YoutubeTranscriptClient};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Shared application state for HTTP handlers
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub transcripts: TranscriptService,
    pub summaries: SummaryService,
}

impl AppState {
    pub fn new(transcripts: TranscriptService, summaries: SummaryService) -> Self {
        Self {
            transcripts,
            summaries,
        }
    }

    /// Wire the production collaborators from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let counter = TokenCounter::for_model(&config.openai.model)
            .context("Failed to load tokenizer")?;
        info!("Token counting with {}", counter.encoding());

        let budgeter = PromptBudgeter::new(counter);
        budgeter
            .validate(&config.openai.budget)
            .context("OPENAI_MAX_RESPONSE_TOKENS / OPENAI_MAX_TOTAL_TOKENS leave no room for a transcript")?;

        let fetcher = YoutubeTranscriptClient::from_config(&config.youtube)
            .context("Failed to create YouTube client")?;
        let provider =
            build_provider(&config.openai).context("Failed to create completion provider")?;

        info!(
            "Summaries via {} ({:?}), budget {} response / {} total tokens",
            config.openai.model,
            config.openai.completion_mode,
            config.openai.budget.max_response_tokens,
            config.openai.budget.max_total_tokens
        );

        Ok(Self::new(
            TranscriptService::new(Arc::new(fetcher), config.youtube.language.clone()),
            SummaryService::new(
                Arc::new(budgeter),
                provider,
                config.openai.budget,
                config.auth.api_password.clone(),
            ),
        ))
    }
}
