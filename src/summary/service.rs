use crate::config::Secret;
use crate::error::{Result, SummarizerError};
use crate::llm::SummaryProvider;
use crate::prompt::{PromptBudget, PromptBudgeter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Generated summary plus the truncation notice (empty if none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    #[serde(rename = "message")]
    pub notice: String,

    #[serde(rename = "summary")]
    pub summary_text: String,
}

/// Password-gated summarization: auth check, budgeting, then one provider call
#[derive(Clone)]
pub struct SummaryService {
    budgeter: Arc<PromptBudgeter>,
    provider: Arc<dyn SummaryProvider>,
    budget: PromptBudget,
    api_password: Secret,
}

impl SummaryService {
    pub fn new(
        budgeter: Arc<PromptBudgeter>,
        provider: Arc<dyn SummaryProvider>,
        budget: PromptBudget,
        api_password: Secret,
    ) -> Self {
        Self {
            budgeter,
            provider,
            budget,
            api_password,
        }
    }

    pub fn budget(&self) -> &PromptBudget {
        &self.budget
    }

    /// Plain equality against the configured secret. Any mismatch is rejected
    /// the same way.
    fn check_password(&self, submitted: &str) -> Result<()> {
        if submitted == self.api_password.expose() {
            Ok(())
        } else {
            Err(SummarizerError::AuthRejected)
        }
    }

    pub async fn summarize(&self, transcript: &str, password: &str) -> Result<SummaryResult> {
        if let Err(e) = self.check_password(password) {
            warn!("Rejected summary request: incorrect API password");
            return Err(e);
        }

        let prompt = self.budgeter.build(transcript, &self.budget)?;
        if prompt.was_truncated() {
            info!("{}", prompt.truncation_notice);
        }

        let summary_text = self
            .provider
            .request_summary(&prompt.final_prompt_text, self.budget.max_response_tokens)
            .await?;

        info!(
            "Summary generated by {} ({} chars)",
            self.provider.name(),
            summary_text.len()
        );

        Ok(SummaryResult {
            notice: prompt.truncation_notice,
            summary_text,
        })
    }
}
