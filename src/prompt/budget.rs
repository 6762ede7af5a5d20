use super::notice::truncation_notice;
use crate::error::{Result, SummarizerError};
use crate::tokens::TokenCounter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Framing that opens the transcript section of the prompt
pub const PROMPT_PREFIX: &str = "Below is the transcript of a YouTube video, between the <transcript> markers.\n<transcript>\n";

/// Closing marker plus the summarization instruction. Appended after truncation.
pub const PROMPT_SUFFIX: &str = "\n</transcript>\n\nIn no more than 200 words, summarize the main point the video is trying to make, using only the material between the transcript markers above.";

/// Token limits for one summarization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBudget {
    /// Tokens reserved for the model's response
    pub max_response_tokens: usize,

    /// Context window: prompt + response must fit here
    pub max_total_tokens: usize,
}

/// Prompt ready to submit, plus a notice if the transcript had to be cut
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetedPrompt {
    pub final_prompt_text: String,

    /// Empty unless truncation happened
    pub truncation_notice: String,
}

impl BudgetedPrompt {
    pub fn was_truncated(&self) -> bool {
        !self.truncation_notice.is_empty()
    }
}

/// Builds prompts that fit a [`PromptBudget`]
#[derive(Debug, Clone)]
pub struct PromptBudgeter {
    counter: TokenCounter,
    suffix_tokens: usize,
}

impl PromptBudgeter {
    pub fn new(counter: TokenCounter) -> Self {
        let suffix_tokens = counter.count(PROMPT_SUFFIX);
        Self {
            counter,
            suffix_tokens,
        }
    }

    pub fn counter(&self) -> &TokenCounter {
        &self.counter
    }

    /// Tokens taken by the closing instruction
    pub fn suffix_tokens(&self) -> usize {
        self.suffix_tokens
    }

    /// Transcript tokens available once the response and instruction are reserved
    fn allowed_tokens(&self, budget: &PromptBudget) -> Result<usize> {
        match budget.max_response_tokens.checked_add(self.suffix_tokens) {
            Some(reserved) if reserved < budget.max_total_tokens => {
                Ok(budget.max_total_tokens - reserved)
            }
            _ => Err(self.invalid_budget(budget)),
        }
    }

    fn invalid_budget(&self, budget: &PromptBudget) -> SummarizerError {
        SummarizerError::InvalidBudget {
            max_response_tokens: budget.max_response_tokens,
            suffix_tokens: self.suffix_tokens,
            max_total_tokens: budget.max_total_tokens,
        }
    }

    /// Check at startup that `budget` leaves room for any transcript at all
    pub fn validate(&self, budget: &PromptBudget) -> Result<()> {
        self.allowed_tokens(budget).map(|_| ())
    }

    /// Build the final prompt for `transcript` within `budget`
    pub fn build(&self, transcript: &str, budget: &PromptBudget) -> Result<BudgetedPrompt> {
        let allowed = self.allowed_tokens(budget)?;

        let mut prefixed = format!("{}{}", PROMPT_PREFIX, transcript);
        let transcript_tokens = self.counter.count(&prefixed);

        let fits = transcript_tokens <= allowed;

        let truncation_notice = if fits {
            debug!(
                "Prompt fits budget ({} transcript + {} instruction tokens)",
                transcript_tokens, self.suffix_tokens
            );
            String::new()
        } else {
            prefixed = self.counter.truncate_to_token_count(&prefixed, allowed);

            info!(
                "Truncated transcript from {} to {} tokens to fit {} total tokens",
                transcript_tokens, allowed, budget.max_total_tokens
            );

            truncation_notice(allowed, transcript_tokens)
        };

        prefixed.push_str(PROMPT_SUFFIX);

        Ok(BudgetedPrompt {
            final_prompt_text: prefixed,
            truncation_notice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budgeter() -> PromptBudgeter {
        PromptBudgeter::new(TokenCounter::cl100k().unwrap())
    }

    #[test]
    fn test_suffix_tokens_cached() {
        let b = budgeter();
        assert_eq!(b.suffix_tokens(), b.counter().count(PROMPT_SUFFIX));
        assert!(b.suffix_tokens() > 0);
    }

    #[test]
    fn test_empty_transcript_is_prefix_and_suffix() {
        let b = budgeter();
        let budget = PromptBudget {
            max_response_tokens: 100,
            max_total_tokens: 4096,
        };

        let prompt = b.build("", &budget).unwrap();
        assert_eq!(
            prompt.final_prompt_text,
            format!("{}{}", PROMPT_PREFIX, PROMPT_SUFFIX)
        );
        assert!(!prompt.was_truncated());
    }

    #[test]
    fn test_validate_rejects_budget_without_room() {
        let b = budgeter();
        let budget = PromptBudget {
            max_response_tokens: 10,
            max_total_tokens: 10 + b.suffix_tokens(),
        };
        assert!(matches!(
            b.validate(&budget),
            Err(SummarizerError::InvalidBudget { .. })
        ));

        let roomy = PromptBudget {
            max_response_tokens: 10,
            max_total_tokens: 11 + b.suffix_tokens(),
        };
        assert!(b.validate(&roomy).is_ok());
    }

    #[test]
    fn test_oversized_response_budget_is_invalid() {
        let b = budgeter();
        let budget = PromptBudget {
            max_response_tokens: usize::MAX,
            max_total_tokens: 4096,
        };

        assert!(matches!(
            b.validate(&budget),
            Err(SummarizerError::InvalidBudget { .. })
        ));
        assert!(matches!(
            b.build("hello", &budget),
            Err(SummarizerError::InvalidBudget { .. })
        ));

        let both_huge = PromptBudget {
            max_response_tokens: usize::MAX - 1,
            max_total_tokens: usize::MAX,
        };
        assert!(b.validate(&both_huge).is_err());
    }

    #[test]
    fn test_exact_fit_is_not_truncated() {
        let b = budgeter();
        let transcript = "a short transcript that fits exactly";
        let prefixed_tokens = b.counter().count(&format!("{}{}", PROMPT_PREFIX, transcript));
        let budget = PromptBudget {
            max_response_tokens: 64,
            max_total_tokens: prefixed_tokens + 64 + b.suffix_tokens(),
        };

        let prompt = b.build(transcript, &budget).unwrap();
        assert!(!prompt.was_truncated());
        assert!(prompt.final_prompt_text.contains(transcript));
    }
}
