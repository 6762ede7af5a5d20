//! Token-budgeted summarization prompts
//!
//! The budgeter wraps a transcript between fixed framing markers and, when the
//! result would not leave room for the model's response, truncates the
//! transcript (never the closing instruction) to exactly fit.

mod budget;
mod notice;

pub use budget::{BudgetedPrompt, PromptBudget, PromptBudgeter, PROMPT_PREFIX, PROMPT_SUFFIX};
pub use notice::truncation_notice;
