pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod prompt;
pub mod summary;
pub mod tokens;
pub mod youtube;

pub use config::Config;
pub use error::{Result, SummarizerError};
pub use http::{create_router, AppState};
pub use llm::{CompletionMode, OpenAiClient, SummaryProvider};
pub use prompt::{BudgetedPrompt, PromptBudget, PromptBudgeter};
pub use summary::{SummaryResult, SummaryService};
pub use tokens::TokenCounter;
pub use youtube::{
    TranscriptFetcher, TranscriptLanguage, TranscriptSegment, TranscriptService,
    YoutubeTranscriptClient,
};
