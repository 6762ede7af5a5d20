//! Summary requests against an OpenAI-compatible completion API

mod openai;
mod provider;

pub use openai::{OpenAiClient, DEFAULT_OPENAI_BASE_URL};
pub use provider::{build_provider, CompletionMode, SummaryProvider};
