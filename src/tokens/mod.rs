//! Model-specific token counting
//!
//! Counts and truncates text using the same byte-pair encoding the completion
//! model uses, so prompt budgets computed here hold on the provider side.

mod counter;

pub use counter::{TokenCounter, FALLBACK_ENCODING};
