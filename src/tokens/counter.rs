use crate::error::{Result, SummarizerError};
use std::sync::Arc;
use tiktoken_rs::CoreBPE;
use tracing::{info, warn};

/// Encoding used when the configured model is unknown to tiktoken
pub const FALLBACK_ENCODING: &str = "cl100k_base";

/// BPE token counter bound to one model's encoding.
///
/// Cloning is cheap; the encoder tables are shared.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    encoding: String,
}

impl TokenCounter {
    /// Load the encoding used by `model`, falling back to `cl100k_base`
    pub fn for_model(model: &str) -> Result<Self> {
        match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => {
                info!("Loaded tokenizer for model {}", model);
                Ok(Self {
                    bpe: Arc::new(bpe),
                    encoding: format!("model:{}", model),
                })
            }
            Err(e) => {
                warn!(
                    "No tokenizer known for model {} ({}), using {}",
                    model, e, FALLBACK_ENCODING
                );
                Self::cl100k()
            }
        }
    }

    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| SummarizerError::Tokenizer(e.to_string()))?;

        Ok(Self {
            bpe: Arc::new(bpe),
            encoding: FALLBACK_ENCODING.to_string(),
        })
    }

    /// Name of the loaded encoding (for logging)
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Number of tokens in `text`
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Prefix of `text` covering its first `n` tokens, decoded back to text.
    ///
    /// When token `n` ends inside a multi-byte character the cut moves back
    /// to the last whole character instead of emitting a partial one.
    pub fn truncate_to_token_count(&self, text: &str, n: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if n >= tokens.len() {
            return text.to_string();
        }

        let mut end = n;
        while end > 0 {
            if let Ok(prefix) = self.bpe.decode(tokens[..end].to_vec()) {
                return prefix;
            }
            end -= 1;
        }

        String::new()
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("encoding", &self.encoding)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> TokenCounter {
        TokenCounter::cl100k().expect("cl100k_base should load")
    }

    #[test]
    fn test_count_basic() {
        let tokens = counter().count("Hello, world!");
        assert!(tokens > 0);
        assert!(tokens < 10);
    }

    #[test]
    fn test_count_empty() {
        assert_eq!(counter().count(""), 0);
    }

    #[test]
    fn test_count_is_not_word_count() {
        // Punctuation and rare words split into several tokens
        let c = counter();
        assert!(c.count("antidisestablishmentarianism!!!") > 1);
    }

    #[test]
    fn test_truncate_full_count_is_identity() {
        let c = counter();
        for s in [
            "",
            "hello world",
            "Never gonna give you up, never gonna let you down",
            "naïve café, 日本語のテキスト 🎉🎉",
        ] {
            assert_eq!(c.truncate_to_token_count(s, c.count(s)), s);
        }
    }

    #[test]
    fn test_truncate_beyond_count_is_identity() {
        let c = counter();
        assert_eq!(c.truncate_to_token_count("short", 1000), "short");
    }

    #[test]
    fn test_truncate_is_monotonic() {
        let c = counter();
        let s = "The quick brown fox jumps over the lazy dog. 日本語 🎉 done.";
        let mut last_len = 0;
        for n in 0..=c.count(s) {
            let out = c.truncate_to_token_count(s, n);
            assert!(out.len() >= last_len, "length shrank at n={}", n);
            assert!(s.starts_with(&out));
            last_len = out.len();
        }
    }

    #[test]
    fn test_truncate_respects_token_count() {
        let c = counter();
        let s = "one two three four five six seven eight nine ten";
        let out = c.truncate_to_token_count(s, 4);
        assert_eq!(c.count(&out), 4);
        assert_eq!(out, "one two three four");
    }

    #[test]
    fn test_truncate_never_splits_characters() {
        let c = counter();
        let s = "🎉🎉🎉";
        for n in 0..=c.count(s) {
            let out = c.truncate_to_token_count(s, n);
            assert!(s.starts_with(&out));
            assert!(!out.contains('\u{FFFD}'));
        }
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let c = TokenCounter::for_model("definitely-not-a-model").unwrap();
        assert_eq!(c.encoding(), FALLBACK_ENCODING);
    }

    #[test]
    fn test_known_model_loads() {
        let c = TokenCounter::for_model("gpt-3.5-turbo").unwrap();
        assert_eq!(c.encoding(), "model:gpt-3.5-turbo");
        assert!(c.count("hello world") > 0);
    }

    mod properties {
        use super::*;
        use once_cell::sync::Lazy;
        use proptest::prelude::*;

        static CL100K: Lazy<TokenCounter> = Lazy::new(counter);

        /// Arbitrary printable text, or runs of mixed-script words and emoji
        fn text() -> impl Strategy<Value = String> {
            prop_oneof![
                "\\PC{0,120}",
                prop::collection::vec(
                    prop::sample::select(vec![
                        "hello", " ", "world", "日本語", "テキスト", "🎉", "👩‍👩‍👧", "naïve",
                        "café", "\n", "42", "!!", "'s", "  ",
                    ]),
                    0..60,
                )
                .prop_map(|parts| parts.concat()),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn truncate_at_full_count_is_identity(s in text()) {
                let c = &*CL100K;
                prop_assert_eq!(c.truncate_to_token_count(&s, c.count(&s)), s);
            }

            #[test]
            fn truncate_yields_prefix_within_count(s in text(), n in 0usize..200) {
                let c = &*CL100K;
                let out = c.truncate_to_token_count(&s, n);
                prop_assert!(s.starts_with(&out));
                prop_assert!(c.count(&out) <= n);
                let no_new_replacement_chars = !out.contains('\u{FFFD}') || s.contains('\u{FFFD}');
                prop_assert!(no_new_replacement_chars);
            }

            #[test]
            fn truncate_is_monotonic_in_n(s in text(), a in 0usize..200, b in 0usize..200) {
                let c = &*CL100K;
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let shorter = c.truncate_to_token_count(&s, lo);
                let longer = c.truncate_to_token_count(&s, hi);
                prop_assert!(longer.starts_with(&shorter));
            }

            #[test]
            fn ascii_truncation_keeps_exactly_n_tokens(s in "[ -~\n]{0,300}", n in 0usize..120) {
                // Single-byte characters, so a cut never lands inside one
                let c = &*CL100K;
                let out = c.truncate_to_token_count(&s, n);
                prop_assert_eq!(c.count(&out), n.min(c.count(&s)));
            }
        }
    }
}
