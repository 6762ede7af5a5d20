use serde::{Deserialize, Serialize};

/// A single timed caption unit returned by the transcript provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text
    pub text: String,

    /// Offset from the start of the video, in seconds
    pub start_secs: f64,

    /// How long the caption is shown, in seconds
    pub duration_secs: f64,
}

/// Language/region requested from the transcript provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLanguage {
    /// ISO 639-1 language code (e.g. "en")
    pub lang: String,

    /// ISO 3166 region code (e.g. "US")
    pub country: String,
}

impl TranscriptLanguage {
    pub fn new(lang: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            country: country.into(),
        }
    }

    /// Value for the `Accept-Language` header (e.g. "en-US")
    pub fn accept_language(&self) -> String {
        if self.country.is_empty() {
            self.lang.clone()
        } else {
            format!("{}-{}", self.lang, self.country)
        }
    }
}

impl Default for TranscriptLanguage {
    fn default() -> Self {
        Self::new("en", "US")
    }
}

/// Flatten segments into one string, space-joined in provider order
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, start: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start_secs: start,
            duration_secs: 1.5,
        }
    }

    #[test]
    fn test_join_preserves_order() {
        let segments = vec![seg("first", 3.0), seg("second", 1.0), seg("third", 2.0)];
        assert_eq!(join_segments(&segments), "first second third");
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join_segments(&[]), "");
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(TranscriptLanguage::default().accept_language(), "en-US");
        assert_eq!(TranscriptLanguage::new("de", "").accept_language(), "de");
    }
}
