use super::fetcher::TranscriptFetcher;
use super::segment::{join_segments, TranscriptLanguage};
use super::video_id::extract_video_id;
use crate::error::{Result, SummarizerError};
use std::sync::Arc;
use tracing::info;

/// Resolves a user-supplied URL to a flattened transcript
#[derive(Clone)]
pub struct TranscriptService {
    fetcher: Arc<dyn TranscriptFetcher>,
    language: TranscriptLanguage,
}

impl TranscriptService {
    pub fn new(fetcher: Arc<dyn TranscriptFetcher>, language: TranscriptLanguage) -> Self {
        Self { fetcher, language }
    }

    pub fn language(&self) -> &TranscriptLanguage {
        &self.language
    }

    /// Fetch the transcript for `url` as one space-joined string
    pub async fn fetch_transcript(&self, url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SummarizerError::MissingInput(
                "YouTube URL not provided.".to_string(),
            ));
        }

        let video_id = extract_video_id(url)?;
        info!(
            "Fetching {} transcript for video {} via {}",
            self.language.accept_language(),
            video_id,
            self.fetcher.name()
        );

        let segments = self.fetcher.fetch_segments(&video_id, &self.language).await?;
        Ok(join_segments(&segments))
    }
}
