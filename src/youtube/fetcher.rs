use super::segment::{TranscriptLanguage, TranscriptSegment};
use crate::error::Result;

/// Transcript provider trait
///
/// Implementations:
/// - `YoutubeTranscriptClient`: captions scraped from youtube.com
/// - test doubles in the integration tests
#[async_trait::async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch caption segments for `video_id`, in provider order
    ///
    /// Fails with `TranscriptUnavailable` when the video has no usable captions
    async fn fetch_segments(
        &self,
        video_id: &str,
        language: &TranscriptLanguage,
    ) -> Result<Vec<TranscriptSegment>>;

    /// Get fetcher name for logging
    fn name(&self) -> &str;
}
