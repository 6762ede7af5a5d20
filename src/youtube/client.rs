use super::captions::{
    available_languages, parse_caption_tracks, parse_timedtext, select_track, unavailable_reason,
};
use super::fetcher::TranscriptFetcher;
use super::segment::{TranscriptLanguage, TranscriptSegment};
use crate::config::YoutubeConfig;
use crate::error::{Result, SummarizerError};
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches captions the way a browser would: load the watch page, read the
/// advertised caption tracks, then download the chosen track's timedtext XML.
pub struct YoutubeTranscriptClient {
    http: Client,
    base_url: Url,
}

impl YoutubeTranscriptClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SummarizerError::Config(format!("invalid YouTube base URL '{}': {}", base_url, e))
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizerError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &YoutubeConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout)
    }

    fn watch_url(&self, video_id: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join("/watch")
            .map_err(|e| SummarizerError::Config(format!("invalid watch URL: {}", e)))?;
        url.query_pairs_mut().append_pair("v", video_id);
        Ok(url)
    }

    /// Caption URLs are normally absolute; resolve relative ones against the base
    fn resolve_track_url(&self, base_url: &str) -> Result<Url> {
        self.base_url.join(base_url).map_err(|e| {
            SummarizerError::provider(None, format!("invalid caption track URL '{}': {}", base_url, e))
        })
    }

    async fn get_text(&self, url: Url, language: &TranscriptLanguage) -> Result<String> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT_LANGUAGE, language.accept_language())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                error!("YouTube request to {} failed: {}", url, e);
                SummarizerError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("YouTube returned {} for {}: {}", status, url, body);
            return Err(SummarizerError::provider(Some(status.as_u16()), body));
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl TranscriptFetcher for YoutubeTranscriptClient {
    async fn fetch_segments(
        &self,
        video_id: &str,
        language: &TranscriptLanguage,
    ) -> Result<Vec<TranscriptSegment>> {
        let page = self.get_text(self.watch_url(video_id)?, language).await?;

        let tracks = match parse_caption_tracks(&page) {
            Some(tracks) => tracks,
            None => {
                return Err(SummarizerError::TranscriptUnavailable(unavailable_reason(
                    &page, video_id,
                )))
            }
        };

        let track = select_track(&tracks, &language.lang).ok_or_else(|| {
            SummarizerError::TranscriptUnavailable(format!(
                "No transcripts are available in {} for this video ({}). Available languages: {}",
                language.lang,
                video_id,
                available_languages(&tracks)
            ))
        })?;

        debug!(
            "Using {} caption track ({}) for video {}",
            track.language_code,
            if track.is_auto_generated() { "auto-generated" } else { "manual" },
            video_id
        );

        let xml = self
            .get_text(self.resolve_track_url(&track.base_url)?, language)
            .await?;
        let segments = parse_timedtext(&xml)?;

        info!(
            "Fetched {} transcript segments for video {}",
            segments.len(),
            video_id
        );

        Ok(segments)
    }

    fn name(&self) -> &str {
        "youtube"
    }
}
