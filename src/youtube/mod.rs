//! YouTube transcript retrieval
//!
//! This module provides:
//! - Video id extraction from the URL shapes users paste
//! - The `TranscriptFetcher` trait and its youtube.com implementation
//! - `TranscriptService`, which flattens segments into a single transcript string

mod captions;
mod client;
mod fetcher;
mod segment;
mod service;
mod video_id;

pub use captions::{parse_caption_tracks, parse_timedtext, select_track, CaptionTrack};
pub use client::{YoutubeTranscriptClient, DEFAULT_YOUTUBE_BASE_URL};
pub use fetcher::TranscriptFetcher;
pub use segment::{join_segments, TranscriptLanguage, TranscriptSegment};
pub use service::TranscriptService;
pub use video_id::extract_video_id;
