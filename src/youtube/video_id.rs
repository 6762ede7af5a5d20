use crate::error::{Result, SummarizerError};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// Path prefixes that carry the id as the next segment (`/embed/<id>`, ...)
const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "live", "v", "e"];

fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com"
        || h.ends_with(".youtube.com")
        || h == "youtube-nocookie.com"
        || h.ends_with(".youtube-nocookie.com")
}

fn valid_id(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    VIDEO_ID
        .is_match(candidate)
        .then(|| candidate.to_string())
}

fn id_from_url(u: &Url) -> Option<String> {
    let host = u.host_str()?;

    // youtu.be/<id>
    if host.eq_ignore_ascii_case("youtu.be") || host.eq_ignore_ascii_case("www.youtu.be") {
        return valid_id(u.path_segments()?.next()?);
    }

    if !is_youtube_host(host) {
        return None;
    }

    // youtube.com/watch?v=<id>
    if u.path().trim_end_matches('/') == "/watch" {
        return u
            .query_pairs()
            .find(|(k, _)| k == "v")
            .and_then(|(_, v)| valid_id(&v));
    }

    // youtube.com/{embed,shorts,live,v,e}/<id>
    let mut segs = u.path_segments()?;
    let kind = segs.next()?;
    if ID_PATH_PREFIXES.contains(&kind) {
        return valid_id(segs.next()?);
    }

    None
}

/// Extract the 11-character video id from any accepted YouTube URL shape.
///
/// Accepts bare ids and URLs without a scheme (`youtu.be/<id>`).
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if let Some(id) = valid_id(input) {
        return Ok(id);
    }

    let parsed = Url::parse(input)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| Url::parse(&format!("https://{}", input)).ok());

    parsed
        .as_ref()
        .and_then(id_from_url)
        .ok_or_else(|| SummarizerError::InvalidUrl(input.to_string()))
}
