//! Parsing for the two documents involved in a caption fetch: the watch page
//! (which advertises the available caption tracks) and the timedtext XML of
//! the chosen track.

use super::segment::TranscriptSegment;
use crate::error::{Result, SummarizerError};
use quick_xml::events::Event;
use once_cell::sync::Lazy;
use quick_xml::Reader;
use regex::{Captures, Regex};
use serde::Deserialize;

const ASR_KIND: &str = "asr";

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{0,31});")
        .expect("entity pattern is valid")
});

/// One caption track advertised on a watch page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,

    /// `"asr"` for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub name: Option<TrackName>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackName {
    #[serde(default)]
    pub simple_text: Option<String>,
}

impl CaptionTrack {
    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some(ASR_KIND)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsSection {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// Caption tracks embedded in a watch page, or `None` if it advertises none.
pub fn parse_caption_tracks(html: &str) -> Option<Vec<CaptionTrack>> {
    let (_, after) = html.split_once("\"captions\":")?;

    // The captions object is followed by more player JSON; read exactly one value.
    let section = serde_json::Deserializer::from_str(after)
        .into_iter::<CaptionsSection>()
        .next()?
        .ok()?;

    let tracks = section.player_captions_tracklist_renderer?.caption_tracks;
    (!tracks.is_empty()).then_some(tracks)
}

/// Explain why a watch page carries no captions
pub fn unavailable_reason(html: &str, video_id: &str) -> String {
    if html.contains("class=\"g-recaptcha\"") {
        "YouTube is receiving too many requests from this server; try again later".to_string()
    } else if !html.contains("\"playabilityStatus\":") {
        format!("The video is no longer available ({})", video_id)
    } else {
        format!("Transcript is disabled on this video ({})", video_id)
    }
}

/// Pick the track for `lang`: exact code first, then a regional variant
/// (`en` matches `en-GB`). Manually created tracks beat auto-generated ones.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    let regional_prefix = format!("{}-", lang);

    let exact = |t: &&CaptionTrack| t.language_code.eq_ignore_ascii_case(lang);
    let regional = |t: &&CaptionTrack| {
        t.language_code
            .to_ascii_lowercase()
            .starts_with(&regional_prefix.to_ascii_lowercase())
    };

    let best = |matches: Vec<&'a CaptionTrack>| {
        matches
            .iter()
            .find(|t| !t.is_auto_generated())
            .or_else(|| matches.first())
            .copied()
    };

    best(tracks.iter().filter(exact).collect())
        .or_else(|| best(tracks.iter().filter(regional).collect()))
}

/// Comma-separated language codes, for error messages
pub fn available_languages(tracks: &[CaptionTrack]) -> String {
    tracks
        .iter()
        .map(|t| t.language_code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Caption text is frequently escaped twice (`&amp;#39;`). Each second-layer
/// entity is resolved on its own; anything unrecognised (a literal "R&D", an
/// HTML-only name) stays as written.
fn unescape_cue(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[0];
            match quick_xml::escape::unescape(entity) {
                Ok(resolved) => resolved.into_owned(),
                Err(_) => entity.to_string(),
            }
        })
        .into_owned()
}

fn parse_secs(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Parse timedtext XML (`<transcript><text start=".." dur="..">..</text>...`)
/// into segments, in document order. Empty cues are dropped.
pub fn parse_timedtext(xml: &str) -> Result<Vec<TranscriptSegment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();

    let mut in_cue = false;
    let mut start_secs = 0.0;
    let mut duration_secs = 0.0;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                in_cue = true;
                start_secs = 0.0;
                duration_secs = 0.0;
                text.clear();

                for a in e.attributes().flatten() {
                    let v = a.unescape_value().map(|v| v.to_string()).unwrap_or_default();
                    match a.key.as_ref() {
                        b"start" => start_secs = parse_secs(&v),
                        b"dur" => duration_secs = parse_secs(&v),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(t)) if in_cue => {
                let chunk = t
                    .unescape()
                    .map_err(|e| SummarizerError::provider(None, format!("Malformed caption data: {}", e)))?;
                text.push_str(&chunk);
            }
            Ok(Event::CData(t)) if in_cue => {
                text.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                in_cue = false;
                let cue = normalize_ws(&unescape_cue(&text));
                if !cue.is_empty() {
                    segments.push(TranscriptSegment {
                        text: cue,
                        start_secs,
                        duration_secs,
                    });
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(SummarizerError::provider(
                    None,
                    format!(
                        "Malformed caption data at position {}: {}",
                        reader.error_position(),
                        e
                    ),
                ));
            }
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.test/timedtext?lang={}", code),
            language_code: code.to_string(),
            kind: kind.map(str::to_string),
            name: None,
        }
    }

    #[test]
    fn test_parse_caption_tracks_from_page() {
        let html = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en","name":{"simpleText":"English"},"languageCode":"en","isTranslatable":true},{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=de&kind=asr","languageCode":"de","kind":"asr"}],"audioTracks":[]}},"videoDetails":{"videoId":"dQw4w9WgXcQ"}};</script>"#;

        let tracks = parse_caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(
            tracks[0].base_url,
            "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en"
        );
        assert_eq!(
            tracks[0].name.as_ref().and_then(|n| n.simple_text.as_deref()),
            Some("English")
        );
        assert!(tracks[1].is_auto_generated());
    }

    #[test]
    fn test_parse_caption_tracks_missing() {
        assert!(parse_caption_tracks("<html>no player here</html>").is_none());
        assert!(parse_caption_tracks(r#"{"captions":{}}"#).is_none());
        assert!(parse_caption_tracks(
            r#"{"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[]}}}"#
        )
        .is_none());
    }

    #[test]
    fn test_unavailable_reason() {
        assert!(unavailable_reason(r#"<div class="g-recaptcha"></div>"#, "x")
            .contains("too many requests"));
        assert!(unavailable_reason("<html></html>", "abc").contains("no longer available (abc)"));
        assert!(unavailable_reason(r#"{"playabilityStatus":{}}"#, "abc")
            .contains("Transcript is disabled on this video (abc)"));
    }

    #[test]
    fn test_select_track_prefers_manual_exact_match() {
        let tracks = vec![
            track("en", Some("asr")),
            track("fr", None),
            track("en", None),
        ];
        let picked = select_track(&tracks, "en").unwrap();
        assert_eq!(picked.language_code, "en");
        assert!(!picked.is_auto_generated());
    }

    #[test]
    fn test_select_track_falls_back_to_auto_generated() {
        let tracks = vec![track("fr", None), track("en", Some("asr"))];
        let picked = select_track(&tracks, "en").unwrap();
        assert!(picked.is_auto_generated());
    }

    #[test]
    fn test_select_track_regional_variant() {
        let tracks = vec![track("fr", None), track("en-GB", None)];
        assert_eq!(select_track(&tracks, "en").unwrap().language_code, "en-GB");
    }

    #[test]
    fn test_select_track_none() {
        let tracks = vec![track("fr", None), track("de", Some("asr"))];
        assert!(select_track(&tracks, "en").is_none());
        assert_eq!(available_languages(&tracks), "fr, de");
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">We&amp;#39;re no strangers</text><text start="2.6" dur="3">to   love
you know</text><text start="5.6" dur="1"></text><text start="6.6" dur="1.2">R&amp;D budget</text></transcript>"#;

        let segments = parse_timedtext(xml).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "We're no strangers");
        assert_eq!(segments[0].start_secs, 0.5);
        assert_eq!(segments[0].duration_secs, 2.1);
        assert_eq!(segments[1].text, "to love you know");
        assert_eq!(segments[2].text, "R&D budget");
    }

    #[test]
    fn test_unescape_cue_resolves_entities_independently() {
        assert_eq!(unescape_cue("Q&A and &#39;quotes&#39;"), "Q&A and 'quotes'");
        assert_eq!(unescape_cue("R&D &amp; &#x41;&#65;"), "R&D & AA");
        assert_eq!(unescape_cue("&nbsp;kept &bogus; &#39;"), "&nbsp;kept &bogus; '");
        assert_eq!(unescape_cue("no entities"), "no entities");
    }

    #[test]
    fn test_parse_timedtext_mixed_literal_and_escaped() {
        let xml = r#"<transcript><text start="1" dur="2">Q&amp;A and &amp;#39;fun&amp;#39; &amp;amp; games</text></transcript>"#;

        let segments = parse_timedtext(xml).unwrap();
        assert_eq!(segments[0].text, "Q&A and 'fun' & games");
    }

    #[test]
    fn test_parse_timedtext_empty_document() {
        let segments = parse_timedtext("<transcript></transcript>").unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_parse_timedtext_malformed() {
        let err = parse_timedtext("<transcript><text start=\"0\">oops</wrong></transcript>")
            .unwrap_err();
        assert!(matches!(err, SummarizerError::Provider { status: None, .. }));
    }
}
