//! YouTube transcript retrieval.
//!
//! The watch page embeds the player configuration as JSON
//! (`ytInitialPlayerResponse`); its caption track list points at timed-text
//! XML documents which are flattened into plain text.

use reqwest::header::ACCEPT_LANGUAGE;
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::loader::article::clean_text;
use crate::loader::config::LoaderConfig;
use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::{ContentSource, LoadFuture, browser_get, read_body_limited};

/// Hosts that serve YouTube videos (after stripping a leading `www.`).
const YOUTUBE_HOSTS: [&str; 4] = [
    "youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
];

/// Path prefixes on YouTube hosts that are followed by a video id.
const VIDEO_PATH_PREFIXES: [&str; 4] = ["shorts", "embed", "live", "v"];

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

/// Extract the YouTube video id from a URL, if it points to a video.
#[must_use]
pub fn video_id(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed)
        .ok()
        .or_else(|| Url::parse(&format!("https://{trimmed}")).ok())?;

    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let mut segments = parsed.path_segments()?;

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if YOUTUBE_HOSTS.contains(&host) {
        match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some(prefix) if VIDEO_PATH_PREFIXES.contains(&prefix) => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    } else {
        None
    }?;

    is_valid_video_id(&candidate).then_some(candidate)
}

/// YouTube ids are 11 characters from the URL-safe base64 alphabet.
fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A caption track advertised by the player configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    /// URL of the timed-text document.
    pub base_url: String,
    /// BCP-47 language code (e.g. `en`, `en-GB`).
    pub language_code: String,
    /// `asr` for auto-generated tracks.
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn matches_language(&self, lang: &str) -> bool {
        let code = self.language_code.to_ascii_lowercase();
        let lang = lang.to_ascii_lowercase();
        code == lang
            || code
                .strip_prefix(lang.as_str())
                .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// Transcript source backed by YouTube's public watch page.
pub struct TranscriptSource {
    client: reqwest::Client,
    config: LoaderConfig,
}

impl TranscriptSource {
    /// Create a new transcript source.
    #[must_use]
    pub const fn new(client: reqwest::Client, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    async fn fetch_transcript(&self, url: &str) -> LoaderResult<String> {
        let id = video_id(url).ok_or_else(|| LoaderError::NotAVideo(url.to_string()))?;
        let watch_url = format!(
            "https://www.youtube.com/watch?v={}",
            urlencoding::encode(&id)
        );

        let html = self.get_text(&watch_url).await?;
        let tracks = caption_tracks(&html)?;
        tracing::debug!(video_id = %id, tracks = tracks.len(), "Found caption tracks");

        let track = select_track(&tracks, &self.config.transcript_languages).ok_or_else(|| {
            LoaderError::NoTranscript {
                video_id: id.clone(),
                languages: self.config.transcript_languages.join(", "),
            }
        })?;

        let xml = self.get_text(&track.base_url).await?;
        Ok(parse_timed_text(&xml))
    }

    async fn get_text(&self, url: &str) -> LoaderResult<String> {
        let response = browser_get(&self.client, &self.config, url)
            .header(ACCEPT_LANGUAGE, self.config.accept_language())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        read_body_limited(response, self.config.max_content_length).await
    }
}

impl ContentSource for TranscriptSource {
    fn fetch(&self, url: &str) -> LoadFuture<'_, LoaderResult<String>> {
        let url = url.to_string();
        Box::pin(async move { self.fetch_transcript(&url).await })
    }
}

/// Read the caption tracks out of a watch page.
///
/// # Errors
/// Returns an error if the embedded player JSON is malformed.
pub fn caption_tracks(html: &str) -> LoaderResult<Vec<CaptionTrack>> {
    let Some(player) = player_response(html)? else {
        return Ok(Vec::new());
    };

    match player.pointer("/captions/playerCaptionsTracklistRenderer/captionTracks") {
        Some(tracks) => Ok(serde_json::from_value(tracks.clone())?),
        None => Ok(Vec::new()),
    }
}

/// Locate and decode the `ytInitialPlayerResponse` object.
fn player_response(html: &str) -> LoaderResult<Option<serde_json::Value>> {
    for (pos, _) in html.match_indices(PLAYER_RESPONSE_MARKER) {
        let rest = &html[pos + PLAYER_RESPONSE_MARKER.len()..];
        let Some(start) = rest.find('{') else {
            return Ok(None);
        };
        // Only an assignment counts: `ytInitialPlayerResponse = {` or `"] = {`.
        let between = rest[..start].trim().trim_start_matches(['"', '\'', ']']).trim();
        if between != "=" {
            continue;
        }

        // The object is followed by more script; only the first JSON value is read.
        let mut stream =
            serde_json::Deserializer::from_str(&rest[start..]).into_iter::<serde_json::Value>();
        return match stream.next() {
            Some(value) => Ok(Some(value?)),
            None => Ok(None),
        };
    }

    Ok(None)
}

/// Pick the best track: for each preferred language in order, a manual
/// track wins over an auto-generated one.
#[must_use]
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| !t.is_generated() && t.matches_language(lang))
            .or_else(|| tracks.iter().find(|t| t.matches_language(lang)))
    })
}

/// Flatten a timed-text document (`srv1` `<text>` or `srv3` `<p>` cues) into plain text.
#[must_use]
pub fn parse_timed_text(xml: &str) -> String {
    let fragment = Html::parse_fragment(xml);

    let mut cues: Vec<String> = Vec::new();
    for tag in ["text", "p"] {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        cues = fragment
            .select(&selector)
            .map(|cue| unescape_entities(&cue.text().collect::<String>()))
            .filter(|cue| !cue.trim().is_empty())
            .collect();
        if !cues.is_empty() {
            break;
        }
    }

    clean_text(&cues.join(" "))
}

/// Cue bodies are entity-escaped a second time inside the XML.
fn unescape_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.test/{code}/{}", kind.unwrap_or("manual")),
            language_code: code.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_video_id_variants() {
        let id = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(video_id("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ"), id);
        assert_eq!(video_id("https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42"), id);
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"), id);
        assert_eq!(video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), id);
        assert_eq!(video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(video_id("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(video_id("www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
    }

    #[test]
    fn test_video_id_rejects_non_videos() {
        assert_eq!(video_id("https://www.youtube.com/@channel"), None);
        assert_eq!(video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(video_id("https://notyoutube.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(video_id("not a url"), None);
    }

    #[test]
    fn test_select_track_prefers_manual_then_language_order() {
        let tracks = vec![
            track("fr", None),
            track("en", Some("asr")),
            track("en-GB", None),
        ];

        let en = vec!["en".to_string()];
        let chosen = select_track(&tracks, &en);
        assert_eq!(chosen.map(|t| t.language_code.as_str()), Some("en-GB"));

        let fr_first = vec!["fr".to_string(), "en".to_string()];
        let chosen = select_track(&tracks, &fr_first);
        assert_eq!(chosen.map(|t| t.language_code.as_str()), Some("fr"));

        let de = vec!["de".to_string()];
        assert!(select_track(&tracks, &de).is_none());
    }

    #[test]
    fn test_select_track_falls_back_to_generated() {
        let tracks = vec![track("en", Some("asr"))];
        let en = vec!["en".to_string()];
        assert!(select_track(&tracks, &en).is_some_and(CaptionTrack::is_generated));
    }

    #[test]
    fn test_caption_tracks_from_watch_page() {
        let html = r#"<html><script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=x&lang=en","languageCode":"en","kind":"asr"}]}}};var meta = {};</script></html>"#;
        let tracks = caption_tracks(html).unwrap_or_default();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
        assert!(tracks[0].is_generated());
    }

    #[test]
    fn test_caption_tracks_missing() {
        let html = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{}};</script>"#;
        assert!(caption_tracks(html).is_ok_and(|t| t.is_empty()));
        assert!(caption_tracks("<html></html>").is_ok_and(|t| t.is_empty()));
    }

    #[test]
    fn test_parse_timed_text_srv1() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.5">Hello &amp;amp; welcome</text><text start="1.5" dur="2">it&amp;#39;s   a
test</text></transcript>"#;
        assert_eq!(parse_timed_text(xml), "Hello & welcome it's a test");
    }

    #[test]
    fn test_parse_timed_text_srv3() {
        let xml = r#"<timedtext format="3"><body><p t="0" d="1000"><s>first</s><s> cue</s></p><p t="1000" d="500">second</p></body></timedtext>"#;
        assert_eq!(parse_timed_text(xml), "first cue second");
    }
}
