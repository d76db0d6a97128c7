//! Source-link normalization
//!
//! Converts a pasted sharing link into the embeddable form a third-party
//! widget can load. Pure string handling: no network, never fails. Links that
//! are not recognised (or are already embeddable) come back unchanged.

use crate::types::SourceKind;

/// Prefix of embeddable Spotify track URLs
pub const SPOTIFY_EMBED_TRACK_BASE: &str = "https://open.spotify.com/embed/track";

/// Prefix of embeddable YouTube video URLs
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed";

/// Normalize `raw_link` for the given source kind
///
/// - Spotify: `open.spotify.com/.../track/<id>` and `spotify:track:<id>`
///   become `https://open.spotify.com/embed/track/<id>`
/// - YouTube: `youtube.com/watch?v=<id>` and `youtu.be/<id>` become
///   `https://www.youtube.com/embed/<id>`
/// - Local: returned as is (the reference is a file id, not a link)
pub fn normalize(raw_link: &str, kind: SourceKind) -> String {
    let normalized = match kind {
        SourceKind::Spotify => {
            spotify_track_id(raw_link).map(|id| format!("{SPOTIFY_EMBED_TRACK_BASE}/{id}"))
        }
        SourceKind::YouTube => {
            youtube_video_id(raw_link).map(|id| format!("{YOUTUBE_EMBED_BASE}/{id}"))
        }
        SourceKind::Local => None,
    };

    normalized.unwrap_or_else(|| raw_link.to_string())
}

/// Extract the track id from a Spotify web or URI link
pub fn spotify_track_id(link: &str) -> Option<&str> {
    if link.contains("open.spotify.com/embed/") {
        return None;
    }

    if let Some(path) = after(link, "open.spotify.com/") {
        // Also covers localized paths such as /intl-de/track/<id>
        let rest = after(path, "track/")?;
        return non_empty(take_until(rest, &['?', '/', '#']));
    }

    let rest = after(link, "spotify:track:")?;
    non_empty(take_until(rest, &['?', ':', '/']))
}

/// Extract the video id from a YouTube watch or short link
pub fn youtube_video_id(link: &str) -> Option<&str> {
    if let Some(query) = after(link, "youtube.com/watch?") {
        let query = take_until(query, &['#']);
        return query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .and_then(non_empty);
    }

    let rest = after(link, "youtu.be/")?;
    non_empty(take_until(rest, &['?', '&', '/', '#']))
}

fn after<'a>(haystack: &'a str, marker: &str) -> Option<&'a str> {
    haystack
        .find(marker)
        .map(|pos| &haystack[pos + marker.len()..])
}

fn take_until<'a>(s: &'a str, stops: &[char]) -> &'a str {
    s.find(stops).map_or(s, |end| &s[..end])
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
