//! Embed source URLs
//!
//! Builds the widget `src` for a clip: the canonical link plus the autoplay
//! directive, and for YouTube the start offset. Spotify embeds cannot seek.

use url::Url;
use walkup_core::{normalize, MusicRef, SourceKind};

use crate::mechanism::{EmbedRequest, EmbedSurface};

/// Build the embed request for `music` on `surface`
///
/// `None` for local clips and for embedded clips without a link.
pub fn embed_request(music: &MusicRef, surface: EmbedSurface) -> Option<EmbedRequest> {
    if !music.source_kind.is_embedded() {
        return None;
    }

    let canonical = normalize(music.canonical_url.trim(), music.source_kind);
    if canonical.is_empty() {
        return None;
    }

    let params = embed_params(music, surface);
    Some(EmbedRequest {
        kind: music.source_kind,
        src: with_query(&canonical, &params),
    })
}

fn embed_params(music: &MusicRef, surface: EmbedSurface) -> Vec<(&'static str, String)> {
    match (music.source_kind, surface) {
        (SourceKind::YouTube, EmbedSurface::Announce) => vec![
            ("start", music.start_offset_seconds.to_string()),
            ("autoplay", "1".to_string()),
            ("controls", "0".to_string()),
        ],
        (SourceKind::YouTube, EmbedSurface::Preview) => vec![
            ("start", music.start_offset_seconds.to_string()),
            ("autoplay", "1".to_string()),
        ],
        _ => vec![("autoplay", "1".to_string())],
    }
}

/// Append query parameters, falling back to plain concatenation when the
/// link does not parse as a URL
fn with_query(link: &str, params: &[(&str, String)]) -> String {
    if let Ok(mut url) = Url::parse(link) {
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        return url.into();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if link.contains('?') { '&' } else { '?' };
    format!("{link}{separator}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkup_core::LocalFileId;

    fn youtube() -> MusicRef {
        MusicRef::embedded(
            SourceKind::YouTube,
            "We Will Rock You",
            "https://www.youtube.com/embed/zBUJztI884M",
            12,
            27,
        )
    }

    #[test]
    fn youtube_announce_hides_controls() {
        let request = embed_request(&youtube(), EmbedSurface::Announce).unwrap();
        assert_eq!(
            request.src,
            "https://www.youtube.com/embed/zBUJztI884M?start=12&autoplay=1&controls=0"
        );
        assert_eq!(request.kind, SourceKind::YouTube);
    }

    #[test]
    fn youtube_preview_keeps_controls() {
        let request = embed_request(&youtube(), EmbedSurface::Preview).unwrap();
        assert_eq!(
            request.src,
            "https://www.youtube.com/embed/zBUJztI884M?start=12&autoplay=1"
        );
    }

    #[test]
    fn spotify_has_no_start_offset() {
        let music = MusicRef::embedded(
            SourceKind::Spotify,
            "Thunderstruck",
            "https://open.spotify.com/embed/track/57bgtoPSgt236HzfBOd8kj",
            10,
            25,
        );
        for surface in [EmbedSurface::Announce, EmbedSurface::Preview] {
            let request = embed_request(&music, surface).unwrap();
            assert_eq!(
                request.src,
                "https://open.spotify.com/embed/track/57bgtoPSgt236HzfBOd8kj?autoplay=1"
            );
        }
    }

    #[test]
    fn stored_watch_link_is_normalized_at_dispatch() {
        let music = MusicRef::embedded(
            SourceKind::YouTube,
            "Clip",
            "https://www.youtube.com/watch?v=XYZ789&t=5s",
            0,
            10,
        );
        let request = embed_request(&music, EmbedSurface::Preview).unwrap();
        assert_eq!(
            request.src,
            "https://www.youtube.com/embed/XYZ789?start=0&autoplay=1"
        );
    }

    #[test]
    fn unparsable_link_falls_back_to_concatenation() {
        let music = MusicRef::embedded(SourceKind::Spotify, "Clip", "not a url", 0, 10);
        let request = embed_request(&music, EmbedSurface::Announce).unwrap();
        assert_eq!(request.src, "not a url?autoplay=1");
    }

    #[test]
    fn local_and_empty_links_have_no_embed() {
        let local = MusicRef::local("Clip", LocalFileId::new("file_1"), 0, 10);
        assert!(embed_request(&local, EmbedSurface::Announce).is_none());

        let empty = MusicRef::embedded(SourceKind::YouTube, "Clip", "  ", 0, 10);
        assert!(embed_request(&empty, EmbedSurface::Announce).is_none());
    }
}
