//! Walk-up music reference types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ids::LocalFileId;

/// Where a walk-up clip comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Spotify track embed (no start offset support)
    Spotify,
    /// YouTube video embed
    YouTube,
    /// Audio file uploaded into memory
    Local,
}

impl SourceKind {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::YouTube => "youtube",
            Self::Local => "local",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "spotify" => Some(Self::Spotify),
            "youtube" => Some(Self::YouTube),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    /// Whether clips of this kind play inside a third-party embed
    pub fn is_embedded(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A player's walk-up clip
///
/// `canonical_url` is meaningful for embedded kinds, `local_file_id` for
/// [`SourceKind::Local`]. The legacy field names written by the first
/// version of the app (`source`, `url`, `fileId`, `startTime`, `endTime`) are
/// accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicRef {
    /// Source kind, selects which of url / file id applies
    #[serde(alias = "source")]
    pub source_kind: SourceKind,

    /// Display title
    pub title: String,

    /// Embeddable URL (empty for local clips)
    #[serde(alias = "url", default)]
    pub canonical_url: String,

    /// In-memory file reference (local clips only)
    #[serde(alias = "fileId", default)]
    pub local_file_id: Option<LocalFileId>,

    /// Clip start, seconds into the track
    #[serde(alias = "startTime")]
    pub start_offset_seconds: u32,

    /// Clip end, seconds into the track
    #[serde(alias = "endTime")]
    pub end_offset_seconds: u32,
}

impl MusicRef {
    /// Create a reference to an embedded (Spotify/YouTube) clip
    pub fn embedded(
        source_kind: SourceKind,
        title: impl Into<String>,
        canonical_url: impl Into<String>,
        start_offset_seconds: u32,
        end_offset_seconds: u32,
    ) -> Self {
        Self {
            source_kind,
            title: title.into(),
            canonical_url: canonical_url.into(),
            local_file_id: None,
            start_offset_seconds,
            end_offset_seconds,
        }
    }

    /// Create a reference to an uploaded local file
    pub fn local(
        title: impl Into<String>,
        file_id: LocalFileId,
        start_offset_seconds: u32,
        end_offset_seconds: u32,
    ) -> Self {
        Self {
            source_kind: SourceKind::Local,
            title: title.into(),
            canonical_url: String::new(),
            local_file_id: Some(file_id),
            start_offset_seconds,
            end_offset_seconds,
        }
    }

    /// Offset at which playback begins
    pub fn start(&self) -> Duration {
        Duration::from_secs(u64::from(self.start_offset_seconds))
    }

    /// Length of the clip window (`end - start`, never negative)
    pub fn window(&self) -> Duration {
        Duration::from_secs(u64::from(
            self.end_offset_seconds
                .saturating_sub(self.start_offset_seconds),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_end_minus_start() {
        let music = MusicRef::local("Clip", LocalFileId::new("file_1"), 10, 25);
        assert_eq!(music.start(), Duration::from_secs(10));
        assert_eq!(music.window(), Duration::from_secs(15));
    }

    #[test]
    fn inverted_window_saturates_to_zero() {
        let music = MusicRef::embedded(SourceKind::YouTube, "Clip", "u", 30, 10);
        assert_eq!(music.window(), Duration::ZERO);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let music = MusicRef::embedded(
            SourceKind::Spotify,
            "Thunderstruck",
            "https://open.spotify.com/embed/track/x",
            10,
            25,
        );
        let json = serde_json::to_value(&music).unwrap();
        assert_eq!(json["sourceKind"], "spotify");
        assert_eq!(json["canonicalUrl"], "https://open.spotify.com/embed/track/x");
        assert_eq!(json["localFileId"], serde_json::Value::Null);
        assert_eq!(json["startOffsetSeconds"], 10);
        assert_eq!(json["endOffsetSeconds"], 25);
    }

    #[test]
    fn reads_legacy_field_names() {
        let json = r#"{
            "source": "youtube",
            "title": "We Will Rock You - Queen",
            "url": "https://www.youtube.com/embed/zBUJztI884M",
            "startTime": 0,
            "endTime": 15,
            "fileId": null
        }"#;
        let music: MusicRef = serde_json::from_str(json).unwrap();
        assert_eq!(music.source_kind, SourceKind::YouTube);
        assert_eq!(music.canonical_url, "https://www.youtube.com/embed/zBUJztI884M");
        assert_eq!(music.end_offset_seconds, 15);
        assert!(music.local_file_id.is_none());
    }

    #[test]
    fn source_kind_round_trips_through_str() {
        for kind in [SourceKind::Spotify, SourceKind::YouTube, SourceKind::Local] {
            assert_eq!(SourceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(SourceKind::from_str("soundcloud"), None);
    }
}
