//! Playback mechanism seams
//!
//! The engines never talk to a device or a widget directly. The platform
//! layer implements these traits:
//! - [`LocalAudioOutput`] plays decoded clips with full transport
//! - [`EmbedHost`] renders third-party embeds, which offer no transport
//!   beyond an autoplay directive and a best-effort "press play"

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use walkup_core::{LocalAudioLibrary, LocalFileId, MusicRef, SourceKind};

use crate::error::Result;

/// A local clip ready to be played
#[derive(Debug, Clone)]
pub struct LocalClip {
    /// Library id of the uploaded file
    pub file_id: LocalFileId,

    /// Encoded audio
    pub bytes: Bytes,

    /// Position to seek to before playing
    pub start: Duration,

    /// How long the clip should sound
    pub window: Duration,
}

impl LocalClip {
    /// Resolve a local music reference against the library
    ///
    /// `None` when the reference has no file id or the file is gone.
    pub fn resolve(music: &MusicRef, library: &LocalAudioLibrary) -> Option<Self> {
        let file_id = music.local_file_id.as_ref()?;
        let file = library.get(file_id)?;
        Some(Self {
            file_id: file_id.clone(),
            bytes: file.bytes,
            start: music.start(),
            window: music.window(),
        })
    }
}

/// Device that plays local clips
///
/// One instance is shared by every engine; at most one clip sounds at a time.
///
/// Engines call these methods while holding their state lock. Implementations
/// must return without calling back into [`PlaybackEngine`] or
/// [`PreviewEngine`], or they deadlock.
///
/// [`PlaybackEngine`]: crate::PlaybackEngine
/// [`PreviewEngine`]: crate::PreviewEngine
pub trait LocalAudioOutput: Send + Sync {
    /// Start playing `clip`, replacing whatever is playing
    fn play(&self, clip: &LocalClip) -> Result<()>;

    /// Silence the output
    fn stop(&self);
}

/// Embed widget slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedSurface {
    /// The "now batting" embed
    Announce,
    /// The editor's preview embed
    Preview,
}

/// What to load into an embed surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Spotify or YouTube
    pub kind: SourceKind,

    /// Widget source URL including the autoplay directive
    pub src: String,
}

/// Result of one attempt to start an embed's playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementOutcome {
    /// Playback started
    Engaged,
    /// Widget has not finished loading
    NotReady,
    /// The embed refused (autoplay policy, access restriction)
    Blocked,
}

/// The embed's content cannot be reached from the host
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmbedAccessError {
    /// Content belongs to another origin
    #[error("embed content is cross-origin")]
    CrossOrigin,

    /// Nothing is rendered on the surface
    #[error("no embed rendered on surface")]
    NotRendered,
}

/// Host of the embed surfaces
///
/// Every method runs under the calling engine's state lock, including the
/// retry attempts. Do not read engine state from inside them; queue the
/// work and handle it after returning.
pub trait EmbedHost: Send + Sync {
    /// Load `request` into `surface`, replacing what was there
    fn render(&self, surface: EmbedSurface, request: &EmbedRequest) -> Result<()>;

    /// Unload `surface`
    fn clear(&self, surface: EmbedSurface);

    /// Try to start playback inside the embed
    fn attempt_engagement(&self, surface: EmbedSurface) -> EngagementOutcome;

    /// Install a click interceptor so the embed cannot navigate away
    ///
    /// Usually fails for third-party embeds.
    fn suppress_navigation(&self, surface: EmbedSurface)
        -> std::result::Result<(), EmbedAccessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reads_window_from_music() {
        let library = LocalAudioLibrary::new();
        let file = library.insert("a.mp3", "audio/mpeg", vec![7u8; 8]).unwrap();
        let music = MusicRef::local("A", file.id.clone(), 5, 20);

        let clip = LocalClip::resolve(&music, &library).unwrap();
        assert_eq!(clip.file_id, file.id);
        assert_eq!(clip.start, Duration::from_secs(5));
        assert_eq!(clip.window, Duration::from_secs(15));
        assert_eq!(clip.bytes.len(), 8);
    }

    #[test]
    fn resolve_missing_file_is_none() {
        let library = LocalAudioLibrary::new();
        let music = MusicRef::local("A", LocalFileId::new("file_gone"), 0, 10);
        assert!(LocalClip::resolve(&music, &library).is_none());

        let embedded = MusicRef::embedded(SourceKind::Spotify, "S", "u", 0, 10);
        assert!(LocalClip::resolve(&embedded, &library).is_none());
    }
}
