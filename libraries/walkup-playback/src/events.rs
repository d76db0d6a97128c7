//! Playback Events
//!
//! Engines queue events as they act; the presentation layer drains them to
//! stay in sync. Events are emitted at key points:
//! - Session start/end (announce, stop, replacement)
//! - Local clip window elapsed
//! - Degraded modes (missing file, failing device or embed)
//! - Autoplay retry progress

use serde::{Deserialize, Serialize};
use walkup_core::{LocalFileId, PlayerId, SourceKind};

use crate::mechanism::EngagementOutcome;
use crate::session::SessionId;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Explicit stop
    Stopped,
    /// Another player was announced
    Replaced,
}

/// Events emitted by the playback engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A player is now announced
    SessionStarted {
        /// New session
        session: SessionId,
        /// Announced player
        player_id: PlayerId,
        /// Mechanism dispatched to
        source_kind: SourceKind,
    },

    /// The announce session ended
    SessionEnded {
        /// Ended session
        session: SessionId,
        /// Player that was announced
        player_id: PlayerId,
        /// Why it ended
        reason: EndReason,
    },

    /// A local clip reached the end of its window and was silenced
    ClipFinished {
        /// Session the clip belonged to (`None` for previews)
        session: Option<SessionId>,
    },

    /// A local clip could not be found in the library
    LocalClipMissing {
        /// Referenced file, if the clip had one
        file_id: Option<LocalFileId>,
    },

    /// The local output failed to start
    OutputFailed {
        /// Error message
        message: String,
    },

    /// The embed surface failed to render
    EmbedFailed {
        /// Error message
        message: String,
    },

    /// One autoplay retry ran
    AutoplayAttempted {
        /// Session the attempt belongs to
        session: SessionId,
        /// Attempt number, starting at 1
        attempt: usize,
        /// What the host reported
        outcome: EngagementOutcome,
    },

    /// Every autoplay retry ran without engaging
    AutoplayExhausted {
        /// Session the retries belonged to
        session: SessionId,
    },

    /// The announce embed was reloaded on request
    EmbedRefreshed {
        /// Session whose embed was reloaded
        session: SessionId,
    },

    /// A preview started
    PreviewStarted {
        /// Previewed source
        source_kind: SourceKind,
    },

    /// The preview was closed
    PreviewClosed,
}
