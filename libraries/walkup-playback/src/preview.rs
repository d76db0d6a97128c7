//! Preview engine
//!
//! Plays a clip from the player editor on its own embed surface. Previews
//! never touch the announce session and get no autoplay retries; a new
//! preview replaces the previous one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use walkup_core::{LocalAudioLibrary, MusicRef};

use crate::dispatch::Mechanisms;
use crate::events::PlaybackEvent;
use crate::mechanism::{EmbedHost, EmbedSurface};
use crate::output::{OutputToken, SharedLocalOutput};
use crate::session::{ActiveMechanism, Mechanism, Timers};

#[derive(Debug)]
struct PreviewSession {
    id: u64,
    music: MusicRef,
    sounding: bool,
    mechanism: Mechanism,
    timers: Timers,
}

impl PreviewSession {
    fn snapshot(&self) -> PreviewSnapshot {
        PreviewSnapshot {
            music: self.music.clone(),
            is_sounding: self.sounding,
            mechanism: self.mechanism.public(),
        }
    }
}

/// Read-only view of the running preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSnapshot {
    /// Clip being previewed
    pub music: MusicRef,

    /// Whether audio is expected to be sounding
    pub is_sounding: bool,

    /// Mechanism in use
    pub mechanism: ActiveMechanism,
}

#[derive(Debug, Default)]
struct PreviewState {
    last_preview: u64,
    preview: Option<PreviewSession>,
    pending_events: Vec<PlaybackEvent>,
}

struct PreviewShared {
    mechanisms: Mechanisms,
    state: Mutex<PreviewState>,
}

impl PreviewShared {
    fn lock(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Editor preview engine
#[derive(Clone)]
pub struct PreviewEngine {
    shared: Arc<PreviewShared>,
}

impl fmt::Debug for PreviewEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewEngine")
            .field("preview", &self.state())
            .finish_non_exhaustive()
    }
}

impl PreviewEngine {
    /// Create an engine with nothing previewing
    ///
    /// Like [`PlaybackEngine::new`](crate::PlaybackEngine::new), captures the
    /// current Tokio runtime for its timers.
    pub fn new(
        output: SharedLocalOutput,
        host: Arc<dyn EmbedHost>,
        library: LocalAudioLibrary,
    ) -> Self {
        Self {
            shared: Arc::new(PreviewShared {
                mechanisms: Mechanisms::new(output, host, library),
                state: Mutex::new(PreviewState::default()),
            }),
        }
    }

    /// Preview `music`, replacing any running preview
    pub fn preview(&self, music: MusicRef) -> PreviewSnapshot {
        let mut guard = self.shared.lock();
        let state = &mut *guard;

        if let Some(mut previous) = state.preview.take() {
            previous.timers.abort_all();
            self.shared
                .mechanisms
                .release(&previous.mechanism, EmbedSurface::Preview);
        }

        state.last_preview += 1;
        let id = state.last_preview;

        tracing::debug!("Previewing {} clip '{}'", music.source_kind, music.title);
        let mechanism = self.shared.mechanisms.start(
            &music,
            EmbedSurface::Preview,
            &mut state.pending_events,
        );

        let mut timers = Timers::default();
        if let Mechanism::Local(token) = &mechanism {
            timers.spawn(
                self.shared.mechanisms.runtime.as_ref(),
                auto_stop(Arc::downgrade(&self.shared), id, *token, music.window()),
            );
        }

        state.pending_events.push(PlaybackEvent::PreviewStarted {
            source_kind: music.source_kind,
        });

        let preview = PreviewSession {
            id,
            music,
            sounding: true,
            mechanism,
            timers,
        };
        let snapshot = preview.snapshot();
        state.preview = Some(preview);

        snapshot
    }

    /// Close the preview
    ///
    /// Stops the local output only if the preview still owns it. Returns
    /// `false` when nothing was previewing.
    pub fn close(&self) -> bool {
        let mut guard = self.shared.lock();
        let Some(mut preview) = guard.preview.take() else {
            return false;
        };

        preview.timers.abort_all();
        self.shared
            .mechanisms
            .release(&preview.mechanism, EmbedSurface::Preview);
        guard.pending_events.push(PlaybackEvent::PreviewClosed);

        tracing::debug!("Closed preview of '{}'", preview.music.title);
        true
    }

    /// Running preview, if any
    pub fn state(&self) -> Option<PreviewSnapshot> {
        self.shared.lock().preview.as_ref().map(PreviewSession::snapshot)
    }

    /// Take all events queued since the last call
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.shared.lock().pending_events)
    }
}

async fn auto_stop(engine: Weak<PreviewShared>, id: u64, token: OutputToken, window: Duration) {
    tokio::time::sleep(window).await;

    let Some(shared) = engine.upgrade() else {
        return;
    };
    let mut guard = shared.lock();
    let state = &mut *guard;

    let Some(preview) = state.preview.as_mut().filter(|p| p.id == id) else {
        return;
    };

    shared.mechanisms.output.release(token);
    preview.sounding = false;
    state
        .pending_events
        .push(PlaybackEvent::ClipFinished { session: None });
}
