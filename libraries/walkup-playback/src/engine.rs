//! Announce playback engine
//!
//! Holds at most one [`PlaybackSession`]. Announcing a player ends the
//! previous session first (timers aborted, output released, embed cleared)
//! and only then starts the new one, all under the engine lock.
//!
//! Timer tasks hold a weak reference to the engine and re-check the session
//! id under the lock before acting, so a timer that outlives its session
//! does nothing.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use walkup_core::{LocalAudioLibrary, Player, PlayerId};

use crate::dispatch::Mechanisms;
use crate::error::{PlaybackError, Result};
use crate::events::{EndReason, PlaybackEvent};
use crate::mechanism::{EmbedHost, EmbedSurface, EngagementOutcome};
use crate::output::{OutputToken, SharedLocalOutput};
use crate::session::{Mechanism, PlaybackSession, SessionId, SessionSnapshot, Timers};

/// Default autoplay retry offsets, in milliseconds after the announce
pub const DEFAULT_AUTOPLAY_RETRY_DELAYS_MS: [u64; 4] = [1000, 1500, 2000, 3000];

/// Playback engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// When to retry starting an embed, measured from the announce
    pub autoplay_retry_delays: Vec<Duration>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay_retry_delays: DEFAULT_AUTOPLAY_RETRY_DELAYS_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    last_session: u64,
    session: Option<PlaybackSession>,
    pending_events: Vec<PlaybackEvent>,
}

struct EngineShared {
    mechanisms: Mechanisms,
    config: PlaybackConfig,
    state: Mutex<EngineState>,
}

impl EngineShared {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Announce engine
///
/// Cheap to clone; clones drive the same session.
#[derive(Clone)]
pub struct PlaybackEngine {
    shared: Arc<EngineShared>,
}

impl fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("session", &self.session())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl PlaybackEngine {
    /// Create an idle engine
    ///
    /// Clip timers run on the Tokio runtime current at construction, so
    /// `announce` may be called from any thread afterwards.
    pub fn new(
        output: SharedLocalOutput,
        host: Arc<dyn EmbedHost>,
        library: LocalAudioLibrary,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                mechanisms: Mechanisms::new(output, host, library),
                config,
                state: Mutex::new(EngineState::default()),
            }),
        }
    }

    /// Announce `player`, replacing any current session
    pub fn announce(&self, player: Player) -> SessionSnapshot {
        let mut guard = self.shared.lock();
        let state = &mut *guard;

        self.end_session(state, EndReason::Replaced);

        state.last_session += 1;
        let id = SessionId::new(state.last_session);
        let music = player.walkup_music.clone();

        tracing::info!(
            "Announcing {} #{} ({} clip, session {})",
            player.name,
            player.number,
            music.source_kind,
            id
        );

        let mechanism = self.shared.mechanisms.start(
            &music,
            EmbedSurface::Announce,
            &mut state.pending_events,
        );

        let mut timers = Timers::default();
        let runtime = self.shared.mechanisms.runtime.as_ref();
        match &mechanism {
            Mechanism::Local(token) => {
                timers.spawn(
                    runtime,
                    auto_stop(Arc::downgrade(&self.shared), id, *token, music.window()),
                );
            }
            Mechanism::Embed(_) if !self.shared.config.autoplay_retry_delays.is_empty() => {
                timers.spawn(
                    runtime,
                    autoplay_retries(
                        Arc::downgrade(&self.shared),
                        id,
                        self.shared.config.autoplay_retry_delays.clone(),
                    ),
                );
            }
            Mechanism::Embed(_) | Mechanism::Unavailable => {}
        }

        state.pending_events.push(PlaybackEvent::SessionStarted {
            session: id,
            player_id: player.id.clone(),
            source_kind: music.source_kind,
        });

        let session = PlaybackSession {
            id,
            player,
            sounding: true,
            mechanism,
            timers,
        };
        let snapshot = session.snapshot();
        state.session = Some(session);

        snapshot
    }

    /// End the current session; no-op when idle
    ///
    /// Returns `true` if a session was ended.
    pub fn stop(&self) -> bool {
        let mut guard = self.shared.lock();
        self.end_session(&mut guard, EndReason::Stopped)
    }

    /// End the session only if `player_id` is the one announcing
    pub fn stop_if_current(&self, player_id: &PlayerId) -> bool {
        let mut guard = self.shared.lock();
        let is_current = guard
            .session
            .as_ref()
            .is_some_and(|s| &s.player.id == player_id);
        if !is_current {
            return false;
        }
        self.end_session(&mut guard, EndReason::Stopped)
    }

    /// Reload the announce embed with its autoplay directive
    ///
    /// Manual fallback when the automatic retries did not start playback.
    pub fn refresh_embed(&self) -> Result<()> {
        let mut guard = self.shared.lock();
        let state = &mut *guard;

        let Some(session) = state.session.as_ref() else {
            return Err(PlaybackError::InvalidOperation(
                "no player is being announced".to_string(),
            ));
        };
        let Mechanism::Embed(request) = &session.mechanism else {
            return Err(PlaybackError::InvalidOperation(
                "the announced clip is not an embed".to_string(),
            ));
        };

        self.shared
            .mechanisms
            .host
            .render(EmbedSurface::Announce, request)?;
        tracing::debug!("Refreshed announce embed for session {}", session.id);

        state
            .pending_events
            .push(PlaybackEvent::EmbedRefreshed { session: session.id });
        Ok(())
    }

    /// Current session, if a player is announced
    pub fn session(&self) -> Option<SessionSnapshot> {
        self.shared.lock().session.as_ref().map(PlaybackSession::snapshot)
    }

    /// Whether a player is announced
    pub fn is_announcing(&self) -> bool {
        self.shared.lock().session.is_some()
    }

    /// Id of the announced player
    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.shared
            .lock()
            .session
            .as_ref()
            .map(|s| s.player.id.clone())
    }

    /// Take all events queued since the last call
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.shared.lock().pending_events)
    }

    fn end_session(&self, state: &mut EngineState, reason: EndReason) -> bool {
        let Some(mut session) = state.session.take() else {
            return false;
        };

        session.timers.abort_all();
        self.shared
            .mechanisms
            .release(&session.mechanism, EmbedSurface::Announce);

        tracing::info!(
            "Session {} for {} ended ({:?})",
            session.id,
            session.player.name,
            reason
        );
        state.pending_events.push(PlaybackEvent::SessionEnded {
            session: session.id,
            player_id: session.player.id,
            reason,
        });
        true
    }
}

/// Silence a local clip once its window has elapsed
async fn auto_stop(
    engine: Weak<EngineShared>,
    id: SessionId,
    token: OutputToken,
    window: Duration,
) {
    tokio::time::sleep(window).await;

    let Some(shared) = engine.upgrade() else {
        return;
    };
    let mut guard = shared.lock();
    let state = &mut *guard;

    let Some(session) = state.session.as_mut().filter(|s| s.id == id) else {
        return;
    };

    shared.mechanisms.output.release(token);
    session.sounding = false;
    tracing::info!("Clip window elapsed for {}", session.player.name);

    state
        .pending_events
        .push(PlaybackEvent::ClipFinished { session: Some(id) });
}

/// Press "play" on the announce embed at each offset until it engages
async fn autoplay_retries(engine: Weak<EngineShared>, id: SessionId, delays: Vec<Duration>) {
    let started = tokio::time::Instant::now();

    for (index, delay) in delays.iter().enumerate() {
        tokio::time::sleep_until(started + *delay).await;

        let Some(shared) = engine.upgrade() else {
            return;
        };
        let mut guard = shared.lock();
        let state = &mut *guard;
        if state.session.as_ref().map(|s| s.id) != Some(id) {
            return;
        }

        let attempt = index + 1;
        let outcome = shared
            .mechanisms
            .host
            .attempt_engagement(EmbedSurface::Announce);
        state.pending_events.push(PlaybackEvent::AutoplayAttempted {
            session: id,
            attempt,
            outcome,
        });

        match outcome {
            EngagementOutcome::Engaged => {
                tracing::info!("Embed playback started on attempt {}", attempt);
                return;
            }
            EngagementOutcome::NotReady | EngagementOutcome::Blocked => {
                tracing::debug!("Autoplay attempt {} for session {}: {:?}", attempt, id, outcome);
            }
        }
    }

    let Some(shared) = engine.upgrade() else {
        return;
    };
    let mut guard = shared.lock();
    if guard.session.as_ref().map(|s| s.id) == Some(id) {
        tracing::info!("Autoplay not confirmed after {} attempts", delays.len());
        guard
            .pending_events
            .push(PlaybackEvent::AutoplayExhausted { session: id });
    }
}
