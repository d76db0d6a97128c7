//! Per-source dispatch shared by the announce and preview engines

use std::sync::Arc;
use tokio::runtime::Handle;
use walkup_core::{LocalAudioLibrary, MusicRef, SourceKind};

use crate::embed::embed_request;
use crate::events::PlaybackEvent;
use crate::mechanism::{EmbedHost, EmbedSurface, LocalClip};
use crate::output::SharedLocalOutput;
use crate::session::Mechanism;

/// Everything an engine plays through
#[derive(Clone)]
pub(crate) struct Mechanisms {
    pub(crate) output: SharedLocalOutput,
    pub(crate) host: Arc<dyn EmbedHost>,
    pub(crate) library: LocalAudioLibrary,
    /// Runtime timers are spawned on, captured when the engine is built
    pub(crate) runtime: Option<Handle>,
}

impl Mechanisms {
    pub(crate) fn new(
        output: SharedLocalOutput,
        host: Arc<dyn EmbedHost>,
        library: LocalAudioLibrary,
    ) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            tracing::warn!("Playback engine built outside a Tokio runtime, clip timers are disabled");
        }
        Self {
            output,
            host,
            library,
            runtime,
        }
    }

    /// Start `music` on the mechanism its source kind calls for
    ///
    /// Never fails: anything that cannot start degrades to
    /// [`Mechanism::Unavailable`] with a warning and an event.
    pub(crate) fn start(
        &self,
        music: &MusicRef,
        surface: EmbedSurface,
        events: &mut Vec<PlaybackEvent>,
    ) -> Mechanism {
        match music.source_kind {
            SourceKind::Local => self.start_local(music, events),
            SourceKind::Spotify | SourceKind::YouTube => {
                self.start_embed(music, surface, events)
            }
        }
    }

    fn start_local(&self, music: &MusicRef, events: &mut Vec<PlaybackEvent>) -> Mechanism {
        let Some(clip) = LocalClip::resolve(music, &self.library) else {
            tracing::warn!(
                "Local clip {:?} is not loaded, nothing will sound",
                music.local_file_id
            );
            events.push(PlaybackEvent::LocalClipMissing {
                file_id: music.local_file_id.clone(),
            });
            return Mechanism::Unavailable;
        };

        match self.output.start(&clip) {
            Ok(token) => {
                tracing::debug!(
                    "Playing {} from {:?} for {:?}",
                    clip.file_id,
                    clip.start,
                    clip.window
                );
                Mechanism::Local(token)
            }
            Err(e) => {
                tracing::warn!("Local output failed to start: {}", e);
                events.push(PlaybackEvent::OutputFailed {
                    message: e.to_string(),
                });
                Mechanism::Unavailable
            }
        }
    }

    fn start_embed(
        &self,
        music: &MusicRef,
        surface: EmbedSurface,
        events: &mut Vec<PlaybackEvent>,
    ) -> Mechanism {
        let Some(request) = embed_request(music, surface) else {
            tracing::warn!("{} clip '{}' has no link", music.source_kind, music.title);
            events.push(PlaybackEvent::EmbedFailed {
                message: format!("{} clip has no link", music.source_kind),
            });
            return Mechanism::Unavailable;
        };

        if let Err(e) = self.host.render(surface, &request) {
            tracing::warn!("Failed to render {:?} embed: {}", surface, e);
            events.push(PlaybackEvent::EmbedFailed {
                message: e.to_string(),
            });
            return Mechanism::Unavailable;
        }

        if let Err(e) = self.host.suppress_navigation(surface) {
            tracing::debug!("Could not block navigation inside {:?} embed: {}", surface, e);
        }

        Mechanism::Embed(request)
    }

    /// Let go of whatever `mechanism` holds
    pub(crate) fn release(&self, mechanism: &Mechanism, surface: EmbedSurface) {
        match mechanism {
            Mechanism::Local(token) => {
                if !self.output.release(*token) {
                    tracing::debug!("Local output no longer owned, leaving it alone");
                }
            }
            Mechanism::Embed(_) => self.host.clear(surface),
            Mechanism::Unavailable => {}
        }
    }
}
