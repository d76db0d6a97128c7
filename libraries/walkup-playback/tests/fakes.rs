//! Recording mechanism fakes for engine tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use walkup_core::{LocalAudioLibrary, LocalFileId, MusicRef, Player, PlayerId, SourceKind};
use walkup_playback::{
    EmbedAccessError, EmbedHost, EmbedRequest, EmbedSurface, EngagementOutcome, LocalAudioOutput,
    LocalClip, PlaybackConfig, PlaybackEngine, PlaybackError, PreviewEngine, SharedLocalOutput,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCall {
    Play(LocalFileId),
    Stop,
}

#[derive(Default)]
pub struct RecordingOutput {
    calls: Mutex<Vec<OutputCall>>,
    pub fail: AtomicBool,
}

impl RecordingOutput {
    pub fn calls(&self) -> Vec<OutputCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == OutputCall::Stop)
            .count()
    }
}

impl LocalAudioOutput for RecordingOutput {
    fn play(&self, clip: &LocalClip) -> walkup_playback::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PlaybackError::output("no audio device"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(OutputCall::Play(clip.file_id.clone()));
        Ok(())
    }

    fn stop(&self) {
        self.calls.lock().unwrap().push(OutputCall::Stop);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Render(EmbedSurface, String),
    Clear(EmbedSurface),
    Attempt(EmbedSurface),
    Suppress(EmbedSurface),
}

/// Embed host that records every call
///
/// `attempt_engagement` pops scripted outcomes, then reports `NotReady`.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    outcomes: Mutex<VecDeque<EngagementOutcome>>,
    pub fail_render: AtomicBool,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempts(&self, surface: EmbedSurface) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == HostCall::Attempt(surface))
            .count()
    }

    pub fn renders(&self, surface: EmbedSurface) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Render(s, src) if s == surface => Some(src),
                _ => None,
            })
            .collect()
    }

    pub fn script(&self, outcomes: &[EngagementOutcome]) {
        self.outcomes.lock().unwrap().extend(outcomes.iter().copied());
    }
}

impl EmbedHost for RecordingHost {
    fn render(&self, surface: EmbedSurface, request: &EmbedRequest) -> walkup_playback::Result<()> {
        if self.fail_render.load(Ordering::SeqCst) {
            return Err(PlaybackError::embed("surface detached"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Render(surface, request.src.clone()));
        Ok(())
    }

    fn clear(&self, surface: EmbedSurface) {
        self.calls.lock().unwrap().push(HostCall::Clear(surface));
    }

    fn attempt_engagement(&self, surface: EmbedSurface) -> EngagementOutcome {
        self.calls.lock().unwrap().push(HostCall::Attempt(surface));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(EngagementOutcome::NotReady)
    }

    fn suppress_navigation(&self, surface: EmbedSurface) -> Result<(), EmbedAccessError> {
        self.calls.lock().unwrap().push(HostCall::Suppress(surface));
        Err(EmbedAccessError::CrossOrigin)
    }
}

/// Both engines wired to the same recording fakes
pub struct Harness {
    pub engine: PlaybackEngine,
    pub preview: PreviewEngine,
    pub output: Arc<RecordingOutput>,
    pub host: Arc<RecordingHost>,
    pub library: LocalAudioLibrary,
}

impl Harness {
    pub fn new() -> Self {
        let output = Arc::new(RecordingOutput::default());
        let host = Arc::new(RecordingHost::default());
        let library = LocalAudioLibrary::new();
        let shared = SharedLocalOutput::new(output.clone());

        let engine = PlaybackEngine::new(
            shared.clone(),
            host.clone(),
            library.clone(),
            PlaybackConfig::default(),
        );
        let preview = PreviewEngine::new(shared, host.clone(), library.clone());

        Self {
            engine,
            preview,
            output,
            host,
            library,
        }
    }

    /// Upload a clip and return a local reference to it
    pub fn local_music(&self, name: &str, start: u32, end: u32) -> MusicRef {
        let file = self
            .library
            .insert(name, "audio/mpeg", vec![1u8, 2, 3, 4])
            .unwrap();
        MusicRef::local(name, file.id, start, end)
    }
}

pub fn player(id: &str, music: MusicRef) -> Player {
    Player {
        id: PlayerId::new(id),
        name: format!("Player {id}"),
        number: id.to_string(),
        walkup_music: music,
    }
}

pub fn spotify() -> MusicRef {
    MusicRef::embedded(
        SourceKind::Spotify,
        "Eye of the Tiger - Survivor",
        "https://open.spotify.com/embed/track/2KH16WveTQWT6KOG9Rg6e2",
        15,
        30,
    )
}

pub fn youtube() -> MusicRef {
    MusicRef::embedded(
        SourceKind::YouTube,
        "We Will Rock You - Queen",
        "https://www.youtube.com/embed/zBUJztI884M",
        0,
        15,
    )
}

pub async fn advance_to(ms: u64, since: tokio::time::Instant) {
    tokio::time::sleep_until(since + Duration::from_millis(ms)).await;
}
