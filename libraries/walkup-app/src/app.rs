//! Command layer
//!
//! `WalkupApp` is what a presentation layer talks to. It owns the roster
//! store and both engines, and is the only place that touches more than one
//! of them in a single command.

use bytes::Bytes;
use std::sync::Arc;
use walkup_core::{
    LocalFile, MusicForm, Player, PlayerForm, PlayerId, Result, WalkupError,
};
use walkup_playback::{
    EmbedHost, LocalAudioOutput, PlaybackConfig, PlaybackEngine, PlaybackEvent, PreviewEngine,
    PreviewSnapshot, SessionSnapshot, SharedLocalOutput,
};
use walkup_storage::{LoadReport, RecordStore, RosterStore, SqliteRecordStore};

use crate::config::AppConfig;

/// Roster, lineup and playback behind one command surface
#[derive(Debug)]
pub struct WalkupApp {
    store: RosterStore,
    engine: PlaybackEngine,
    preview: PreviewEngine,
}

impl WalkupApp {
    /// Open the configured database and wire both engines to the platform
    /// mechanisms
    pub async fn open(
        config: &AppConfig,
        device: Arc<dyn LocalAudioOutput>,
        host: Arc<dyn EmbedHost>,
    ) -> crate::Result<Self> {
        config.validate()?;

        tracing::info!("Opening records at {}", config.storage.database_url);
        let records = SqliteRecordStore::connect(&config.storage.database_url).await?;

        Ok(Self::with_records(Arc::new(records), device, host, config.playback_config()).await?)
    }

    /// Build the app over any record backend
    pub async fn with_records(
        records: Arc<dyn RecordStore>,
        device: Arc<dyn LocalAudioOutput>,
        host: Arc<dyn EmbedHost>,
        playback: PlaybackConfig,
    ) -> Result<Self> {
        let store = RosterStore::open(records, walkup_core::LocalAudioLibrary::new()).await?;
        let output = SharedLocalOutput::new(device);
        let library = store.library().clone();

        let engine = PlaybackEngine::new(output.clone(), host.clone(), library.clone(), playback);
        let preview = PreviewEngine::new(output, host, library);

        Ok(Self {
            store,
            engine,
            preview,
        })
    }

    /// Open with the default audio device as local output
    #[cfg(feature = "rodio-output")]
    pub async fn open_with_default_device(
        config: &AppConfig,
        host: Arc<dyn EmbedHost>,
    ) -> crate::Result<Self> {
        let device = walkup_playback::RodioOutput::open()?;
        Self::open(config, Arc::new(device), host).await
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Announce a roster player
    pub fn announce(&self, player_id: &PlayerId) -> Result<SessionSnapshot> {
        let player = self
            .store
            .player(player_id)
            .cloned()
            .ok_or_else(|| WalkupError::PlayerNotFound(player_id.clone()))?;
        Ok(self.engine.announce(player))
    }

    /// Stop the announce; `false` if nothing was announced
    pub fn stop(&self) -> bool {
        self.engine.stop()
    }

    /// Stop the announce only if `player_id` is the one announced
    pub fn stop_if_current(&self, player_id: &PlayerId) -> bool {
        self.engine.stop_if_current(player_id)
    }

    /// Reload the announce embed ("tap to play")
    pub fn refresh_embed(&self) -> Result<()> {
        Ok(self.engine.refresh_embed()?)
    }

    /// Preview a clip from the editor form
    pub fn preview_clip(&self, music: &MusicForm) -> Result<PreviewSnapshot> {
        music.validate_with(self.store.library())?;
        let music = music.to_music_ref()?;
        Ok(self.preview.preview(music))
    }

    /// Close the editor preview
    pub fn close_preview(&self) -> bool {
        self.preview.close()
    }

    // ------------------------------------------------------------------
    // Roster
    // ------------------------------------------------------------------

    /// Create or update a player from the editor form
    ///
    /// An announced player keeps sounding with the clip it started with.
    pub async fn save_player(&mut self, form: &PlayerForm) -> Result<Player> {
        match &form.id {
            None => self.store.add_player(form).await,
            Some(id) => self.store.update_player(id, form).await,
        }
    }

    /// Delete a player, stopping the announce if it was theirs
    pub async fn delete_player(&mut self, player_id: &PlayerId) -> Result<Player> {
        let result = self.store.remove_player(player_id).await;

        // The removal stands even when persisting it failed
        if self.store.player(player_id).is_none() {
            self.engine.stop_if_current(player_id);
        }

        result
    }

    /// Keep an uploaded audio file for local clips
    pub fn upload_local_file(
        &self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<LocalFile> {
        self.store.upload_local_file(name, mime_type, bytes)
    }

    // ------------------------------------------------------------------
    // Lineup
    // ------------------------------------------------------------------

    /// Append a player to the lineup
    pub async fn add_to_lineup(&mut self, player_id: &PlayerId) -> Result<bool> {
        self.store.add_to_lineup(player_id).await
    }

    /// Take a player out of the lineup
    pub async fn remove_from_lineup(&mut self, player_id: &PlayerId) -> Result<bool> {
        self.store.remove_from_lineup(player_id).await
    }

    /// Drop a player onto lineup slot `index`
    pub async fn reorder_lineup(&mut self, player_id: &PlayerId, index: usize) -> Result<bool> {
        self.store.move_to_lineup(player_id, index).await
    }

    /// Replace the lineup order
    pub async fn set_lineup_order(&mut self, ids: Vec<PlayerId>) -> Result<()> {
        self.store.set_lineup_order(ids).await
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    /// Every player, in roster order
    pub fn roster(&self) -> &[Player] {
        self.store.roster()
    }

    /// Lineup players in batting order
    pub fn lineup(&self) -> Vec<Player> {
        self.store.lineup()
    }

    /// Lineup ids in batting order
    pub fn lineup_ids(&self) -> &[PlayerId] {
        self.store.lineup_ids()
    }

    /// Roster players not in the lineup
    pub fn available_players(&self) -> Vec<Player> {
        self.store.available_players()
    }

    /// Players whose name or number matches `query`; blank matches all
    pub fn search_players(&self, query: &str) -> Vec<Player> {
        self.store.search(query)
    }

    /// What was repaired when the records were loaded
    pub fn load_report(&self) -> &LoadReport {
        self.store.load_report()
    }

    /// The announce session, if a player is announced
    pub fn session(&self) -> Option<SessionSnapshot> {
        self.engine.session()
    }

    /// The running editor preview
    pub fn preview_state(&self) -> Option<PreviewSnapshot> {
        self.preview.state()
    }

    /// Events from both engines, announce events first
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        let mut events = self.engine.drain_events();
        events.extend(self.preview.drain_events());
        events
    }
}
