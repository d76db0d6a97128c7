//! Roster and lineup store
//!
//! `RosterStore` is the single owner of the roster and the lineup order.
//! Every successful mutation rewrites both records; reads never touch the
//! backend.
//!
//! Loading is forgiving: a missing or malformed roster record is replaced by
//! the sample roster, and lineup entries that do not resolve to a roster
//! player are dropped. Whatever was repaired is written back immediately.

use bytes::Bytes;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use walkup_core::{
    available_players, lineup, validate_order, LocalAudioLibrary, LocalFile, Player, PlayerForm,
    PlayerId, Result, WalkupError,
};

use crate::records::{RecordStore, LINEUP_KEY, ROSTER_KEY};
use crate::seed::sample_roster;
use crate::StorageError;

/// What `open` had to repair in the stored records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The roster record was absent or malformed and the sample roster was used
    pub reseeded: bool,

    /// Players dropped from the roster because their id was already taken
    pub duplicate_players: Vec<PlayerId>,

    /// Lineup entries dropped (unknown or repeated ids)
    pub dropped_lineup_ids: Vec<PlayerId>,

    /// The lineup record was present but unreadable and was reset
    pub lineup_reset: bool,
}

impl LoadReport {
    /// Whether anything had to be repaired
    pub fn repaired(&self) -> bool {
        self.reseeded
            || self.lineup_reset
            || !self.duplicate_players.is_empty()
            || !self.dropped_lineup_ids.is_empty()
    }
}

/// Lineup entries as written by either record format
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLineupEntry {
    Id(PlayerId),
    Snapshot { id: PlayerId },
}

impl StoredLineupEntry {
    fn into_id(self) -> PlayerId {
        match self {
            Self::Id(id) | Self::Snapshot { id } => id,
        }
    }
}

/// Roster and lineup, persisted through a [`RecordStore`]
pub struct RosterStore {
    records: Arc<dyn RecordStore>,
    library: LocalAudioLibrary,
    roster: Vec<Player>,
    lineup: Vec<PlayerId>,
    report: LoadReport,
}

impl std::fmt::Debug for RosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterStore")
            .field("roster", &self.roster.len())
            .field("lineup", &self.lineup)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl RosterStore {
    /// Load the roster and lineup from `records`, repairing what is broken
    ///
    /// Backend read failures are returned. Malformed contents never are.
    pub async fn open(records: Arc<dyn RecordStore>, library: LocalAudioLibrary) -> Result<Self> {
        let mut report = LoadReport::default();

        let raw_roster = records.read(ROSTER_KEY).await?;
        let roster = match raw_roster.as_deref().map(parse_roster) {
            Some(Ok(players)) if !players.is_empty() => {
                let (players, duplicates) = dedupe_players(players);
                report.duplicate_players = duplicates;
                players
            }
            Some(Ok(_)) => {
                tracing::warn!("Stored roster is empty, loading sample roster");
                report.reseeded = true;
                sample_roster()
            }
            Some(Err(e)) => {
                tracing::warn!("Stored roster is malformed ({}), loading sample roster", e);
                report.reseeded = true;
                sample_roster()
            }
            None => {
                tracing::info!("No stored roster, loading sample roster");
                report.reseeded = true;
                sample_roster()
            }
        };

        let raw_lineup = records.read(LINEUP_KEY).await?;
        let stored_lineup = match raw_lineup.as_deref().map(parse_lineup) {
            Some(Ok(ids)) => ids,
            Some(Err(e)) => {
                tracing::warn!("Stored lineup is malformed ({}), starting empty", e);
                report.lineup_reset = true;
                Vec::new()
            }
            None => Vec::new(),
        };

        let known: HashSet<&PlayerId> = roster.iter().map(|p| &p.id).collect();
        let mut seen = HashSet::new();
        let mut lineup = Vec::with_capacity(stored_lineup.len());
        for id in stored_lineup {
            if known.contains(&id) && seen.insert(id.clone()) {
                lineup.push(id);
            } else {
                tracing::warn!("Dropping lineup entry {}", id);
                report.dropped_lineup_ids.push(id);
            }
        }

        let mut store = Self {
            records,
            library,
            roster,
            lineup,
            report,
        };

        if store.report.repaired() {
            // Load still succeeds if the repair cannot be written back
            if let Err(e) = store.persist().await {
                tracing::warn!("Failed to write repaired records: {}", e);
            }
        }

        tracing::info!(
            "Roster loaded: {} players, {} in lineup",
            store.roster.len(),
            store.lineup.len()
        );

        Ok(store)
    }

    /// Repairs made while loading
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Uploaded-file table shared with the playback engines
    pub fn library(&self) -> &LocalAudioLibrary {
        &self.library
    }

    /// All players, in roster order
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Lineup order as ids
    pub fn lineup_ids(&self) -> &[PlayerId] {
        &self.lineup
    }

    /// Lineup players, in batting order
    pub fn lineup(&self) -> Vec<Player> {
        self.lineup
            .iter()
            .filter_map(|id| self.player(id).cloned())
            .collect()
    }

    /// Roster players not in the lineup, in roster order
    pub fn available_players(&self) -> Vec<Player> {
        available_players(&self.roster, &self.lineup)
    }

    /// Look up a player
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.roster.iter().find(|p| &p.id == id)
    }

    /// Players whose name (case-insensitive) or number contains `query`
    ///
    /// A blank query matches everyone.
    pub fn search(&self, query: &str) -> Vec<Player> {
        let query = query.trim();
        self.roster
            .iter()
            .filter(|p| query.is_empty() || p.matches(query))
            .cloned()
            .collect()
    }

    /// Store an uploaded clip in the shared library
    pub fn upload_local_file(
        &self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<LocalFile> {
        let file = self.library.insert(name, mime_type, bytes)?;
        tracing::info!("Uploaded local file {} ({})", file.name, file.id);
        Ok(file)
    }

    /// Create a player from a submitted form
    pub async fn add_player(&mut self, form: &PlayerForm) -> Result<Player> {
        self.check_form(form)?;
        let player = Player::from_form(PlayerId::generate(), form)?;

        tracing::info!("Adding player {} #{} ({})", player.name, player.number, player.id);
        self.roster.push(player.clone());
        self.persist().await?;

        Ok(player)
    }

    /// Replace name, number and music of an existing player
    ///
    /// The id and the lineup position are kept.
    pub async fn update_player(&mut self, id: &PlayerId, form: &PlayerForm) -> Result<Player> {
        let index = self.index_of(id)?;
        self.check_form(form)?;
        let player = Player::from_form(id.clone(), form)?;

        tracing::info!("Updating player {} ({})", player.name, player.id);
        self.roster[index] = player.clone();
        self.persist().await?;

        Ok(player)
    }

    /// Delete a player from the roster and the lineup
    pub async fn remove_player(&mut self, id: &PlayerId) -> Result<Player> {
        let index = self.index_of(id)?;
        let player = self.roster.remove(index);
        self.lineup.retain(|p| p != id);

        tracing::info!("Removed player {} ({})", player.name, player.id);
        self.persist().await?;

        Ok(player)
    }

    /// Replace the lineup with `ids`
    pub async fn set_lineup_order(&mut self, ids: Vec<PlayerId>) -> Result<()> {
        validate_order(&self.roster, &ids)?;
        if ids == self.lineup {
            return Ok(());
        }

        tracing::debug!("Setting lineup order ({} players)", ids.len());
        self.lineup = ids;
        self.persist().await
    }

    /// Drop a player onto lineup slot `target`
    ///
    /// Inserts the player if absent, otherwise moves it. Returns `false`
    /// when the player was already at that slot.
    pub async fn move_to_lineup(&mut self, id: &PlayerId, target: usize) -> Result<bool> {
        self.index_of(id)?;
        if !lineup::move_within(&mut self.lineup, id, target) {
            return Ok(false);
        }

        tracing::debug!("Moved {} to lineup slot {}", id, target);
        self.persist().await?;
        Ok(true)
    }

    /// Append a player to the lineup; no-op if already there
    pub async fn add_to_lineup(&mut self, id: &PlayerId) -> Result<bool> {
        self.index_of(id)?;
        if self.lineup.contains(id) {
            return Ok(false);
        }

        self.lineup.push(id.clone());
        tracing::debug!("Added {} to lineup", id);
        self.persist().await?;
        Ok(true)
    }

    /// Take a player out of the lineup; no-op if absent
    pub async fn remove_from_lineup(&mut self, id: &PlayerId) -> Result<bool> {
        let before = self.lineup.len();
        self.lineup.retain(|p| p != id);
        if self.lineup.len() == before {
            return Ok(false);
        }

        tracing::debug!("Removed {} from lineup", id);
        self.persist().await?;
        Ok(true)
    }

    fn check_form(&self, form: &PlayerForm) -> Result<()> {
        form.validate()?;
        form.music.validate_with(&self.library)
    }

    fn index_of(&self, id: &PlayerId) -> Result<usize> {
        self.roster
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| WalkupError::PlayerNotFound(id.clone()))
    }

    /// Write both records
    ///
    /// On failure the in-memory state is kept and the error returned.
    async fn persist(&self) -> Result<()> {
        let result = self.write_records().await;
        if let Err(e) = &result {
            tracing::error!("Failed to persist roster: {}", e);
        }
        result.map_err(Into::into)
    }

    async fn write_records(&self) -> std::result::Result<(), StorageError> {
        let roster = serde_json::to_string(&self.roster)?;
        let lineup = serde_json::to_string(&self.lineup)?;
        self.records.write(ROSTER_KEY, &roster).await?;
        self.records.write(LINEUP_KEY, &lineup).await?;
        Ok(())
    }
}

fn parse_roster(raw: &str) -> serde_json::Result<Vec<Player>> {
    serde_json::from_str(raw)
}

fn parse_lineup(raw: &str) -> serde_json::Result<Vec<PlayerId>> {
    let entries: Vec<StoredLineupEntry> = serde_json::from_str(raw)?;
    Ok(entries.into_iter().map(StoredLineupEntry::into_id).collect())
}

fn dedupe_players(players: Vec<Player>) -> (Vec<Player>, Vec<PlayerId>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(players.len());
    let mut dropped = Vec::new();
    for player in players {
        if seen.insert(player.id.clone()) {
            kept.push(player);
        } else {
            tracing::warn!("Dropping duplicate roster entry {}", player.id);
            dropped.push(player.id);
        }
    }
    (kept, dropped)
}
