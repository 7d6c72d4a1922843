//! Typed Game Storage
//!
//! Loads and saves the game's records through an injected [`KeyValueStore`].
//!
//! Loads are best-effort: a record that cannot be read or decoded is logged
//! and treated as absent, so a broken store degrades to "nothing saved"
//! instead of failing the caller. Writes return their error and leave it to
//! the caller whether to surface or log it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};

use super::records::{ExportBundle, ImportPayload, PlayerIdentity, RoomState};
use super::{player_key, room_key, KeyValueStore, StorageError};
use crate::game::distribution::MIN_PLAYERS;
use crate::game::scoreboard::Scoreboard;
use crate::game::scoring::ScoringConfig;
use crate::room::normalize_room_code;

const SCOREBOARD_SUFFIX: &str = "scoreboard";
const STATE_SUFFIX: &str = "state";
const IDENTITY_SUFFIX: &str = "identity";
const SCORING_CONFIG_SUFFIX: &str = "scoring_config";

/// Typed access to persisted game records.
#[derive(Clone, Debug, Default)]
pub struct GameStore<S> {
    store: S,
}

impl<S: KeyValueStore> GameStore<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn load_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn load_or_warn<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_record(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "failed to load record, treating as absent");
            None
        })
    }

    fn save_record<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, &text)
    }

    // =========================================================================
    // Player identity
    // =========================================================================

    /// Save the local player's identity.
    pub fn save_player_identity(&mut self, identity: &PlayerIdentity) -> Result<(), StorageError> {
        self.save_record(&player_key(IDENTITY_SUFFIX), identity)
    }

    /// Load the local player's identity.
    pub fn load_player_identity(&self) -> Option<PlayerIdentity> {
        self.load_or_warn(&player_key(IDENTITY_SUFFIX))
    }

    // =========================================================================
    // Room records
    // =========================================================================

    /// Save a room's scoreboard.
    pub fn save_scoreboard(
        &mut self,
        room_code: &str,
        scoreboard: &Scoreboard,
    ) -> Result<(), StorageError> {
        self.save_record(&room_key(room_code, SCOREBOARD_SUFFIX), scoreboard)
    }

    /// Load a room's scoreboard, empty if none is saved.
    pub fn load_scoreboard(&self, room_code: &str) -> Scoreboard {
        self.load_or_warn(&room_key(room_code, SCOREBOARD_SUFFIX))
            .unwrap_or_default()
    }

    /// Save a room's progress.
    pub fn save_room_state(&mut self, room_code: &str, state: &RoomState) -> Result<(), StorageError> {
        self.save_record(&room_key(room_code, STATE_SUFFIX), state)
    }

    /// Load a room's progress.
    pub fn load_room_state(&self, room_code: &str) -> Option<RoomState> {
        self.load_or_warn(&room_key(room_code, STATE_SUFFIX))
    }

    /// Remove a room's scoreboard and progress.
    pub fn clear_room(&mut self, room_code: &str) -> Result<(), StorageError> {
        self.store.remove(&room_key(room_code, SCOREBOARD_SUFFIX))?;
        self.store.remove(&room_key(room_code, STATE_SUFFIX))?;
        info!(room_code, "cleared room data");
        Ok(())
    }

    // =========================================================================
    // Scoring configuration
    // =========================================================================

    /// Saved scoring config, if any.
    pub fn load_scoring_config(&self) -> Option<ScoringConfig> {
        self.load_or_warn(&player_key(SCORING_CONFIG_SUFFIX))
    }

    /// Current scoring config: the saved one, or the defaults.
    pub fn scoring_config(&self) -> ScoringConfig {
        self.load_scoring_config().unwrap_or_default()
    }

    /// Persist a scoring config.
    pub fn set_scoring_config(&mut self, config: &ScoringConfig) -> Result<(), StorageError> {
        self.save_record(&player_key(SCORING_CONFIG_SUFFIX), config)
    }

    /// Restore and persist the default scoring config, returning it.
    ///
    /// The defaults are returned even when they could not be persisted.
    pub fn reset_scoring_config(&mut self) -> ScoringConfig {
        let defaults = ScoringConfig::default();
        match self.set_scoring_config(&defaults) {
            Ok(()) => info!("scoring config reset to defaults"),
            Err(e) => error!(error = %e, "failed to persist default scoring config"),
        }
        defaults
    }

    // =========================================================================
    // Export / import
    // =========================================================================

    /// Snapshot a room as pretty-printed JSON, stamped with the current time.
    pub fn export_room(&self, room_code: &str) -> Result<String, StorageError> {
        self.export_room_at(room_code, Utc::now())
    }

    /// Snapshot a room with an explicit timestamp.
    pub fn export_room_at(
        &self,
        room_code: &str,
        exported_at: DateTime<Utc>,
    ) -> Result<String, StorageError> {
        let bundle = ExportBundle {
            room_code: room_code.to_string(),
            scoreboard: self.load_scoreboard(room_code),
            state: self.load_room_state(room_code),
            exported_at,
        };
        info!(room_code, "exported room");
        Ok(serde_json::to_string_pretty(&bundle)?)
    }

    /// Import a snapshot produced by [`GameStore::export_room`].
    ///
    /// Returns the imported (normalized) room code. The text is fully
    /// validated before anything is written; present `scoreboard`/`state`
    /// fields overwrite that room's records and nothing else. If the second
    /// write fails the first is rolled back.
    pub fn import_room(&mut self, text: &str) -> Result<String, StorageError> {
        let payload: ImportPayload = serde_json::from_str(text).map_err(|e| {
            warn!(error = %e, "rejected import: unparsable text");
            StorageError::MalformedImport(e.to_string())
        })?;

        let room_code = payload
            .room_code
            .as_deref()
            .map(normalize_room_code)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| {
                warn!("rejected import: missing roomCode");
                StorageError::MalformedImport("missing roomCode".to_string())
            })?;

        if let Some(state) = &payload.state {
            if state.num_players < MIN_PLAYERS {
                warn!(num_players = state.num_players, "rejected import: too few players");
                return Err(StorageError::MalformedImport(format!(
                    "numPlayers must be at least {MIN_PLAYERS}, got {}",
                    state.num_players
                )));
            }
        }

        let state_key = room_key(&room_code, STATE_SUFFIX);
        let previous_state = self.store.get(&state_key)?;

        if let Some(state) = &payload.state {
            self.save_room_state(&room_code, state)?;
        }
        if let Some(scoreboard) = &payload.scoreboard {
            if let Err(e) = self.save_scoreboard(&room_code, scoreboard) {
                if payload.state.is_some() {
                    self.restore(&state_key, previous_state.as_deref());
                }
                return Err(e);
            }
        }

        info!(room_code = %room_code, "imported room");
        Ok(room_code)
    }

    fn restore(&mut self, key: &str, previous: Option<&str>) {
        let result = match previous {
            Some(text) => self.store.set(key, text),
            None => self.store.remove(key),
        };
        if let Err(e) = result {
            error!(key, error = %e, "failed to roll back import");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
