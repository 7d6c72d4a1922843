//! Persisted Records
//!
//! JSON shapes written through the key-value store. Field names are
//! camelCase so records stay readable when copied between devices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::distribution::PlayerNumber;
use crate::game::scoreboard::Scoreboard;

/// Per-room progress: `{ "roundNumber": 3, "numPlayers": 5 }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    /// Current round, starting at 1.
    pub round_number: u32,
    /// Players in the room, fixed when the room state is first created.
    pub num_players: u32,
}

impl RoomState {
    /// Fresh room at round 1.
    pub fn new(num_players: u32) -> Self {
        Self {
            round_number: 1,
            num_players,
        }
    }

    /// Move to the next round.
    pub fn advance(&mut self) {
        self.round_number = self.round_number.saturating_add(1);
    }
}

/// What this device remembers about its player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    /// Normalized room code last joined.
    pub room_code: String,
    /// Private player number.
    pub player_number: PlayerNumber,
    /// Optional local display name.
    #[serde(default)]
    pub display_name: String,
    /// Player count entered on join.
    pub num_players: u32,
}

/// Human-copyable room snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// Room the snapshot belongs to.
    pub room_code: String,
    /// Scores at export time.
    pub scoreboard: Scoreboard,
    /// Room progress, if the room had any.
    pub state: Option<RoomState>,
    /// When the snapshot was taken.
    pub exported_at: DateTime<Utc>,
}

/// Lenient shape accepted by import. Only `roomCode` is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportPayload {
    #[serde(default)]
    pub room_code: Option<String>,
    #[serde(default)]
    pub scoreboard: Option<Scoreboard>,
    #[serde(default)]
    pub state: Option<RoomState>,
}
