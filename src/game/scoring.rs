//! Round Scoring
//!
//! Converts a declared round outcome into per-player point deltas using a
//! user-configurable points table. The app cannot observe who really held
//! which role; it only computes what a declared outcome would award.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::distribution::{generate_roles, PlayerNumber, RoleError};
use crate::game::role::Role;

/// Point delta per player number, sorted by player number.
pub type DeltaMap = BTreeMap<PlayerNumber, i32>;

/// Scoring errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// Outcome name not recognized.
    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),

    /// Deal could not be computed.
    #[error(transparent)]
    Roles(#[from] RoleError),
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Verdict declared by the group after the physical reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The Detective named the Saboteur.
    DetectiveSucceeded,
    /// The Saboteur escaped.
    DetectiveFailed,
}

impl Outcome {
    /// Both outcomes.
    pub const ALL: [Outcome; 2] = [Outcome::DetectiveSucceeded, Outcome::DetectiveFailed];

    /// Record key for this outcome.
    pub fn key(self) -> &'static str {
        match self {
            Outcome::DetectiveSucceeded => "detective_succeeded",
            Outcome::DetectiveFailed => "detective_failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Outcome {
    type Err = ScoringError;

    /// Accepts the record key with `_`, `-` or space separators, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "detective_succeeded" => Ok(Outcome::DetectiveSucceeded),
            "detective_failed" => Ok(Outcome::DetectiveFailed),
            _ => Err(ScoringError::InvalidOutcome(s.to_string())),
        }
    }
}

// =============================================================================
// SCORING CONFIGURATION
// =============================================================================

/// Points awarded to each role for one outcome.
///
/// Missing role keys in a persisted record deserialize as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RolePoints {
    /// Points for the Leader.
    #[serde(default)]
    pub leader: i32,
    /// Points for the Detective.
    #[serde(default)]
    pub detective: i32,
    /// Points for the Saboteur.
    #[serde(default)]
    pub saboteur: i32,
    /// Points for each Generic player.
    #[serde(default)]
    pub generic: i32,
}

impl RolePoints {
    /// Points for `role`.
    pub fn get(&self, role: Role) -> i32 {
        match role {
            Role::Leader => self.leader,
            Role::Detective => self.detective,
            Role::Saboteur => self.saboteur,
            Role::Generic => self.generic,
        }
    }

    /// Set points for `role`.
    pub fn set(&mut self, role: Role, points: i32) {
        match role {
            Role::Leader => self.leader = points,
            Role::Detective => self.detective = points,
            Role::Saboteur => self.saboteur = points,
            Role::Generic => self.generic = points,
        }
    }
}

/// Outcome -> role -> points table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points when the Detective names the Saboteur.
    #[serde(default)]
    pub detective_succeeded: RolePoints,
    /// Points when the Saboteur escapes.
    #[serde(default)]
    pub detective_failed: RolePoints,
}

/// Default points when the Detective succeeds.
pub const DEFAULT_SUCCEEDED_POINTS: RolePoints = RolePoints {
    leader: 3,
    detective: 5,
    saboteur: 0,
    generic: 1,
};

/// Default points when the Detective fails.
pub const DEFAULT_FAILED_POINTS: RolePoints = RolePoints {
    leader: 0,
    detective: -1,
    saboteur: 6,
    generic: 0,
};

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            detective_succeeded: DEFAULT_SUCCEEDED_POINTS,
            detective_failed: DEFAULT_FAILED_POINTS,
        }
    }
}

impl ScoringConfig {
    /// Points table for an outcome.
    pub fn points(&self, outcome: Outcome) -> &RolePoints {
        match outcome {
            Outcome::DetectiveSucceeded => &self.detective_succeeded,
            Outcome::DetectiveFailed => &self.detective_failed,
        }
    }

    /// Mutable points table for an outcome.
    pub fn points_mut(&mut self, outcome: Outcome) -> &mut RolePoints {
        match outcome {
            Outcome::DetectiveSucceeded => &mut self.detective_succeeded,
            Outcome::DetectiveFailed => &mut self.detective_failed,
        }
    }

    /// Points for `role` under `outcome`.
    pub fn delta(&self, outcome: Outcome, role: Role) -> i32 {
        self.points(outcome).get(role)
    }
}

// =============================================================================
// DELTAS
// =============================================================================

/// Compute each player's point delta for a round.
///
/// Re-deals the round from its inputs and looks up every player's role in
/// the points table for `outcome`.
pub fn calculate_deltas(
    config: &ScoringConfig,
    room_code: &str,
    round_number: u32,
    num_players: u32,
    outcome: Outcome,
) -> Result<DeltaMap, ScoringError> {
    let roles = generate_roles(room_code, round_number, num_players)?;
    let deltas = deltas_for_roles(config, &roles, outcome);
    debug!(
        round_number,
        %outcome,
        total = deltas.values().fold(0i32, |acc, d| acc.saturating_add(*d)),
        "calculated deltas"
    );
    Ok(deltas)
}

/// Deltas for an already-computed deal.
pub fn deltas_for_roles(config: &ScoringConfig, roles: &[Role], outcome: Outcome) -> DeltaMap {
    let points = config.points(outcome);
    roles
        .iter()
        .enumerate()
        .map(|(idx, role)| (idx as PlayerNumber + 1, points.get(*role)))
        .collect()
}

/// One line of a round summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaSummary {
    /// Player number.
    pub player_number: PlayerNumber,
    /// Role held that round, if the deal covers this player.
    pub role: Option<Role>,
    /// Points awarded.
    pub delta: i32,
}

impl fmt::Display for DeltaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = self.role.map(Role::name).unwrap_or("?");
        write!(
            f,
            "Player {} ({}): {}",
            self.player_number,
            role,
            format_delta(self.delta)
        )
    }
}

/// Signed rendering of a delta: `+3`, `0`, `-1`.
pub fn format_delta(delta: i32) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Join deltas with the roles that earned them, ascending by player number.
pub fn summarize_deltas(deltas: &DeltaMap, roles: &[Role]) -> Vec<DeltaSummary> {
    deltas
        .iter()
        .map(|(&player_number, &delta)| DeltaSummary {
            player_number,
            role: (player_number as usize)
                .checked_sub(1)
                .and_then(|idx| roles.get(idx))
                .copied(),
            delta,
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
