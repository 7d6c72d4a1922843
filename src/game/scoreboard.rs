//! Cumulative Scores
//!
//! Uses BTreeMap so iteration and the persisted record are sorted by
//! player number.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::distribution::PlayerNumber;
use crate::game::scoring::DeltaMap;

/// Running score per player number for one room.
///
/// Serializes as a plain map with player-number string keys:
/// `{"1": 3, "2": -1}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scoreboard {
    scores: BTreeMap<PlayerNumber, i32>,
}

impl Scoreboard {
    /// Empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a player, 0 if they have none yet.
    pub fn score(&self, player: PlayerNumber) -> i32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    /// Number of players with an entry.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no scores have been recorded.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entries ascending by player number.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerNumber, i32)> + '_ {
        self.scores.iter().map(|(p, s)| (*p, *s))
    }

    /// Return a new scoreboard with `deltas` added. `self` is untouched.
    ///
    /// Scores saturate at the `i32` bounds.
    pub fn apply(&self, deltas: &DeltaMap) -> Scoreboard {
        let mut next = self.clone();
        for (player, delta) in deltas {
            let score = next.scores.entry(*player).or_insert(0);
            *score = score.saturating_add(*delta);
        }
        next
    }

    /// Entries sorted by score (highest first), ties by player number.
    pub fn standings(&self) -> Vec<(PlayerNumber, i32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

impl FromIterator<(PlayerNumber, i32)> for Scoreboard {
    fn from_iter<I: IntoIterator<Item = (PlayerNumber, i32)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Add `deltas` to `scoreboard`, returning the new scoreboard.
pub fn apply_deltas(scoreboard: &Scoreboard, deltas: &DeltaMap) -> Scoreboard {
    scoreboard.apply(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(entries: &[(PlayerNumber, i32)]) -> DeltaMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_apply_to_empty() {
        let board = apply_deltas(&Scoreboard::new(), &deltas(&[(1, 3), (2, -1)]));
        assert_eq!(board.score(1), 3);
        assert_eq!(board.score(2), -1);
        assert_eq!(board.score(3), 0);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_apply_saturates() {
        let board = apply_deltas(&Scoreboard::new(), &deltas(&[(1, i32::MAX), (2, i32::MIN)]));
        let board = board.apply(&deltas(&[(1, i32::MAX), (2, -1)]));
        let board = board.apply(&deltas(&[(1, -5)]));

        assert_eq!(board.score(1), i32::MAX - 5);
        assert_eq!(board.score(2), i32::MIN);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let before: Scoreboard = [(1, 10)].into_iter().collect();
        let after = before.apply(&deltas(&[(1, 5), (2, 1)]));

        assert_eq!(before.score(1), 10);
        assert_eq!(before.len(), 1);
        assert_eq!(after.score(1), 15);
        assert_eq!(after.score(2), 1);
    }

    #[test]
    fn test_apply_keeps_untouched_players() {
        let before: Scoreboard = [(1, 4), (7, 2)].into_iter().collect();
        let after = before.apply(&deltas(&[(1, 1)]));
        assert_eq!(after.score(7), 2);
    }

    #[test]
    fn test_standings_order() {
        let board: Scoreboard = [(1, 3), (2, 8), (3, 3), (4, -1)].into_iter().collect();
        assert_eq!(board.standings(), vec![(2, 8), (1, 3), (3, 3), (4, -1)]);
    }

    #[test]
    fn test_record_shape() {
        let board: Scoreboard = [(2, -1), (1, 3)].into_iter().collect();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"{"1":3,"2":-1}"#);

        let parsed: Scoreboard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }
}
