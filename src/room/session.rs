//! Room Session
//!
//! One device's view of a room: who this player is, which round the room is
//! on, and the running scoreboard. Drives the round cycle
//! (reveal -> declare outcome -> confirm or skip) and persists every step
//! through the injected store.
//!
//! Persistence here is best-effort. A failed write is logged and the session
//! carries on with its in-memory state.

use tracing::{debug, error, info};

use crate::game::distribution::{
    generate_roles, get_role_for_player, PlayerNumber, RoleError, MIN_PLAYERS,
};
use crate::game::role::Role;
use crate::game::scoreboard::Scoreboard;
use crate::game::scoring::{
    calculate_deltas, summarize_deltas, DeltaMap, DeltaSummary, Outcome, ScoringError,
};
use crate::storage::{GameStore, KeyValueStore, PlayerIdentity, RoomState};

use super::normalize_room_code;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Room code blank after trimming.
    #[error("room code is empty")]
    EmptyRoomCode,

    /// No saved identity to resume from.
    #[error("no room joined on this device")]
    NotJoined,

    /// Player count or player number rejected.
    #[error(transparent)]
    Roles(#[from] RoleError),

    /// Deltas could not be computed.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// Only the Detective records a guess.
    #[error("only the DETECTIVE can record a guess, this round you are {0}")]
    NotDetective(Role),

    /// Guess names this player or a number outside the room.
    #[error("cannot guess player {suspect} in a room of {num_players}")]
    InvalidGuess {
        /// Player number guessed.
        suspect: PlayerNumber,
        /// Players in the room.
        num_players: u32,
    },
}

/// Details entered when joining a room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinRequest {
    /// Room code as typed; normalized on join.
    pub room_code: String,
    /// Private player number.
    pub player_number: PlayerNumber,
    /// Player count. Ignored if the room already exists on this device.
    pub num_players: u32,
    /// Optional local display name.
    pub display_name: String,
}

impl From<PlayerIdentity> for JoinRequest {
    fn from(identity: PlayerIdentity) -> Self {
        Self {
            room_code: identity.room_code,
            player_number: identity.player_number,
            num_players: identity.num_players,
            display_name: identity.display_name,
        }
    }
}

/// A joined room on this device.
#[derive(Debug)]
pub struct RoomSession<S> {
    store: GameStore<S>,
    room_code: String,
    player_number: PlayerNumber,
    display_name: String,
    state: RoomState,
    scoreboard: Scoreboard,
    guess: Option<PlayerNumber>,
}

impl<S: KeyValueStore> RoomSession<S> {
    /// Join (or rejoin) a room.
    ///
    /// The first join on a device creates the room state and fixes its
    /// player count; later joins adopt the stored count. The player number is
    /// validated against the room's count.
    pub fn join(mut store: GameStore<S>, request: JoinRequest) -> Result<Self, SessionError> {
        let room_code = normalize_room_code(&request.room_code);
        if room_code.is_empty() {
            return Err(SessionError::EmptyRoomCode);
        }
        if request.num_players < MIN_PLAYERS {
            return Err(RoleError::InvalidPlayerCount(request.num_players).into());
        }

        let state = match store.load_room_state(&room_code) {
            Some(state) => state,
            None => {
                let state = RoomState::new(request.num_players);
                if let Err(e) = store.save_room_state(&room_code, &state) {
                    error!(room_code = %room_code, error = %e, "failed to save new room state");
                }
                state
            }
        };

        if state.num_players < MIN_PLAYERS {
            return Err(RoleError::InvalidPlayerCount(state.num_players).into());
        }
        if request.player_number < 1 || request.player_number > state.num_players {
            return Err(RoleError::InvalidPlayerNumber {
                player: request.player_number,
                num_players: state.num_players,
            }
            .into());
        }

        let display_name = request.display_name.trim().to_string();
        let identity = PlayerIdentity {
            room_code: room_code.clone(),
            player_number: request.player_number,
            display_name: display_name.clone(),
            num_players: request.num_players,
        };
        if let Err(e) = store.save_player_identity(&identity) {
            error!(error = %e, "failed to save player identity");
        }

        let scoreboard = store.load_scoreboard(&room_code);
        info!(
            room_code = %room_code,
            round = state.round_number,
            num_players = state.num_players,
            "joined room"
        );

        Ok(Self {
            store,
            room_code,
            player_number: request.player_number,
            display_name,
            state,
            scoreboard,
            guess: None,
        })
    }

    /// Rejoin the room remembered in the saved player identity.
    pub fn resume(store: GameStore<S>) -> Result<Self, SessionError> {
        let identity = store.load_player_identity().ok_or(SessionError::NotJoined)?;
        Self::join(store, identity.into())
    }

    /// Normalized room code.
    pub fn room_code(&self) -> &str {
        &self.room_code
    }

    /// This device's player number.
    pub fn player_number(&self) -> PlayerNumber {
        self.player_number
    }

    /// Local display name, possibly empty.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Current round.
    pub fn round_number(&self) -> u32 {
        self.state.round_number
    }

    /// Players in the room.
    pub fn num_players(&self) -> u32 {
        self.state.num_players
    }

    /// Room progress.
    pub fn state(&self) -> RoomState {
        self.state
    }

    /// Running scores.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Backing store.
    pub fn store(&self) -> &GameStore<S> {
        &self.store
    }

    /// Mutable backing store (scoring config edits, export).
    pub fn store_mut(&mut self) -> &mut GameStore<S> {
        &mut self.store
    }

    /// This player's role for the current round.
    pub fn role(&self) -> Result<Role, SessionError> {
        Ok(get_role_for_player(
            &self.room_code,
            self.state.round_number,
            self.state.num_players,
            self.player_number,
        )?)
    }

    /// Full deal for the current round (for the end-of-round reveal).
    pub fn round_roles(&self) -> Result<Vec<Role>, SessionError> {
        Ok(generate_roles(
            &self.room_code,
            self.state.round_number,
            self.state.num_players,
        )?)
    }

    /// Deltas the current round would award for `outcome`.
    pub fn deltas(&self, outcome: Outcome) -> Result<DeltaMap, SessionError> {
        let config = self.store.scoring_config();
        Ok(calculate_deltas(
            &config,
            &self.room_code,
            self.state.round_number,
            self.state.num_players,
            outcome,
        )?)
    }

    /// Summary shown before confirming `outcome`.
    pub fn preview(&self, outcome: Outcome) -> Result<Vec<DeltaSummary>, SessionError> {
        let roles = self.round_roles()?;
        let deltas = self.deltas(outcome)?;
        Ok(summarize_deltas(&deltas, &roles))
    }

    /// Record the Detective's private guess at the Saboteur for this round.
    ///
    /// Kept in memory only and cleared when the round ends.
    pub fn record_guess(&mut self, suspect: PlayerNumber) -> Result<(), SessionError> {
        let role = self.role()?;
        if role != Role::Detective {
            return Err(SessionError::NotDetective(role));
        }
        if suspect < 1 || suspect > self.state.num_players || suspect == self.player_number {
            return Err(SessionError::InvalidGuess {
                suspect,
                num_players: self.state.num_players,
            });
        }

        debug!(room_code = %self.room_code, round = self.state.round_number, "guess recorded");
        self.guess = Some(suspect);
        Ok(())
    }

    /// Guess recorded this round, if any.
    pub fn guess(&self) -> Option<PlayerNumber> {
        self.guess
    }

    /// Apply `outcome` to the scoreboard and move to the next round.
    ///
    /// Returns the applied deltas. Other devices must confirm the same
    /// outcome to keep their scoreboards in step.
    pub fn confirm_round(&mut self, outcome: Outcome) -> Result<DeltaMap, SessionError> {
        let deltas = self.deltas(outcome)?;
        self.scoreboard = self.scoreboard.apply(&deltas);
        if let Err(e) = self.store.save_scoreboard(&self.room_code, &self.scoreboard) {
            error!(room_code = %self.room_code, error = %e, "failed to save scoreboard");
        }

        info!(
            room_code = %self.room_code,
            round = self.state.round_number,
            %outcome,
            "round scored"
        );
        self.advance_round();
        Ok(deltas)
    }

    /// Abandon the current round without scoring it.
    pub fn skip_round(&mut self) {
        info!(room_code = %self.room_code, round = self.state.round_number, "round skipped");
        self.advance_round();
    }

    fn advance_round(&mut self) {
        self.guess = None;
        self.state.advance();
        if let Err(e) = self.store.save_room_state(&self.room_code, &self.state) {
            error!(room_code = %self.room_code, error = %e, "failed to save room state");
        }
    }

    /// Leave the room, handing back the store.
    pub fn leave(self) -> GameStore<S> {
        self.store
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn request(room: &str, player: PlayerNumber, players: u32) -> JoinRequest {
        JoinRequest {
            room_code: room.to_string(),
            player_number: player,
            num_players: players,
            display_name: String::new(),
        }
    }

    fn join(room: &str, player: PlayerNumber, players: u32) -> RoomSession<MemoryStore> {
        RoomSession::join(GameStore::new(MemoryStore::new()), request(room, player, players))
            .unwrap()
    }

    /// Store that reads fine but refuses every write.
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn test_join_creates_room_state() {
        let session = join("  game123 ", 2, 4);
        assert_eq!(session.room_code(), "GAME123");
        assert_eq!(session.round_number(), 1);
        assert_eq!(session.num_players(), 4);
        assert_eq!(
            session.store().load_room_state("GAME123"),
            Some(RoomState::new(4))
        );
    }

    #[test]
    fn test_join_saves_identity() {
        let mut req = request("game123", 3, 5);
        req.display_name = "  Ana ".to_string();
        let session = RoomSession::join(GameStore::new(MemoryStore::new()), req).unwrap();

        let identity = session.store().load_player_identity().unwrap();
        assert_eq!(identity.room_code, "GAME123");
        assert_eq!(identity.player_number, 3);
        assert_eq!(identity.display_name, "Ana");
        assert_eq!(session.display_name(), "Ana");
    }

    #[test]
    fn test_first_join_fixes_player_count() {
        let store = join("GAME123", 1, 6).leave();
        // Later join with a different count adopts the stored one
        let session = RoomSession::join(store, request("GAME123", 5, 4)).unwrap();
        assert_eq!(session.num_players(), 6);
    }

    #[test]
    fn test_join_validation() {
        let store = || GameStore::new(MemoryStore::new());

        assert_eq!(
            RoomSession::join(store(), request("   ", 1, 4)).unwrap_err(),
            SessionError::EmptyRoomCode
        );
        assert_eq!(
            RoomSession::join(store(), request("R", 1, 3)).unwrap_err(),
            SessionError::Roles(RoleError::InvalidPlayerCount(3))
        );
        assert_eq!(
            RoomSession::join(store(), request("R", 0, 4)).unwrap_err(),
            SessionError::Roles(RoleError::InvalidPlayerNumber { player: 0, num_players: 4 })
        );
        assert_eq!(
            RoomSession::join(store(), request("R", 5, 4)).unwrap_err(),
            SessionError::Roles(RoleError::InvalidPlayerNumber { player: 5, num_players: 4 })
        );
    }

    #[test]
    fn test_player_number_checked_against_stored_count() {
        let store = join("GAME123", 1, 4).leave();
        let err = RoomSession::join(store, request("GAME123", 6, 8)).unwrap_err();
        assert_eq!(
            err,
            SessionError::Roles(RoleError::InvalidPlayerNumber { player: 6, num_players: 4 })
        );
    }

    #[test]
    fn test_role_matches_deal() {
        let session = join("GAME123", 4, 4);
        // Deal for GAME123 round 1 is L S G D
        assert_eq!(session.role().unwrap(), Role::Detective);
        assert_eq!(
            session.round_roles().unwrap(),
            generate_roles("GAME123", 1, 4).unwrap()
        );
    }

    #[test]
    fn test_preview_does_not_change_state() {
        let session = join("GAME123", 1, 4);
        let summary = session.preview(Outcome::DetectiveSucceeded).unwrap();

        assert_eq!(summary.len(), 4);
        assert_eq!(summary[3].role, Some(Role::Detective));
        assert_eq!(summary[3].delta, 5);
        assert_eq!(session.round_number(), 1);
        assert!(session.scoreboard().is_empty());
    }

    #[test]
    fn test_confirm_round_applies_and_advances() {
        let mut session = join("GAME123", 1, 4);
        let deltas = session.confirm_round(Outcome::DetectiveSucceeded).unwrap();

        assert_eq!(deltas.values().sum::<i32>(), 9);
        assert_eq!(session.round_number(), 2);
        assert_eq!(session.scoreboard().score(4), 5);

        let store = session.store();
        assert_eq!(store.load_scoreboard("GAME123"), *session.scoreboard());
        assert_eq!(store.load_room_state("GAME123").unwrap().round_number, 2);
    }

    #[test]
    fn test_confirm_uses_saved_config() {
        let mut store = GameStore::new(MemoryStore::new());
        let mut config = store.scoring_config();
        config.points_mut(Outcome::DetectiveFailed).set(Role::Saboteur, 10);
        store.set_scoring_config(&config).unwrap();

        let mut session = RoomSession::join(store, request("GAME123", 1, 4)).unwrap();
        session.confirm_round(Outcome::DetectiveFailed).unwrap();
        // Saboteur sits at player 2 in round 1
        assert_eq!(session.scoreboard().score(2), 10);
    }

    #[test]
    fn test_huge_points_saturate_scores() {
        let mut store = GameStore::new(MemoryStore::new());
        let mut config = store.scoring_config();
        config.points_mut(Outcome::DetectiveSucceeded).set(Role::Generic, i32::MAX);
        store.set_scoring_config(&config).unwrap();

        let mut session = RoomSession::join(store, request("GAME123", 1, 4)).unwrap();
        for _ in 0..4 {
            session.confirm_round(Outcome::DetectiveSucceeded).unwrap();
        }

        // Player 3 is Generic in round 1 and Detective in round 2
        assert_eq!(session.scoreboard().score(3), i32::MAX);
        assert!(session.scoreboard().iter().all(|(_, s)| s >= 0));
        assert_eq!(session.store().load_scoreboard("GAME123"), *session.scoreboard());
    }

    #[test]
    fn test_detective_records_guess() {
        // Deal for GAME123 round 1 is L S G D
        let mut session = join("GAME123", 4, 4);
        session.record_guess(2).unwrap();
        assert_eq!(session.guess(), Some(2));

        // Changing the guess replaces it
        session.record_guess(3).unwrap();
        assert_eq!(session.guess(), Some(3));

        session.confirm_round(Outcome::DetectiveSucceeded).unwrap();
        assert_eq!(session.guess(), None);
    }

    #[test]
    fn test_guess_rules() {
        let mut detective = join("GAME123", 4, 4);
        for suspect in [0, 4, 5] {
            assert_eq!(
                detective.record_guess(suspect).unwrap_err(),
                SessionError::InvalidGuess { suspect, num_players: 4 }
            );
        }
        assert_eq!(detective.guess(), None);

        let mut leader = join("GAME123", 1, 4);
        assert_eq!(
            leader.record_guess(2).unwrap_err(),
            SessionError::NotDetective(Role::Leader)
        );
    }

    #[test]
    fn test_skip_clears_guess() {
        let mut session = join("GAME123", 4, 4);
        session.record_guess(2).unwrap();
        session.skip_round();
        assert_eq!(session.guess(), None);
    }

    #[test]
    fn test_skip_round_keeps_scores() {
        let mut session = join("GAME123", 1, 4);
        session.skip_round();

        assert_eq!(session.round_number(), 2);
        assert!(session.scoreboard().is_empty());
        assert_eq!(
            session.store().load_room_state("GAME123").unwrap().round_number,
            2
        );
    }

    #[test]
    fn test_rounds_accumulate() {
        let mut session = join("GAME123", 1, 4);
        session.confirm_round(Outcome::DetectiveSucceeded).unwrap();
        session.confirm_round(Outcome::DetectiveFailed).unwrap();

        let total: i32 = session.scoreboard().iter().map(|(_, s)| s).sum();
        assert_eq!(total, 9 + 5);
        assert_eq!(session.round_number(), 3);
    }

    #[test]
    fn test_resume_from_identity() {
        let mut session = join("GAME123", 3, 5);
        session.skip_round();
        let store = session.leave();

        let resumed = RoomSession::resume(store).unwrap();
        assert_eq!(resumed.room_code(), "GAME123");
        assert_eq!(resumed.player_number(), 3);
        assert_eq!(resumed.round_number(), 2);
    }

    #[test]
    fn test_resume_without_identity() {
        let err = RoomSession::resume(GameStore::new(MemoryStore::new())).unwrap_err();
        assert_eq!(err, SessionError::NotJoined);
    }

    #[test]
    fn test_write_failures_do_not_abort_round() {
        let store = GameStore::new(ReadOnlyStore::default());
        let mut session = RoomSession::join(store, request("GAME123", 1, 4)).unwrap();

        session.confirm_round(Outcome::DetectiveSucceeded).unwrap();
        assert_eq!(session.round_number(), 2);
        assert_eq!(session.scoreboard().score(1), 3);
        // Nothing durable happened
        assert!(session.store().load_scoreboard("GAME123").is_empty());
    }
}
