//! Role Distribution
//!
//! Deals roles for a round without any communication between devices. Each
//! device derives the same seed from the shared room code and round number,
//! shuffles the same canonical role list, and reads its own seat.
//!
//! Assignments are never cached or stored: every query recomputes the whole
//! deal from its inputs.

use tracing::debug;

use crate::core::hash::hash_seed;
use crate::core::rng::DeterministicRng;
use crate::game::role::Role;

/// Player number, 1-based.
pub type PlayerNumber = u32;

/// Minimum number of players in a room.
pub const MIN_PLAYERS: u32 = 4;

/// Domain separator appended to every seed string.
///
/// Must stay byte-identical across every client; changing it re-deals
/// every room.
pub const ROLE_SEED_DOMAIN: &str = "BADSHA-WAZIR-CHOR-SIPAHI";

/// Role distribution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    /// Fewer players than the game supports.
    #[error("minimum 4 players required, got {0}")]
    InvalidPlayerCount(u32),

    /// Player number outside `1..=num_players`.
    #[error("invalid player number {player} for {num_players} players")]
    InvalidPlayerNumber {
        /// Requested player number.
        player: PlayerNumber,
        /// Players in the room.
        num_players: u32,
    },
}

/// Build the seed for a room and round.
///
/// Hashes `"{room_code}|{round_number}|{ROLE_SEED_DOMAIN}"`.
pub fn build_role_seed(room_code: &str, round_number: u32) -> u32 {
    let seed_text = format!("{room_code}|{round_number}|{ROLE_SEED_DOMAIN}");
    hash_seed(&seed_text)
}

/// Canonical unshuffled deal for `num_players` seats:
/// `[Leader, Detective, Saboteur, Generic x (num_players - 3)]`.
pub fn canonical_roles(num_players: u32) -> Result<Vec<Role>, RoleError> {
    if num_players < MIN_PLAYERS {
        return Err(RoleError::InvalidPlayerCount(num_players));
    }

    let mut roles = Vec::with_capacity(num_players as usize);
    roles.extend([Role::Leader, Role::Detective, Role::Saboteur]);
    roles.resize(num_players as usize, Role::Generic);
    Ok(roles)
}

/// Deal roles for a round.
///
/// Index `i` of the result is the role of player number `i + 1`.
///
/// # Example
///
/// ```
/// use role_reveal::game::distribution::generate_roles;
/// use role_reveal::game::role::Role;
///
/// let roles = generate_roles("GAME123", 1, 4).unwrap();
/// assert_eq!(roles, [Role::Leader, Role::Saboteur, Role::Generic, Role::Detective]);
/// ```
pub fn generate_roles(
    room_code: &str,
    round_number: u32,
    num_players: u32,
) -> Result<Vec<Role>, RoleError> {
    let canonical = canonical_roles(num_players)?;
    let seed = build_role_seed(room_code, round_number);
    debug!(round_number, num_players, seed, "dealing roles");

    let mut rng = DeterministicRng::new(seed);
    Ok(rng.shuffled(&canonical))
}

/// Role of a single player for a round.
pub fn get_role_for_player(
    room_code: &str,
    round_number: u32,
    num_players: u32,
    player_number: PlayerNumber,
) -> Result<Role, RoleError> {
    if player_number < 1 || player_number > num_players {
        return Err(RoleError::InvalidPlayerNumber {
            player: player_number,
            num_players,
        });
    }

    let roles = generate_roles(room_code, round_number, num_players)?;
    Ok(roles[(player_number - 1) as usize])
}

/// Player number holding `role` in a deal, if any.
pub fn find_player_with_role(roles: &[Role], role: Role) -> Option<PlayerNumber> {
    roles
        .iter()
        .position(|r| *r == role)
        .map(|idx| idx as PlayerNumber + 1)
}

// =============================================================================
// TESTS
// =============================================================================
