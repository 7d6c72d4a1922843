//! # Role Reveal
//!
//! Companion library for an in-person social deduction game. Every device in
//! a room deals the same roles from shared public inputs, with no network
//! traffic between devices, and computes the same score changes for a
//! declared round outcome.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ROLE REVEAL                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - String -> 32-bit seed                     │
//! │  └── rng.rs      - Mulberry32 PRNG + Fisher-Yates shuffle    │
//! │                                                              │
//! │  game/           - Game rules (deterministic)                │
//! │  ├── role.rs     - Roles and reveal tips                     │
//! │  ├── distribution.rs - Per-round deal                        │
//! │  ├── scoring.rs  - Outcomes, points table, deltas            │
//! │  └── scoreboard.rs - Cumulative scores                       │
//! │                                                              │
//! │  storage/        - Persistence (injected, non-deterministic) │
//! │  room/           - Join / reveal / score / skip cycle        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are pure functions of their inputs:
//! - Explicit 32-bit wrapping arithmetic for hashing and the PRNG
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No clocks, no I/O, no caching
//!
//! Given the same room code, round number and player count, every device
//! deals **identical roles**.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod room;
pub mod storage;

// Re-export commonly used types
pub use crate::core::hash::hash_seed;
pub use crate::core::rng::DeterministicRng;
pub use crate::game::distribution::{
    build_role_seed, generate_roles, get_role_for_player, PlayerNumber, RoleError,
};
pub use crate::game::role::{role_tip, Role};
pub use crate::game::scoreboard::{apply_deltas, Scoreboard};
pub use crate::game::scoring::{
    calculate_deltas, summarize_deltas, DeltaMap, DeltaSummary, Outcome, ScoringConfig,
    ScoringError,
};
pub use crate::room::{normalize_room_code, JoinRequest, RoomSession, SessionError};
pub use crate::storage::{FileStore, GameStore, KeyValueStore, MemoryStore, StorageError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
