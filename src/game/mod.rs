//! Game Rules Module
//!
//! Role dealing and scoring. 100% deterministic, no I/O.
//!
//! ## Module Structure
//!
//! - `role`: The four roles and their tips
//! - `distribution`: Seed derivation and the per-round deal
//! - `scoring`: Outcomes, points table, per-round deltas
//! - `scoreboard`: Cumulative scores per room

pub mod role;
pub mod distribution;
pub mod scoring;
pub mod scoreboard;

// Re-export key types
pub use role::{Role, role_tip};
pub use distribution::{
    build_role_seed, generate_roles, get_role_for_player, PlayerNumber, RoleError,
};
pub use scoring::{
    calculate_deltas, summarize_deltas, DeltaMap, DeltaSummary, Outcome, RolePoints,
    ScoringConfig, ScoringError,
};
pub use scoreboard::{apply_deltas, Scoreboard};
