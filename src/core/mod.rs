//! Core deterministic primitives.
//!
//! Everything here is pure 32-bit integer arithmetic so that independent
//! devices compute bit-identical results from the same inputs.

pub mod hash;
pub mod rng;

// Re-export core types
pub use hash::hash_seed;
pub use rng::DeterministicRng;
