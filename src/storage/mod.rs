//! Persistence Boundary
//!
//! The game rules never touch storage. Scoreboards, room state, the local
//! player identity and the scoring config are read and written through a
//! small key-value capability that the caller injects.
//!
//! ## Module Structure
//!
//! - `memory`: In-process store (tests, embedding)
//! - `file`: One JSON file per key in a data directory
//! - `records`: Persisted record shapes
//! - `game_store`: Typed load/save, export/import on top of any store

pub mod memory;
pub mod file;
pub mod records;
pub mod game_store;

pub use memory::MemoryStore;
pub use file::{FileStore, StorageConfig};
pub use records::{ExportBundle, PlayerIdentity, RoomState};
pub use game_store::GameStore;

/// Prefix shared by every key this crate writes.
pub const STORAGE_PREFIX: &str = "role_reveal_";

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backing store could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import text rejected.
    #[error("invalid scoreboard data: {0}")]
    MalformedImport(String),
}

/// String key-value capability.
///
/// Implementations own their data; values are opaque strings (JSON records
/// in practice).
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Key for a room-scoped record.
pub fn room_key(room_code: &str, suffix: &str) -> String {
    format!("{STORAGE_PREFIX}room_{room_code}_{suffix}")
}

/// Key for a record scoped to the local player.
pub fn player_key(suffix: &str) -> String {
    format!("{STORAGE_PREFIX}player_{suffix}")
}
