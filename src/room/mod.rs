//! Room lifecycle on a single device.

pub mod session;

pub use session::{JoinRequest, RoomSession, SessionError};

/// Canonical form of a typed room code: trimmed and upper-cased.
///
/// All devices must normalize the same way or they derive different seeds.
pub fn normalize_room_code(room_code: &str) -> String {
    room_code.trim().to_uppercase()
}
