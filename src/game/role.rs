//! Role Definitions
//!
//! The four roles dealt each round and their reveal-screen tips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role held by one player for one round.
///
/// Every deal contains exactly one `Leader`, one `Detective` and one
/// `Saboteur`; all remaining seats are `Generic`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Calls on the Detective and asks the question aloud.
    Leader,
    /// Must identify the Saboteur.
    Detective,
    /// Must avoid being identified.
    Saboteur,
    /// Everyone else.
    Generic,
}

impl Role {
    /// All roles, in canonical deal order.
    pub const ALL: [Role; 4] = [Role::Leader, Role::Detective, Role::Saboteur, Role::Generic];

    /// Upper-case name used in records and summaries.
    pub fn name(self) -> &'static str {
        match self {
            Role::Leader => "LEADER",
            Role::Detective => "DETECTIVE",
            Role::Saboteur => "SABOTEUR",
            Role::Generic => "GENERIC",
        }
    }

    /// Tip shown next to the role on the reveal screen.
    pub fn tip(self) -> &'static str {
        match self {
            Role::Leader => "Call on the DETECTIVE and ask the question aloud.",
            Role::Detective => "Detect and identify the SABOTEUR.",
            Role::Saboteur => "Blend in with the GENERIC players.",
            Role::Generic => "Observe and help identify the SABOTEUR.",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a role name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(
    /// Name that failed to parse.
    pub String,
);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEADER" => Ok(Role::Leader),
            "DETECTIVE" => Ok(Role::Detective),
            "SABOTEUR" => Ok(Role::Saboteur),
            "GENERIC" => Ok(Role::Generic),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Tip for a role given by name. Unknown names yield an empty string.
pub fn role_tip(name: &str) -> &'static str {
    name.parse::<Role>().map(Role::tip).unwrap_or("")
}
