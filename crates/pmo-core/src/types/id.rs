//! Identifier types shared by every entity and by the acting principal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary key of every persisted entity.
///
/// `0` means "not yet assigned"; the store hands out a fresh key on insert.
pub type EntityId = i64;

/// Identifier of the user performing the current unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub i64);

impl ActorId {
    /// The system / anonymous actor, used whenever no principal resolves.
    pub const SYSTEM: ActorId = ActorId(0);

    /// Return the raw integer id.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the system / anonymous actor.
    pub fn is_system(self) -> bool {
        self == Self::SYSTEM
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::SYSTEM
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for ActorId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ActorId> for i64 {
    fn from(id: ActorId) -> i64 {
        id.0
    }
}
