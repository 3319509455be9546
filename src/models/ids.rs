//! Numeric entity identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A league entity ID, as assigned by the data-access layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Create a new EntityId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The id following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

/// Type alias for division IDs
pub type DivisionId = EntityId;

/// Type alias for team IDs
pub type TeamId = EntityId;

/// Type alias for player IDs
pub type PlayerId = EntityId;

/// Type alias for match IDs
pub type MatchId = EntityId;

/// Type alias for period IDs
pub type PeriodId = EntityId;
