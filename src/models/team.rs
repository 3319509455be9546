//! League team model.

use serde::{Deserialize, Serialize};

use super::{DivisionId, PlayerId, TeamId};

/// A team registered in the league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: TeamId,

    /// Team name
    pub name: String,

    /// Short initials used in match listings
    pub initials: String,

    /// Divisions this team plays in
    #[serde(default)]
    pub divisions: Vec<DivisionId>,
}

impl Team {
    /// Create a new Team.
    pub fn new(id: TeamId, name: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            initials: initials.into(),
            divisions: Vec::new(),
        }
    }

    /// Builder method to set division memberships.
    pub fn with_divisions(mut self, divisions: Vec<DivisionId>) -> Self {
        self.divisions = divisions;
        self
    }

    /// Check whether this team plays in a division.
    pub fn in_division(&self, division: DivisionId) -> bool {
        self.divisions.contains(&division)
    }
}

/// One roster line of a team: a player and whether the link is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: PlayerId,
    pub active: bool,
}
