//! League division model.

use serde::{Deserialize, Serialize};

use super::{DivisionId, TeamId};

/// A division of the league for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    /// Unique identifier
    pub id: DivisionId,

    /// Division name (e.g., "D1")
    pub name: String,

    /// Season label (e.g., "S3")
    #[serde(default)]
    pub season: String,

    /// Member teams, in display order
    #[serde(default)]
    pub teams: Vec<TeamId>,
}

impl Division {
    /// Create a new empty Division.
    pub fn new(id: DivisionId, name: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            season: season.into(),
            teams: Vec::new(),
        }
    }

    /// Builder method to set member teams.
    pub fn with_teams(mut self, teams: Vec<TeamId>) -> Self {
        self.teams = teams;
        self
    }

    /// Check whether a team belongs to this division.
    pub fn has_team(&self, team: TeamId) -> bool {
        self.teams.contains(&team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_has_team() {
        let division =
            Division::new(1.into(), "D1", "S3").with_teams(vec![10.into(), 11.into()]);

        assert!(division.has_team(10.into()));
        assert!(!division.has_team(12.into()));
    }

    #[test]
    fn test_division_season_defaults_to_empty() {
        let division: Division = serde_json::from_str(r#"{"id":1,"name":"D1"}"#).unwrap();
        assert_eq!(division.season, "");
        assert!(division.teams.is_empty());
    }
}
