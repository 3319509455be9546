//! League player model.

use serde::{Deserialize, Serialize};

use super::{PlayerId, TeamId};

/// A registered league player.
///
/// Team membership is kept as a single current team plus a history, so a player can
/// never be active for two teams at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: PlayerId,

    /// Canonical display name
    pub name: String,

    /// In-game names this player is known under
    #[serde(default)]
    pub nicks: Vec<String>,

    /// Team the player currently plays for
    #[serde(default)]
    pub current_team: Option<TeamId>,

    /// Teams the player played for before, oldest first
    #[serde(default)]
    pub former_teams: Vec<TeamId>,
}

impl Player {
    /// Create a new Player without nicknames or team.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nicks: Vec::new(),
            current_team: None,
            former_teams: Vec::new(),
        }
    }

    /// Builder method to set nicknames.
    pub fn with_nicks<I, S>(mut self, nicks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nicks = nicks.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the current team.
    pub fn with_team(mut self, team: TeamId) -> Self {
        self.current_team = Some(team);
        self
    }

    /// Check whether a raw in-game name is one of this player's nicknames.
    pub fn has_nick(&self, raw: &str) -> bool {
        let needle = raw.to_lowercase();
        self.nicks.iter().any(|n| n.to_lowercase() == needle)
    }

    /// Whether the player is currently active for the given team.
    pub fn is_active_for(&self, team: TeamId) -> bool {
        self.current_team == Some(team)
    }

    /// Whether the player ever played for the given team.
    pub fn played_for(&self, team: TeamId) -> bool {
        self.is_active_for(team) || self.former_teams.contains(&team)
    }

    /// Move to a new team (or to no team). The previous team goes to history.
    pub fn transfer_to(&mut self, team: Option<TeamId>) {
        if self.current_team == team {
            return;
        }
        if let Some(previous) = self.current_team.take() {
            self.former_teams.retain(|t| *t != previous);
            self.former_teams.push(previous);
        }
        if let Some(next) = team {
            self.former_teams.retain(|t| *t != next);
        }
        self.current_team = team;
    }
}
