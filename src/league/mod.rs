//! In-memory league snapshot.
//!
//! A [`League`] owns every division, team, player and match, plus the pool of periods
//! not yet attached to a match. Read queries live in [`report`], admin edits in [`edit`].

pub mod edit;
pub mod report;

pub use edit::*;
pub use report::*;

use thiserror::Error;

use crate::models::{
    Division, DivisionId, Match, MatchId, Period, PeriodId, Player, PlayerId, RosterEntry, Team,
    TeamId,
};

/// Errors raised by league lookups and edits.
#[derive(Debug, Error, PartialEq)]
pub enum LeagueError {
    #[error("Division not found: {0}")]
    DivisionNotFound(DivisionId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Period not found: {0}")]
    PeriodNotFound(PeriodId),

    #[error("Match {0} does not have two teams")]
    MissingTeams(MatchId),

    #[error("Too many periods: {count} (max {max})")]
    TooManyPeriods { count: usize, max: usize },

    #[error("Period {0} listed more than once")]
    DuplicatePeriod(PeriodId),

    #[error("Period {period} is already linked to match {linked_to}")]
    PeriodLinkedElsewhere { period: PeriodId, linked_to: MatchId },

    #[error("Period {0} is not linked to any match")]
    PeriodNotLinked(PeriodId),

    #[error("Match {id} has no period {number} (it has {count})")]
    NoSuchPeriod {
        id: MatchId,
        number: usize,
        count: usize,
    },

    #[error("Invalid replay URL '{url}': {reason}")]
    InvalidReplayUrl { url: String, reason: String },

    #[error("Team {team} is not in division {division}")]
    TeamNotInDivision { team: TeamId, division: DivisionId },

    #[error("A team cannot play against itself: {0}")]
    SameTeam(TeamId),

    #[error("Nickname cannot be empty")]
    EmptyNick,

    #[error("Nickname '{nick}' is already used by player {player}")]
    NickTaken { nick: String, player: PlayerId },

    #[error("Player name cannot be empty")]
    EmptyPlayerName,
}

/// Complete league state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct League {
    pub divisions: Vec<Division>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,

    /// Periods not attached to any match
    pub period_pool: Vec<Period>,
}

impl League {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn division(&self, id: DivisionId) -> Result<&Division, LeagueError> {
        self.divisions
            .iter()
            .find(|d| d.id == id)
            .ok_or(LeagueError::DivisionNotFound(id))
    }

    /// Case-insensitive lookup by division name.
    pub fn division_by_name(&self, name: &str) -> Option<&Division> {
        self.divisions
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, LeagueError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or(LeagueError::TeamNotFound(id))
    }

    /// Case-insensitive lookup by team name or initials.
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        let name = name.trim();
        self.teams
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .or_else(|| {
                self.teams
                    .iter()
                    .find(|t| t.initials.eq_ignore_ascii_case(name))
            })
    }

    /// Display name of a team, falling back to its id.
    pub fn team_name(&self, id: TeamId) -> String {
        self.team(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, LeagueError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(LeagueError::PlayerNotFound(id))
    }

    /// Case-insensitive lookup by player name.
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn get_match(&self, id: MatchId) -> Result<&Match, LeagueError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(LeagueError::MatchNotFound(id))
    }

    pub(crate) fn match_index(&self, id: MatchId) -> Result<usize, LeagueError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(LeagueError::MatchNotFound(id))
    }

    pub(crate) fn player_index(&self, id: PlayerId) -> Result<usize, LeagueError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(LeagueError::PlayerNotFound(id))
    }

    /// Where a period currently lives: `Some(match)` when attached, `None` when pooled.
    pub fn period_owner(&self, id: PeriodId) -> Result<Option<MatchId>, LeagueError> {
        if let Some(m) = self
            .matches
            .iter()
            .find(|m| m.periods.iter().any(|p| p.id == id))
        {
            return Ok(Some(m.id));
        }
        if self.period_pool.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        Err(LeagueError::PeriodNotFound(id))
    }

    /// Teams of a division, in the division's order.
    pub fn division_teams(&self, division: DivisionId) -> Result<Vec<&Team>, LeagueError> {
        let division = self.division(division)?;
        Ok(division
            .teams
            .iter()
            .filter_map(|id| self.teams.iter().find(|t| t.id == *id))
            .collect())
    }

    /// Roster of a team: current players first, then former ones, each by player id.
    pub fn roster(&self, team: TeamId) -> Vec<RosterEntry> {
        let mut active: Vec<RosterEntry> = Vec::new();
        let mut former: Vec<RosterEntry> = Vec::new();

        for player in &self.players {
            if player.is_active_for(team) {
                active.push(RosterEntry {
                    player: player.id,
                    active: true,
                });
            } else if player.played_for(team) {
                former.push(RosterEntry {
                    player: player.id,
                    active: false,
                });
            }
        }

        active.sort_by_key(|e| e.player);
        former.sort_by_key(|e| e.player);
        active.extend(former);
        active
    }

    /// Next free player id.
    pub fn next_player_id(&self) -> PlayerId {
        self.players
            .iter()
            .map(|p| p.id)
            .max()
            .map(|id| id.next())
            .unwrap_or(PlayerId::new(1))
    }

    /// All periods, attached or pooled, with their owning match.
    pub fn all_periods(&self) -> impl Iterator<Item = (&Period, Option<MatchId>)> {
        self.matches
            .iter()
            .flat_map(|m| m.periods.iter().map(move |p| (p, Some(m.id))))
            .chain(self.period_pool.iter().map(|p| (p, None)))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::{GamePosition, PlayerSide, PlayerStats, StatLine};

    fn stat(raw: &str, side: PlayerSide, position: GamePosition, goals: u32) -> PlayerStats {
        PlayerStats::new(raw, side).with_line(StatLine {
            goals,
            gametime: 300.0,
            position,
            ..StatLine::default()
        })
    }

    /// Two divisions, four teams, a handful of players and matches.
    ///
    /// Match 1 (MD 1, Lions vs Tigers) is played over periods 1 and 2, match 2 (MD 2,
    /// Lions vs Bears) is unplayed, periods 3 and 4 sit in the pool.
    pub fn sample_league() -> League {
        let divisions = vec![
            Division::new(1.into(), "Division 1", "S10")
                .with_teams(vec![1.into(), 2.into(), 3.into()]),
            Division::new(2.into(), "Division 2", "S10").with_teams(vec![4.into()]),
        ];
        let teams = vec![
            Team::new(1.into(), "Lions", "LIO").with_divisions(vec![1.into()]),
            Team::new(2.into(), "Tigers", "TIG").with_divisions(vec![1.into()]),
            Team::new(3.into(), "Bears", "BEA").with_divisions(vec![1.into()]),
            Team::new(4.into(), "Wolves", "WOL").with_divisions(vec![2.into()]),
        ];
        let players = vec![
            Player::new(1.into(), "Alice")
                .with_nicks(["alice", "ali"])
                .with_team(1.into()),
            Player::new(2.into(), "Bob").with_nicks(["bob"]).with_team(2.into()),
            Player::new(3.into(), "Carol")
                .with_nicks(["carol"])
                .with_team(1.into()),
            Player::new(4.into(), "Dave").with_nicks(["dave"]).with_team(4.into()),
        ];

        let periods = vec![
            Period::new(1.into(), 2, 0).with_player_stats(vec![
                stat("alice", PlayerSide::First, GamePosition::ST, 2),
                stat("carol", PlayerSide::First, GamePosition::GK, 0),
                stat("bob", PlayerSide::Second, GamePosition::GK, 0),
            ]),
            Period::new(2.into(), 1, 1).with_player_stats(vec![
                stat("bob", PlayerSide::First, GamePosition::GK, 1),
                stat("Alice", PlayerSide::Second, GamePosition::ST, 1),
                stat("carol", PlayerSide::Second, GamePosition::GK, 0),
                stat("ghost", PlayerSide::First, GamePosition::ST, 0),
            ]),
        ];

        let matches = vec![
            Match::new(1.into(), 1.into(), "1")
                .with_teams(1.into(), 2.into())
                .with_periods(periods),
            Match::new(2.into(), 1.into(), "2").with_teams(1.into(), 3.into()),
        ];

        League {
            divisions,
            teams,
            players,
            matches,
            period_pool: vec![Period::new(3.into(), 0, 0), Period::new(4.into(), 1, 2)],
        }
    }
}
