//! Admin edits and integrity checks.
//!
//! Every edit checks all of its inputs first and only then mutates, so a rejected edit
//! leaves the league exactly as it was.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::calculate::{nick_conflicts, NickConflict};
use crate::config::GameRules;
use crate::models::{
    DefWin, DivisionId, Match, MatchDetail, MatchId, PeriodId, Player, PlayerId, TeamId,
};

use super::{League, LeagueError};

/// New result data for a match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultEdit {
    /// Whether the team in slot 1 played red in the first period
    pub first_team_starts_red: bool,
    pub defwin: DefWin,
    pub add_red: i32,
    pub add_blue: i32,
    /// Periods to attach; they are played in id order
    pub period_ids: Vec<PeriodId>,
    /// Replay link; empty clears it
    pub replay_url: Option<String>,
}

/// One integrity problem found in a league snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    NickConflict(NickConflict),
    UnknownTeamInDivision { division: DivisionId, team: TeamId },
    DivisionNotListedOnTeam { division: DivisionId, team: TeamId },
    TeamNotListedOnDivision { team: TeamId, division: DivisionId },
    TeamWithoutDivision { team: TeamId },
    MatchMissingTeams { id: MatchId },
    MatchTeamOutsideDivision { id: MatchId, team: TeamId },
    PlayerUnknownTeam { player: PlayerId, team: TeamId },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NickConflict(c) => {
                let ids: Vec<String> = c.players.iter().map(|p| p.to_string()).collect();
                write!(f, "nickname '{}' shared by players {}", c.nick, ids.join(", "))
            }
            ValidationIssue::UnknownTeamInDivision { division, team } => {
                write!(f, "division {} lists unknown team {}", division, team)
            }
            ValidationIssue::DivisionNotListedOnTeam { division, team } => write!(
                f,
                "division {} lists team {}, but the team does not list the division",
                division, team
            ),
            ValidationIssue::TeamNotListedOnDivision { team, division } => write!(
                f,
                "team {} lists division {}, but the division does not list the team",
                team, division
            ),
            ValidationIssue::TeamWithoutDivision { team } => {
                write!(f, "team {} is not in any division", team)
            }
            ValidationIssue::MatchMissingTeams { id } => {
                write!(f, "match {} does not have two teams", id)
            }
            ValidationIssue::MatchTeamOutsideDivision { id, team } => {
                write!(f, "match {} has team {} from outside its division", id, team)
            }
            ValidationIssue::PlayerUnknownTeam { player, team } => {
                write!(f, "player {} belongs to unknown team {}", player, team)
            }
        }
    }
}

/// Result of [`League::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl League {
    /// Replace the result data of a match.
    ///
    /// The match's current periods go back to the pool, then the requested ones are
    /// attached in id order, the same order a reload restores. A requested period may
    /// already belong to this match.
    pub fn edit_result(
        &mut self,
        id: MatchId,
        edit: ResultEdit,
        rules: &GameRules,
    ) -> Result<(), LeagueError> {
        let index = self.match_index(id)?;
        if self.matches[index].pairing().is_none() {
            return Err(LeagueError::MissingTeams(id));
        }

        if edit.period_ids.len() > rules.max_periods {
            return Err(LeagueError::TooManyPeriods {
                count: edit.period_ids.len(),
                max: rules.max_periods,
            });
        }

        let mut seen = HashSet::new();
        for period in &edit.period_ids {
            if !seen.insert(*period) {
                return Err(LeagueError::DuplicatePeriod(*period));
            }
            match self.period_owner(*period)? {
                Some(owner) if owner != id => {
                    return Err(LeagueError::PeriodLinkedElsewhere {
                        period: *period,
                        linked_to: owner,
                    });
                }
                _ => {}
            }
        }

        let replay_url = parse_replay_url(edit.replay_url.as_deref())?;

        let current = std::mem::take(&mut self.matches[index].periods);
        self.period_pool.extend(current);

        let mut attached = Vec::with_capacity(edit.period_ids.len());
        for period in &edit.period_ids {
            if let Some(pos) = self.period_pool.iter().position(|p| p.id == *period) {
                attached.push(self.period_pool.remove(pos));
            }
        }
        attached.sort_by_key(|p| p.id);
        self.period_pool.sort_by_key(|p| p.id);

        let m = &mut self.matches[index];
        for (slot, detail) in m.details.iter_mut().take(2).enumerate() {
            detail.starts_red = (slot == 0) == edit.first_team_starts_red;
        }
        m.defwin = edit.defwin;
        m.add_red = edit.add_red;
        m.add_blue = edit.add_blue;
        m.periods = attached;
        m.replay_url = replay_url;

        info!(
            "Updated result of match {}: {} period(s), defwin {:?}, adjustments {}/{}",
            id,
            m.periods.len(),
            m.defwin,
            m.add_red,
            m.add_blue
        );
        Ok(())
    }

    /// Move a period from its match back to the pool.
    pub fn detach_period(&mut self, period: PeriodId) -> Result<MatchId, LeagueError> {
        let owner = self
            .period_owner(period)?
            .ok_or(LeagueError::PeriodNotLinked(period))?;
        let index = self.match_index(owner)?;

        let periods = &mut self.matches[index].periods;
        if let Some(pos) = periods.iter().position(|p| p.id == period) {
            let detached = periods.remove(pos);
            self.period_pool.push(detached);
            self.period_pool.sort_by_key(|p| p.id);
        }

        info!("Detached period {} from match {}", period, owner);
        Ok(owner)
    }

    /// Set both teams of a match. `first` is home and starts red; the title is rebuilt.
    pub fn set_match_teams(
        &mut self,
        id: MatchId,
        first: TeamId,
        second: TeamId,
    ) -> Result<(), LeagueError> {
        let index = self.match_index(id)?;
        if first == second {
            return Err(LeagueError::SameTeam(first));
        }

        let division_id = self.matches[index].division;
        let division = self.division(division_id)?;
        for team in [first, second] {
            self.team(team)?;
            if !division.has_team(team) {
                return Err(LeagueError::TeamNotInDivision {
                    team,
                    division: division_id,
                });
            }
        }

        let first_name = self.team_name(first);
        let second_name = self.team_name(second);

        let m = &mut self.matches[index];
        m.details = vec![
            MatchDetail::new(first, true, true),
            MatchDetail::new(second, false, false),
        ];
        m.title = Match::derive_title(
            &m.matchday,
            m.game_number,
            Some(&first_name),
            Some(&second_name),
        );

        info!("Match {} is now '{}'", id, m.title);
        Ok(())
    }

    /// Add a nickname to a player. Nicknames are unique across the league, ignoring case.
    pub fn add_nick(&mut self, player: PlayerId, nick: &str) -> Result<(), LeagueError> {
        let index = self.player_index(player)?;
        let nick = nick.trim();
        if nick.is_empty() {
            return Err(LeagueError::EmptyNick);
        }
        if let Some(owner) = self.players.iter().find(|p| p.has_nick(nick)) {
            return Err(LeagueError::NickTaken {
                nick: nick.to_string(),
                player: owner.id,
            });
        }

        self.players[index].nicks.push(nick.to_string());
        info!("Added nickname '{}' to player {}", nick, player);
        Ok(())
    }

    /// Move a player to another team, or to no team.
    pub fn change_team(&mut self, player: PlayerId, team: Option<TeamId>) -> Result<(), LeagueError> {
        let index = self.player_index(player)?;
        if let Some(team) = team {
            self.team(team)?;
        }

        self.players[index].transfer_to(team);
        match team {
            Some(team) => info!("Player {} now plays for team {}", player, team),
            None => info!("Player {} no longer has a team", player),
        }
        Ok(())
    }

    /// Register a new player with the next free id.
    pub fn register_player(
        &mut self,
        name: &str,
        nicks: &[String],
        team: Option<TeamId>,
    ) -> Result<PlayerId, LeagueError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::EmptyPlayerName);
        }
        if let Some(team) = team {
            self.team(team)?;
        }

        let mut cleaned: Vec<String> = Vec::new();
        for nick in nicks {
            let nick = nick.trim();
            if nick.is_empty() {
                return Err(LeagueError::EmptyNick);
            }
            let lower = nick.to_lowercase();
            if cleaned.iter().any(|n| n.to_lowercase() == lower) {
                continue;
            }
            if let Some(owner) = self.players.iter().find(|p| p.has_nick(nick)) {
                return Err(LeagueError::NickTaken {
                    nick: nick.to_string(),
                    player: owner.id,
                });
            }
            cleaned.push(nick.to_string());
        }

        let id = self.next_player_id();
        let mut player = Player::new(id, name).with_nicks(cleaned);
        player.current_team = team;
        self.players.push(player);

        info!("Registered player {} ({})", name, id);
        Ok(id)
    }

    /// Check the snapshot for integrity problems.
    pub fn validate(&self) -> ValidationReport {
        let mut issues: Vec<ValidationIssue> = nick_conflicts(&self.players)
            .into_iter()
            .map(ValidationIssue::NickConflict)
            .collect();

        for division in &self.divisions {
            for team_id in &division.teams {
                match self.team(*team_id) {
                    Ok(team) if !team.in_division(division.id) => {
                        issues.push(ValidationIssue::DivisionNotListedOnTeam {
                            division: division.id,
                            team: *team_id,
                        });
                    }
                    Ok(_) => {}
                    Err(_) => issues.push(ValidationIssue::UnknownTeamInDivision {
                        division: division.id,
                        team: *team_id,
                    }),
                }
            }
        }

        for team in &self.teams {
            if team.divisions.is_empty() {
                issues.push(ValidationIssue::TeamWithoutDivision { team: team.id });
            }
            for division_id in &team.divisions {
                let listed = self
                    .division(*division_id)
                    .map_or(false, |d| d.has_team(team.id));
                if !listed {
                    issues.push(ValidationIssue::TeamNotListedOnDivision {
                        team: team.id,
                        division: *division_id,
                    });
                }
            }
        }

        for m in &self.matches {
            if m.pairing().is_none() {
                issues.push(ValidationIssue::MatchMissingTeams { id: m.id });
            }
            if let Ok(division) = self.division(m.division) {
                for detail in m.details.iter().take(2) {
                    if !division.has_team(detail.team) {
                        issues.push(ValidationIssue::MatchTeamOutsideDivision {
                            id: m.id,
                            team: detail.team,
                        });
                    }
                }
            }
        }

        for player in &self.players {
            for team in player.current_team.iter().chain(player.former_teams.iter()) {
                if self.team(*team).is_err() {
                    issues.push(ValidationIssue::PlayerUnknownTeam {
                        player: player.id,
                        team: *team,
                    });
                }
            }
        }

        for issue in &issues {
            warn!("Integrity issue: {}", issue);
        }
        ValidationReport { issues }
    }
}

fn parse_replay_url(raw: Option<&str>) -> Result<Option<String>, LeagueError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    Url::parse(raw)
        .map(|url| Some(url.to_string()))
        .map_err(|e| LeagueError::InvalidReplayUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
}
