//! Read-only league queries: match listings, match reports, standings and statistics.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::calculate::{
    aggregate_stat_sheets, build_stat_sheets_with, compute_standings, default_stats_range,
    filter_matches, period_view, resolve_match_score, share, team_sheets, MatchFilter, MatchdayOrder,
    MatchdayRange, MatchdaySelection, NicknameResolver,
};
use crate::config::GameRules;
use crate::models::{
    DivisionId, GamePosition, Match, MatchId, MatchResult, PlayerId, Slot, StandingRow,
    StatSheet, TeamId,
};

use super::{League, LeagueError};

/// One line of a match listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub id: MatchId,
    pub division: DivisionId,
    pub matchday: String,
    pub game_number: u32,
    pub date: Option<NaiveDateTime>,
    pub title: String,
    pub team1: Option<String>,
    pub team2: Option<String>,
    /// `"a-b"`, or empty when there is no displayable score
    pub score: String,
}

/// Aggregated sheets of one side of a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSheets {
    pub team: TeamId,
    pub team_name: String,
    pub sheets: Vec<StatSheet>,
}

/// Full detail of one match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub id: MatchId,
    pub division: DivisionId,
    pub matchday: String,
    pub title: String,
    pub date: Option<NaiveDateTime>,
    pub replay_url: Option<String>,
    /// Period (1-based) the report is limited to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<usize>,
    pub result: MatchResult,
    /// Possession shares (team1, team2), when the match has a score
    pub possession: Option<(f64, f64)>,
    /// Action-zone shares (team1, team2), when the match has a score
    pub action_zone: Option<(f64, f64)>,
    pub teams: Vec<TeamSheets>,
}

/// Selection for league statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub division: DivisionId,
    pub team: Option<TeamId>,

    /// Matchday range; `None` uses the default statistics range of the division
    pub range: Option<MatchdayRange>,

    pub position: Option<GamePosition>,

    /// Keep only players with at least one full game of playing time
    pub full_games_only: bool,
}

impl StatsQuery {
    pub fn division(division: DivisionId) -> Self {
        Self {
            division,
            team: None,
            range: None,
            position: None,
            full_games_only: false,
        }
    }
}

impl League {
    /// Matchday order of a division.
    pub fn matchday_order(&self, division: DivisionId) -> MatchdayOrder {
        MatchdayOrder::for_division(&self.matches, division)
    }

    /// Stored title of a match, or one derived from its teams.
    pub fn match_title(&self, m: &Match) -> String {
        if !m.title.trim().is_empty() {
            return m.title.clone();
        }
        let first = m.team_in(Slot::First).map(|t| self.team_name(t));
        let second = m.team_in(Slot::Second).map(|t| self.team_name(t));
        Match::derive_title(&m.matchday, m.game_number, first.as_deref(), second.as_deref())
    }

    /// Listing of the matches selected by a filter, by match id.
    pub fn match_rows(&self, filter: &MatchFilter, rules: &GameRules) -> Vec<MatchRow> {
        let mut selected = filter_matches(&self.matches, filter);
        selected.sort_by_key(|m| m.id);

        selected
            .into_iter()
            .map(|m| MatchRow {
                id: m.id,
                division: m.division,
                matchday: m.matchday.clone(),
                game_number: m.game_number,
                date: m.date,
                title: self.match_title(m),
                team1: m.team_in(Slot::First).map(|t| self.team_name(t)),
                team2: m.team_in(Slot::Second).map(|t| self.team_name(t)),
                score: resolve_match_score(m, rules).display_score(),
            })
            .collect()
    }

    /// Score and per-team sheets of one match, or of one of its periods (1-based).
    pub fn match_report(
        &self,
        id: MatchId,
        period: Option<usize>,
        rules: &GameRules,
    ) -> Result<MatchReport, LeagueError> {
        let stored = self.get_match(id)?;
        let view;
        let m = match period {
            Some(number) => {
                view = period_view(stored, number).ok_or(LeagueError::NoSuchPeriod {
                    id,
                    number,
                    count: stored.periods.len(),
                })?;
                &view
            }
            None => stored,
        };
        let result = resolve_match_score(m, rules);

        let (possession, action_zone) = match result.as_scored() {
            Some(scored) => (
                Some(share(scored.possession.0, scored.possession.1)),
                Some(share(scored.action_zone.0, scored.action_zone.1)),
            ),
            None => (None, None),
        };

        let resolver = NicknameResolver::new(&self.players);
        let entries = build_stat_sheets_with(&resolver, m, rules);
        let teams = [Slot::First, Slot::Second]
            .iter()
            .filter_map(|slot| m.team_in(*slot))
            .map(|team| TeamSheets {
                team,
                team_name: self.team_name(team),
                sheets: team_sheets(&entries, team, rules),
            })
            .collect();

        Ok(MatchReport {
            id: m.id,
            division: m.division,
            matchday: m.matchday.clone(),
            title: self.match_title(m),
            date: m.date,
            replay_url: m.replay_url.clone(),
            period,
            result,
            possession,
            action_zone,
            teams,
        })
    }

    /// Standings of a division over an optional matchday range.
    pub fn standings(
        &self,
        division: DivisionId,
        range: Option<&MatchdayRange>,
        rules: &GameRules,
    ) -> Result<Vec<StandingRow>, LeagueError> {
        let division = self.division(division)?;
        Ok(compute_standings(
            &self.matches,
            division,
            &self.teams,
            range,
            rules,
        ))
    }

    /// Aggregated statistics of the players currently active on the selected teams.
    pub fn statistics(
        &self,
        query: &StatsQuery,
        rules: &GameRules,
    ) -> Result<Vec<StatSheet>, LeagueError> {
        let division = self.division(query.division)?;
        if let Some(team) = query.team {
            self.team(team)?;
        }

        let range = match query.range {
            Some(range) => range,
            None => match default_stats_range(&self.matches, division.id) {
                Some(range) => range,
                None => return Ok(Vec::new()),
            },
        };

        let filter = MatchFilter::division(division.id)
            .with_team(query.team)
            .with_matchdays(MatchdaySelection::Range(range));
        let matches = filter_matches(&self.matches, &filter);

        let resolver = NicknameResolver::new(&self.players);
        let entries: Vec<_> = matches
            .iter()
            .flat_map(|m| build_stat_sheets_with(&resolver, m, rules))
            .collect();

        let eligible: HashSet<PlayerId> = division
            .teams
            .iter()
            .filter(|team| query.team.map_or(true, |selected| selected == **team))
            .flat_map(|team| {
                self.players
                    .iter()
                    .filter(move |p| p.is_active_for(*team))
                    .map(|p| p.id)
            })
            .collect();

        let full_game_secs = rules.full_game_secs();
        let sheets: Vec<StatSheet> = aggregate_stat_sheets(&entries, rules)
            .into_iter()
            .filter(|s| s.player.map_or(false, |id| eligible.contains(&id)))
            .filter(|s| query.position.map_or(true, |pos| s.stats.position == pos))
            .filter(|s| !query.full_games_only || s.stats.gametime >= full_game_secs)
            .collect();

        debug!(
            "Statistics for division {}: {} match(es), {} player(s)",
            division.id,
            matches.len(),
            sheets.len()
        );
        Ok(sheets)
    }
}
