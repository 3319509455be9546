//! Derived statistics models: resolved match results, stat sheets, standings.

use serde::{Deserialize, Serialize};

use super::{PlayerId, StatLine, TeamId};

/// Legacy score pair for a match that has not been played.
pub const UNPLAYED_SENTINEL: (i32, i32) = (-1, -1);

/// Legacy score pair for a cancelled match.
pub const VOID_SENTINEL: (i32, i32) = (-5, -5);

/// Score and shared metrics of a match, ordered (team1, team2).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: (i32, i32),
    pub possession: (f64, f64),
    pub action_zone: (f64, f64),
}

impl MatchScore {
    /// Score without possession or action zone data.
    pub fn from_score(first: i32, second: i32) -> Self {
        Self {
            score: (first, second),
            ..Default::default()
        }
    }
}

/// Outcome of resolving a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MatchResult {
    /// Nothing attached yet
    Unplayed,
    /// Cancelled; not a real result
    Void,
    Scored(MatchScore),
}

impl MatchResult {
    /// The displayable score, if there is one.
    pub fn score(&self) -> Option<(i32, i32)> {
        match self {
            MatchResult::Scored(s) => Some(s.score),
            MatchResult::Unplayed | MatchResult::Void => None,
        }
    }

    pub fn as_scored(&self) -> Option<&MatchScore> {
        match self {
            MatchResult::Scored(s) => Some(s),
            MatchResult::Unplayed | MatchResult::Void => None,
        }
    }

    /// Score pair with negative sentinels, as exported to spreadsheets.
    pub fn sentinel_score(&self) -> (i32, i32) {
        match self {
            MatchResult::Unplayed => UNPLAYED_SENTINEL,
            MatchResult::Void => VOID_SENTINEL,
            MatchResult::Scored(s) => s.score,
        }
    }

    /// Score formatted as `"a-b"`, empty when not displayable.
    pub fn display_score(&self) -> String {
        match self.score() {
            Some((a, b)) => format!("{}-{}", a, b),
            None => String::new(),
        }
    }
}

/// Statistics of one player in one period, resolved to a league player and team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSheetEntry {
    /// Resolved league player; `None` for unknown in-game names
    pub player: Option<PlayerId>,

    /// Canonical name, or `"<raw> (unknown)"`
    pub player_name: String,

    pub team: TeamId,

    /// Whether the player was on the red side in this period
    pub is_red: bool,

    pub stats: StatLine,

    /// 1 when this period counts as a clean sheet for the player
    pub clean_sheet: u32,
}

/// Statistics of one player merged over a set of periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSheet {
    pub player: Option<PlayerId>,

    pub player_name: String,

    pub team: TeamId,

    pub stats: StatLine,

    pub clean_sheets: u32,

    /// Number of period entries merged into this sheet
    pub periods: u32,
}

impl StatSheet {
    /// Successful passes over attempted passes (0.0 when nothing was attempted).
    pub fn pass_success(&self) -> f64 {
        crate::calculate::pass_success(self.stats.passes_successful, self.stats.passes_attempted)
    }

    /// Counters scaled to one full game of `full_game_secs` seconds.
    pub fn per_full_game(&self, full_game_secs: f64) -> StatRates {
        let factor = if self.stats.gametime > 0.0 {
            full_game_secs / self.stats.gametime
        } else {
            0.0
        };
        let rate = |v: u32| v as f64 * factor;

        StatRates {
            goals: rate(self.stats.goals),
            assists: rate(self.stats.assists),
            secondary_assists: rate(self.stats.secondary_assists),
            tertiary_assists: rate(self.stats.tertiary_assists),
            clean_sheets: rate(self.clean_sheets),
            saves: rate(self.stats.saves),
            own_goals: rate(self.stats.own_goals),
            passes_attempted: rate(self.stats.passes_attempted),
            shots: rate(self.stats.shots),
            shots_target: rate(self.stats.shots_target),
            touches: rate(self.stats.touches),
            kicks: rate(self.stats.kicks),
            rebound_dribbles: rate(self.stats.rebound_dribbles),
            duels: rate(self.stats.duels),
            interceptions: rate(self.stats.interceptions),
            clears: rate(self.stats.clears),
        }
    }
}

/// Per-full-game rates of the counting statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatRates {
    pub goals: f64,
    pub assists: f64,
    pub secondary_assists: f64,
    pub tertiary_assists: f64,
    pub clean_sheets: f64,
    pub saves: f64,
    pub own_goals: f64,
    pub passes_attempted: f64,
    pub shots: f64,
    pub shots_target: f64,
    pub touches: f64,
    pub kicks: f64,
    pub rebound_dribbles: f64,
    pub duels: f64,
    pub interceptions: f64,
    pub clears: f64,
}

/// One line of a division standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team: TeamId,
    pub team_name: String,
    pub games: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,

    /// Games won by default (informational)
    pub defwins: u32,

    pub goals_scored: i32,
    pub goals_conceded: i32,
    pub points: u32,
    pub differential: i32,
}

impl StandingRow {
    /// Create an empty row for a team.
    pub fn new(team: TeamId, team_name: impl Into<String>) -> Self {
        Self {
            team,
            team_name: team_name.into(),
            games: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            defwins: 0,
            goals_scored: 0,
            goals_conceded: 0,
            points: 0,
            differential: 0,
        }
    }

    /// Record one game from this team's point of view.
    pub fn record(&mut self, own: i32, opponent: i32, won_by_default: bool) {
        self.games += 1;
        if own > opponent {
            self.wins += 1;
        } else if own == opponent {
            self.draws += 1;
        } else {
            self.losses += 1;
        }
        if won_by_default {
            self.defwins += 1;
        }
        self.goals_scored += own;
        self.goals_conceded += opponent;
        self.points = 3 * self.wins + self.draws;
        self.differential = self.goals_scored - self.goals_conceded;
    }

    /// Sort key: higher is better.
    pub fn rank_key(&self) -> (u32, i32, i32) {
        (self.points, self.differential, self.goals_scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_score() {
        let scored = MatchResult::Scored(MatchScore::from_score(3, 2));

        assert_eq!(scored.score(), Some((3, 2)));
        assert_eq!(MatchResult::Unplayed.score(), None);
        assert_eq!(MatchResult::Void.score(), None);
    }

    #[test]
    fn test_match_result_sentinels() {
        assert_eq!(MatchResult::Unplayed.sentinel_score(), (-1, -1));
        assert_eq!(MatchResult::Void.sentinel_score(), (-5, -5));
    }

    #[test]
    fn test_match_result_display_score() {
        assert_eq!(
            MatchResult::Scored(MatchScore::from_score(0, 5)).display_score(),
            "0-5"
        );
        assert_eq!(MatchResult::Unplayed.display_score(), "");
    }

    #[test]
    fn test_match_result_serialization() {
        let json = serde_json::to_value(MatchResult::Unplayed).unwrap();
        assert_eq!(json["status"], "unplayed");

        let json = serde_json::to_value(MatchResult::Scored(MatchScore::from_score(2, 1))).unwrap();
        assert_eq!(json["status"], "scored");
        assert_eq!(json["score"][0], 2);
    }

    #[test]
    fn test_standing_row_record() {
        let mut row = StandingRow::new(1.into(), "X");
        row.record(5, 2, false);
        row.record(3, 3, false);

        assert_eq!(row.games, 2);
        assert_eq!(row.wins, 1);
        assert_eq!(row.draws, 1);
        assert_eq!(row.losses, 0);
        assert_eq!(row.points, 4);
        assert_eq!(row.goals_scored, 8);
        assert_eq!(row.goals_conceded, 5);
        assert_eq!(row.differential, 3);
    }

    #[test]
    fn test_per_full_game_rates() {
        let sheet = StatSheet {
            player: None,
            player_name: "A".to_string(),
            team: 1.into(),
            stats: StatLine {
                goals: 2,
                gametime: 300.0,
                ..Default::default()
            },
            clean_sheets: 1,
            periods: 1,
        };

        let rates = sheet.per_full_game(600.0);
        assert!((rates.goals - 4.0).abs() < 1e-9);
        assert!((rates.clean_sheets - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_full_game_zero_time() {
        let sheet = StatSheet {
            player: None,
            player_name: "A".to_string(),
            team: 1.into(),
            stats: StatLine {
                goals: 2,
                ..Default::default()
            },
            clean_sheets: 0,
            periods: 1,
        };

        assert_eq!(sheet.per_full_game(600.0).goals, 0.0);
    }
}
