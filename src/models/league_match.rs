//! League match model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{DivisionId, MatchId, Period, TeamId};

/// Label used in titles when a slot has no team yet.
pub const MISSING_TEAM_LABEL: &str = "TBD";

/// Position of a team in a match's detail ordering. `First` is the home team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn other(&self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Default-win flag of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DefWin {
    #[default]
    None,
    /// The team in slot 1 wins by default
    First,
    /// The team in slot 2 wins by default
    Second,
    /// Cancelled; no real result
    Void,
}

impl DefWin {
    /// The slot that gets the default win, if any.
    pub fn beneficiary(&self) -> Option<Slot> {
        match self {
            DefWin::First => Some(Slot::First),
            DefWin::Second => Some(Slot::Second),
            DefWin::None | DefWin::Void => None,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, DefWin::None)
    }
}

impl TryFrom<u8> for DefWin {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DefWin::None),
            1 => Ok(DefWin::First),
            2 => Ok(DefWin::Second),
            3 => Ok(DefWin::Void),
            other => Err(format!("invalid defwin value: {}", other)),
        }
    }
}

impl From<DefWin> for u8 {
    fn from(defwin: DefWin) -> Self {
        match defwin {
            DefWin::None => 0,
            DefWin::First => 1,
            DefWin::Second => 2,
            DefWin::Void => 3,
        }
    }
}

/// Participation of one team in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub team: TeamId,

    #[serde(default)]
    pub home: bool,

    /// Whether this team played the red side in the first period
    #[serde(default)]
    pub starts_red: bool,
}

impl MatchDetail {
    pub fn new(team: TeamId, home: bool, starts_red: bool) -> Self {
        Self {
            team,
            home,
            starts_red,
        }
    }
}

/// A scheduled league match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Unique identifier
    pub id: MatchId,

    /// Division the match is played in
    pub division: DivisionId,

    /// Matchday label: numeric ("3") or textual ("Playoffs")
    pub matchday: String,

    /// Disambiguates repeated games on the same matchday
    #[serde(default = "default_game_number")]
    pub game_number: u32,

    /// Scheduled date and time
    #[serde(default)]
    pub date: Option<NaiveDateTime>,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Participating teams, home first
    #[serde(default)]
    pub details: Vec<MatchDetail>,

    /// Attached periods in chronological order. Stored separately.
    #[serde(skip)]
    pub periods: Vec<Period>,

    #[serde(default)]
    pub defwin: DefWin,

    /// Manual score adjustment for the team that started red
    #[serde(default)]
    pub add_red: i32,

    /// Manual score adjustment for the team that started blue
    #[serde(default)]
    pub add_blue: i32,

    #[serde(default)]
    pub replay_url: Option<String>,
}

fn default_game_number() -> u32 {
    1
}

impl Match {
    /// Create a new Match without teams or periods.
    pub fn new(id: MatchId, division: DivisionId, matchday: impl Into<String>) -> Self {
        Self {
            id,
            division,
            matchday: matchday.into(),
            game_number: 1,
            date: None,
            title: String::new(),
            details: Vec::new(),
            periods: Vec::new(),
            defwin: DefWin::None,
            add_red: 0,
            add_blue: 0,
            replay_url: None,
        }
    }

    /// Builder method to set both teams. `first` is home and starts red.
    pub fn with_teams(mut self, first: TeamId, second: TeamId) -> Self {
        self.details = vec![
            MatchDetail::new(first, true, true),
            MatchDetail::new(second, false, false),
        ];
        self
    }

    /// Builder method to set the game number.
    pub fn with_game_number(mut self, game_number: u32) -> Self {
        self.game_number = game_number;
        self
    }

    /// Builder method to set the periods.
    pub fn with_periods(mut self, periods: Vec<Period>) -> Self {
        self.periods = periods;
        self
    }

    /// Builder method to set the default-win flag.
    pub fn with_defwin(mut self, defwin: DefWin) -> Self {
        self.defwin = defwin;
        self
    }

    /// Builder method to set the manual score adjustments.
    pub fn with_adjustments(mut self, add_red: i32, add_blue: i32) -> Self {
        self.add_red = add_red;
        self.add_blue = add_blue;
        self
    }

    /// Both match details, when the two teams are known.
    pub fn pairing(&self) -> Option<(&MatchDetail, &MatchDetail)> {
        match self.details.as_slice() {
            [first, second, ..] => Some((first, second)),
            _ => None,
        }
    }

    /// Detail record in a slot.
    pub fn detail(&self, slot: Slot) -> Option<&MatchDetail> {
        self.details.get(slot.index())
    }

    /// Team in a slot.
    pub fn team_in(&self, slot: Slot) -> Option<TeamId> {
        self.detail(slot).map(|d| d.team)
    }

    /// Slot a team plays in, if it takes part in this match.
    pub fn slot_of(&self, team: TeamId) -> Option<Slot> {
        self.details
            .iter()
            .take(2)
            .position(|d| d.team == team)
            .map(|i| if i == 0 { Slot::First } else { Slot::Second })
    }

    /// Whether a team takes part in this match.
    pub fn involves(&self, team: TeamId) -> bool {
        self.slot_of(team).is_some()
    }

    /// Build a match title from its matchday, game number and team names.
    pub fn derive_title(
        matchday: &str,
        game_number: u32,
        first: Option<&str>,
        second: Option<&str>,
    ) -> String {
        let t1 = first.unwrap_or(MISSING_TEAM_LABEL);
        let t2 = second.unwrap_or(MISSING_TEAM_LABEL);
        let is_numeric = !matchday.is_empty() && matchday.chars().all(|c| c.is_ascii_digit());

        if is_numeric {
            format!("MD {} - {} vs {}", matchday, t1, t2)
        } else if game_number > 1 {
            format!("{} {} - {} vs {}", matchday, game_number, t1, t2)
        } else {
            format!("{} - {} vs {}", matchday, t1, t2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defwin_serialization() {
        assert_eq!(serde_json::to_string(&DefWin::Second).unwrap(), "2");
        assert_eq!(serde_json::from_str::<DefWin>("3").unwrap(), DefWin::Void);
        assert!(serde_json::from_str::<DefWin>("4").is_err());
    }

    #[test]
    fn test_defwin_beneficiary() {
        assert_eq!(DefWin::First.beneficiary(), Some(Slot::First));
        assert_eq!(DefWin::Second.beneficiary(), Some(Slot::Second));
        assert_eq!(DefWin::Void.beneficiary(), None);
        assert!(!DefWin::None.is_set());
        assert!(DefWin::Void.is_set());
    }

    #[test]
    fn test_slot_of() {
        let m = Match::new(1.into(), 1.into(), "1").with_teams(10.into(), 20.into());

        assert_eq!(m.slot_of(10.into()), Some(Slot::First));
        assert_eq!(m.slot_of(20.into()), Some(Slot::Second));
        assert_eq!(m.slot_of(30.into()), None);
        assert_eq!(m.team_in(Slot::Second), Some(20.into()));
    }

    #[test]
    fn test_pairing_requires_two_details() {
        let mut m = Match::new(1.into(), 1.into(), "1");
        assert!(m.pairing().is_none());

        m.details.push(MatchDetail::new(10.into(), true, true));
        assert!(m.pairing().is_none());

        m.details.push(MatchDetail::new(20.into(), false, false));
        assert!(m.pairing().is_some());
    }

    #[test]
    fn test_derive_title_numeric_matchday() {
        let title = Match::derive_title("3", 1, Some("Lions"), Some("Tigers"));
        assert_eq!(title, "MD 3 - Lions vs Tigers");
    }

    #[test]
    fn test_derive_title_textual_matchday() {
        assert_eq!(
            Match::derive_title("Playoffs", 1, Some("Lions"), Some("Tigers")),
            "Playoffs - Lions vs Tigers"
        );
        assert_eq!(
            Match::derive_title("Playoffs", 2, Some("Lions"), Some("Tigers")),
            "Playoffs 2 - Lions vs Tigers"
        );
    }

    #[test]
    fn test_derive_title_missing_team() {
        let title = Match::derive_title("1", 1, Some("Lions"), None);
        assert_eq!(title, "MD 1 - Lions vs TBD");
    }

    #[test]
    fn test_match_json_defaults() {
        let json = r#"{"id":4,"division":1,"matchday":"2"}"#;
        let m: Match = serde_json::from_str(json).unwrap();

        assert_eq!(m.game_number, 1);
        assert_eq!(m.defwin, DefWin::None);
        assert!(m.details.is_empty());
        assert!(m.periods.is_empty());
    }
}
