//! Raw per-period player statistics, as recorded by the game client.

use serde::{Deserialize, Serialize};

/// Position a player mostly occupied during a period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum GamePosition {
    #[default]
    Unknown,
    GK,
    DM,
    AM,
    ST,
}

impl GamePosition {
    /// All positions, in storage order.
    pub const ALL: [GamePosition; 5] = [
        GamePosition::Unknown,
        GamePosition::GK,
        GamePosition::DM,
        GamePosition::AM,
        GamePosition::ST,
    ];

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, GamePosition::GK)
    }

    /// Short label used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            GamePosition::Unknown => "unknown",
            GamePosition::GK => "GK",
            GamePosition::DM => "DM",
            GamePosition::AM => "AM",
            GamePosition::ST => "ST",
        }
    }

    /// Parse a label (case-insensitive) as printed by [`GamePosition::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl TryFrom<u8> for GamePosition {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("invalid game position: {}", value))
    }
}

impl From<GamePosition> for u8 {
    fn from(position: GamePosition) -> Self {
        match position {
            GamePosition::Unknown => 0,
            GamePosition::GK => 1,
            GamePosition::DM => 2,
            GamePosition::AM => 3,
            GamePosition::ST => 4,
        }
    }
}

impl std::fmt::Display for GamePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Physical side a character played on in one period, as the game client records it.
///
/// Side 1 is the red side of that period, side 2 the blue side. It says nothing about
/// which league team the character belongs to until it is mapped through the period's
/// side assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerSide {
    First,
    Second,
}

impl PlayerSide {
    pub fn is_red(&self) -> bool {
        matches!(self, PlayerSide::First)
    }
}

impl TryFrom<u8> for PlayerSide {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerSide::First),
            2 => Ok(PlayerSide::Second),
            other => Err(format!("invalid player side: {} (expected 1 or 2)", other)),
        }
    }
}

impl From<PlayerSide> for u8 {
    fn from(side: PlayerSide) -> Self {
        match side {
            PlayerSide::First => 1,
            PlayerSide::Second => 2,
        }
    }
}

/// The statistic counters of one player over some playing time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub goals: u32,
    pub assists: u32,
    pub secondary_assists: u32,
    pub tertiary_assists: u32,

    /// Time played, in seconds
    pub gametime: f64,

    pub position: GamePosition,

    pub passes_attempted: u32,
    pub passes_successful: u32,
    pub touches: u32,
    pub kicks: u32,
    pub shots: u32,
    pub shots_target: u32,
    pub saves: u32,
    pub clears: u32,
    pub duels: u32,
    pub interceptions: u32,
    pub rebound_dribbles: u32,
    pub own_goals: u32,

    pub average_pos_x: f64,
    pub average_pos_y: f64,

    /// Goals the player's side scored while they were on the pitch
    pub goals_scored_team: u32,

    /// Goals the player's side conceded while they were on the pitch
    pub goals_conceded_team: u32,
}

impl StatLine {
    /// Add every summable counter of `other` to this line.
    ///
    /// Gametime, position and average positions are not touched.
    pub fn add_counters(&mut self, other: &StatLine) {
        self.goals += other.goals;
        self.assists += other.assists;
        self.secondary_assists += other.secondary_assists;
        self.tertiary_assists += other.tertiary_assists;
        self.passes_attempted += other.passes_attempted;
        self.passes_successful += other.passes_successful;
        self.touches += other.touches;
        self.kicks += other.kicks;
        self.shots += other.shots;
        self.shots_target += other.shots_target;
        self.saves += other.saves;
        self.clears += other.clears;
        self.duels += other.duels;
        self.interceptions += other.interceptions;
        self.rebound_dribbles += other.rebound_dribbles;
        self.own_goals += other.own_goals;
        self.goals_scored_team += other.goals_scored_team;
        self.goals_conceded_team += other.goals_conceded_team;
    }
}

/// One raw statistics row: one in-game character in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// In-game name as typed by the player
    pub raw_name: String,

    /// Side played on during the period
    pub side: PlayerSide,

    #[serde(flatten)]
    pub line: StatLine,
}

impl PlayerStats {
    /// Create a row with zeroed counters.
    pub fn new(raw_name: impl Into<String>, side: PlayerSide) -> Self {
        Self {
            raw_name: raw_name.into(),
            side,
            line: StatLine::default(),
        }
    }

    /// Builder method to set the counters.
    pub fn with_line(mut self, line: StatLine) -> Self {
        self.line = line;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_position_numeric_serialization() {
        let json = serde_json::to_string(&GamePosition::AM).unwrap();
        assert_eq!(json, "3");

        let deserialized: GamePosition = serde_json::from_str("1").unwrap();
        assert_eq!(deserialized, GamePosition::GK);

        assert!(serde_json::from_str::<GamePosition>("9").is_err());
    }

    #[test]
    fn test_game_position_labels() {
        assert_eq!(GamePosition::from_label("gk"), Some(GamePosition::GK));
        assert_eq!(GamePosition::from_label("ST"), Some(GamePosition::ST));
        assert_eq!(GamePosition::from_label("libero"), None);
        assert_eq!(format!("{}", GamePosition::Unknown), "unknown");
    }

    #[test]
    fn test_player_side_serialization() {
        assert_eq!(serde_json::to_string(&PlayerSide::Second).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<PlayerSide>("1").unwrap(),
            PlayerSide::First
        );
        assert!(serde_json::from_str::<PlayerSide>("0").is_err());
    }

    #[test]
    fn test_add_counters_leaves_time_and_position() {
        let mut line = StatLine {
            goals: 1,
            gametime: 120.0,
            position: GamePosition::ST,
            ..Default::default()
        };
        let other = StatLine {
            goals: 2,
            saves: 3,
            gametime: 300.0,
            position: GamePosition::GK,
            ..Default::default()
        };

        line.add_counters(&other);

        assert_eq!(line.goals, 3);
        assert_eq!(line.saves, 3);
        assert_eq!(line.gametime, 120.0);
        assert_eq!(line.position, GamePosition::ST);
    }

    #[test]
    fn test_player_stats_flat_json() {
        let json = r#"{"raw_name":"Ali","side":2,"goals":2,"gametime":280.5,"position":1}"#;
        let row: PlayerStats = serde_json::from_str(json).unwrap();

        assert_eq!(row.raw_name, "Ali");
        assert_eq!(row.side, PlayerSide::Second);
        assert_eq!(row.line.goals, 2);
        assert_eq!(row.line.position, GamePosition::GK);
        assert_eq!(row.line.assists, 0);
    }
}
