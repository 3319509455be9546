//! Period model: one played half of a match.

use serde::{Deserialize, Serialize};

use super::{PeriodId, PlayerStats};

/// One period of play, with red/blue metrics as recorded by the game client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier
    pub id: PeriodId,

    #[serde(default)]
    pub score_red: u32,

    #[serde(default)]
    pub score_blue: u32,

    #[serde(default)]
    pub possession_red: f64,

    #[serde(default)]
    pub possession_blue: f64,

    #[serde(default)]
    pub action_zone_red: f64,

    #[serde(default)]
    pub action_zone_blue: f64,

    /// One row per in-game character
    #[serde(default)]
    pub player_stats: Vec<PlayerStats>,
}

impl Period {
    /// Create a period with the given score and no other data.
    pub fn new(id: PeriodId, score_red: u32, score_blue: u32) -> Self {
        Self {
            id,
            score_red,
            score_blue,
            possession_red: 0.0,
            possession_blue: 0.0,
            action_zone_red: 0.0,
            action_zone_blue: 0.0,
            player_stats: Vec::new(),
        }
    }

    /// Builder method to set the possession metrics.
    pub fn with_possession(mut self, red: f64, blue: f64) -> Self {
        self.possession_red = red;
        self.possession_blue = blue;
        self
    }

    /// Builder method to set the action zone metrics.
    pub fn with_action_zone(mut self, red: f64, blue: f64) -> Self {
        self.action_zone_red = red;
        self.action_zone_blue = blue;
        self
    }

    /// Builder method to set the player rows.
    pub fn with_player_stats(mut self, rows: Vec<PlayerStats>) -> Self {
        self.player_stats = rows;
        self
    }

    /// Goals conceded by the red side (`is_red`) or the blue side.
    pub fn conceded_by(&self, is_red: bool) -> u32 {
        if is_red {
            self.score_blue
        } else {
            self.score_red
        }
    }
}
