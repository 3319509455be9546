//! Core data models for the league.

mod division;
mod ids;
mod league_match;
mod period;
mod player;
mod player_stats;
mod stats;
mod team;

pub use division::*;
pub use ids::*;
pub use league_match::*;
pub use period::*;
pub use player::*;
pub use player_stats::*;
pub use stats::*;
pub use team::*;
