//! # FUTLIFE League
//!
//! League engine for an online 3v3 football game: turns recorded periods into match
//! scores, player statistics and division standings.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (divisions, teams, players, matches, periods)
//! - **calculate**: Nickname resolution, side assignment, scoring, stat sheets, standings
//! - **league**: In-memory league snapshot, queries and admin edits
//! - **storage**: JSONL persistence of the snapshot
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod league;
pub mod models;
pub mod storage;

pub use models::*;
