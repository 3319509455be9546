//! Filesystem persistence of the league snapshot.
//!
//! Every entity type lives in its own JSONL file under `<data_dir>/league/`:
//! - `divisions.jsonl`, `teams.jsonl`, `players.jsonl`
//! - `matches.jsonl` (without periods)
//! - `periods.jsonl` (each period with the id of the match it belongs to, if any)

pub mod jsonl;
pub mod store;

pub use jsonl::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn league_dir(&self) -> PathBuf {
        self.data_dir.join("league")
    }

    /// Path of one entity type's file.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.league_dir().join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
