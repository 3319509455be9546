//! Loading and saving a complete league snapshot.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::league::League;
use crate::models::{Division, Match, MatchId, Period, Player, Team};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// On-disk form of a period: the period itself plus its owning match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde(default)]
    pub match_id: Option<MatchId>,

    #[serde(flatten)]
    pub period: Period,
}

/// JSONL-backed league snapshot store.
#[derive(Debug, Clone)]
pub struct LeagueStore {
    config: StorageConfig,
}

impl LeagueStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Read every entity file and assemble the league.
    ///
    /// Periods are attached to their match in id order; periods pointing at an unknown
    /// match end up in the pool. Match details are ordered home first.
    pub fn load(&self) -> Result<League, StorageError> {
        let divisions: Vec<Division> =
            JsonlReader::for_entity(&self.config, EntityType::Division).read_all()?;
        let teams: Vec<Team> = JsonlReader::for_entity(&self.config, EntityType::Team).read_all()?;
        let players: Vec<Player> =
            JsonlReader::for_entity(&self.config, EntityType::Player).read_all()?;
        let mut matches: Vec<Match> =
            JsonlReader::for_entity(&self.config, EntityType::Match).read_all()?;
        let mut records: Vec<PeriodRecord> =
            JsonlReader::for_entity(&self.config, EntityType::Period).read_all()?;

        for m in &mut matches {
            m.details.sort_by_key(|d| !d.home);
        }

        records.sort_by_key(|r| r.period.id);
        let mut period_pool = Vec::new();
        for record in records {
            let Some(match_id) = record.match_id else {
                period_pool.push(record.period);
                continue;
            };
            match matches.iter_mut().find(|m| m.id == match_id) {
                Some(m) => m.periods.push(record.period),
                None => {
                    warn!(
                        "Period {} references unknown match {}; moving it to the pool",
                        record.period.id, match_id
                    );
                    period_pool.push(record.period);
                }
            }
        }

        info!(
            "Loaded league from {:?}: {} division(s), {} team(s), {} player(s), {} match(es), {} pooled period(s)",
            self.config.league_dir(),
            divisions.len(),
            teams.len(),
            players.len(),
            matches.len(),
            period_pool.len()
        );

        Ok(League {
            divisions,
            teams,
            players,
            matches,
            period_pool,
        })
    }

    /// Rewrite every entity file from the league.
    pub fn save(&self, league: &League) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::Division).write_all(&league.divisions)?;
        JsonlWriter::for_entity(&self.config, EntityType::Team).write_all(&league.teams)?;
        JsonlWriter::for_entity(&self.config, EntityType::Player).write_all(&league.players)?;
        JsonlWriter::for_entity(&self.config, EntityType::Match).write_all(&league.matches)?;

        let mut records: Vec<PeriodRecord> = league
            .all_periods()
            .map(|(period, match_id)| PeriodRecord {
                match_id,
                period: period.clone(),
            })
            .collect();
        records.sort_by_key(|r| r.period.id);
        JsonlWriter::for_entity(&self.config, EntityType::Period).write_all(&records)?;

        info!("Saved league to {:?}", self.config.league_dir());
        Ok(())
    }
}
