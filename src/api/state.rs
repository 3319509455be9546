use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::GameRules;
use crate::league::League;

#[derive(Clone)]
pub struct AppState {
    pub league: Arc<RwLock<League>>,
    pub rules: Arc<GameRules>,
    pub cors_origin: Arc<str>,
}

impl AppState {
    pub fn new(league: League, rules: GameRules, cors_origin: &str) -> Self {
        Self {
            league: Arc::new(RwLock::new(league)),
            rules: Arc::new(rules),
            cors_origin: Arc::from(cors_origin),
        }
    }
}
