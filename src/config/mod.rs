//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Game rules used by the scoring and statistics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// Duration of one period, in minutes
    #[serde(default = "default_game_time")]
    pub game_time_minutes: u32,

    /// Fraction of a period a goalkeeper must play to earn a clean sheet
    #[serde(default = "default_clean_sheet_fraction")]
    pub clean_sheet_fraction: f64,

    /// Score awarded to the winner of a default win
    #[serde(default = "default_defwin_score")]
    pub defwin_score: i32,

    /// Number of periods in a full game
    #[serde(default = "default_periods_per_game")]
    pub periods_per_game: u32,

    /// Most periods that can be attached to a match
    #[serde(default = "default_max_periods")]
    pub max_periods: usize,
}

fn default_game_time() -> u32 {
    5
}

fn default_clean_sheet_fraction() -> f64 {
    0.75
}

fn default_defwin_score() -> i32 {
    5
}

fn default_periods_per_game() -> u32 {
    2
}

fn default_max_periods() -> usize {
    3
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            game_time_minutes: default_game_time(),
            clean_sheet_fraction: default_clean_sheet_fraction(),
            defwin_score: default_defwin_score(),
            periods_per_game: default_periods_per_game(),
            max_periods: default_max_periods(),
        }
    }
}

impl GameRules {
    /// Length of one period in seconds.
    pub fn period_secs(&self) -> f64 {
        self.game_time_minutes as f64 * 60.0
    }

    /// Length of a full game in seconds.
    pub fn full_game_secs(&self) -> f64 {
        self.period_secs() * self.periods_per_game as f64
    }

    /// Minimum gametime in a period for a clean sheet, in seconds.
    pub fn clean_sheet_secs(&self) -> f64 {
        self.period_secs() * self.clean_sheet_fraction
    }

    /// Validate the rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_time_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "Game time must be greater than 0".to_string(),
            ));
        }

        if !(self.clean_sheet_fraction > 0.0 && self.clean_sheet_fraction <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "Clean sheet fraction must be in (0, 1], got {}",
                self.clean_sheet_fraction
            )));
        }

        if self.periods_per_game == 0 {
            return Err(ConfigError::ValidationError(
                "Periods per game must be greater than 0".to_string(),
            ));
        }

        if self.max_periods == 0 {
            return Err(ConfigError::ValidationError(
                "Max periods must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub rules: GameRules,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            rules: GameRules::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.rules.game_time_minutes, 5);
        assert_eq!(config.rules.defwin_score, 5);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_rules_derived_durations() {
        let rules = GameRules::default();

        assert_eq!(rules.period_secs(), 300.0);
        assert_eq!(rules.full_game_secs(), 600.0);
        assert_eq!(rules.clean_sheet_secs(), 225.0);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_fraction() {
        let mut config = AppConfig::default();
        config.rules.clean_sheet_fraction = 0.0;
        assert!(config.validate().is_err());

        config.rules.clean_sheet_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_game_time() {
        let mut config = AppConfig::default();
        config.rules.game_time_minutes = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            data_dir = "/srv/futlife"

            [rules]
            game_time_minutes = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/futlife"));
        assert_eq!(config.rules.game_time_minutes, 7);
        assert_eq!(config.rules.clean_sheet_fraction, 0.75);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&tmp.path().join("missing.toml")).unwrap();

        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_file_rejects_invalid_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("futlife.toml");
        std::fs::write(&path, "[rules]\nperiods_per_game = 0\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.rules, parsed.rules);
    }
}
