//! Application configuration loaded from a TOML file.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::lucky_dice::{
    DEFAULT_DICE_COUNT, DEFAULT_FACE_COUNT, DEFAULT_TARGET_SCORE, GameSettings, Normalized,
    RiskThreshold,
};

/// Default location of the history database.
pub const DEFAULT_DB_PATH: &str = "lucky_dice.db";

/// Settings file contents.
///
/// Numeric game settings are read as signed integers so that out-of-range
/// values reach [`GameSettings::normalize`] and fall back to defaults there.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Score to land on exactly.
    #[serde(default = "default_target_score")]
    target_score: i64,

    /// Faces per die.
    #[serde(default = "default_face_count")]
    face_count: i64,

    /// Dice thrown per roll.
    #[serde(default = "default_dice_count")]
    dice_count: i64,

    /// Rule for classifying rolls as risky.
    #[serde(default)]
    risk_threshold: RiskThreshold,

    /// SQLite file holding the game history.
    #[serde(default = "default_db_path")]
    db_path: String,
}

#[instrument]
fn default_target_score() -> i64 {
    i64::from(DEFAULT_TARGET_SCORE)
}

#[instrument]
fn default_face_count() -> i64 {
    i64::from(DEFAULT_FACE_COUNT)
}

#[instrument]
fn default_dice_count() -> i64 {
    i64::from(DEFAULT_DICE_COUNT)
}

#[instrument]
fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_score: default_target_score(),
            face_count: default_face_count(),
            dice_count: default_dice_count(),
            risk_threshold: RiskThreshold::default(),
            db_path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(target_score = config.target_score, db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not a valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Replaces the database path, e.g. from a command-line flag.
    #[instrument(skip(self))]
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.db_path = db_path;
        self
    }

    /// Game settings with out-of-range values replaced by defaults.
    #[instrument(skip(self))]
    pub fn game_settings(&self) -> Normalized<GameSettings> {
        GameSettings::normalize(
            self.target_score,
            self.face_count,
            self.dice_count,
            self.risk_threshold,
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
