//! Configuration management module
//!
//! Handles loading, saving, and validation of quiz settings.

use crate::session::SessionSettings;
use crate::{
    QuizError, Result, APP_NAME, CONFIG_FILE, DEFAULT_QUESTIONS_FILE, DEFAULT_TIME_LIMIT_SECS,
    RANDOM_SAMPLE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Quiz configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Question file to load at startup
    pub questions_path: PathBuf,
    /// Countdown budget for one session, in seconds
    pub time_limit_secs: u64,
    /// Number of questions drawn in random mode
    pub random_sample_size: usize,
    /// Countdown tick period in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS as u64,
            random_sample_size: RANDOM_SAMPLE_SIZE,
            tick_interval_ms: 1000,
        }
    }
}

impl QuizConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.questions_path.as_os_str().is_empty() {
            return Err(QuizError::ConfigError(
                "Question file path must not be empty".to_string(),
            ));
        }

        if self.time_limit_secs == 0 {
            return Err(QuizError::ConfigError(
                "Time limit must be greater than 0".to_string(),
            ));
        }

        const MAX_TIME_LIMIT: u64 = 24 * 60 * 60; // 1 day
        if self.time_limit_secs > MAX_TIME_LIMIT {
            return Err(QuizError::ConfigError(format!(
                "Time limit too long: {}s (max: {}s)",
                self.time_limit_secs, MAX_TIME_LIMIT
            )));
        }

        if self.random_sample_size == 0 {
            return Err(QuizError::ConfigError(
                "Random sample size must be greater than 0".to_string(),
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err(QuizError::ConfigError(
                "Tick interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the question file
    pub fn with_questions_path(mut self, path: PathBuf) -> Self {
        self.questions_path = path;
        self
    }

    /// Set the session time limit
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = limit.as_secs();
        self
    }

    /// Set the random-mode sample size
    pub fn with_random_sample_size(mut self, size: usize) -> Self {
        self.random_sample_size = size;
        self
    }

    /// Countdown tick period
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Settings handed to each quiz session
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            time_limit_secs: u32::try_from(self.time_limit_secs).unwrap_or(u32::MAX),
            random_sample_size: self.random_sample_size,
        }
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from `config_path`, defaulting when it is absent
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            QuizError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            QuizError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to `config_path`
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                QuizError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            QuizError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/quizterm/quizterm.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            QuizError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
