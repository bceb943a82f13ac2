//! QUIZTERM - topic-based quiz runner
//!
//! Loads a question file, lets the user pick a topic, runs a timed quiz
//! session and scores it. The session core is headless; the terminal UI and
//! the line-mode console are two front ends driving it through commands.

use std::fmt;

pub mod app;
pub mod bank;
pub mod config;
pub mod console;
pub mod logging;
pub mod models;
pub mod session;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum QuizError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Question source unreadable or malformed
    DataLoadError(String),
    /// Start requested before a topic was chosen
    SelectionError,
    /// The chosen topic has no questions
    EmptyTopicError(String),
    /// Operation not valid in the current session state
    SessionError(String),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// TUI rendering or interaction error
    TuiError(String),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::IoError(err) => write!(f, "I/O error: {}", err),
            QuizError::DataLoadError(msg) => write!(f, "Question data error: {}", msg),
            QuizError::SelectionError => write!(f, "No topic selected"),
            QuizError::EmptyTopicError(topic) => {
                write!(f, "Topic '{}' has no questions", topic)
            }
            QuizError::SessionError(msg) => write!(f, "Session error: {}", msg),
            QuizError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            QuizError::TuiError(msg) => write!(f, "TUI error: {}", msg),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        QuizError::IoError(err)
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::DataLoadError(format!("JSON parsing error: {}", err))
    }
}

impl From<toml::de::Error> for QuizError {
    fn from(err: toml::de::Error) -> Self {
        QuizError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for QuizError {
    fn from(err: toml::ser::Error) -> Self {
        QuizError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for quiz operations
pub type Result<T> = std::result::Result<T, QuizError>;

/// Error handling utilities
pub mod error {
    use super::QuizError;

    /// Whether the user can recover by picking again.
    ///
    /// A failed question load leaves the application unusable; there is no
    /// retry.
    pub fn is_recoverable(error: &QuizError) -> bool {
        match error {
            QuizError::SelectionError => true,
            QuizError::EmptyTopicError(_) => true,
            QuizError::SessionError(_) => true,

            QuizError::DataLoadError(_) => false,
            QuizError::ConfigError(_) => false,
            QuizError::IoError(_) => false,
            QuizError::TuiError(_) => false,
        }
    }

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &QuizError) -> String {
        match error {
            QuizError::SelectionError => "Please choose a topic first.".to_string(),
            QuizError::EmptyTopicError(topic) => {
                format!("No questions for '{}'. Pick another topic.", topic)
            }
            QuizError::DataLoadError(msg) => {
                format!("Could not load the questions: {}", msg)
            }
            QuizError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "quizterm";
pub const CONFIG_FILE: &str = "quizterm.toml";
pub const LOG_FILE: &str = "quizterm.log";
pub const DEFAULT_QUESTIONS_FILE: &str = "questions.json";
/// Session time budget in seconds
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 1200;
/// Number of questions drawn in random mode
pub const RANDOM_SAMPLE_SIZE: usize = 20;
