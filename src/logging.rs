//! Tracing setup
//!
//! The terminal UI owns stdout and stderr while it runs, so logs go to a
//! file under the data directory. The filter comes from `QUIZTERM_LOG`.

use crate::{QuizError, Result, APP_NAME, LOG_FILE};
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter
pub const LOG_ENV: &str = "QUIZTERM_LOG";

/// Get the standard log file path
/// Uses $DATA_HOME/quizterm/quizterm.log
pub fn log_file_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        QuizError::ConfigError("Unable to determine data directory".to_string())
    })?;

    Ok(data_dir.join(APP_NAME).join(LOG_FILE))
}

fn open_log_file() -> Result<File> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Default filter directive for the verbosity flag
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Writes to the log file when it can be opened. Otherwise falls back to
/// stderr, unless `to_stderr_allowed` is false (full-screen mode), in which
/// case logging stays off.
pub fn init_tracing(verbose: bool, to_stderr_allowed: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    let installed = match open_log_file() {
        Ok(file) => builder.with_writer(Mutex::new(file)).try_init(),
        Err(_) if to_stderr_allowed => builder.with_writer(std::io::stderr).try_init(),
        Err(_) => return Ok(()),
    };

    installed.map_err(|e| QuizError::ConfigError(format!("failed to initialize tracing: {}", e)))
}
