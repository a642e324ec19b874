use std::result::Result as StdResult;

use thiserror::Error;
use tracker_config::ConfigError;
use tracker_core::CoreError;

/// Unified error type for the session and configuration layers.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, TrackerError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CoreError> for TrackerError {
    fn from(err: CoreError) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<ConfigError> for TrackerError {
    fn from(err: ConfigError) -> Self {
        TrackerError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Core(err.into())
    }
}
