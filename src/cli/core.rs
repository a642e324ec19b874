//! Shared CLI types: modes, command errors, and loop control.

use tracker_config::ConfigError;
use tracker_core::CoreError;

use crate::core::errors::{CliError, TrackerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        if err.is_rejection() {
            CommandError::InvalidArguments(err.to_string())
        } else {
            CommandError::Core(err.into())
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { .. } | ConfigError::UnknownKey(_) => {
                CommandError::InvalidArguments(err.to_string())
            }
            other => CommandError::Core(other.into()),
        }
    }
}

impl From<tracker_domain::ParseCategoryError> for CommandError {
    fn from(err: tracker_domain::ParseCategoryError) -> Self {
        CommandError::InvalidArguments(err.to_string())
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}
