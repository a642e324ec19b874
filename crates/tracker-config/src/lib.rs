//! tracker-config
//!
//! Persistent user preferences for the output tracker shell.
//! Owns the Config data structure, the application home directory, and disk persistence.

pub mod error;
pub mod manager;
pub mod model;
pub mod paths;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
pub use paths::{app_home_dir, HOME_ENV_VAR};
