use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

pub const DEFAULT_DATA_FILE: &str = "output_progress.csv";
const MAX_DECIMAL_PLACES: u8 = 6;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom data file location. Defaults to `<home>/output_progress.csv`.
    pub data_file: Option<PathBuf>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Suppresses informational lines in the shell.
    #[serde(default)]
    pub quiet_mode: bool,
    #[serde(default = "Config::default_decimal_places")]
    pub decimal_places: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            quiet_mode: false,
            decimal_places: Self::default_decimal_places(),
        }
    }
}

impl Config {
    /// Setting names accepted by [`Config::apply_setting`].
    pub const KEYS: [&'static str; 4] = [
        "data_file",
        "ui_color_enabled",
        "quiet_mode",
        "decimal_places",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_decimal_places() -> u8 {
        2
    }

    /// Data file path; relative custom paths are resolved against `home`.
    pub fn resolve_data_file(&self, home: &Path) -> PathBuf {
        match &self.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => home.join(path),
            None => home.join(DEFAULT_DATA_FILE),
        }
    }

    /// Current value of a setting, formatted for display.
    pub fn setting(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_file" => self
                .data_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "quiet_mode" => self.quiet_mode.to_string(),
            "decimal_places" => self.decimal_places.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses and stores `value` for `key`. `data_file` accepts `default` to clear it.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "data_file" => {
                self.data_file = match value {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, value)?,
            "quiet_mode" => self.quiet_mode = parse_bool(key, value)?,
            "decimal_places" => {
                let places: u8 = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a whole number"))?;
                if places > MAX_DECIMAL_PLACES {
                    return Err(invalid(key, "must be between 0 and 6"));
                }
                self.decimal_places = places;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, "expected on/off")),
    }
}
