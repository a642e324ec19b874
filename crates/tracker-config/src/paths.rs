use std::{env, path::PathBuf};

/// Overrides the application home directory when set.
pub const HOME_ENV_VAR: &str = "OUTPUT_TRACKER_HOME";
const DEFAULT_DIR_NAME: &str = ".output_tracker";

/// Directory holding the config file and, by default, the data file.
pub fn app_home_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
