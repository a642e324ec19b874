//! tracker-storage-csv
//!
//! Persists the ledger as a single CSV record compatible with the tracker's
//! `output_progress.csv` data file.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};
use tracker_core::{
    storage::{LedgerStorage, LoadReport, LoadSource},
    CoreError,
};
use tracker_domain::LedgerState;

pub mod codec;

const TMP_SUFFIX: &str = "tmp";
const CORRUPT_SUFFIX: &str = "corrupt";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(err) => CoreError::Io(err),
            other => CoreError::Storage(other.to_string()),
        }
    }
}

/// Filesystem-backed CSV persistence for the single ledger record.
#[derive(Debug, Clone)]
pub struct CsvLedgerStorage {
    path: PathBuf,
}

impl CsvLedgerStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where an unreadable record is preserved before a fresh state replaces it.
    pub fn corrupt_copy_path(&self) -> PathBuf {
        suffixed_path(&self.path, CORRUPT_SUFFIX)
    }

    fn recover(&self, reason: String) -> LoadReport {
        warn!(path = %self.path.display(), %reason, "unreadable ledger record; starting fresh");
        let mut report = LoadReport::fresh();
        report.source = LoadSource::Recovered;
        report
            .warnings
            .push(format!("Could not read {}: {}", self.path.display(), reason));
        let backup = self.corrupt_copy_path();
        match fs::copy(&self.path, &backup) {
            Ok(_) => report.warnings.push(format!(
                "The unreadable file was copied to {}.",
                backup.display()
            )),
            Err(err) => debug!(%err, "could not preserve unreadable record"),
        }
        report
    }
}

impl LedgerStorage for CsvLedgerStorage {
    fn load(&self) -> Result<LoadReport, CoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no ledger record yet; starting fresh");
            return Ok(LoadReport::fresh());
        }
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) => return Ok(self.recover(err.to_string())),
        };
        match codec::decode(&data) {
            Ok(decoded) => {
                for warning in &decoded.warnings {
                    warn!(path = %self.path.display(), "{}", warning);
                }
                for migration in &decoded.migrations {
                    warn!(path = %self.path.display(), "{}", migration);
                }
                info!(
                    path = %self.path.display(),
                    total = decoded.state.total_output(),
                    "ledger record loaded"
                );
                Ok(LoadReport {
                    state: decoded.state,
                    source: LoadSource::File,
                    warnings: decoded.warnings,
                    migrations: decoded.migrations,
                })
            }
            Err(err) => Ok(self.recover(err.to_string())),
        }
    }

    fn save(&self, state: &LedgerState) -> Result<(), CoreError> {
        save_state_to_path(state, &self.path)?;
        debug!(path = %self.path.display(), total = state.total_output(), "ledger record saved");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Writes `state` to `path`, staging through a temporary file and renaming it into place.
pub fn save_state_to_path(state: &LedgerState, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = suffixed_path(path, TMP_SUFFIX);
    write_atomic(&tmp, &codec::encode(state)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads and decodes the record at `path` without any recovery.
pub fn load_state_from_path(path: &Path) -> Result<LedgerState, StorageError> {
    let data = fs::read(path)?;
    Ok(codec::decode(&data)?.state)
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, suffix),
        None => suffix.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
