use std::path::Path;

use tracker_domain::LedgerState;

use crate::CoreError;

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// No record existed; the state is new.
    Fresh,
    File,
    /// The record could not be read; a new state replaced it.
    Recovered,
}

/// A loaded state plus anything the backend had to repair on the way in.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub state: LedgerState,
    pub source: LoadSource,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

impl LoadReport {
    pub fn fresh() -> Self {
        Self {
            state: LedgerState::new(),
            source: LoadSource::Fresh,
            warnings: Vec::new(),
            migrations: Vec::new(),
        }
    }
}

/// Abstraction over persistence backends holding the single ledger record.
pub trait LedgerStorage: Send + Sync {
    /// Loads the persisted state. Unreadable records yield a fresh state with a warning
    /// rather than an error; `Err` is reserved for failures that leave no usable state.
    fn load(&self) -> Result<LoadReport, CoreError>;
    /// Replaces the persisted record with `state`.
    fn save(&self, state: &LedgerState) -> Result<(), CoreError>;
    fn location(&self) -> &Path;
}
