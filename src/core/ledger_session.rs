//! Session facade coordinating ledger state, rollover, and persistence.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tracker_core::{
    storage::{LedgerStorage, LoadSource},
    Clock, CoreError, FamilySummary, OperationReport, RolloverService, SummaryService, TotalsReport,
    TransactionService,
};
use tracker_domain::{Batch, LedgerState};

use crate::core::errors::{Result, TrackerError};

/// Metadata describing the outcome of the initial load.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub source: LoadSource,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
    pub path: PathBuf,
}

/// Owns the ledger for the lifetime of a shell and persists it after every change.
///
/// Every mutating call first runs the rollover check, then applies the operation to the
/// in-memory state and saves it. If the save fails the state is restored to what it was
/// before the call, so memory and disk never disagree.
pub struct LedgerSession {
    state: LedgerState,
    storage: Box<dyn LedgerStorage>,
    clock: Box<dyn Clock>,
    load: LoadMetadata,
}

impl LedgerSession {
    /// Loads the persisted state and takes today's start-of-day snapshot if needed.
    pub fn open(storage: Box<dyn LedgerStorage>, clock: Box<dyn Clock>) -> Result<Self> {
        let report = storage.load()?;
        let load = LoadMetadata {
            source: report.source,
            warnings: report.warnings,
            migrations: report.migrations,
            path: storage.location().to_path_buf(),
        };
        let mut session = Self {
            state: report.state,
            storage,
            clock,
            load,
        };
        session.refresh()?;
        info!(
            path = %session.load.path.display(),
            total = session.state.total_output(),
            "session opened"
        );
        Ok(session)
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn load_metadata(&self) -> &LoadMetadata {
        &self.load
    }

    pub fn location(&self) -> &Path {
        self.storage.location()
    }

    pub fn apply_add(&mut self, batch: &Batch) -> Result<OperationReport> {
        self.commit(|state| TransactionService::add(state, batch))
    }

    pub fn apply_remove(&mut self, batch: &Batch) -> Result<OperationReport> {
        self.commit(|state| TransactionService::remove(state, batch))
    }

    pub fn apply_initialize(&mut self, assignment: &Batch) -> Result<OperationReport> {
        self.commit(|state| TransactionService::initialize_breakdown(state, assignment))
    }

    pub fn set_start_of_day(&mut self, value: u64) -> Result<OperationReport> {
        self.commit(|state| Ok(RolloverService::override_start_of_day(state, value)))
    }

    pub fn set_today_output(&mut self, value: u64) -> Result<OperationReport> {
        self.commit(|state| Ok(RolloverService::override_today_output(state, value)))
    }

    /// Current totals, after making sure the start-of-day snapshot is for today.
    pub fn report_totals(&mut self) -> Result<TotalsReport> {
        self.refresh()?;
        Ok(SummaryService::totals(&self.state))
    }

    /// Per-family breakdown, after the same start-of-day check as [`Self::report_totals`].
    pub fn report_breakdown(&mut self, include_empty: bool) -> Result<Vec<FamilySummary>> {
        self.refresh()?;
        Ok(SummaryService::breakdown(&self.state, include_empty))
    }

    /// Runs the rollover check, persisting when the date changed. Returns whether it did.
    pub fn refresh(&mut self) -> Result<bool> {
        let snapshot = self.state.clone();
        if !RolloverService::ensure_start_of_day(&mut self.state, &*self.clock) {
            return Ok(false);
        }
        if let Err(err) = self.storage.save(&self.state) {
            self.state = snapshot;
            return Err(self.save_failed(err));
        }
        Ok(true)
    }

    /// Writes the current state unconditionally.
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.state).map_err(|err| self.save_failed(err))
    }

    fn commit<F>(&mut self, operation: F) -> Result<OperationReport>
    where
        F: FnOnce(&mut LedgerState) -> std::result::Result<OperationReport, CoreError>,
    {
        self.refresh()?;
        let snapshot = self.state.clone();
        match operation(&mut self.state) {
            Ok(report) => {
                if report.applied() {
                    if let Err(err) = self.storage.save(&self.state) {
                        self.state = snapshot;
                        return Err(self.save_failed(err));
                    }
                }
                Ok(report)
            }
            Err(err) if err.is_rejection() => {
                self.state = snapshot;
                info!(reason = %err, "operation rejected");
                Ok(OperationReport::rejected(err.to_string()))
            }
            Err(err) => {
                self.state = snapshot;
                Err(err.into())
            }
        }
    }

    fn save_failed(&self, err: CoreError) -> TrackerError {
        warn!(path = %self.storage.location().display(), %err, "save failed; changes rolled back");
        TrackerError::Storage(format!(
            "could not save {}: {}",
            self.storage.location().display(),
            err
        ))
    }
}
