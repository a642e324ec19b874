//! Start-of-day snapshot handling.

use tracing::{info, warn};
use tracker_domain::LedgerState;

use crate::{time::Clock, OperationReport};

/// Detects date changes and maintains the start-of-day snapshot.
pub struct RolloverService;

impl RolloverService {
    /// Takes the start-of-day snapshot if it is stale for the clock's current date.
    ///
    /// Returns `true` when the state changed and should be persisted.
    pub fn ensure_start_of_day(state: &mut LedgerState, clock: &dyn Clock) -> bool {
        let today = clock.today();
        let rolled = state.roll_over(today);
        if rolled {
            info!(
                %today,
                start_of_day_output = state.start_of_day_output(),
                "start of day recorded"
            );
        }
        rolled
    }

    pub fn today_output(state: &LedgerState) -> u64 {
        state.today_output()
    }

    /// Sets the start-of-day snapshot directly. Values above the total are kept and flagged.
    pub fn override_start_of_day(state: &mut LedgerState, value: u64) -> OperationReport {
        state.override_start_of_day(value);
        if value > state.total_output() {
            warn!(
                value,
                total = state.total_output(),
                "start of day set above total output"
            );
            OperationReport::success(format!(
                "Start of day set to {} (above total output {}; today's output reads 0).",
                value,
                state.total_output()
            ))
        } else {
            info!(value, "start of day overridden");
            OperationReport::success(format!(
                "Start of day set to {}. Today's output: {}.",
                value,
                state.today_output()
            ))
        }
    }

    /// Adjusts the snapshot so today's output reads `value`, clamped by the total.
    pub fn override_today_output(state: &mut LedgerState, value: u64) -> OperationReport {
        let start = state.override_today_output(value);
        info!(value, start_of_day_output = start, "today's output overridden");
        if value > state.total_output() {
            OperationReport::success(format!(
                "Today's output capped at total output {} (start of day set to {}).",
                state.today_output(),
                start
            ))
        } else {
            OperationReport::success(format!(
                "Today's output set to {} (start of day set to {}).",
                value, start
            ))
        }
    }
}
