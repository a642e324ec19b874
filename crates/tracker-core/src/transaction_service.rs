//! Add, remove, and breakdown initialization over a [`LedgerState`].

use tracing::{debug, info};
use tracker_domain::{Batch, Direction, LedgerState, Posting};

use crate::{CoreError, OperationReport};

/// Applies validated unit batches to the ledger.
pub struct TransactionService;

impl TransactionService {
    /// Credits every quantity in `batch`. An all-zero batch is reported as a no-op.
    pub fn add(state: &mut LedgerState, batch: &Batch) -> Result<OperationReport, CoreError> {
        Self::post(state, batch, Direction::Credit)
    }

    /// Debits every quantity in `batch`, rejecting the whole batch if any part would
    /// exceed what is recorded.
    pub fn remove(state: &mut LedgerState, batch: &Batch) -> Result<OperationReport, CoreError> {
        Self::post(state, batch, Direction::Debit)
    }

    /// Replaces the per-category breakdown. The assignment must sum to the current
    /// total output; omitted categories become zero.
    pub fn initialize_breakdown(
        state: &mut LedgerState,
        assignment: &Batch,
    ) -> Result<OperationReport, CoreError> {
        let effect = state.reassign(assignment)?;
        info!(
            units = effect.units,
            weighted = state.weighted_output(),
            "breakdown initialized"
        );
        Ok(OperationReport::success(format!(
            "Breakdown updated for {} unit(s); weighted output is now {}.",
            effect.units,
            format_points(state.weighted_output())
        )))
    }

    fn post(
        state: &mut LedgerState,
        batch: &Batch,
        direction: Direction,
    ) -> Result<OperationReport, CoreError> {
        let verb = match direction {
            Direction::Credit => "addition",
            Direction::Debit => "removal",
        };
        match state.post(batch, direction)? {
            Posting::NoOp => {
                debug!(?direction, "empty batch ignored");
                Ok(OperationReport::no_op(format!(
                    "No units selected for {}.",
                    verb
                )))
            }
            Posting::Applied(effect) => {
                info!(
                    ?direction,
                    units = effect.units,
                    points = effect.points,
                    total = state.total_output(),
                    "batch posted"
                );
                let what = match batch.single_family() {
                    Some(family) => format!("{} {} unit(s)", effect.units, family),
                    None => format!("{} unit(s)", effect.units),
                };
                let message = match direction {
                    Direction::Credit => format!(
                        "Added {} (+{} points).",
                        what,
                        format_points(effect.points)
                    ),
                    Direction::Debit => format!(
                        "Removed {} (-{} points).",
                        what,
                        format_points(effect.points)
                    ),
                };
                Ok(OperationReport::success(message))
            }
        }
    }
}

/// Formats a points value with two decimals.
pub fn format_points(points: f64) -> String {
    format!("{:.2}", points)
}
