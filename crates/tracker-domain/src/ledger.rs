//! Running output totals and the rules that keep them consistent.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    batch::Batch,
    category::{Category, Family},
};

/// Direction in which a batch moves the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Credit => 1.0,
            Direction::Debit => -1.0,
        }
    }
}

/// What a committed batch changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchEffect {
    pub units: u64,
    pub points: f64,
}

/// Result of posting a batch that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Posting {
    /// Every quantity was zero; nothing changed.
    NoOp,
    Applied(BatchEffect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Rule violations that reject an operation without touching the ledger.
pub enum LedgerRuleError {
    NothingToRemove,
    ExceedsTotal {
        requested: u64,
        available: u64,
    },
    ExceedsCategory {
        category: Category,
        requested: u64,
        recorded: u64,
    },
    SumMismatch {
        entered: u64,
        total: u64,
    },
    Overflow,
}

impl fmt::Display for LedgerRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerRuleError::NothingToRemove => f.write_str("no units to remove"),
            LedgerRuleError::ExceedsTotal {
                requested,
                available,
            } => write!(
                f,
                "cannot remove {} unit(s); total output is {}",
                requested, available
            ),
            LedgerRuleError::ExceedsCategory {
                category,
                requested,
                recorded,
            } => write!(
                f,
                "cannot remove {} {}; only {} recorded",
                requested, category, recorded
            ),
            LedgerRuleError::SumMismatch { entered, total } => write!(
                f,
                "sum of entries ({}) must equal total output ({})",
                entered, total
            ),
            LedgerRuleError::Overflow => f.write_str("quantity exceeds the supported range"),
        }
    }
}

impl std::error::Error for LedgerRuleError {}

/// Plain projection of a [`LedgerState`], used to persist and restore it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub total_output: u64,
    pub weighted_output: f64,
    pub counters: BTreeMap<Category, u64>,
    pub start_date: Option<NaiveDate>,
    pub start_of_day_output: u64,
}

/// The single mutable aggregate of the tracker.
///
/// Fields are private: counters and totals only change through
/// [`LedgerState::post`], [`LedgerState::reassign`], and the start-of-day helpers,
/// each of which validates fully before mutating anything.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    total_output: u64,
    weighted_output: f64,
    counters: BTreeMap<Category, u64>,
    start_date: Option<NaiveDate>,
    start_of_day_output: u64,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState {
    /// Creates an all-zero ledger with no start-of-day snapshot yet.
    pub fn new() -> Self {
        Self {
            total_output: 0,
            weighted_output: 0.0,
            counters: Category::all().map(|category| (category, 0)).collect(),
            start_date: None,
            start_of_day_output: 0,
        }
    }

    /// Rebuilds a ledger from its persisted projection.
    ///
    /// Totals are taken as recorded; older records may carry output that was never
    /// broken down by category (see [`LedgerState::unassigned_output`]).
    pub fn from_record(record: LedgerRecord) -> Self {
        let mut state = Self::new();
        for (category, count) in record.counters {
            state.counters.insert(category, count);
        }
        state.total_output = record.total_output;
        state.weighted_output = if record.weighted_output.is_finite() {
            record.weighted_output.max(0.0)
        } else {
            0.0
        };
        state.start_date = record.start_date;
        state.start_of_day_output = record.start_of_day_output;
        state
    }

    pub fn to_record(&self) -> LedgerRecord {
        LedgerRecord {
            total_output: self.total_output,
            weighted_output: self.weighted_output,
            counters: self.counters.clone(),
            start_date: self.start_date,
            start_of_day_output: self.start_of_day_output,
        }
    }

    pub fn total_output(&self) -> u64 {
        self.total_output
    }

    pub fn weighted_output(&self) -> f64 {
        self.weighted_output
    }

    pub fn current_totals(&self) -> (u64, f64) {
        (self.total_output, self.weighted_output)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn start_of_day_output(&self) -> u64 {
        self.start_of_day_output
    }

    /// Output recorded since the start-of-day snapshot, never negative.
    pub fn today_output(&self) -> u64 {
        self.total_output.saturating_sub(self.start_of_day_output)
    }

    pub fn count(&self, category: Category) -> u64 {
        self.counters.get(&category).copied().unwrap_or(0)
    }

    /// Every category with its count, zeros included.
    pub fn breakdown(&self) -> BTreeMap<Category, u64> {
        self.counters.clone()
    }

    /// Units recorded for `family`, saturating at `u64::MAX`.
    pub fn family_total(&self, family: Family) -> u64 {
        family
            .categories()
            .fold(0u64, |sum, category| sum.saturating_add(self.count(category)))
    }

    pub fn family_breakdown(&self) -> Vec<(Family, u64)> {
        Family::ALL
            .into_iter()
            .map(|family| (family, self.family_total(family)))
            .collect()
    }

    /// Sum of all category counters, saturating at `u64::MAX`.
    pub fn assigned_output(&self) -> u64 {
        self.counters
            .values()
            .fold(0u64, |sum, count| sum.saturating_add(*count))
    }

    /// Output recorded in the total but not attributed to any category.
    pub fn unassigned_output(&self) -> u64 {
        self.total_output.saturating_sub(self.assigned_output())
    }

    pub fn is_consistent(&self) -> bool {
        self.total_output == self.assigned_output()
    }

    pub fn recomputed_weighted_output(&self) -> f64 {
        self.counters
            .iter()
            .map(|(category, count)| category.points() * *count as f64)
            .sum()
    }

    /// Validates and applies a batch in one step. Nothing changes unless every check passes.
    ///
    /// Debits check, in order: the ledger is not empty, the batch is not all zeros,
    /// the batch fits within the total, and each quantity fits within its counter.
    pub fn post(
        &mut self,
        batch: &Batch,
        direction: Direction,
    ) -> Result<Posting, LedgerRuleError> {
        if direction == Direction::Debit && self.total_output == 0 {
            return Err(LedgerRuleError::NothingToRemove);
        }
        let units = batch.total().ok_or(LedgerRuleError::Overflow)?;
        if units == 0 {
            return Ok(Posting::NoOp);
        }

        let total_output = match direction {
            Direction::Credit => self
                .total_output
                .checked_add(units)
                .ok_or(LedgerRuleError::Overflow)?,
            Direction::Debit => self.total_output.checked_sub(units).ok_or(
                LedgerRuleError::ExceedsTotal {
                    requested: units,
                    available: self.total_output,
                },
            )?,
        };

        let mut staged = Vec::new();
        for (category, quantity) in batch.iter().filter(|(_, quantity)| *quantity > 0) {
            let recorded = self.count(category);
            let next = match direction {
                Direction::Credit => recorded
                    .checked_add(quantity)
                    .ok_or(LedgerRuleError::Overflow)?,
                Direction::Debit => {
                    recorded
                        .checked_sub(quantity)
                        .ok_or(LedgerRuleError::ExceedsCategory {
                            category,
                            requested: quantity,
                            recorded,
                        })?
                }
            };
            staged.push((category, next));
        }

        let points = batch.points();
        for (category, next) in staged {
            self.counters.insert(category, next);
        }
        self.total_output = total_output;
        self.weighted_output += direction.sign() * points;
        if self.total_output == 0 {
            self.weighted_output = 0.0;
        } else if self.weighted_output < 0.0 {
            self.weighted_output = 0.0;
        }

        Ok(Posting::Applied(BatchEffect { units, points }))
    }

    /// Replaces every counter with `assignment` and recomputes the weighted total.
    ///
    /// The assignment must account for exactly the current total output.
    pub fn reassign(&mut self, assignment: &Batch) -> Result<BatchEffect, LedgerRuleError> {
        let entered = assignment.total().ok_or(LedgerRuleError::Overflow)?;
        if entered != self.total_output {
            return Err(LedgerRuleError::SumMismatch {
                entered,
                total: self.total_output,
            });
        }
        for category in Category::all() {
            self.counters.insert(category, assignment.get(category));
        }
        self.weighted_output = self.recomputed_weighted_output();
        Ok(BatchEffect {
            units: entered,
            points: self.weighted_output,
        })
    }

    /// Snapshots the current total as the start of `today`. Returns `false` if
    /// today's snapshot was already taken.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.start_date == Some(today) {
            return false;
        }
        self.start_date = Some(today);
        self.start_of_day_output = self.total_output;
        true
    }

    /// Overrides the start-of-day snapshot. Values above the total are accepted.
    pub fn override_start_of_day(&mut self, value: u64) {
        self.start_of_day_output = value;
    }

    /// Moves the start-of-day snapshot so today's output reads `value`, clamped
    /// at the total output. Returns the new snapshot.
    pub fn override_today_output(&mut self, value: u64) -> u64 {
        self.start_of_day_output = self.total_output.saturating_sub(value);
        self.start_of_day_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_invariants(state: &LedgerState) {
        assert_eq!(state.total_output(), state.assigned_output());
        assert!((state.weighted_output() - state.recomputed_weighted_output()).abs() < EPSILON);
        for family in Family::ALL {
            let sum: u64 = family.categories().map(|c| state.count(c)).sum();
            assert_eq!(state.family_total(family), sum);
        }
    }

    #[test]
    fn new_ledger_lists_every_category_at_zero() {
        let state = LedgerState::new();
        let breakdown = state.breakdown();
        assert_eq!(breakdown.len(), Category::all().count());
        assert!(breakdown.values().all(|count| *count == 0));
        assert_eq!(state.current_totals(), (0, 0.0));
        assert_eq!(state.start_date(), None);
    }

    #[test]
    fn credit_updates_counters_and_totals() {
        let mut state = LedgerState::new();
        let batch = Batch::from([
            (Category::Model525QmWarranty, 2),
            (Category::Model525FlatRate, 3),
        ]);
        let posting = state.post(&batch, Direction::Credit).unwrap();
        assert_eq!(
            posting,
            Posting::Applied(BatchEffect {
                units: 5,
                points: 4.5
            })
        );
        assert_eq!(state.current_totals(), (5, 4.5));
        assert_eq!(state.family_total(Family::Model525), 5);
        assert_invariants(&state);
    }

    #[test]
    fn all_zero_batch_is_a_no_op() {
        let mut state = LedgerState::new();
        let before = state.clone();
        let batch = Batch::new().with(Category::StratusFlatRate, 0);
        assert_eq!(state.post(&batch, Direction::Credit), Ok(Posting::NoOp));
        assert_eq!(state, before);
    }

    #[test]
    fn debit_checks_run_in_order() {
        let mut state = LedgerState::new();
        let zero = Batch::new();
        assert_eq!(
            state.post(&zero, Direction::Debit),
            Err(LedgerRuleError::NothingToRemove)
        );

        state
            .post(&Batch::from([(Category::M10FlatRate, 2)]), Direction::Credit)
            .unwrap();
        assert_eq!(state.post(&zero, Direction::Debit), Ok(Posting::NoOp));
        assert_eq!(
            state.post(&Batch::from([(Category::PocRepair, 3)]), Direction::Debit),
            Err(LedgerRuleError::ExceedsTotal {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(
            state.post(&Batch::from([(Category::PocRepair, 1)]), Direction::Debit),
            Err(LedgerRuleError::ExceedsCategory {
                category: Category::PocRepair,
                requested: 1,
                recorded: 0
            })
        );
    }

    #[test]
    fn failed_debit_leaves_state_untouched() {
        let mut state = LedgerState::new();
        state
            .post(
                &Batch::from([
                    (Category::StratusFlatRate, 4),
                    (Category::Model1025Pm, 1),
                ]),
                Direction::Credit,
            )
            .unwrap();
        let before = state.clone();
        let batch = Batch::from([(Category::StratusFlatRate, 2), (Category::Model1025Pm, 2)]);
        assert!(state.post(&batch, Direction::Debit).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn emptying_the_ledger_zeroes_weighted_output_exactly() {
        let mut state = LedgerState::new();
        let batch = Batch::from([
            (Category::Model525Pm, 7),
            (Category::Model525MinorRepair, 3),
            (Category::Perfecto2VFlatRate, 1),
        ]);
        state.post(&batch, Direction::Credit).unwrap();
        state.post(&batch, Direction::Debit).unwrap();
        assert_eq!(state.total_output(), 0);
        assert_eq!(state.weighted_output(), 0.0);
    }

    #[test]
    fn reassign_requires_matching_sum() {
        let mut state = LedgerState::from_record(LedgerRecord {
            total_output: 7,
            weighted_output: 3.0,
            ..LedgerRecord::default()
        });
        let before = state.clone();
        let assignment = Batch::from([(Category::Model525FlatRate, 10)]);
        assert_eq!(
            state.reassign(&assignment),
            Err(LedgerRuleError::SumMismatch {
                entered: 10,
                total: 7
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn reassign_replaces_counters_and_recomputes_points() {
        let mut state = LedgerState::from_record(LedgerRecord {
            total_output: 4,
            weighted_output: 99.0,
            ..LedgerRecord::default()
        });
        assert_eq!(state.unassigned_output(), 4);
        let assignment = Batch::from([(Category::HomefillFlatRate, 1), (Category::Model525Pm, 3)]);
        let effect = state.reassign(&assignment).unwrap();
        assert_eq!(effect.units, 4);
        assert_eq!(state.weighted_output(), 2.75);
        assert!(state.is_consistent());
        assert_invariants(&state);
    }

    #[test]
    fn reassign_zeroes_categories_left_out() {
        let mut state = LedgerState::new();
        state
            .post(
                &Batch::from([
                    (Category::StratusFlatRate, 3),
                    (Category::M10FlatRate, 2),
                ]),
                Direction::Credit,
            )
            .unwrap();
        let assignment = Batch::from([(Category::PocRepair, 5)]);
        state.reassign(&assignment).unwrap();
        assert_eq!(state.count(Category::StratusFlatRate), 0);
        assert_eq!(state.count(Category::M10FlatRate), 0);
        assert_eq!(state.count(Category::PocRepair), 5);
        assert_eq!(state.family_total(Family::Stratus), 0);
        assert_eq!(state.weighted_output(), 10.0);
        assert_invariants(&state);
    }

    #[test]
    fn debit_never_drives_weighted_output_negative() {
        let mut counters = BTreeMap::new();
        counters.insert(Category::Model525QmWarranty, 2);
        let mut state = LedgerState::from_record(LedgerRecord {
            total_output: 2,
            weighted_output: 0.5,
            counters,
            ..LedgerRecord::default()
        });
        let posting = state
            .post(&Batch::from([(Category::Model525QmWarranty, 1)]), Direction::Debit)
            .unwrap();
        assert_eq!(
            posting,
            Posting::Applied(BatchEffect {
                units: 1,
                points: 0.75
            })
        );
        assert_eq!(state.total_output(), 1);
        assert_eq!(state.weighted_output(), 0.0);
    }

    #[test]
    fn sums_saturate_on_huge_counters() {
        let mut counters = BTreeMap::new();
        counters.insert(Category::Model525QmWarranty, u64::MAX);
        counters.insert(Category::Model525Pm, 1);
        let state = LedgerState::from_record(LedgerRecord {
            total_output: 5,
            counters,
            ..LedgerRecord::default()
        });
        assert_eq!(state.assigned_output(), u64::MAX);
        assert_eq!(state.family_total(Family::Model525), u64::MAX);
        assert_eq!(state.unassigned_output(), 0);
        assert!(!state.is_consistent());
    }

    #[test]
    fn roll_over_snapshots_once_per_day() {
        let mut state = LedgerState::new();
        state
            .post(&Batch::from([(Category::PocRepair, 3)]), Direction::Credit)
            .unwrap();
        assert!(state.roll_over(date(2025, 3, 1)));
        assert_eq!(state.start_of_day_output(), 3);

        state
            .post(&Batch::from([(Category::PocRepair, 2)]), Direction::Credit)
            .unwrap();
        assert!(!state.roll_over(date(2025, 3, 1)));
        assert_eq!(state.start_of_day_output(), 3);
        assert_eq!(state.today_output(), 2);

        assert!(state.roll_over(date(2025, 3, 2)));
        assert_eq!(state.today_output(), 0);
    }

    #[test]
    fn overrides_adjust_start_of_day() {
        let mut state = LedgerState::new();
        state
            .post(&Batch::from([(Category::M10QmWarranty, 10)]), Direction::Credit)
            .unwrap();
        state.override_start_of_day(25);
        assert_eq!(state.start_of_day_output(), 25);
        assert_eq!(state.today_output(), 0);

        assert_eq!(state.override_today_output(4), 6);
        assert_eq!(state.today_output(), 4);
        assert_eq!(state.override_today_output(40), 0);
        assert_eq!(state.today_output(), 10);
    }

    #[test]
    fn record_round_trip_preserves_state() {
        let mut state = LedgerState::new();
        state
            .post(&Batch::from([(Category::RhythmLm5aQmWarranty, 2)]), Direction::Credit)
            .unwrap();
        state.roll_over(date(2025, 1, 5));
        assert_eq!(LedgerState::from_record(state.to_record()), state);
    }

    #[test]
    fn random_walk_keeps_invariants() {
        let categories: Vec<Category> = Category::all().collect();
        let mut state = LedgerState::new();
        let mut seed: u64 = 0x5eed;
        for step in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let category = categories[(seed >> 33) as usize % categories.len()];
            let quantity = (seed >> 17) % 4;
            let batch = Batch::from([(category, quantity)]);
            let direction = if step % 3 == 0 {
                Direction::Debit
            } else {
                Direction::Credit
            };
            let _ = state.post(&batch, direction);
            assert_invariants(&state);
            if state.total_output() == 0 {
                assert_eq!(state.weighted_output(), 0.0);
            }
        }
    }
}
