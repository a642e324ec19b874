use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::{
    input::{parse_assignment, parse_family_quantities},
    report::ReportStatus,
    rollover_service::RolloverService,
    summary_service::SummaryService,
    time::Clock,
    transaction_service::TransactionService,
    CoreError,
};
use tracker_domain::{Batch, Category, Family, LedgerRecord, LedgerState};

struct FixedClock(DateTime<Local>);

impl FixedClock {
    fn on(y: i32, m: u32, d: u32) -> Self {
        FixedClock(Local.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

fn scenario_one() -> LedgerState {
    let mut state = LedgerState::new();
    let batch = parse_family_quantities(Family::Model525, &["qm=2", "flat=3"]).unwrap();
    TransactionService::add(&mut state, &batch).expect("add batch");
    state
}

#[test]
fn add_reports_family_units_and_points() {
    let mut state = LedgerState::new();
    let batch = parse_family_quantities(Family::Model525, &["qm=2", "flat=3"]).unwrap();
    let report = TransactionService::add(&mut state, &batch).unwrap();

    assert!(report.applied());
    assert_eq!(report.message, "Added 5 525 unit(s) (+4.50 points).");
    assert_eq!(state.current_totals(), (5, 4.5));
}

#[test]
fn remove_more_than_recorded_category_is_rejected() {
    let mut state = scenario_one();
    let before = state.clone();
    let batch = Batch::from([(Category::Model525QmWarranty, 5)]);

    let err = TransactionService::remove(&mut state, &batch).expect_err("must reject");
    assert!(matches!(
        err,
        CoreError::ExceedsCategory {
            category: Category::Model525QmWarranty,
            requested: 5,
            recorded: 2
        }
    ));
    assert!(err.is_rejection());
    assert_eq!(state, before);
}

#[test]
fn removing_everything_resets_weighted_output() {
    let mut state = scenario_one();
    let batch = Batch::from([
        (Category::Model525QmWarranty, 2),
        (Category::Model525FlatRate, 3),
    ]);

    let report = TransactionService::remove(&mut state, &batch).unwrap();
    assert!(report.applied());
    assert_eq!(state.total_output(), 0);
    assert_eq!(state.weighted_output(), 0.0);
}

#[test]
fn remove_from_empty_ledger_reports_nothing_to_remove() {
    let mut state = LedgerState::new();
    let err = TransactionService::remove(&mut state, &Batch::new()).unwrap_err();
    assert!(matches!(err, CoreError::NothingToRemove));
    assert_eq!(err.to_string(), "No units to remove.");
}

#[test]
fn zero_batches_are_no_ops() {
    let mut state = scenario_one();
    let before = state.clone();
    let zeros = parse_family_quantities(Family::Stratus, &["flat=0", "manuf="]).unwrap();

    let added = TransactionService::add(&mut state, &zeros).unwrap();
    assert_eq!(added.status, ReportStatus::NoOp);
    assert_eq!(added.message, "No units selected for addition.");

    let removed = TransactionService::remove(&mut state, &zeros).unwrap();
    assert_eq!(removed.status, ReportStatus::NoOp);
    assert_eq!(removed.message, "No units selected for removal.");
    assert_eq!(state, before);
}

#[test]
fn remove_over_total_is_checked_before_categories() {
    let mut state = scenario_one();
    let batch = Batch::from([(Category::PocRepair, 9)]);
    let err = TransactionService::remove(&mut state, &batch).unwrap_err();
    assert!(matches!(
        err,
        CoreError::ExceedsTotal {
            requested: 9,
            available: 5
        }
    ));
}

#[test]
fn initialize_breakdown_repairs_legacy_totals() {
    let mut state = LedgerState::from_record(LedgerRecord {
        total_output: 10,
        weighted_output: 7.5,
        ..LedgerRecord::default()
    });

    let mismatch = parse_assignment(&["525:qm=4"]).unwrap();
    let err = TransactionService::initialize_breakdown(&mut state, &mismatch).unwrap_err();
    assert!(matches!(err, CoreError::SumMismatch { entered: 4, total: 10 }));
    assert_eq!(state.weighted_output(), 7.5);

    let assignment = parse_assignment(&["525:qm=4", "count_1025_flat=6"]).unwrap();
    let report = TransactionService::initialize_breakdown(&mut state, &assignment).unwrap();
    assert!(report.applied());
    assert_eq!(state.weighted_output(), 9.0);
    assert_eq!(state.unassigned_output(), 0);
    assert_eq!(state.count(Category::Model1025FlatRate), 6);
}

#[test]
fn rollover_runs_once_per_date() {
    let mut state = scenario_one();
    let monday = FixedClock::on(2025, 6, 2);

    assert!(RolloverService::ensure_start_of_day(&mut state, &monday));
    assert_eq!(state.start_date(), NaiveDate::from_ymd_opt(2025, 6, 2));
    assert_eq!(state.start_of_day_output(), 5);
    assert!(!RolloverService::ensure_start_of_day(&mut state, &monday));

    TransactionService::add(&mut state, &Batch::from([(Category::PocRepair, 3)])).unwrap();
    assert_eq!(RolloverService::today_output(&state), 3);

    let tuesday = FixedClock::on(2025, 6, 3);
    assert!(RolloverService::ensure_start_of_day(&mut state, &tuesday));
    assert_eq!(RolloverService::today_output(&state), 0);
    assert_eq!(state.start_of_day_output(), 8);
}

#[test]
fn start_of_day_override_above_total_is_flagged() {
    let mut state = scenario_one();
    let report = RolloverService::override_start_of_day(&mut state, 12);
    assert!(report.applied());
    assert!(report.message.contains("above total output 5"));
    assert_eq!(state.start_of_day_output(), 12);
    assert_eq!(state.today_output(), 0);
}

#[test]
fn today_override_moves_start_of_day() {
    let mut state = scenario_one();
    RolloverService::override_today_output(&mut state, 2);
    assert_eq!(state.start_of_day_output(), 3);
    assert_eq!(state.today_output(), 2);

    let report = RolloverService::override_today_output(&mut state, 50);
    assert!(report.message.contains("capped"));
    assert_eq!(state.start_of_day_output(), 0);
}

#[test]
fn summary_lists_families_in_schema_order() {
    let mut state = scenario_one();
    TransactionService::add(&mut state, &Batch::from([(Category::StratusFlatRate, 4)])).unwrap();

    let rows = SummaryService::breakdown(&state, false);
    let families: Vec<Family> = rows.iter().map(|row| row.family).collect();
    assert_eq!(families, vec![Family::Stratus, Family::Model525]);
    assert_eq!(rows[0].total, 4);
    assert_eq!(rows[0].points, 3.0);
    assert_eq!(rows[1].categories.len(), 5);

    assert_eq!(SummaryService::breakdown(&state, true).len(), Family::ALL.len());

    let totals = SummaryService::totals(&state);
    assert_eq!(totals.total_output, 9);
    assert_eq!(totals.weighted_output, 7.5);
}

#[test]
fn point_table_covers_every_category() {
    let table = SummaryService::point_table();
    assert_eq!(table.len(), 30);
    assert_eq!(table[0].field, "count_stratus_flat");
    assert_eq!(table[29].points, 2.0);
}
