//! Read-only views over the ledger.

use tracker_domain::{Category, Family, LedgerState};

use crate::TotalsReport;

/// One family with its subcategory counts, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySummary {
    pub family: Family,
    pub total: u64,
    pub points: f64,
    pub categories: Vec<(Category, u64)>,
}

/// One row of the point table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRow {
    pub category: Category,
    pub points: f64,
    pub field: &'static str,
}

/// Builds totals and breakdown views for presentation layers.
pub struct SummaryService;

impl SummaryService {
    pub fn totals(state: &LedgerState) -> TotalsReport {
        TotalsReport {
            total_output: state.total_output(),
            weighted_output: state.weighted_output(),
            today_output: state.today_output(),
            start_of_day_output: state.start_of_day_output(),
            start_date: state.start_date(),
            unassigned_output: state.unassigned_output(),
        }
    }

    /// Per-family breakdown. With `include_empty` false, families with no units are skipped.
    pub fn breakdown(state: &LedgerState, include_empty: bool) -> Vec<FamilySummary> {
        Family::ALL
            .into_iter()
            .map(|family| {
                let categories: Vec<(Category, u64)> = family
                    .categories()
                    .map(|category| (category, state.count(category)))
                    .collect();
                let points = categories
                    .iter()
                    .map(|(category, count)| category.points() * *count as f64)
                    .sum();
                FamilySummary {
                    family,
                    total: state.family_total(family),
                    points,
                    categories,
                }
            })
            .filter(|summary| include_empty || summary.total > 0)
            .collect()
    }

    pub fn point_table() -> Vec<PointRow> {
        Category::all()
            .map(|category| PointRow {
                category,
                points: category.points(),
                field: category.field_name(),
            })
            .collect()
    }
}
