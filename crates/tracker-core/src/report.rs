use std::fmt;

use chrono::NaiveDate;

/// Outcome class of a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Applied,
    NoOp,
    Rejected,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportStatus::Applied => "applied",
            ReportStatus::NoOp => "no-op",
            ReportStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// Status plus a human-readable message, returned by every mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub status: ReportStatus,
    pub message: String,
}

impl OperationReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Applied,
            message: message.into(),
        }
    }

    pub fn no_op(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::NoOp,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Rejected,
            message: message.into(),
        }
    }

    /// True when the ledger changed.
    pub fn applied(&self) -> bool {
        self.status == ReportStatus::Applied
    }
}

/// Headline figures shown by the totals views.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsReport {
    pub total_output: u64,
    pub weighted_output: f64,
    pub today_output: u64,
    pub start_of_day_output: u64,
    pub start_date: Option<NaiveDate>,
    pub unassigned_output: u64,
}
