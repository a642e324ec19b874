use thiserror::Error;
use tracker_domain::{Category, LedgerRuleError, ParseCategoryError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No units to remove.")]
    NothingToRemove,
    #[error("Cannot remove more than total output ({requested} requested, {available} recorded).")]
    ExceedsTotal { requested: u64, available: u64 },
    #[error("Cannot remove more {category} than recorded ({requested} requested, {recorded} recorded).")]
    ExceedsCategory {
        category: Category,
        requested: u64,
        recorded: u64,
    },
    #[error("Sum of entered units ({entered}) must equal total output ({total}).")]
    SumMismatch { entered: u64, total: u64 },
    #[error("Quantity exceeds the supported range.")]
    Overflow,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the error rejects an operation on its merits, leaving the ledger untouched.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CoreError::Storage(_) | CoreError::Io(_))
    }
}

impl From<LedgerRuleError> for CoreError {
    fn from(err: LedgerRuleError) -> Self {
        match err {
            LedgerRuleError::NothingToRemove => CoreError::NothingToRemove,
            LedgerRuleError::ExceedsTotal {
                requested,
                available,
            } => CoreError::ExceedsTotal {
                requested,
                available,
            },
            LedgerRuleError::ExceedsCategory {
                category,
                requested,
                recorded,
            } => CoreError::ExceedsCategory {
                category,
                requested,
                recorded,
            },
            LedgerRuleError::SumMismatch { entered, total } => {
                CoreError::SumMismatch { entered, total }
            }
            LedgerRuleError::Overflow => CoreError::Overflow,
        }
    }
}

impl From<ParseCategoryError> for CoreError {
    fn from(err: ParseCategoryError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
