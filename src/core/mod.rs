pub mod errors;
pub mod ledger_session;

pub use errors::{CliError, TrackerError};
pub use ledger_session::{LedgerSession, LoadMetadata};
