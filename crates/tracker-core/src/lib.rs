//! tracker-core
//!
//! Ledger operations, daily rollover, and reporting for the output tracker.
//! Depends on tracker-domain. No CLI, no terminal I/O, no concrete storage backend.

pub mod error;
pub mod input;
pub mod report;
pub mod rollover_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;

pub use error::CoreError;
pub use input::*;
pub use report::*;
pub use rollover_service::*;
pub use storage::*;
pub use summary_service::*;
pub use time::Clock;
pub use transaction_service::*;

#[cfg(test)]
mod tests;
