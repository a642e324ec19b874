//! tracker-domain
//!
//! Category schema and ledger state for the weighted output tracker.
//! No I/O, no CLI, no storage. Only data types and the rules that keep them consistent.

pub mod batch;
pub mod category;
pub mod ledger;

pub use batch::*;
pub use category::*;
pub use ledger::*;
