#![doc(test(attr(deny(warnings))))]

//! Output Tracker records serviced units per product category, keeps a
//! weighted point total alongside the raw count, and tracks output per day.

pub mod cli;
pub mod core;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Output Tracker tracing initialized.");
    });
}
