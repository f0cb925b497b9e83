#![doc(test(attr(deny(warnings))))]

//! Expense Ledger keeps a personal income/expense ledger, derives running
//! totals, and builds period reports that can be exported as PDF or CSV
//! documents.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod report;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Ledger tracing initialized.");
    });
}
