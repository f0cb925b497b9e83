#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use expense_ledger::{
    core::{FixedClock, LedgerManager},
    ledger::{Ledger, Transaction, TransactionDraft},
    storage::{JsonStorage, MemoryStorage, DEFAULT_STORAGE_KEY},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Manager over in-memory storage with a pinned clock.
pub fn memory_manager(now: DateTime<Utc>) -> LedgerManager {
    LedgerManager::open(Box::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY)
        .with_clock(Box::new(FixedClock(now)))
}

/// Manager over JSON files in an isolated directory.
pub fn json_manager(base: PathBuf) -> (LedgerManager, JsonStorage) {
    let storage = JsonStorage::new(Some(base)).expect("create json storage backend");
    let manager = LedgerManager::open(Box::new(storage.clone()), DEFAULT_STORAGE_KEY);
    (manager, storage)
}

pub fn draft(description: &str, amount: f64, category: &str, kind: &str) -> TransactionDraft {
    TransactionDraft::new(description, amount, category, kind)
}

/// Builds a ledger whose transactions carry explicit timestamps, newest last in `entries`.
/// Each entry is `(description, amount, category, kind, when)`.
pub fn ledger_with(entries: &[(&str, f64, &str, &str, DateTime<Utc>)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (description, amount, category, kind, when) in entries {
        let txn: Transaction = draft(description, *amount, category, kind)
            .into_transaction(*when)
            .expect("valid draft");
        ledger.prepend(txn).expect("unique id");
    }
    ledger
}
