pub mod json_backend;

use std::{collections::HashMap, sync::Mutex};

use crate::{errors::LedgerError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key under which the transaction list is stored unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "expenseTrackerTransactions";

/// Abstraction over key-value backends holding serialized payloads.
pub trait StorageBackend: Send + Sync {
    /// Returns the raw payload stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Keeps a copy of a payload that failed to load before it gets overwritten.
    fn preserve_corrupt(&self, _key: &str, _raw: &str) -> Result<()> {
        Ok(())
    }
}

/// In-process backend used by tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        storage
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// How the stored payload was turned into a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRecovery {
    /// Nothing stored yet.
    Missing,
    /// Payload parsed normally.
    Loaded,
    /// Payload could not be read or parsed; an empty ledger was used instead.
    Reset { reason: String },
}

/// Outcome of [`load_ledger`].
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub recovery: LoadRecovery,
}

impl LoadReport {
    pub fn was_reset(&self) -> bool {
        matches!(self.recovery, LoadRecovery::Reset { .. })
    }
}

/// Loads the ledger stored under `key`, falling back to an empty ledger when
/// the payload is unreadable or corrupt. Never fails.
pub fn load_ledger(storage: &dyn StorageBackend, key: &str) -> LoadReport {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored transactions, starting empty");
            return LoadReport {
                ledger: Ledger::new(),
                recovery: LoadRecovery::Missing,
            };
        }
        Err(err) => {
            tracing::error!(key, error = %err, "error loading transactions");
            return LoadReport {
                ledger: Ledger::new(),
                recovery: LoadRecovery::Reset {
                    reason: err.to_string(),
                },
            };
        }
    };

    match serde_json::from_str::<Ledger>(&raw) {
        Ok(ledger) => {
            tracing::info!(key, transactions = ledger.len(), "loaded transactions");
            LoadReport {
                ledger,
                recovery: LoadRecovery::Loaded,
            }
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "stored transactions are corrupt, starting empty");
            if let Err(preserve_err) = storage.preserve_corrupt(key, &raw) {
                tracing::warn!(key, error = %preserve_err, "could not preserve corrupt payload");
            }
            LoadReport {
                ledger: Ledger::new(),
                recovery: LoadRecovery::Reset {
                    reason: err.to_string(),
                },
            }
        }
    }
}

/// Serializes the full ledger and overwrites the payload under `key`.
pub fn save_ledger(storage: &dyn StorageBackend, key: &str, ledger: &Ledger) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    storage.write(key, &json)?;
    tracing::debug!(key, transactions = ledger.len(), "saved transactions");
    Ok(())
}

pub use json_backend::JsonStorage;
