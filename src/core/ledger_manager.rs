use chrono::{DateTime, Utc};

use crate::errors::LedgerError;
use crate::ledger::{Ledger, Totals, Transaction, TransactionDraft, TransactionId, TypeFilter};
use crate::storage::{load_ledger, save_ledger, LoadRecovery, StorageBackend};

use super::clock::{Clock, SystemClock};

/// Facade that owns the single ledger instance and keeps storage in sync.
///
/// Every mutation re-serializes the full list. A failed write rolls the
/// in-memory change back so the ledger never diverges from what was last
/// persisted successfully.
pub struct LedgerManager {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    key: String,
    clock: Box<dyn Clock>,
    recovery: LoadRecovery,
}

impl LedgerManager {
    /// Loads the ledger stored under `key`. Unreadable payloads yield an empty ledger.
    pub fn open(storage: Box<dyn StorageBackend>, key: impl Into<String>) -> Self {
        let key = key.into();
        let report = load_ledger(storage.as_ref(), &key);
        Self {
            ledger: report.ledger,
            storage,
            key,
            clock: Box::new(SystemClock),
            recovery: report.recovery,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates `draft`, records it as the newest transaction and persists.
    pub fn add(&mut self, draft: TransactionDraft) -> Result<Transaction, LedgerError> {
        let transaction = draft.into_transaction(self.clock.now())?;
        self.ledger.prepend(transaction.clone())?;
        if let Err(err) = self.persist() {
            self.ledger.drop_first();
            return Err(err);
        }
        tracing::debug!(id = %transaction.id, kind = %transaction.kind, "added transaction");
        Ok(transaction)
    }

    /// Removes the transaction with `id` if present and persists the result.
    pub fn remove(&mut self, id: &TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let removed = self.ledger.remove(id);
        if let Err(err) = self.persist() {
            if let Some((index, transaction)) = removed {
                self.ledger.restore(index, transaction);
            }
            return Err(err);
        }
        match &removed {
            Some(_) => tracing::debug!(%id, "removed transaction"),
            None => tracing::debug!(%id, "remove requested for unknown transaction"),
        }
        Ok(removed.map(|(_, transaction)| transaction))
    }

    pub fn list(&self, filter: TypeFilter) -> Vec<&Transaction> {
        self.ledger.list(filter)
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Current instant according to the manager's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// How the ledger was obtained when the manager was opened.
    pub fn load_recovery(&self) -> &LoadRecovery {
        &self.recovery
    }

    fn persist(&self) -> Result<(), LedgerError> {
        save_ledger(self.storage.as_ref(), &self.key, &self.ledger)
    }
}
