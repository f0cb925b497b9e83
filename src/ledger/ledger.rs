use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionId, TransactionKind};
use crate::errors::{Field, LedgerError, ValidationError};

/// Ordered transaction list, newest insertion first.
///
/// Serializes as a bare JSON array so the persisted payload is exactly the
/// transaction list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Transaction>", into = "Vec<Transaction>")]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a transaction at the front of the list.
    pub fn prepend(&mut self, transaction: Transaction) -> Result<(), LedgerError> {
        if self.transaction(&transaction.id).is_some() {
            return Err(LedgerError::DuplicateId(transaction.id.to_string()));
        }
        self.transactions.insert(0, transaction);
        Ok(())
    }

    /// Removes the transaction with `id`, returning it with its former position.
    pub fn remove(&mut self, id: &TransactionId) -> Option<(usize, Transaction)> {
        let index = self.transactions.iter().position(|txn| &txn.id == id)?;
        Some((index, self.transactions.remove(index)))
    }

    /// Puts a previously removed transaction back at `index`.
    pub(crate) fn restore(&mut self, index: usize, transaction: Transaction) {
        let index = index.min(self.transactions.len());
        self.transactions.insert(index, transaction);
    }

    pub(crate) fn drop_first(&mut self) -> Option<Transaction> {
        if self.transactions.is_empty() {
            None
        } else {
            Some(self.transactions.remove(0))
        }
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| &txn.id == id)
    }

    pub fn list(&self, filter: TypeFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| filter.matches(txn.kind))
            .collect()
    }

    pub fn totals(&self) -> Totals {
        Totals::of(&self.transactions)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(transactions: Vec<Transaction>) -> Self {
        let mut seen = HashSet::with_capacity(transactions.len());
        let before = transactions.len();
        let transactions: Vec<Transaction> = transactions
            .into_iter()
            .filter(|txn| seen.insert(txn.id.clone()))
            .collect();
        if transactions.len() != before {
            tracing::warn!(
                dropped = before - transactions.len(),
                "dropped transactions with duplicate ids"
            );
        }
        Self { transactions }
    }
}

impl From<Ledger> for Vec<Transaction> {
    fn from(ledger: Ledger) -> Self {
        ledger.transactions
    }
}

/// Which transactions a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Credit,
    Debit,
}

impl TypeFilter {
    pub fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Credit => kind == TransactionKind::Credit,
            TypeFilter::Debit => kind == TransactionKind::Debit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Credit => "credit",
            TypeFilter::Debit => "debit",
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(TypeFilter::All),
            "credit" | "income" => Ok(TypeFilter::Credit),
            "debit" | "expense" => Ok(TypeFilter::Debit),
            other => Err(ValidationError::invalid(
                Field::Kind,
                format!("`{other}` is not all, credit or debit"),
            )),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Income, expense and their difference over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Totals {
    pub fn of<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (income, expense) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), txn| match txn.kind {
                    TransactionKind::Credit => (income + txn.amount, expense),
                    TransactionKind::Debit => (income, expense + txn.amount),
                });
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionDraft;
    use chrono::{TimeZone, Utc};

    fn txn(description: &str, amount: f64, kind: &str) -> Transaction {
        TransactionDraft::new(description, amount, "other", kind)
            .into_transaction(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let mut ledger = Ledger::new();
        ledger.prepend(txn("first", 1.0, "credit")).unwrap();
        ledger.prepend(txn("second", 2.0, "debit")).unwrap();
        let names: Vec<_> = ledger.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, ["second", "first"]);
    }

    #[test]
    fn prepend_rejects_duplicate_ids() {
        let mut ledger = Ledger::new();
        let first = txn("first", 1.0, "credit");
        ledger.prepend(first.clone()).unwrap();
        let err = ledger.prepend(first).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateId(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut ledger = Ledger::new();
        let entry = txn("coffee", 3.5, "debit");
        let id = entry.id.clone();
        ledger.prepend(entry).unwrap();
        assert!(ledger.remove(&id).is_some());
        assert!(ledger.remove(&id).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn totals_over_empty_ledger_are_zero() {
        assert_eq!(Ledger::new().totals(), Totals::default());
    }

    #[test]
    fn filter_partitions_the_list() {
        let mut ledger = Ledger::new();
        ledger.prepend(txn("pay", 100.0, "credit")).unwrap();
        ledger.prepend(txn("rent", 60.0, "debit")).unwrap();
        ledger.prepend(txn("food", 15.0, "debit")).unwrap();
        assert_eq!(ledger.list(TypeFilter::All).len(), 3);
        assert_eq!(ledger.list(TypeFilter::Credit).len(), 1);
        assert_eq!(ledger.list(TypeFilter::Debit).len(), 2);
        let totals = ledger.totals();
        assert_eq!(totals.income, 100.0);
        assert_eq!(totals.expense, 75.0);
        assert_eq!(totals.balance, 25.0);
    }

    #[test]
    fn deserializing_drops_duplicate_ids() {
        let entry = txn("dup", 1.0, "credit");
        let payload = serde_json::to_string(&vec![entry.clone(), entry]).unwrap();
        let ledger: Ledger = serde_json::from_str(&payload).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn filter_parses_user_input() {
        assert_eq!("".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!("Income".parse::<TypeFilter>().unwrap(), TypeFilter::Credit);
        assert_eq!("debit".parse::<TypeFilter>().unwrap(), TypeFilter::Debit);
        assert!("transfers".parse::<TypeFilter>().is_err());
    }
}
