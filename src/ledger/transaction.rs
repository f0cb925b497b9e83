use std::{fmt, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use crate::errors::{Field, ValidationError};

/// Opaque transaction identifier.
///
/// Freshly generated ids are UUIDv7 values (millisecond timestamp plus random
/// bits) rendered as 32 hex digits; ids read from storage are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TransactionId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for TransactionId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of a transaction: credits raise the balance, debits lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "Income",
            TransactionKind::Debit => "Expense",
        }
    }

    pub fn sign(&self) -> char {
        match self {
            TransactionKind::Credit => '+',
            TransactionKind::Debit => '-',
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::Missing(Field::Kind));
        }
        match value.to_ascii_lowercase().as_str() {
            "credit" | "income" => Ok(TransactionKind::Credit),
            "debit" | "expense" => Ok(TransactionKind::Debit),
            other => Err(ValidationError::invalid(
                Field::Kind,
                format!("`{other}` is not credit or debit"),
            )),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded income or expense. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign applied by the transaction kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }
}

/// Unvalidated user input for a new transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: String,
}

impl TransactionDraft {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            kind: kind.into(),
        }
    }

    /// Checks every field in form order and reports the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::Missing(Field::Description));
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::invalid(Field::Amount, "not a number"));
        }
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::Missing(Field::Category));
        }
        self.kind.parse::<TransactionKind>()?;
        Ok(())
    }

    /// Validates the draft and stamps it with a fresh id and `now`.
    pub fn into_transaction(self, now: DateTime<Utc>) -> Result<Transaction, ValidationError> {
        self.validate()?;
        let kind = self.kind.parse::<TransactionKind>()?;
        Ok(Transaction {
            id: TransactionId::generate(),
            description: self.description.trim().to_string(),
            amount: self.amount,
            category: Category::from(self.category.trim().to_string()),
            kind,
            date: now.trunc_subsecs(3),
        })
    }
}

/// Parses an amount typed by the user.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(Field::Amount));
    }
    let cleaned: String = value.chars().filter(|c| *c != ',' && *c != '_').collect();
    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| ValidationError::invalid(Field::Amount, format!("`{value}` is not a number")))?;
    if !amount.is_finite() {
        return Err(ValidationError::invalid(Field::Amount, "not a number"));
    }
    Ok(amount)
}
