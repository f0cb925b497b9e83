use std::fmt;

use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Duplicate transaction id: {0}")]
    DuplicateId(String),
}

impl LedgerError {
    /// Returns the validation failure carried by this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// User supplied fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Amount,
    Category,
    Kind,
    ReportKind,
    ReportDate,
    ReportMonth,
    ReportYear,
    ReportPeriod,
    ExportFormat,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Category => "category",
            Field::Kind => "type",
            Field::ReportKind => "report type",
            Field::ReportDate => "date",
            Field::ReportMonth => "month",
            Field::ReportYear => "year",
            Field::ReportPeriod => "report period",
            Field::ExportFormat => "export format",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected user input. No state changes when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(Field),
    #[error("amount must be greater than 0")]
    NonPositiveAmount,
    #[error("{field} is invalid: {reason}")]
    Invalid { field: Field, reason: String },
}

impl ValidationError {
    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// The field the user has to correct.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing(field) => *field,
            ValidationError::NonPositiveAmount => Field::Amount,
            ValidationError::Invalid { field, .. } => *field,
        }
    }
}
