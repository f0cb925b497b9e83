//! User intents emitted by the shell commands.
//!
//! Command handlers only translate arguments into an [`Intent`];
//! [`ShellContext::apply`](crate::cli::ShellContext::apply) performs the
//! ledger and report calls and renders what they return.

use std::{fmt, path::PathBuf, str::FromStr};

use crate::{
    export::ExportFormat,
    ledger::{TransactionDraft, TransactionId, TypeFilter},
    report::Period,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddTransaction(TransactionDraft),
    DeleteTransaction(DeleteTarget),
    SelectFilter(TypeFilter),
    ShowTotals,
    SelectReportPeriod(Period),
    Export {
        format: ExportFormat,
        dir: Option<PathBuf>,
    },
    ShowConfig,
    SetConfig {
        key: String,
        value: String,
    },
}

/// Which transaction a delete refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// 1-based row of the most recent listing.
    Row(usize),
    Id(TransactionId),
}

impl FromStr for DeleteTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<usize>() {
            Ok(row) if row > 0 => DeleteTarget::Row(row),
            _ => DeleteTarget::Id(TransactionId::from(trimmed)),
        })
    }
}

impl fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteTarget::Row(row) => write!(f, "row {row}"),
            DeleteTarget::Id(id) => write!(f, "id {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_target_prefers_rows_for_small_numbers() {
        assert_eq!("3".parse::<DeleteTarget>().unwrap(), DeleteTarget::Row(3));
        assert_eq!(
            "0".parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Id(TransactionId::from("0"))
        );
        let id = "0190b7a2c3d44e5f8a9b0c1d2e3f4a5b";
        assert_eq!(
            id.parse::<DeleteTarget>().unwrap(),
            DeleteTarget::Id(TransactionId::from(id))
        );
    }
}
