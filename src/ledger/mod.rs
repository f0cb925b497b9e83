//! Ledger domain models and persistence-friendly types.

pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use category::Category;
pub use ledger::{Ledger, Totals, TypeFilter};
pub use transaction::{
    parse_amount, Transaction, TransactionDraft, TransactionId, TransactionKind,
};
