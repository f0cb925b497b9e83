//! Period reports derived from a ledger snapshot.

pub mod period;

pub use period::{Period, PeriodKind};

use crate::core::zone::ZonePolicy;
use crate::currency::LocaleConfig;
use crate::ledger::{Ledger, Totals, Transaction};

/// Extension of the suggested export file name.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Transactions and totals for one period. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub period: Period,
    pub title: String,
    pub file_stem: String,
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
}

impl Report {
    /// Suggested export file name, e.g. `Expense_Report_January_2024.pdf`.
    pub fn filename(&self) -> String {
        self.filename_with_extension(DEFAULT_EXTENSION)
    }

    pub fn filename_with_extension(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem, extension)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Result of [`ReportGenerator::generate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Ready(Report),
    /// No transaction falls in the period; nothing must be exported.
    Empty { period: Period },
}

impl ReportOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, ReportOutcome::Empty { .. })
    }

    pub fn into_report(self) -> Option<Report> {
        match self {
            ReportOutcome::Ready(report) => Some(report),
            ReportOutcome::Empty { .. } => None,
        }
    }
}

/// Selects the transactions of a period and totals them.
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    zone: ZonePolicy,
    locale: LocaleConfig,
}

impl ReportGenerator {
    pub fn new(zone: ZonePolicy, locale: LocaleConfig) -> Self {
        Self { zone, locale }
    }

    pub fn zone(&self) -> ZonePolicy {
        self.zone
    }

    pub fn generate(&self, period: &Period, ledger: &Ledger) -> ReportOutcome {
        let transactions: Vec<Transaction> = ledger
            .iter()
            .filter(|txn| period.contains(self.zone.local_date(txn.date)))
            .cloned()
            .collect();

        if transactions.is_empty() {
            tracing::info!(%period, "no transactions in report period");
            return ReportOutcome::Empty { period: *period };
        }

        let totals = Totals::of(&transactions);
        tracing::info!(%period, rows = transactions.len(), "generated report");
        ReportOutcome::Ready(Report {
            period: *period,
            title: period.title(&self.locale),
            file_stem: period.file_stem(),
            transactions,
            totals,
        })
    }
}
