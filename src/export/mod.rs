//! Turning a generated [`Report`] into a downloadable document.

pub mod csv;
pub mod pdf;

pub use self::csv::CsvRenderer;
pub use self::pdf::PdfRenderer;

use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

use crate::{
    core::zone::ZonePolicy,
    currency::{CurrencyFormatter, DateFormatStyle},
    errors::{Field, ValidationError},
    report::Report,
    storage::json_backend::tmp_path,
    utils::paths::ensure_dir,
};

pub const DOCUMENT_HEADING: &str = "Expense Tracker Report";
pub const COLUMNS: [&str; 5] = ["Date", "Description", "Category", "Type", "Amount"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("Render error: {0}")]
    Render(String),
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub date: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub amount: String,
}

impl ReportRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.date,
            &self.description,
            &self.category,
            &self.kind,
            &self.amount,
        ]
    }
}

/// Format-neutral content of an exported report; every value is already rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub heading: String,
    pub title: String,
    pub file_stem: String,
    pub summary: Vec<(String, String)>,
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ReportDocument {
    pub fn from_report(report: &Report, formatter: &CurrencyFormatter, zone: ZonePolicy) -> Self {
        let rows = report
            .transactions
            .iter()
            .map(|txn| ReportRow {
                date: formatter.format_date(zone.local_date(txn.date), DateFormatStyle::Short),
                description: txn.description.clone(),
                category: txn.category.label().to_string(),
                kind: txn.kind.label().to_string(),
                amount: formatter.format(txn.amount),
            })
            .collect();

        let totals = &report.totals;
        Self {
            heading: DOCUMENT_HEADING.to_string(),
            title: report.title.clone(),
            file_stem: report.file_stem.clone(),
            summary: vec![
                ("Total Income".into(), formatter.format(totals.income)),
                ("Total Expenses".into(), formatter.format(totals.expense)),
                ("Net Balance".into(), formatter.format(totals.balance)),
            ],
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn filename(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem, extension)
    }

    /// Summary entries as `Label: value` lines.
    pub fn summary_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.summary
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
    }
}

pub trait DocumentRenderer {
    fn extension(&self) -> &'static str;
    fn render(&self, document: &ReportDocument, out: &mut dyn Write) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn renderer(&self) -> Box<dyn DocumentRenderer> {
        match self {
            ExportFormat::Pdf => Box::new(PdfRenderer::default()),
            ExportFormat::Csv => Box::new(CsvRenderer),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pdf" => Ok(ExportFormat::Pdf),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ValidationError::invalid(
                Field::ExportFormat,
                format!("unsupported format `{other}` (expected pdf or csv)"),
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders `document` into `dir`, replacing any previous export of the same name.
pub fn export_report(
    document: &ReportDocument,
    renderer: &dyn DocumentRenderer,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = dir.join(document.filename(renderer.extension()));
    let mut buffer = Vec::new();
    renderer.render(document, &mut buffer)?;

    let tmp = tmp_path(&path);
    fs::write(&tmp, &buffer)?;
    fs::rename(&tmp, &path)?;
    tracing::info!(
        path = %path.display(),
        rows = document.rows.len(),
        bytes = buffer.len(),
        "exported report"
    );
    Ok(path)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::currency::{CurrencyCode, LocaleConfig};
    use crate::ledger::{Ledger, TransactionDraft};
    use crate::report::{Period, ReportGenerator};
    use chrono::{TimeZone, Utc};

    pub fn sample_document(rows: usize) -> ReportDocument {
        let mut ledger = Ledger::new();
        for i in 0..rows {
            let (kind, category) = if i % 2 == 0 {
                ("debit", "food")
            } else {
                ("credit", "salary")
            };
            let txn = TransactionDraft::new(format!("Entry {i}"), 100.0 + i as f64, category, kind)
                .into_transaction(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
                .unwrap();
            ledger.prepend(txn).unwrap();
        }
        let report = ReportGenerator::new(ZonePolicy::Utc, LocaleConfig::default())
            .generate(&Period::Year(2024), &ledger)
            .into_report()
            .expect("non-empty report");
        let formatter = CurrencyFormatter::new(CurrencyCode::default(), LocaleConfig::default());
        ReportDocument::from_report(&report, &formatter, ZonePolicy::Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_document;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn document_formats_rows_and_summary() {
        let doc = sample_document(2);
        assert_eq!(doc.heading, "Expense Tracker Report");
        assert_eq!(doc.title, "Annual Report: 2024");
        assert_eq!(doc.rows.len(), 2);

        let newest = &doc.rows[0];
        assert_eq!(newest.date, "15/01/2024");
        assert_eq!(newest.description, "Entry 1");
        assert_eq!(newest.category, "Salary");
        assert_eq!(newest.kind, "Income");
        assert_eq!(newest.amount, "₹101.00");
        assert_eq!(doc.rows[1].category, "Food & Dining");

        let lines: Vec<_> = doc.summary_lines().collect();
        assert_eq!(
            lines,
            [
                "Total Income: ₹101.00",
                "Total Expenses: ₹100.00",
                "Net Balance: ₹1.00"
            ]
        );
    }

    #[test]
    fn export_format_parsing() {
        assert_eq!("".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.field(), Field::ExportFormat);
    }

    #[test]
    fn export_writes_named_file() {
        let temp = TempDir::new().unwrap();
        let doc = sample_document(3);
        let path = export_report(&doc, &CsvRenderer, temp.path()).unwrap();
        assert_eq!(path, temp.path().join("Expense_Report_2024.csv"));
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());

        let pdf = export_report(&doc, ExportFormat::Pdf.renderer().as_ref(), temp.path()).unwrap();
        assert_eq!(pdf.file_name().unwrap(), "Expense_Report_2024.pdf");
    }
}
