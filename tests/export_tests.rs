mod common;

use std::fs;

use common::{at, ledger_with, temp_base};
use expense_ledger::{
    core::ZonePolicy,
    currency::{CurrencyCode, CurrencyFormatter, LocaleConfig},
    export::{export_report, CsvRenderer, DocumentRenderer, ExportFormat, ReportDocument},
    report::{Period, ReportGenerator},
};

fn january_document(locale: &str, currency: &str) -> ReportDocument {
    let ledger = ledger_with(&[
        ("Salary", 50_000.0, "salary", "credit", at(2024, 1, 1, 9)),
        ("Lunch (team)", 1_250.0, "food", "debit", at(2024, 1, 15, 13)),
    ]);
    let locale = LocaleConfig::for_tag(locale).expect("supported locale");
    let report = ReportGenerator::new(ZonePolicy::Utc, locale.clone())
        .generate(&Period::Month { year: 2024, month: 1 }, &ledger)
        .into_report()
        .expect("non-empty month");
    let formatter = CurrencyFormatter::new(CurrencyCode::new(currency), locale);
    ReportDocument::from_report(&report, &formatter, ZonePolicy::Utc)
}

#[test]
fn pdf_export_lands_under_suggested_name() {
    let dir = temp_base().join("reports");
    let document = january_document("en-IN", "INR");
    let renderer = ExportFormat::Pdf.renderer();
    let path = export_report(&document, renderer.as_ref(), &dir).unwrap();

    assert_eq!(path, dir.join("Expense_Report_January_2024.pdf"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("(Monthly Report: January 2024) Tj"));
    assert!(text.contains("(Net Balance: Rs.48,750.00) Tj"));
    assert!(text.contains("(Lunch \\(team\\)) Tj"));
    assert!(text.contains("(Food & Dining) Tj"));
    assert!(text.contains("(Salary) Tj"));
}

#[test]
fn csv_export_matches_document() {
    let dir = temp_base();
    let document = january_document("en-US", "USD");
    let path = export_report(&document, &CsvRenderer, &dir).unwrap();
    assert_eq!(path.file_name().unwrap(), "Expense_Report_January_2024.csv");

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["Date", "Description", "Category", "Type", "Amount"]
    );
    let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 5);
    assert_eq!(
        records[0].iter().collect::<Vec<_>>(),
        ["01/15/2024", "Lunch (team)", "Food & Dining", "Expense", "$1,250.00"]
    );
    assert_eq!(
        records[1].iter().collect::<Vec<_>>(),
        ["01/01/2024", "Salary", "Salary", "Income", "$50,000.00"]
    );
    assert_eq!(&records[4][0], "Net Balance");
    assert_eq!(&records[4][4], "$48,750.00");
}

#[test]
fn re_export_replaces_previous_file() {
    let dir = temp_base();
    let document = january_document("en-IN", "INR");
    let first = export_report(&document, &CsvRenderer, &dir).unwrap();
    let second = export_report(&document, &CsvRenderer, &dir).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    assert_eq!(CsvRenderer.extension(), "csv");
}
