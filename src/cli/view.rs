//! Text rendering of ledger rows, totals and report previews.

use chrono::NaiveDate;
use colored::Colorize;

use crate::{
    core::zone::ZonePolicy,
    currency::{format_relative_date, CurrencyFormatter},
    ledger::{Totals, Transaction, TypeFilter},
    report::Report,
};

use super::io;
use super::output;

const DESCRIPTION_WIDTH: usize = 24;

/// Shared formatting inputs for one render pass.
pub struct RowStyle<'a> {
    pub formatter: &'a CurrencyFormatter,
    pub zone: ZonePolicy,
    pub today: NaiveDate,
}

/// Signed, formatted amount as shown in the list (`+₹50,000.00`).
pub fn signed_amount(txn: &Transaction, formatter: &CurrencyFormatter) -> String {
    format!("{}{}", txn.kind.sign(), formatter.format(txn.amount))
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// One listing line without colour.
pub fn format_row(index: usize, txn: &Transaction, style: &RowStyle<'_>) -> String {
    let date = format_relative_date(
        &style.formatter.locale,
        style.zone.local_date(txn.date),
        style.today,
    );
    format!(
        "{:>3}. {:<12} {:<width$} {:<22} {:>16}",
        index,
        date,
        clip(&txn.description, DESCRIPTION_WIDTH),
        txn.category.display_label(),
        signed_amount(txn, style.formatter),
        width = DESCRIPTION_WIDTH
    )
}

pub fn print_transactions(rows: &[&Transaction], filter: TypeFilter, style: &RowStyle<'_>) {
    output::section(format!("Transactions ({filter})"));
    if rows.is_empty() {
        io::print_info("No transactions yet");
        io::print_hint("Add your first transaction to get started");
        return;
    }
    for (position, txn) in rows.iter().enumerate() {
        let line = format_row(position + 1, txn, style);
        if txn.is_credit() {
            output::line(line.green());
        } else {
            output::line(line.red());
        }
    }
}

pub fn totals_lines(totals: &Totals, formatter: &CurrencyFormatter) -> [String; 3] {
    [
        format!("  Balance : {}", formatter.format(totals.balance)),
        format!("  Income  : {}", formatter.format(totals.income)),
        format!("  Expenses: {}", formatter.format(totals.expense)),
    ]
}

pub fn print_totals(totals: &Totals, formatter: &CurrencyFormatter) {
    output::section("Summary");
    for line in totals_lines(totals, formatter) {
        output::line(line);
    }
}

pub fn print_report_preview(report: &Report, style: &RowStyle<'_>) {
    output::section(&report.title);
    let totals = &report.totals;
    output::line(format!(
        "  Total Income: {}",
        style.formatter.format(totals.income)
    ));
    output::line(format!(
        "  Total Expenses: {}",
        style.formatter.format(totals.expense)
    ));
    output::line(format!(
        "  Net Balance: {}",
        style.formatter.format(totals.balance)
    ));
    output::line("");
    for (position, txn) in report.transactions.iter().enumerate() {
        output::line(format_row(position + 1, txn, style));
    }
    io::print_hint(format!(
        "{} transaction(s). Use `export` to save it as {}.",
        report.len(),
        report.filename()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionDraft;
    use chrono::{TimeZone, Utc};

    fn transaction(description: &str, kind: &str, day: u32) -> Transaction {
        TransactionDraft::new(description, 250.0, "food", kind)
            .into_transaction(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn rows_show_sign_relative_date_and_icon() {
        let formatter = CurrencyFormatter::default();
        let style = RowStyle {
            formatter: &formatter,
            zone: ZonePolicy::Utc,
            today: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        let row = format_row(1, &transaction("Lunch", "debit", 14), &style);
        assert!(row.starts_with("  1. Yesterday"), "{row}");
        assert!(row.contains("Lunch"));
        assert!(row.contains("Food & Dining"));
        assert!(row.ends_with("-\u{20B9}250.00"), "{row}");

        let older = format_row(2, &transaction("Pay", "credit", 2), &style);
        assert!(older.contains("2 Jan"), "{older}");
        assert!(older.ends_with("+\u{20B9}250.00"));
    }

    #[test]
    fn long_descriptions_are_clipped() {
        let clipped = clip("a very long description that keeps going", 10);
        assert_eq!(clipped, "a very ...");
        assert_eq!(clip("short", 10), "short");
    }

    #[test]
    fn totals_lines_use_formatter() {
        let totals = Totals {
            income: 50_000.0,
            expense: 250.0,
            balance: 49_750.0,
        };
        let lines = totals_lines(&totals, &CurrencyFormatter::default());
        assert_eq!(lines[0], "  Balance : \u{20B9}49,750.00");
        assert_eq!(lines[2], "  Expenses: \u{20B9}250.00");
    }
}
