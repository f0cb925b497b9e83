use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use crate::currency::{format_date, month_name, DateFormatStyle, LocaleConfig};
use crate::errors::{Field, ValidationError};

/// Granularity of a report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Daily,
    Monthly,
    Yearly,
}

impl PeriodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Monthly => "monthly",
            PeriodKind::Yearly => "yearly",
        }
    }

    /// Field the user must fill in for this kind of period.
    pub fn value_field(&self) -> Field {
        match self {
            PeriodKind::Daily => Field::ReportDate,
            PeriodKind::Monthly => Field::ReportMonth,
            PeriodKind::Yearly => Field::ReportYear,
        }
    }

    /// Expected shape of the period value, for prompts and help text.
    pub fn value_hint(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "YYYY-MM-DD",
            PeriodKind::Monthly => "YYYY-MM",
            PeriodKind::Yearly => "YYYY",
        }
    }
}

impl FromStr for PeriodKind {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Err(ValidationError::Missing(Field::ReportKind)),
            "daily" | "day" => Ok(PeriodKind::Daily),
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            "yearly" | "year" | "annual" => Ok(PeriodKind::Yearly),
            other => Err(ValidationError::invalid(
                Field::ReportKind,
                format!("`{other}` is not daily, monthly or yearly"),
            )),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar window used to select transactions for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    /// Builds a period from the user's selection. A blank value is reported
    /// as a missing date, month or year.
    pub fn from_selection(kind: PeriodKind, value: Option<&str>) -> Result<Self, ValidationError> {
        let field = kind.value_field();
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(ValidationError::Missing(field));
        }
        let malformed = || {
            ValidationError::invalid(field, format!("`{value}` is not {}", kind.value_hint()))
        };
        match kind {
            PeriodKind::Daily => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Period::Day)
                .map_err(|_| malformed()),
            PeriodKind::Monthly => {
                let (year, month) = value.split_once('-').ok_or_else(malformed)?;
                let year = parse_year(year).ok_or_else(malformed)?;
                let month: u32 = month.parse().map_err(|_| malformed())?;
                if !(1..=12).contains(&month) {
                    return Err(malformed());
                }
                Ok(Period::Month { year, month })
            }
            PeriodKind::Yearly => parse_year(value).map(Period::Year).ok_or_else(malformed),
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Day(_) => PeriodKind::Daily,
            Period::Month { .. } => PeriodKind::Monthly,
            Period::Year(_) => PeriodKind::Yearly,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Day(day) => date == day,
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year(year) => date.year() == year,
        }
    }

    pub fn title(&self, locale: &LocaleConfig) -> String {
        match *self {
            Period::Day(day) => format!(
                "Daily Report: {}",
                format_date(locale, day, DateFormatStyle::Short)
            ),
            Period::Month { year, month } => {
                format!("Monthly Report: {} {year}", month_name(month))
            }
            Period::Year(year) => format!("Annual Report: {year}"),
        }
    }

    /// Suggested export file name without extension.
    pub fn file_stem(&self) -> String {
        match *self {
            Period::Day(day) => format!("Expense_Report_Daily_{}", day.format("%Y-%m-%d")),
            Period::Month { year, month } => {
                format!("Expense_Report_{}_{year}", month_name(month))
            }
            Period::Year(year) => format!("Expense_Report_{year}"),
        }
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.trim().parse().ok()?;
    (1..=9999).contains(&year).then_some(year)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            Period::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Period::Year(year) => write!(f, "{year:04}"),
        }
    }
}
