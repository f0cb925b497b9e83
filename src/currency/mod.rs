//! Presentation-only formatting of amounts and dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// How digits of the integer part are grouped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupingStyle {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    Short,
    Medium,
    Long,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: GroupingStyle,
    pub day_first: bool,
}

impl LocaleConfig {
    /// Preferences for a supported BCP 47 tag, or `None` when unknown.
    pub fn for_tag(tag: &str) -> Option<Self> {
        let (decimal, grouping_sep, grouping, day_first) = match tag.trim() {
            "en-IN" | "hi-IN" => ('.', ',', GroupingStyle::Indian, true),
            "en-US" => ('.', ',', GroupingStyle::Thousands, false),
            "en-GB" | "en-AU" | "en-NZ" => ('.', ',', GroupingStyle::Thousands, true),
            "de-DE" | "es-ES" | "it-IT" | "pt-BR" => (',', '.', GroupingStyle::Thousands, true),
            "fr-FR" => (',', ' ', GroupingStyle::Thousands, true),
            _ => return None,
        };
        Some(Self {
            language_tag: tag.trim().to_string(),
            decimal_separator: decimal,
            grouping_separator: grouping_sep,
            grouping,
            day_first,
        })
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-IN".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            grouping: GroupingStyle::Indian,
            day_first: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencyDisplay {
    Symbol,
    Code,
    SymbolAndCode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency_display: CurrencyDisplay::Symbol,
            negative_style: NegativeStyle::Sign,
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats `value` with the locale's separators and grouping.
pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let grouped = group_digits(int_part, locale.grouping_separator, locale.grouping);
    match frac_part {
        Some(frac) => format!("{sign}{grouped}{}{frac}", locale.decimal_separator),
        None => format!("{sign}{grouped}"),
    }
}

fn group_digits(digits: &str, separator: char, style: GroupingStyle) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::new();
    for (index, ch) in chars.iter().enumerate() {
        let remaining = chars.len() - index;
        if index > 0 && is_group_boundary(remaining, style) {
            grouped.push(separator);
        }
        grouped.push(*ch);
    }
    grouped
}

fn is_group_boundary(remaining: usize, style: GroupingStyle) -> bool {
    match style {
        GroupingStyle::Thousands => remaining % 3 == 0,
        GroupingStyle::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
    }
}

/// Formats amounts and dates for a fixed currency and locale.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormatter {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
    pub options: FormatOptions,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(CurrencyCode::default(), LocaleConfig::default())
    }
}

impl CurrencyFormatter {
    pub fn new(code: CurrencyCode, locale: LocaleConfig) -> Self {
        Self {
            code,
            locale,
            options: FormatOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(&self, amount: f64) -> String {
        let code = self.code.as_str();
        let body = format_number(&self.locale, amount.abs(), minor_units_for(code));
        let symbol = symbol_for(code);
        let unsigned = match self.options.currency_display {
            CurrencyDisplay::Symbol => format!("{symbol}{body}"),
            CurrencyDisplay::Code => format!("{code} {body}"),
            CurrencyDisplay::SymbolAndCode => format!("{symbol}{body} ({code})"),
        };
        // -0.00 renders without a sign
        let negative = amount < 0.0 && body.chars().any(|c| matches!(c, '1'..='9'));
        if !negative {
            return unsigned;
        }
        match self.options.negative_style {
            NegativeStyle::Sign => format!("-{unsigned}"),
            NegativeStyle::Parentheses => format!("({unsigned})"),
        }
    }

    pub fn format_date(&self, date: NaiveDate, style: DateFormatStyle) -> String {
        format_date(&self.locale, date, style)
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate, style: DateFormatStyle) -> String {
    let (day, month, year) = (date.day(), date.month(), date.year());
    match (style, locale.day_first) {
        (DateFormatStyle::Short, true) => format!("{day:02}/{month:02}/{year}"),
        (DateFormatStyle::Short, false) => format!("{month:02}/{day:02}/{year}"),
        (DateFormatStyle::Medium, true) => format!("{day} {} {year}", month_label(month)),
        (DateFormatStyle::Medium, false) => format!("{} {day}, {year}", month_label(month)),
        (DateFormatStyle::Long, true) => format!(
            "{}, {day} {} {year}",
            weekday_name(date),
            month_name(month)
        ),
        (DateFormatStyle::Long, false) => format!(
            "{}, {} {day}, {year}",
            weekday_name(date),
            month_name(month)
        ),
    }
}

/// List-view date: `Today`, `Yesterday`, `N days ago`, then a short calendar date.
pub fn format_relative_date(locale: &LocaleConfig, date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => {
            let (day, month) = (date.day(), month_label(date.month()));
            let same_year = date.year() == today.year();
            match (locale.day_first, same_year) {
                (true, true) => format!("{day} {month}"),
                (true, false) => format!("{day} {month} {}", date.year()),
                (false, true) => format!("{month} {day}"),
                (false, false) => format!("{month} {day}, {}", date.year()),
            }
        }
    }
}

pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

fn weekday_name(date: NaiveDate) -> &'static str {
    use chrono::Weekday::*;
    match date.weekday() {
        Mon => "Monday",
        Tue => "Tuesday",
        Wed => "Wednesday",
        Thu => "Thursday",
        Fri => "Friday",
        Sat => "Saturday",
        Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rupees_use_indian_grouping() {
        let formatter = CurrencyFormatter::default();
        assert_eq!(formatter.format(50_000.0), "₹50,000.00");
        assert_eq!(formatter.format(1_234_567.5), "₹12,34,567.50");
        assert_eq!(formatter.format(250.0), "₹250.00");
        assert_eq!(formatter.format(0.0), "₹0.00");
        assert_eq!(formatter.format(-49_750.0), "-₹49,750.00");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(CurrencyFormatter::default().format(-0.001), "₹0.00");
    }

    #[test]
    fn thousands_grouping_and_alternate_separators() {
        let us = CurrencyFormatter::new(
            CurrencyCode::new("usd"),
            LocaleConfig::for_tag("en-US").unwrap(),
        );
        assert_eq!(us.format(1_234_567.891), "$1,234,567.89");

        let de = CurrencyFormatter::new(
            CurrencyCode::new("EUR"),
            LocaleConfig::for_tag("de-DE").unwrap(),
        )
        .with_options(FormatOptions {
            currency_display: CurrencyDisplay::Code,
            negative_style: NegativeStyle::Parentheses,
        });
        assert_eq!(de.format(-1234.5), "(EUR 1.234,50)");
    }

    #[test]
    fn zero_precision_currencies_drop_decimals() {
        let yen = CurrencyFormatter::new(
            CurrencyCode::new("JPY"),
            LocaleConfig::for_tag("en-US").unwrap(),
        );
        assert_eq!(yen.format(1500.0), "¥1,500");
    }

    #[test]
    fn unknown_locale_is_rejected() {
        assert!(LocaleConfig::for_tag("xx-YY").is_none());
    }

    #[test]
    fn dates_follow_locale_order() {
        let india = LocaleConfig::default();
        let us = LocaleConfig::for_tag("en-US").unwrap();
        let day = date(2024, 1, 15);
        assert_eq!(format_date(&india, day, DateFormatStyle::Short), "15/01/2024");
        assert_eq!(format_date(&us, day, DateFormatStyle::Short), "01/15/2024");
        assert_eq!(format_date(&india, day, DateFormatStyle::Medium), "15 Jan 2024");
        assert_eq!(
            format_date(&us, day, DateFormatStyle::Long),
            "Monday, January 15, 2024"
        );
    }

    #[test]
    fn relative_dates() {
        let locale = LocaleConfig::for_tag("en-US").unwrap();
        let today = date(2024, 3, 10);
        assert_eq!(format_relative_date(&locale, today, today), "Today");
        assert_eq!(format_relative_date(&locale, date(2024, 3, 9), today), "Yesterday");
        assert_eq!(format_relative_date(&locale, date(2024, 3, 5), today), "5 days ago");
        assert_eq!(format_relative_date(&locale, date(2024, 1, 5), today), "Jan 5");
        assert_eq!(
            format_relative_date(&locale, date(2023, 12, 25), today),
            "Dec 25, 2023"
        );
    }
}
