use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised time zone `{0}` (expected local, utc or an offset such as +05:30)")]
pub struct ZoneParseError(String);

/// Time zone used to turn stored UTC instants into calendar dates.
///
/// Report periods and displayed dates are evaluated in this zone only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ZonePolicy {
    /// The machine's local zone at the time of evaluation.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl ZonePolicy {
    pub fn parse(raw: &str) -> Result<Self, ZoneParseError> {
        let value = raw.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" | "" => return Ok(ZonePolicy::Local),
            "utc" | "z" => return Ok(ZonePolicy::Utc),
            _ => {}
        }
        parse_offset(value)
            .map(ZonePolicy::Fixed)
            .ok_or_else(|| ZoneParseError(value.to_string()))
    }

    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ZonePolicy::Local => instant.with_timezone(&Local).naive_local(),
            ZonePolicy::Utc => instant.naive_utc(),
            ZonePolicy::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_char_boundary(2) => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl TryFrom<String> for ZonePolicy {
    type Error = ZoneParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ZonePolicy::parse(&value)
    }
}

impl From<ZonePolicy> for String {
    fn from(policy: ZonePolicy) -> Self {
        policy.to_string()
    }
}

impl fmt::Display for ZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZonePolicy::Local => f.write_str("local"),
            ZonePolicy::Utc => f.write_str("utc"),
            ZonePolicy::Fixed(offset) => {
                let seconds = offset.local_minus_utc();
                let sign = if seconds < 0 { '-' } else { '+' };
                let seconds = seconds.abs();
                write!(f, "{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_named_and_offset_zones() {
        assert_eq!(ZonePolicy::parse("Local").unwrap(), ZonePolicy::Local);
        assert_eq!(ZonePolicy::parse("UTC").unwrap(), ZonePolicy::Utc);
        let ist = ZonePolicy::parse("+05:30").unwrap();
        assert_eq!(ist.to_string(), "+05:30");
        assert_eq!(ZonePolicy::parse("-0800").unwrap().to_string(), "-08:00");
        assert_eq!(ZonePolicy::parse("+3").unwrap().to_string(), "+03:00");
        assert!(ZonePolicy::parse("Mars/Olympus").is_err());
        assert!(ZonePolicy::parse("+25:00").is_err());
    }

    #[test]
    fn non_ascii_offsets_are_rejected() {
        for raw in ["+\u{20AC}a", "-a\u{20AC}", "+\u{00E9}\u{00E9}", "+05:\u{20AC}"] {
            assert!(ZonePolicy::parse(raw).is_err(), "{raw}");
        }
        assert!(serde_json::from_str::<ZonePolicy>("\"+\u{20AC}a\"").is_err());
    }

    #[test]
    fn date_boundary_follows_policy() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap();
        assert_eq!(
            ZonePolicy::Utc.local_date(instant),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        let ist = ZonePolicy::parse("+05:30").unwrap();
        assert_eq!(
            ist.local_date(instant),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn serializes_as_string() {
        let ist = ZonePolicy::parse("+05:30").unwrap();
        assert_eq!(serde_json::to_string(&ist).unwrap(), "\"+05:30\"");
        let back: ZonePolicy = serde_json::from_str("\"utc\"").unwrap();
        assert_eq!(back, ZonePolicy::Utc);
        assert!(serde_json::from_str::<ZonePolicy>("\"nowhere\"").is_err());
    }
}
