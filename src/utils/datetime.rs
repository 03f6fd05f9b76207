//! Date and time utility functions
//!
//! Deadlines are local wall-clock values; record timestamps coming from the
//! backend are naive UTC. Everything here works on `NaiveDateTime` so callers
//! decide where "now" comes from.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Date key format used for grouping and for the backend's date-only deadlines
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_KEY_FORMAT).to_string()
}

/// Current local wall-clock time
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Current UTC time without offset, matching how the backend stores timestamps
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Monday 00:00:00.000 of the week containing `reference`.
pub fn week_start(reference: NaiveDateTime) -> NaiveDateTime {
    let offset = i64::from(reference.weekday().num_days_from_monday());
    let monday = reference.date() - Duration::days(offset);
    monday.and_time(NaiveTime::MIN)
}

/// Sunday 23:59:59.999 of the week containing `reference`.
pub fn week_end(reference: NaiveDateTime) -> NaiveDateTime {
    week_start(reference) + Duration::days(7) - Duration::milliseconds(1)
}

/// Whether `at` falls inside the Monday..Sunday week containing `reference`.
pub fn in_same_week(at: NaiveDateTime, reference: NaiveDateTime) -> bool {
    at >= week_start(reference) && at <= week_end(reference)
}

/// Parse a deadline as entered by the user or echoed by the backend.
///
/// Accepts RFC 3339 (converted to local time), naive date-times with or
/// without seconds, and bare dates (local midnight). Anything else yields
/// `None`, which callers treat as "no deadline".
pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    parse_naive(raw)
}

/// Parse a record timestamp (created/updated/completed/sent).
///
/// Offsets are normalised to UTC; naive values are assumed to already be UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    parse_naive(raw)
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Serialize a deadline the way the backend accepts it (ISO 8601, no offset).
pub fn format_deadline(deadline: NaiveDateTime) -> String {
    deadline.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Serde helper for optional timestamps that must never fail a whole response.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// User-selectable date display formats, stored in preferences under `dateFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    DayMonthYearSlash,
    MonthDayYearSlash,
    Iso,
    DayMonthYearDot,
    MonthDayYearDot,
}

impl DateFormat {
    pub const ALL: [DateFormat; 5] = [
        DateFormat::DayMonthYearSlash,
        DateFormat::MonthDayYearSlash,
        DateFormat::Iso,
        DateFormat::DayMonthYearDot,
        DateFormat::MonthDayYearDot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::MonthDayYearSlash => "MM/DD/YYYY",
            DateFormat::Iso => "YYYY-MM-DD",
            DateFormat::DayMonthYearDot => "DD.MM.YYYY",
            DateFormat::MonthDayYearDot => "MM.DD.YYYY",
        }
    }

    fn chrono_pattern(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::MonthDayYearSlash => "%m/%d/%Y",
            DateFormat::Iso => DATE_KEY_FORMAT,
            DateFormat::DayMonthYearDot => "%d.%m.%Y",
            DateFormat::MonthDayYearDot => "%m.%d.%Y",
        }
    }

    /// Format a date in this style.
    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.chrono_pattern()).to_string()
    }

    /// Format a raw date string; unparseable input renders as an empty string.
    pub fn format_str(self, raw: &str) -> String {
        parse_deadline(raw).map(|dt| self.format(dt.date())).unwrap_or_default()
    }

    /// The `dateFormat` a preferences object asks for, if it names a known one.
    pub fn preferred(preferences: Option<&serde_json::Map<String, serde_json::Value>>) -> Option<Self> {
        preferences
            .and_then(|prefs| prefs.get("dateFormat"))
            .and_then(|value| value.as_str())
            .and_then(|s| s.parse().ok())
    }

    /// Read the format from a user's preferences object, falling back to the default.
    pub fn from_preferences(preferences: Option<&serde_json::Map<String, serde_json::Value>>) -> Self {
        Self::preferred(preferences).unwrap_or_default()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown date format '{}'", s))
    }
}
