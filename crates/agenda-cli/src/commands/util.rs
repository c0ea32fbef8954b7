//! Shared utilities for CLI commands.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};

use agenda_core::time::parse_hhmm;

const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];
const WEEKDAY_FULL_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Parses a local calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2025-03-10)"))
}

/// Parses a local time of day (`HH:MM`) into minutes from midnight.
pub fn parse_time(s: &str) -> anyhow::Result<u32> {
    parse_hhmm(s).with_context(|| format!("Invalid time: {s}. Use HH:MM (e.g., 09:30)"))
}

/// Parses a weekday given as `0`-`6` (0 = Sunday) or an exact name like
/// `mon` or `monday`.
pub fn parse_weekday(s: &str) -> anyhow::Result<u8> {
    if let Ok(n) = s.parse::<u8>() {
        anyhow::ensure!(n <= 6, "Invalid weekday: {s}. Use 0-6 (0 = Sunday)");
        return Ok(n);
    }
    let lower = s.trim().to_ascii_lowercase();
    WEEKDAY_NAMES
        .iter()
        .zip(WEEKDAY_FULL_NAMES)
        .zip(0u8..)
        .find(|((short, full), _)| lower == **short || lower == *full)
        .map(|(_, index)| index)
        .with_context(|| format!("Invalid weekday: {s}. Use 0-6 or a name such as mon"))
}

/// Short English name of a weekday index.
pub fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAY_NAMES
        .get(usize::from(weekday))
        .copied()
        .unwrap_or("?")
}

/// Parses `--now` (RFC 3339), falling back to the system clock.
pub fn parse_now(s: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    let Some(s) = s else {
        return Ok(Utc::now());
    };
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| {
            format!("Invalid datetime: {s}. Use RFC 3339 (e.g., 2025-03-10T12:00:00Z)")
        })
}
