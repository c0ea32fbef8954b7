//! Business-local civil time.
//!
//! The business runs on `America/Bahia` time, a fixed UTC-03:00 offset with
//! no daylight saving. Schedules are expressed as minutes from local
//! midnight; bookings and blocks are stored as UTC instants. All conversions
//! here are integer minute arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::types::ValidationError;

/// IANA name of the business timezone.
pub const BUSINESS_TIMEZONE: &str = "America/Bahia";

/// Offset of business local time from UTC, in minutes.
pub const BUSINESS_UTC_OFFSET_MINUTES: i64 = -3 * 60;

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Returns the UTC instant for `minute` minutes after local midnight of `date`.
///
/// `minute` may be [`MINUTES_PER_DAY`], which yields the next local midnight.
pub fn local_instant(date: NaiveDate, minute: u32) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    midnight + Duration::minutes(i64::from(minute) - BUSINESS_UTC_OFFSET_MINUTES)
}

/// Returns the half-open UTC range covering the local day.
pub fn local_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (local_instant(date, 0), local_instant(date, MINUTES_PER_DAY))
}

/// Converts a UTC instant into business local wall-clock time.
pub fn to_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc() + Duration::minutes(BUSINESS_UTC_OFFSET_MINUTES)
}

/// Returns the local calendar date of an instant.
pub fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    to_local(instant).date()
}

/// Returns the local minute of day of an instant, truncating seconds.
pub fn minute_of_day(instant: DateTime<Utc>) -> u32 {
    let time = to_local(instant).time();
    time.hour() * 60 + time.minute()
}

/// Weekday index with 0 = Sunday through 6 = Saturday.
#[expect(
    clippy::cast_possible_truncation,
    reason = "num_days_from_sunday is always below 7"
)]
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Parses `HH:MM` (or `HH:MM:SS`, seconds ignored) into a minute of day.
///
/// `24:00` is accepted so that a shift can end at midnight.
pub fn parse_hhmm(value: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidTimeOfDay {
        value: value.to_string(),
    };

    let mut parts = value.trim().split(':');
    let hours: u32 = parts
        .next()
        .filter(|p| (1..=2).contains(&p.len()))
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let minutes: u32 = parts
        .next()
        .filter(|p| p.len() == 2)
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    if let Some(seconds) = parts.next() {
        let valid = seconds.len() == 2 && seconds.parse::<u32>().is_ok_and(|s| s < 60);
        if !valid {
            return Err(invalid());
        }
    }
    if parts.next().is_some() || minutes >= 60 {
        return Err(invalid());
    }

    let total = hours * 60 + minutes;
    if total > MINUTES_PER_DAY {
        return Err(invalid());
    }
    Ok(total)
}

/// Formats a minute of day as `HH:MM`.
pub fn format_hhmm(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Formats an instant as local `YYYY-MM-DD HH:MM`.
pub fn format_local(instant: DateTime<Utc>) -> String {
    to_local(instant).format("%Y-%m-%d %H:%M").to_string()
}
