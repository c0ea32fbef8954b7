//! Half-open overlap tests shared by slot generation and booking commit.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{BlockInterval, BookedInterval};
use crate::time::{format_hhmm, format_local};
use crate::types::StaffId;

/// Whether `[a_start, a_end)` and `[b_start, b_end)` share any instant.
///
/// Intervals that merely touch (`a_end == b_start`) do not overlap.
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

/// The first rule that rejects a candidate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict<'a> {
    /// The slot runs into the staff member's break (minutes of day).
    Break { start_minute: u32, end_minute: u32 },
    /// The slot overlaps a booking that holds its time.
    Booking(&'a BookedInterval),
    /// The slot overlaps a manual block.
    Block(&'a BlockInterval),
}

impl fmt::Display for Conflict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Break {
                start_minute,
                end_minute,
            } => write!(
                f,
                "overlaps break {}-{}",
                format_hhmm(*start_minute),
                format_hhmm(*end_minute)
            ),
            Self::Booking(booking) => write!(
                f,
                "overlaps booking {} to {}",
                format_local(booking.start),
                format_local(booking.end)
            ),
            Self::Block(block) => write!(
                f,
                "overlaps block {} to {}",
                format_local(block.start),
                format_local(block.end)
            ),
        }
    }
}

/// Finds a booking or block that keeps `staff` from serving `[start, end)`.
///
/// With `staff = None` every booking and block is considered.
pub fn find_conflict<'a>(
    staff: Option<&StaffId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bookings: &'a [BookedInterval],
    blocks: &'a [BlockInterval],
) -> Option<Conflict<'a>> {
    if let Some(booking) = bookings
        .iter()
        .find(|b| b.applies_to(staff) && overlaps(start, end, b.start, b.end))
    {
        return Some(Conflict::Booking(booking));
    }
    blocks
        .iter()
        .find(|b| b.applies_to(staff) && overlaps(start, end, b.start, b.end))
        .map(Conflict::Block)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn staff(id: &str) -> StaffId {
        StaffId::new(id).unwrap()
    }

    fn booked_by(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BookedInterval {
        BookedInterval::new(Some(staff(id)), start, end)
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        assert!(!overlaps(540, 570, 570, 600));
        assert!(!overlaps(570, 600, 540, 570));
    }

    #[test]
    fn test_nested_and_partial_intervals_overlap() {
        assert!(overlaps(540, 600, 550, 560));
        assert!(overlaps(550, 560, 540, 600));
        assert!(overlaps(540, 570, 560, 600));
        assert!(overlaps(560, 600, 540, 570));
    }

    #[test]
    fn test_booking_for_other_staff_is_not_a_conflict() {
        let bookings = vec![booked_by("bruno", at(13, 0), at(14, 0))];
        let result = find_conflict(Some(&staff("ana")), at(13, 0), at(13, 30), &bookings, &[]);
        assert_eq!(result, None);
    }

    #[test]
    fn test_booking_for_same_staff_conflicts() {
        let bookings = vec![booked_by("ana", at(13, 0), at(14, 0))];
        let result = find_conflict(Some(&staff("ana")), at(13, 30), at(14, 30), &bookings, &[]);
        assert_eq!(result, Some(Conflict::Booking(&bookings[0])));
    }

    #[test]
    fn test_tenant_wide_block_conflicts_for_everyone() {
        let blocks = vec![BlockInterval::new(None, at(15, 0), at(16, 0))];
        for id in ["ana", "bruno"] {
            let result = find_conflict(Some(&staff(id)), at(15, 45), at(16, 15), &[], &blocks);
            assert_eq!(result, Some(Conflict::Block(&blocks[0])));
        }
    }

    #[test]
    fn test_bookings_are_reported_before_blocks() {
        let ana = staff("ana");
        let bookings = vec![booked_by("ana", at(13, 0), at(14, 0))];
        let blocks = vec![BlockInterval::new(None, at(13, 0), at(14, 0))];
        let result = find_conflict(Some(&ana), at(13, 0), at(13, 30), &bookings, &blocks);
        assert!(matches!(result, Some(Conflict::Booking(_))));
    }

    #[test]
    fn test_conflict_display_uses_local_time() {
        let block = BlockInterval::new(None, at(15, 0), at(16, 0));
        assert_eq!(
            Conflict::Block(&block).to_string(),
            "overlaps block 2025-03-10 12:00 to 2025-03-10 13:00"
        );
        let lunch = Conflict::Break {
            start_minute: 720,
            end_minute: 780,
        };
        assert_eq!(lunch.to_string(), "overlaps break 12:00-13:00");
    }
}
