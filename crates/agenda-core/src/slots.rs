//! Availability slot generation.
//!
//! Given one day's working intervals, bookings and blocks, enumerates every
//! start time at which a service could begin and classifies it as available
//! or occupied.
//!
//! # Algorithm Summary
//!
//! 1. Keep the active working intervals for the date's weekday (and the
//!    requested staff member, if any); validate them.
//! 2. For each interval, walk aligned minutes from its start up to
//!    `end - (duration + buffer)` inclusive.
//! 3. Skip starts at or before `now`.
//! 4. A start is occupied when `[start, start + duration)` overlaps the break,
//!    a booking held by the same staff, or a block for that staff (or for
//!    everyone).
//! 5. Interval scans are merged lazily by start time, then optionally
//!    collapsed to one slot per time and filtered to available slots.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::iter::{FusedIterator, Peekable};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::conflict::{Conflict, find_conflict, overlaps};
use crate::model::{CandidateSlot, DaySchedule, SlotFilter, SlotRequest, SlotView, WorkingInterval};
use crate::time::{local_instant, weekday_index};
use crate::types::{StaffId, ValidationError};

/// Computes the candidate slots for `request` over `day`.
///
/// Validation happens before any slot is produced; the returned iterator is
/// lazy, sorted by start time, and cannot be restarted. A day without
/// matching working intervals yields no slots.
pub fn generate_slots<'a>(
    request: &'a SlotRequest,
    day: &'a DaySchedule,
) -> Result<Slots<'a>, ValidationError> {
    request.validate()?;

    let weekday = weekday_index(request.date);
    let mut staff_order: Vec<&StaffId> = Vec::new();
    let mut windows = Vec::new();

    for interval in &day.working {
        if !interval.active || interval.weekday != weekday {
            continue;
        }
        if request
            .staff_id
            .as_ref()
            .is_some_and(|staff| *staff != interval.staff_id)
        {
            continue;
        }
        interval.validate()?;

        let order = staff_order
            .iter()
            .position(|s| **s == interval.staff_id)
            .unwrap_or_else(|| {
                staff_order.push(&interval.staff_id);
                staff_order.len() - 1
            });
        if let Some(window) = Window::new(interval, order, request) {
            windows.push(window);
        }
    }

    tracing::debug!(
        date = %request.date,
        weekday,
        staff = staff_order.len(),
        windows = windows.len(),
        "scanning working intervals"
    );

    Ok(Slots {
        scan: StaffScan::new(request, day, windows).peekable(),
        view: request.view,
        filter: request.filter,
    })
}

/// One working interval's range of aligned start minutes.
#[derive(Debug)]
struct Window<'a> {
    interval: &'a WorkingInterval,
    /// Position of the staff member in scan order, for tie-breaking.
    order: usize,
    first_minute: u32,
    last_minute: u32,
}

impl<'a> Window<'a> {
    fn new(interval: &'a WorkingInterval, order: usize, request: &SlotRequest) -> Option<Self> {
        let span = request
            .service_duration_minutes
            .saturating_add(request.buffer_minutes);
        let last_minute = interval.end_minute.checked_sub(span)?;
        let step = request.slot_granularity_minutes;
        let first_minute = interval.start_minute.div_ceil(step).checked_mul(step)?;
        (first_minute <= last_minute).then_some(Self {
            interval,
            order,
            first_minute,
            last_minute,
        })
    }
}

/// K-way merge of all window scans, ordered by (minute, staff order, window).
struct StaffScan<'a> {
    request: &'a SlotRequest,
    day: &'a DaySchedule,
    windows: Vec<Window<'a>>,
    heap: BinaryHeap<Reverse<(u32, usize, usize)>>,
}

impl<'a> StaffScan<'a> {
    fn new(request: &'a SlotRequest, day: &'a DaySchedule, windows: Vec<Window<'a>>) -> Self {
        let heap = windows
            .iter()
            .enumerate()
            .map(|(index, w)| Reverse((w.first_minute, w.order, index)))
            .collect();
        Self {
            request,
            day,
            windows,
            heap,
        }
    }

    fn conflict_at(
        &self,
        interval: &WorkingInterval,
        minute: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<Conflict<'a>> {
        let slot_end_minute = minute + self.request.service_duration_minutes;
        if let Some((start_minute, end_minute)) = interval
            .break_window()
            .filter(|&(bs, be)| overlaps(minute, slot_end_minute, bs, be))
        {
            return Some(Conflict::Break {
                start_minute,
                end_minute,
            });
        }
        let day = self.day;
        find_conflict(
            Some(&interval.staff_id),
            start,
            end,
            &day.bookings,
            &day.blocks,
        )
    }
}

impl Iterator for StaffScan<'_> {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<CandidateSlot> {
        let step = self.request.slot_granularity_minutes;
        let duration = Duration::minutes(i64::from(self.request.service_duration_minutes));

        loop {
            let Reverse((minute, order, index)) = self.heap.pop()?;
            let window = &self.windows[index];
            let interval = window.interval;
            if let Some(next) = minute
                .checked_add(step)
                .filter(|next| *next <= window.last_minute)
            {
                self.heap.push(Reverse((next, order, index)));
            }

            let start = local_instant(self.request.date, minute);
            if start <= self.request.now {
                continue;
            }
            let end = start + duration;

            let conflict = self.conflict_at(interval, minute, start, end);
            if let Some(conflict) = &conflict {
                tracing::trace!(staff = %interval.staff_id, minute, %conflict, "slot occupied");
            }

            return Some(CandidateSlot {
                start,
                end,
                available: conflict.is_none(),
                staff_id: Some(interval.staff_id.clone()),
            });
        }
    }
}

/// Lazy, ordered sequence of candidate slots produced by [`generate_slots`].
pub struct Slots<'a> {
    scan: Peekable<StaffScan<'a>>,
    view: SlotView,
    filter: SlotFilter,
}

impl Iterator for Slots<'_> {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<CandidateSlot> {
        loop {
            let mut slot = self.scan.next()?;

            if self.view == SlotView::AnyStaff {
                while let Some(other) = self.scan.next_if(|s| s.start == slot.start) {
                    if !slot.available && other.available {
                        slot = other;
                    }
                }
                if !slot.available {
                    slot.staff_id = None;
                }
            }

            if self.filter == SlotFilter::AvailableOnly && !slot.available {
                continue;
            }
            return Some(slot);
        }
    }
}

impl FusedIterator for Slots<'_> {}

/// Available and occupied slots split from a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotListing {
    pub available: Vec<CandidateSlot>,
    pub occupied: Vec<CandidateSlot>,
}

impl SlotListing {
    /// Partitions slots, preserving their order within each list.
    pub fn collect(slots: impl IntoIterator<Item = CandidateSlot>) -> Self {
        let (available, occupied) = slots.into_iter().partition(|slot| slot.available);
        Self {
            available,
            occupied,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.occupied.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone};

    use crate::model::{BlockInterval, BookedInterval};
    use crate::time::minute_of_day;

    /// Monday.
    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid test date")
    }

    const fn hm(hour: u32, minute: u32) -> u32 {
        hour * 60 + minute
    }

    fn local(hour: u32, minute: u32) -> DateTime<Utc> {
        local_instant(day(), hm(hour, minute))
    }

    fn day_before() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn staff(id: &str) -> StaffId {
        StaffId::new(id).unwrap()
    }

    fn monday(id: &str, start: u32, end: u32) -> WorkingInterval {
        WorkingInterval::new(staff(id), 1, start, end)
    }

    fn booking(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BookedInterval {
        BookedInterval::new(Some(staff(id)), start, end)
    }

    fn request(duration: u32) -> SlotRequest {
        SlotRequest::new(day(), duration, day_before())
    }

    fn starts(slots: &[CandidateSlot]) -> Vec<u32> {
        slots.iter().map(|s| minute_of_day(s.start)).collect()
    }

    fn run(request: &SlotRequest, schedule: &DaySchedule) -> Vec<CandidateSlot> {
        generate_slots(request, schedule)
            .expect("valid request")
            .collect()
    }

    #[test]
    fn test_booking_marks_overlapping_starts_occupied() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(18, 0))],
            bookings: vec![booking("ana", local(10, 0), local(10, 30))],
            blocks: vec![],
        };
        let slots = run(&request(30), &schedule);

        assert_eq!(slots.first().map(|s| s.start), Some(local(9, 0)));
        // 18:00 - (30 + 10) = 17:20, aligned down to 17:15.
        assert_eq!(slots.last().map(|s| s.start), Some(local(17, 15)));
        assert_eq!(slots.len(), 34);

        let listing = SlotListing::collect(slots);
        assert_eq!(
            starts(&listing.occupied),
            vec![hm(9, 45), hm(10, 0), hm(10, 15)]
        );
        let available = starts(&listing.available);
        assert!(available.contains(&hm(9, 30)));
        assert!(available.contains(&hm(10, 30)));
    }

    #[test]
    fn test_slot_duration_excludes_buffer() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(12, 0))],
            ..DaySchedule::default()
        };
        let slots = run(&request(45), &schedule);
        assert!(
            slots
                .iter()
                .all(|s| s.end - s.start == Duration::minutes(45))
        );
    }

    #[test]
    fn test_break_blocks_every_overlapping_start() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(18, 0)).with_break(hm(12, 0), hm(13, 0)),
            ],
            ..DaySchedule::default()
        };
        let listing = SlotListing::collect(run(&request(60), &schedule));
        let available = starts(&listing.available);

        assert!(available.contains(&hm(11, 0)));
        assert!(available.contains(&hm(13, 0)));
        assert!(
            available
                .iter()
                .all(|m| !(hm(11, 1)..=hm(12, 59)).contains(m))
        );
        assert_eq!(
            starts(&listing.occupied),
            (hm(11, 15)..hm(13, 0)).step_by(15).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_past_starts_are_not_offered() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(12, 0))],
            ..DaySchedule::default()
        };

        let at_ten = SlotRequest {
            now: local(10, 0),
            ..request(30)
        };
        let slots = run(&at_ten, &schedule);
        assert_eq!(slots.first().map(|s| s.start), Some(local(10, 15)));
        assert!(slots.iter().all(|s| s.start > at_ten.now));

        let later = SlotRequest {
            now: local(10, 5),
            ..request(30)
        };
        assert_eq!(
            run(&later, &schedule).first().map(|s| s.start),
            Some(local(10, 15))
        );
    }

    #[test]
    fn test_back_to_back_booking_does_not_block() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(12, 0))],
            bookings: vec![booking("ana", local(9, 0), local(10, 0))],
            blocks: vec![],
        };
        let slots = run(&request(30), &schedule);
        let ten = slots.iter().find(|s| s.start == local(10, 0)).unwrap();
        assert!(ten.available);
        let nine_45 = slots.iter().find(|s| s.start == local(9, 45)).unwrap();
        assert!(!nine_45.available);
    }

    #[test]
    fn test_bookings_of_other_staff_are_ignored() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(12, 0))],
            bookings: vec![booking("bruno", local(9, 0), local(12, 0))],
            blocks: vec![],
        };
        assert!(run(&request(30), &schedule).iter().all(|s| s.available));
    }

    #[test]
    fn test_unassigned_booking_blocks_every_staff() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(12, 0)),
                monday("bruno", hm(9, 0), hm(12, 0)),
            ],
            bookings: vec![BookedInterval::new(None, local(9, 0), local(9, 30))],
            blocks: vec![],
        };
        let occupied: Vec<_> = run(&request(30), &schedule)
            .into_iter()
            .filter(|s| !s.available)
            .collect();
        // 09:00 and 09:15 overlap the booking, for both staff members.
        assert_eq!(occupied.len(), 4);
        assert!(
            occupied
                .iter()
                .all(|s| s.start == local(9, 0) || s.start == local(9, 15))
        );
    }

    #[test]
    fn test_tenant_block_applies_to_all_and_staff_block_to_one() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(12, 0)),
                monday("bruno", hm(9, 0), hm(12, 0)),
            ],
            bookings: vec![],
            blocks: vec![
                BlockInterval::new(None, local(9, 0), local(9, 30)),
                BlockInterval::new(Some(staff("bruno")), local(11, 0), local(11, 30)),
            ],
        };
        let slots = run(&request(30), &schedule);
        let occupied: Vec<(u32, String)> = slots
            .iter()
            .filter(|s| !s.available)
            .map(|s| {
                (
                    minute_of_day(s.start),
                    s.staff_id.as_ref().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            occupied,
            vec![
                (hm(9, 0), "ana".to_string()),
                (hm(9, 0), "bruno".to_string()),
                (hm(9, 15), "ana".to_string()),
                (hm(9, 15), "bruno".to_string()),
                (hm(10, 45), "bruno".to_string()),
                (hm(11, 0), "bruno".to_string()),
                (hm(11, 15), "bruno".to_string()),
            ]
        );
    }

    #[test]
    fn test_staff_filter_restricts_scan() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(12, 0)),
                monday("bruno", hm(13, 0), hm(15, 0)),
            ],
            ..DaySchedule::default()
        };
        let slots = run(&request(30).with_staff(staff("bruno")), &schedule);
        assert!(!slots.is_empty());
        assert!(slots.iter().all(|s| s.staff_id == Some(staff("bruno"))));
        assert_eq!(slots.first().map(|s| s.start), Some(local(13, 0)));
    }

    #[test]
    fn test_per_staff_view_orders_by_time_then_staff() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(10, 0)),
                monday("bruno", hm(8, 30), hm(9, 40)),
            ],
            ..DaySchedule::default()
        };
        let slots = run(&request(20).with_buffer(0), &schedule);
        let view: Vec<(u32, String)> = slots
            .iter()
            .map(|s| {
                (
                    minute_of_day(s.start),
                    s.staff_id.as_ref().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            view,
            vec![
                (hm(8, 30), "bruno".to_string()),
                (hm(8, 45), "bruno".to_string()),
                (hm(9, 0), "ana".to_string()),
                (hm(9, 0), "bruno".to_string()),
                (hm(9, 15), "ana".to_string()),
                (hm(9, 15), "bruno".to_string()),
                (hm(9, 30), "ana".to_string()),
            ]
        );
    }

    #[test]
    fn test_any_staff_view_is_available_when_one_staff_is_free() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(18, 0)),
                monday("bruno", hm(9, 0), hm(18, 0)),
            ],
            bookings: vec![booking("ana", local(9, 0), local(18, 0))],
            blocks: vec![],
        };

        let per_staff = run(&request(30), &schedule);
        assert_eq!(per_staff.len(), 68);
        assert_eq!(per_staff.iter().filter(|s| s.available).count(), 34);

        let any = run(&request(30).with_view(SlotView::AnyStaff), &schedule);
        assert_eq!(any.len(), 34);
        assert!(any.iter().all(|s| s.available));
        assert!(any.iter().all(|s| s.staff_id == Some(staff("bruno"))));
        assert!(any.windows(2).all(|pair| pair[0].start < pair[1].start));
    }

    #[test]
    fn test_any_staff_view_prefers_first_staff_in_scan_order() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(10, 0)),
                monday("bruno", hm(9, 0), hm(10, 0)),
            ],
            ..DaySchedule::default()
        };
        let any = run(&request(30).with_view(SlotView::AnyStaff), &schedule);
        assert!(any.iter().all(|s| s.staff_id == Some(staff("ana"))));
    }

    #[test]
    fn test_any_staff_view_marks_time_occupied_when_everyone_is_busy() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(11, 0)),
                monday("bruno", hm(9, 0), hm(11, 0)),
            ],
            bookings: vec![],
            blocks: vec![BlockInterval::new(None, local(9, 0), local(9, 30))],
        };
        let any = run(&request(30).with_view(SlotView::AnyStaff), &schedule);
        let first = &any[0];
        assert_eq!(first.start, local(9, 0));
        assert!(!first.available);
        assert_eq!(first.staff_id, None);

        let available_only = run(
            &request(30)
                .with_view(SlotView::AnyStaff)
                .with_filter(SlotFilter::AvailableOnly),
            &schedule,
        );
        assert_eq!(available_only.first().map(|s| s.start), Some(local(9, 30)));
    }

    #[test]
    fn test_available_only_filter_drops_occupied_slots() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(18, 0))],
            bookings: vec![booking("ana", local(10, 0), local(10, 30))],
            blocks: vec![],
        };
        let all = run(&request(30), &schedule);
        let available_only = request(30).with_filter(SlotFilter::AvailableOnly);
        let only = run(&available_only, &schedule);
        assert!(only.iter().all(|s| s.available));
        assert_eq!(only, SlotListing::collect(all).available);
    }

    #[test]
    fn test_closed_day_yields_no_slots() {
        let schedule = DaySchedule {
            working: vec![WorkingInterval::new(staff("ana"), 2, hm(9, 0), hm(18, 0))],
            ..DaySchedule::default()
        };
        assert!(run(&request(30), &schedule).is_empty());
        assert!(SlotListing::collect(run(&request(30), &schedule)).is_empty());
    }

    #[test]
    fn test_inactive_interval_is_ignored() {
        let mut interval = monday("ana", hm(9, 0), hm(18, 0));
        interval.active = false;
        let schedule = DaySchedule {
            working: vec![interval],
            ..DaySchedule::default()
        };
        assert!(run(&request(30), &schedule).is_empty());
    }

    #[test]
    fn test_unaligned_start_rounds_up_to_granularity() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 10), hm(11, 0))],
            ..DaySchedule::default()
        };
        let slots = run(&request(30), &schedule);
        assert_eq!(slots.first().map(|s| s.start), Some(local(9, 15)));
        assert!(starts(&slots).iter().all(|m| m % 15 == 0));
    }

    #[test]
    fn test_window_shorter_than_service_and_buffer_is_empty() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(9, 30))],
            ..DaySchedule::default()
        };
        assert!(run(&request(30), &schedule).is_empty());
        let no_buffer = run(&request(30).with_buffer(0), &schedule);
        assert_eq!(starts(&no_buffer), vec![hm(9, 0)]);
    }

    #[test]
    fn test_split_shift_leaves_gap() {
        let schedule = DaySchedule {
            working: vec![
                monday("ana", hm(9, 0), hm(12, 0)),
                monday("ana", hm(14, 0), hm(16, 0)),
            ],
            ..DaySchedule::default()
        };
        let slots = run(&request(30), &schedule);
        let minutes = starts(&slots);
        assert!(minutes.contains(&hm(11, 15)));
        assert!(!minutes.contains(&hm(11, 30)));
        assert!(minutes.iter().all(|m| !(hm(11, 16)..hm(14, 0)).contains(m)));
        assert_eq!(minutes.last(), Some(&hm(15, 15)));
    }

    #[test]
    fn test_identical_inputs_give_identical_output() {
        let schedule = DaySchedule {
            working: vec![
                monday("bruno", hm(9, 0), hm(18, 0)).with_break(hm(12, 0), hm(13, 0)),
                monday("ana", hm(10, 0), hm(16, 0)),
            ],
            bookings: vec![booking("ana", local(11, 0), local(12, 0))],
            blocks: vec![BlockInterval::new(None, local(15, 0), local(15, 30))],
        };
        let req = request(45).with_view(SlotView::AnyStaff);
        assert_eq!(run(&req, &schedule), run(&req, &schedule));
    }

    #[test]
    fn test_iterator_is_lazy_and_fused() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(9, 0), hm(18, 0))],
            ..DaySchedule::default()
        };
        let req = request(30);
        let mut slots = generate_slots(&req, &schedule).unwrap();
        assert_eq!(slots.next().map(|s| s.start), Some(local(9, 0)));
        let rest: Vec<_> = slots.by_ref().collect();
        assert_eq!(rest.len(), 33);
        assert_eq!(slots.next(), None);
    }

    #[test]
    fn test_invalid_request_fails_before_scanning() {
        let schedule = DaySchedule::default();
        assert!(generate_slots(&request(0), &schedule).is_err());
        assert!(generate_slots(&request(30).with_granularity(0), &schedule).is_err());
    }

    #[test]
    fn test_invalid_interval_on_scanned_day_is_rejected() {
        let schedule = DaySchedule {
            working: vec![monday("ana", hm(18, 0), hm(9, 0))],
            ..DaySchedule::default()
        };
        assert!(matches!(
            generate_slots(&request(30), &schedule).err(),
            Some(ValidationError::InvalidWorkingInterval { .. })
        ));

        let other_day = DaySchedule {
            working: vec![WorkingInterval::new(staff("ana"), 3, hm(18, 0), hm(9, 0))],
            ..DaySchedule::default()
        };
        assert!(generate_slots(&request(30), &other_day).is_ok());
    }

    #[test]
    fn test_available_slots_never_touch_conflicts() {
        let intervals = vec![
            monday("ana", hm(8, 0), hm(17, 0)).with_break(hm(12, 0), hm(13, 0)),
            monday("bruno", hm(10, 10), hm(19, 0)).with_break(hm(14, 0), hm(14, 45)),
        ];
        let schedule = DaySchedule {
            working: intervals.clone(),
            bookings: vec![
                booking("ana", local(9, 10), local(9, 55)),
                booking("bruno", local(16, 0), local(17, 20)),
                booking("ana", local(15, 0), local(15, 30)),
            ],
            blocks: vec![
                BlockInterval::new(Some(staff("bruno")), local(11, 0), local(11, 40)),
                BlockInterval::new(None, local(18, 0), local(18, 30)),
            ],
        };
        let req = request(40).with_granularity(10).with_buffer(5);

        for slot in run(&req, &schedule) {
            let staff_id = slot.staff_id.clone().unwrap();
            let minute = minute_of_day(slot.start);
            assert_eq!(minute % 10, 0);
            let interval = intervals
                .iter()
                .find(|i| {
                    i.staff_id == staff_id
                        && i.start_minute <= minute
                        && minute <= i.end_minute - 45
                })
                .expect("slot lies within a working interval");

            if slot.available {
                assert!(interval.admits(minute, minute + 40));
                assert!(
                    find_conflict(
                        Some(&staff_id),
                        slot.start,
                        slot.end,
                        &schedule.bookings,
                        &schedule.blocks
                    )
                    .is_none()
                );
            }
        }
    }
}
