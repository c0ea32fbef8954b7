//! Schedule, booking and block records consumed by the slot engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::overlaps;
use crate::time::MINUTES_PER_DAY;
use crate::types::{StaffId, ValidationError};

/// Default step between candidate start times.
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 15;

/// Default gap reserved after a service at the end of a shift.
pub const DEFAULT_BUFFER_MINUTES: u32 = 10;

const fn default_active() -> bool {
    true
}

/// One staff member's working window on one weekday.
///
/// Minutes are counted from local midnight. A split shift is modelled as
/// several intervals for the same staff and weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingInterval {
    pub staff_id: StaffId,

    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,

    pub start_minute: u32,
    pub end_minute: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end_minute: Option<u32>,

    #[serde(default = "default_active")]
    pub active: bool,
}

impl WorkingInterval {
    /// Creates an active interval without a break.
    pub const fn new(staff_id: StaffId, weekday: u8, start_minute: u32, end_minute: u32) -> Self {
        Self {
            staff_id,
            weekday,
            start_minute,
            end_minute,
            break_start_minute: None,
            break_end_minute: None,
            active: true,
        }
    }

    /// Adds a break to the interval.
    #[must_use]
    pub const fn with_break(mut self, start_minute: u32, end_minute: u32) -> Self {
        self.break_start_minute = Some(start_minute);
        self.break_end_minute = Some(end_minute);
        self
    }

    /// The break window, when both bounds are set.
    pub const fn break_window(&self) -> Option<(u32, u32)> {
        match (self.break_start_minute, self.break_end_minute) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Checks the interval invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weekday > 6 {
            return Err(ValidationError::InvalidWeekday {
                value: self.weekday,
            });
        }
        if self.end_minute > MINUTES_PER_DAY {
            return Err(ValidationError::MinuteOutOfRange {
                value: self.end_minute,
            });
        }
        if self.start_minute >= self.end_minute {
            return Err(ValidationError::InvalidWorkingInterval {
                staff_id: self.staff_id.to_string(),
                start: self.start_minute,
                end: self.end_minute,
            });
        }
        match self.break_window() {
            Some((start, end))
                if start >= end || start < self.start_minute || end > self.end_minute =>
            {
                Err(ValidationError::InvalidBreak {
                    staff_id: self.staff_id.to_string(),
                    start,
                    end,
                })
            }
            _ => Ok(()),
        }
    }

    /// Whether `[start_minute, end_minute)` fits inside working hours and
    /// clear of the break.
    pub fn admits(&self, start_minute: u32, end_minute: u32) -> bool {
        if start_minute < self.start_minute || end_minute > self.end_minute {
            return false;
        }
        self.break_window()
            .is_none_or(|(bs, be)| !overlaps(start_minute, end_minute, bs, be))
    }
}

/// A reserved period derived from a booking in a holding status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    /// `None` for bookings taken without a specific professional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookedInterval {
    pub const fn new(staff_id: Option<StaffId>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            staff_id,
            start,
            end,
        }
    }

    /// Whether this booking competes with `staff` for time.
    ///
    /// Unassigned bookings compete with everyone, and a staff-agnostic
    /// check (`staff = None`) considers every booking.
    pub fn applies_to(&self, staff: Option<&StaffId>) -> bool {
        match (&self.staff_id, staff) {
            (Some(own), Some(other)) => own == other,
            _ => true,
        }
    }
}

/// A manual unavailability window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInterval {
    /// `None` blocks every staff member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BlockInterval {
    pub const fn new(staff_id: Option<StaffId>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            staff_id,
            start,
            end,
        }
    }

    /// Whether this block applies to `staff`.
    pub fn applies_to(&self, staff: Option<&StaffId>) -> bool {
        match (&self.staff_id, staff) {
            (Some(own), Some(other)) => own == other,
            _ => true,
        }
    }
}

/// Everything known about one day, as resolved by the stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub working: Vec<WorkingInterval>,
    pub bookings: Vec<BookedInterval>,
    pub blocks: Vec<BlockInterval>,
}

/// A candidate start time for the requested service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,

    /// `start + service duration`; the buffer is not included.
    pub end: DateTime<Utc>,

    pub available: bool,

    /// The staff member this slot belongs to. In the any-staff view this is
    /// the first free staff member, or `None` when nobody is free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
}

/// How slots of several staff members are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotView {
    /// One slot per staff member and start time.
    #[default]
    PerStaff,
    /// One slot per start time, available if any staff member is free.
    AnyStaff,
}

/// Which slots the engine emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotFilter {
    /// Available and occupied slots.
    #[default]
    All,
    /// Only available slots.
    AvailableOnly,
}

/// Query parameters for one day's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub date: NaiveDate,
    pub service_duration_minutes: u32,

    /// Restrict the scan to one professional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,

    pub slot_granularity_minutes: u32,
    pub buffer_minutes: u32,

    /// Slots starting at or before this instant are not offered.
    pub now: DateTime<Utc>,

    #[serde(default)]
    pub view: SlotView,
    #[serde(default)]
    pub filter: SlotFilter,
}

impl SlotRequest {
    /// Creates a request with default granularity, buffer, view and filter.
    pub const fn new(date: NaiveDate, service_duration_minutes: u32, now: DateTime<Utc>) -> Self {
        Self {
            date,
            service_duration_minutes,
            staff_id: None,
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            now,
            view: SlotView::PerStaff,
            filter: SlotFilter::All,
        }
    }

    #[must_use]
    pub fn with_staff(mut self, staff_id: StaffId) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    #[must_use]
    pub const fn with_granularity(mut self, minutes: u32) -> Self {
        self.slot_granularity_minutes = minutes;
        self
    }

    #[must_use]
    pub const fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    #[must_use]
    pub const fn with_view(mut self, view: SlotView) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub const fn with_filter(mut self, filter: SlotFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Rejects requests the engine cannot scan.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.service_duration_minutes == 0 {
            return Err(ValidationError::NotPositive {
                field: "service duration",
            });
        }
        if self.slot_granularity_minutes == 0 {
            return Err(ValidationError::NotPositive {
                field: "slot granularity",
            });
        }
        if self.service_duration_minutes > MINUTES_PER_DAY {
            return Err(ValidationError::MinuteOutOfRange {
                value: self.service_duration_minutes,
            });
        }
        Ok(())
    }
}
