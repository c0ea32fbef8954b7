//! Recurring clients: standing weekly appointments.
//!
//! A recurring client keeps the same staff member, weekday and start time
//! every week. Once that day's slot has ended, the appointment is recorded
//! as a completed booking so it shows up in the calendar and in reports.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::BookedInterval;
use crate::time::{local_date, local_instant, weekday_index};
use crate::types::{RecurringClientId, StaffId};

/// Window around a recurring start inside which an existing booking counts
/// as already materialized.
const EXISTING_BOOKING_TOLERANCE_MINUTES: i64 = 1;

/// A customer with a standing weekly appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringClient {
    pub id: RecurringClientId,
    pub staff_id: StaffId,

    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,
    pub start_minute: u32,

    /// Duration of the service (or the client's own duration when no service
    /// is linked).
    pub duration_minutes: u32,

    /// First local date on which the arrangement applies.
    pub start_date: NaiveDate,
    pub active: bool,

    pub client_name: String,
    pub client_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecurringClient {
    /// Whether the arrangement applies on `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.active && self.start_date <= date && self.weekday == weekday_index(date)
    }

    /// The appointment's `[start, end)` on `date`.
    pub fn occurrence_on(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = local_instant(date, self.start_minute);
        let end = start + Duration::minutes(i64::from(self.duration_minutes));
        (start, end)
    }

    /// Booking notes marking the appointment as recurring.
    pub fn booking_notes(&self) -> String {
        self.notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map_or_else(
                || format!("Recurring client: {}", self.client_name),
                |notes| format!("Recurring client: {} | {notes}", self.client_name),
            )
    }
}

/// A booking to create for a recurring client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringOccurrence<'a> {
    pub client: &'a RecurringClient,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Why a recurring client was not materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The arrangement does not apply today.
    NotScheduled,
    /// Today's slot has not ended yet.
    NotEnded,
    /// A booking for the same staff already starts at that time.
    AlreadyBooked,
}

/// Outcome of planning one day's recurring bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringPlan<'a> {
    pub date: Option<NaiveDate>,
    pub to_create: Vec<RecurringOccurrence<'a>>,
    pub skipped: Vec<(&'a RecurringClient, SkipReason)>,
}

impl RecurringPlan<'_> {
    /// Number of clients considered.
    pub fn total(&self) -> usize {
        self.to_create.len() + self.skipped.len()
    }
}

/// Decides which recurring clients become bookings at `now`.
///
/// `existing` holds the day's bookings in any status; a booking for the same
/// staff starting within a minute of the recurring start means the
/// appointment was already recorded.
pub fn plan_recurring<'a>(
    clients: &'a [RecurringClient],
    existing: &[BookedInterval],
    now: DateTime<Utc>,
) -> RecurringPlan<'a> {
    let today = local_date(now);
    let tolerance = Duration::minutes(EXISTING_BOOKING_TOLERANCE_MINUTES);
    let mut plan = RecurringPlan {
        date: Some(today),
        ..RecurringPlan::default()
    };

    for client in clients {
        if !client.applies_on(today) {
            plan.skipped.push((client, SkipReason::NotScheduled));
            continue;
        }

        let (start, end) = client.occurrence_on(today);
        if end > now {
            tracing::debug!(client = %client.id, "recurring slot has not ended yet");
            plan.skipped.push((client, SkipReason::NotEnded));
            continue;
        }

        let already_booked = existing.iter().any(|b| {
            b.staff_id.as_ref() == Some(&client.staff_id)
                && b.start >= start
                && b.start < start + tolerance
        });
        if already_booked {
            tracing::debug!(client = %client.id, "recurring booking already exists");
            plan.skipped.push((client, SkipReason::AlreadyBooked));
            continue;
        }

        let occurrence = RecurringOccurrence { client, start, end };
        plan.to_create.push(occurrence);
    }

    plan
}
