//! Core scheduling logic for agenda.
//!
//! This crate contains the fundamental types and logic for:
//! - Slots: computing bookable start times from working hours, bookings and blocks
//! - Conflicts: the half-open overlap rules shared with booking commit
//! - Recurring clients: turning standing weekly appointments into bookings
//!
//! Nothing here performs I/O; the stores live in `agenda-db`.

pub mod conflict;
pub mod model;
pub mod recurring;
mod slots;
pub mod time;
mod types;

pub use conflict::{Conflict, find_conflict, overlaps};
pub use model::{
    BlockInterval, BookedInterval, CandidateSlot, DEFAULT_BUFFER_MINUTES,
    DEFAULT_SLOT_GRANULARITY_MINUTES, DaySchedule, SlotFilter, SlotRequest, SlotView,
    WorkingInterval,
};
pub use recurring::{RecurringClient, RecurringPlan, plan_recurring};
pub use slots::{SlotListing, Slots, generate_slots};
pub use types::{
    BookingId, BookingOrigin, BookingStatus, RecurringClientId, ServiceId, StaffId, TenantId,
    ValidationError,
};
