//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types and slot requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A duration or step that must be positive was zero.
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    /// A clock time could not be parsed as `HH:MM`.
    #[error("invalid time of day: {value} (expected HH:MM)")]
    InvalidTimeOfDay { value: String },

    /// A minute-of-day value outside `0..=1440`.
    #[error("minute of day out of range: {value}")]
    MinuteOutOfRange { value: u32 },

    /// A weekday index outside `0..=6`.
    #[error("weekday must be between 0 (Sunday) and 6 (Saturday), got {value}")]
    InvalidWeekday { value: u8 },

    /// A working interval whose start is not before its end.
    #[error("working interval for staff {staff_id} must start before it ends ({start}..{end})")]
    InvalidWorkingInterval {
        staff_id: String,
        start: u32,
        end: u32,
    },

    /// A break that is inverted or lies outside its working interval.
    #[error("break {start}..{end} for staff {staff_id} must be non-empty and inside working hours")]
    InvalidBreak {
        staff_id: String,
        start: u32,
        end: u32,
    },

    /// A time range whose end is not after its start.
    #[error("{field} must end after it starts")]
    InvalidRange { field: &'static str },

    /// A slot start that is not in the future.
    #[error("cannot book a slot in the past: {start}")]
    StartInPast { start: String },

    /// Invalid booking status value.
    #[error("invalid booking status: {value}")]
    InvalidBookingStatus { value: String },

    /// Invalid booking origin value.
    #[error("invalid booking origin: {value}")]
    InvalidBookingOrigin { value: String },
}

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation (e.g. payment pending).
    Pending,
    /// Confirmed by the business or the customer.
    Confirmed,
    /// The service was delivered.
    Completed,
    /// Cancelled before it happened.
    Cancelled,
    /// The customer did not show up.
    NoShow,
}

impl BookingStatus {
    /// Statuses whose bookings occupy their slot.
    pub const HOLDING: [Self; 2] = [Self::Pending, Self::Confirmed];

    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Whether a booking in this status blocks other bookings from its slot.
    #[must_use]
    pub const fn holds_slot(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(ValidationError::InvalidBookingStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// Where a booking was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingOrigin {
    /// The public booking page.
    Public,
    /// Staff or owner, through the admin calendar.
    Admin,
    /// Materialized from a recurring client.
    Recurring,
}

impl BookingOrigin {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Admin => "admin",
            Self::Recurring => "recurring",
        }
    }
}

impl fmt::Display for BookingOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingOrigin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "admin" => Ok(Self::Admin),
            "recurring" => Ok(Self::Recurring),
            _ => Err(ValidationError::InvalidBookingOrigin {
                value: s.to_string(),
            }),
        }
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated tenant (business) identifier.
    TenantId, "tenant ID"
);

define_string_id!(
    /// A validated staff member identifier.
    ///
    /// Staff IDs scope working intervals, bookings and blocks.
    StaffId, "staff ID"
);

define_string_id!(
    /// A validated service identifier.
    ServiceId, "service ID"
);

define_string_id!(
    /// A validated booking identifier.
    BookingId, "booking ID"
);

define_string_id!(
    /// A validated recurring client identifier.
    RecurringClientId, "recurring client ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_id_rejects_empty() {
        assert!(StaffId::new("").is_err());
        assert!(StaffId::new("   ").is_err());
        assert!(StaffId::new("ana").is_ok());
    }

    #[test]
    fn test_tenant_id_serde_roundtrip() {
        let id = TenantId::new("barbearia-centro").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"barbearia-centro\"");
        let parsed: TenantId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_staff_id_serde_rejects_empty() {
        let result: Result<StaffId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_staff_ids_order_lexicographically() {
        let a = StaffId::new("ana").unwrap();
        let b = StaffId::new("bruno").unwrap();
        assert!(a < b);
    }

    // ========== BookingStatus Tests ==========

    #[test]
    fn test_booking_status_from_str() {
        assert_eq!(
            "confirmed".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(
            "no_show".parse::<BookingStatus>().unwrap(),
            BookingStatus::NoShow
        );
        assert!("booked".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_only_pending_and_confirmed_hold_slots() {
        assert!(BookingStatus::Pending.holds_slot());
        assert!(BookingStatus::Confirmed.holds_slot());
        assert!(!BookingStatus::Completed.holds_slot());
        assert!(!BookingStatus::Cancelled.holds_slot());
        assert!(!BookingStatus::NoShow.holds_slot());
        assert!(BookingStatus::HOLDING.iter().all(BookingStatus::holds_slot));
    }

    #[test]
    fn test_booking_status_serializes_snake_case() {
        let json = serde_json::to_string(&BookingStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
    }

    // ========== BookingOrigin Tests ==========

    #[test]
    fn test_booking_origin_roundtrips_through_str() {
        for origin in [
            BookingOrigin::Public,
            BookingOrigin::Admin,
            BookingOrigin::Recurring,
        ] {
            assert_eq!(origin.as_str().parse::<BookingOrigin>().unwrap(), origin);
        }
        assert!("whatsapp".parse::<BookingOrigin>().is_err());
    }
}
