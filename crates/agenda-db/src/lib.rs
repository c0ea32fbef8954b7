//! Storage layer for agenda.
//!
//! Provides persistence for tenants, services, staff schedules, bookings,
//! blocks and recurring clients using `rusqlite`, and resolves slot queries
//! into the plain interval lists consumed by `agenda_core::generate_slots`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. Separate processes (or
//! separate `Database` instances) may open the same file; booking commits
//! take SQLite's write lock up front so that the availability re-check and
//! the insert happen atomically.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Instants are stored as TEXT in RFC 3339 UTC with millisecond precision
//! (e.g., `2025-03-10T12:00:00.000Z`). Lexicographic ordering matches
//! chronological ordering, so range filters are plain string comparisons.
//!
//! ## Local Times
//!
//! Schedule times (`start_time`, `break_start`, ...) are business-local
//! `HH:MM` strings and calendar dates are `YYYY-MM-DD`.
//!
//! ## Tenant Settings
//!
//! The `settings` column stores a JSON object ([`TenantSettings`]). Unknown
//! keys are ignored so the payload can grow without a migration.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use agenda_core::time::{
    format_hhmm, format_local, local_date, local_day_bounds, local_instant, parse_hhmm,
    weekday_index,
};
use agenda_core::{
    BlockInterval, BookedInterval, BookingId, BookingOrigin, BookingStatus, CandidateSlot,
    DEFAULT_BUFFER_MINUTES, DEFAULT_SLOT_GRANULARITY_MINUTES, DaySchedule, RecurringClient,
    RecurringClientId, ServiceId, SlotFilter, SlotRequest, SlotView, StaffId, TenantId,
    ValidationError, WorkingInterval, find_conflict, generate_slots, plan_recurring,
};

/// SQL list of the statuses whose bookings hold their slot.
const HOLDING_STATUSES_SQL: &str = "('pending', 'confirmed')";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Input or stored data failed domain validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A referenced tenant, service, staff member or booking does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// The requested slot conflicts with a booking or block.
    #[error("slot at {start} is no longer available: {reason}")]
    SlotUnavailable { start: String, reason: String },
    /// The requested slot is outside the staff member's working hours.
    #[error("staff {staff_id} is not working at {start}")]
    OutsideWorkingHours { staff_id: String, start: String },
    /// Failed to parse a stored timestamp or date.
    #[error("invalid {column} value: {value}")]
    TimestampParse {
        column: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Tenant settings JSON could not be read or written.
    #[error("invalid settings for tenant {tenant_id}")]
    InvalidSettings {
        tenant_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DbError {
    fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Per-tenant overrides for slot generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_granularity_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_minutes: Option<u32>,
}

impl TenantSettings {
    /// Applies these overrides on top of `defaults`. A granularity of 0
    /// counts as unset.
    #[must_use]
    pub fn resolve(self, defaults: SlotDefaults) -> SlotDefaults {
        SlotDefaults {
            slot_granularity_minutes: self
                .slot_granularity_minutes
                .filter(|m| *m > 0)
                .unwrap_or(defaults.slot_granularity_minutes),
            buffer_minutes: self.buffer_minutes.unwrap_or(defaults.buffer_minutes),
        }
    }
}

/// A business using the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    pub id: TenantId,
    pub name: String,
    pub settings: TenantSettings,
}

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub tenant_id: TenantId,
    pub name: String,
    pub duration_minutes: u32,
    pub price_cents: i64,
}

/// A professional who can be booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRecord {
    pub id: StaffId,
    pub tenant_id: TenantId,
    pub name: String,
}

/// A stored working interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub id: String,
    pub interval: WorkingInterval,
}

/// A manual block to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlock {
    pub tenant_id: TenantId,
    /// `None` blocks every staff member.
    pub staff_id: Option<StaffId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: Option<String>,
}

/// A booking request for a chosen slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub tenant_id: TenantId,
    pub service_id: ServiceId,
    pub staff_id: Option<StaffId>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    /// Local calendar date of the appointment.
    pub date: NaiveDate,
    /// Local minute of day at which the service starts.
    pub start_minute: u32,
    pub notes: Option<String>,
    pub origin: BookingOrigin,
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRecord {
    pub id: BookingId,
    pub tenant_id: TenantId,
    pub service_id: Option<ServiceId>,
    pub staff_id: Option<StaffId>,
    pub customer_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub origin: BookingOrigin,
}

/// A recurring client to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecurringClient {
    pub tenant_id: TenantId,
    pub staff_id: StaffId,
    /// When set, the service's duration wins over `duration_minutes`.
    pub service_id: Option<ServiceId>,
    pub duration_minutes: Option<u32>,
    pub weekday: u8,
    pub start_minute: u32,
    pub start_date: NaiveDate,
    pub client_name: String,
    pub client_phone: String,
    pub notes: Option<String>,
}

/// Parameters of an availability lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub tenant_id: TenantId,
    pub service_id: ServiceId,
    pub staff_id: Option<StaffId>,
    pub date: NaiveDate,
    pub view: SlotView,
    pub filter: SlotFilter,
}

/// Slot settings used when a tenant does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDefaults {
    pub slot_granularity_minutes: u32,
    pub buffer_minutes: u32,
}

impl Default for SlotDefaults {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
        }
    }
}

/// Summary of a recurring-bookings run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecurringRunStats {
    pub created: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Row counts shown by `agenda status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub tenants: i64,
    pub services: i64,
    pub staff: i64,
    pub schedules: i64,
    pub holding_bookings: i64,
    pub blocks: i64,
    pub recurring_clients: i64,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tenants (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                settings TEXT NOT NULL DEFAULT '{}'
            );

            CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                price_cents INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS staff (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE
            );

            -- Working intervals
            -- weekday: 0 = Sunday .. 6 = Saturday
            -- start_time/end_time/break_*: business-local 'HH:MM'
            CREATE TABLE IF NOT EXISTS schedules (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                staff_id TEXT NOT NULL,
                weekday INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                break_start TEXT,
                break_end TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE,
                FOREIGN KEY (staff_id) REFERENCES staff(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_schedules_day ON schedules(tenant_id, weekday);

            CREATE TABLE IF NOT EXISTS customers (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                email TEXT,
                UNIQUE (tenant_id, phone),
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE
            );

            -- starts_at/ends_at: RFC 3339 UTC instants
            -- status: pending, confirmed, completed, cancelled, no_show
            -- created_via: public, admin, recurring
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                service_id TEXT,
                staff_id TEXT,
                customer_id TEXT NOT NULL,
                starts_at TEXT NOT NULL,
                ends_at TEXT NOT NULL,
                status TEXT NOT NULL,
                notes TEXT,
                created_via TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE,
                FOREIGN KEY (service_id) REFERENCES services(id) ON DELETE SET NULL,
                FOREIGN KEY (staff_id) REFERENCES staff(id) ON DELETE SET NULL,
                FOREIGN KEY (customer_id) REFERENCES customers(id)
            );

            CREATE INDEX IF NOT EXISTS idx_bookings_range ON bookings(tenant_id, starts_at);
            CREATE INDEX IF NOT EXISTS idx_bookings_staff ON bookings(staff_id);

            -- staff_id NULL blocks every staff member
            CREATE TABLE IF NOT EXISTS blocks (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                staff_id TEXT,
                starts_at TEXT NOT NULL,
                ends_at TEXT NOT NULL,
                reason TEXT,
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE,
                FOREIGN KEY (staff_id) REFERENCES staff(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_blocks_range ON blocks(tenant_id, starts_at);

            CREATE TABLE IF NOT EXISTS recurring_clients (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                staff_id TEXT NOT NULL,
                service_id TEXT,
                duration_minutes INTEGER,
                weekday INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                start_date TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                client_name TEXT NOT NULL,
                client_phone TEXT NOT NULL,
                notes TEXT,
                FOREIGN KEY (tenant_id) REFERENCES tenants(id) ON DELETE CASCADE,
                FOREIGN KEY (staff_id) REFERENCES staff(id) ON DELETE CASCADE,
                FOREIGN KEY (service_id) REFERENCES services(id) ON DELETE SET NULL
            );
            ",
        )?;
        Ok(())
    }

    // ========== Tenants, services, staff ==========

    /// Inserts or updates a tenant.
    pub fn upsert_tenant(&self, tenant: &TenantRecord) -> Result<(), DbError> {
        let settings =
            serde_json::to_string(&tenant.settings).map_err(|source| DbError::InvalidSettings {
                tenant_id: tenant.id.to_string(),
                source,
            })?;
        self.conn.execute(
            "
            INSERT INTO tenants (id, name, settings) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, settings = excluded.settings
            ",
            params![tenant.id.as_str(), tenant.name, settings],
        )?;
        Ok(())
    }

    /// Looks up a tenant.
    pub fn get_tenant(&self, tenant_id: &TenantId) -> Result<TenantRecord, DbError> {
        query_tenant(&self.conn, tenant_id)
    }

    /// Lists tenants ordered by ID.
    pub fn list_tenants(&self) -> Result<Vec<TenantRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, settings FROM tenants ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut tenants = Vec::new();
        for row in rows {
            let (id, name, settings) = row?;
            let id = TenantId::new(id)?;
            let settings = parse_settings(&id, &settings)?;
            tenants.push(TenantRecord { id, name, settings });
        }
        Ok(tenants)
    }

    /// Inserts a service.
    pub fn insert_service(&self, service: &ServiceRecord) -> Result<(), DbError> {
        if service.duration_minutes == 0 {
            return Err(ValidationError::NotPositive {
                field: "service duration",
            }
            .into());
        }
        self.get_tenant(&service.tenant_id)?;
        self.conn.execute(
            "
            INSERT INTO services (id, tenant_id, name, duration_minutes, price_cents)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                service.id.as_str(),
                service.tenant_id.as_str(),
                service.name,
                service.duration_minutes,
                service.price_cents,
            ],
        )?;
        Ok(())
    }

    /// Looks up a service within a tenant.
    pub fn get_service(
        &self,
        tenant_id: &TenantId,
        service_id: &ServiceId,
    ) -> Result<ServiceRecord, DbError> {
        query_service(&self.conn, tenant_id, service_id)
    }

    /// Inserts a staff member.
    pub fn insert_staff(&self, staff: &StaffRecord) -> Result<(), DbError> {
        self.get_tenant(&staff.tenant_id)?;
        self.conn.execute(
            "INSERT INTO staff (id, tenant_id, name) VALUES (?1, ?2, ?3)",
            params![staff.id.as_str(), staff.tenant_id.as_str(), staff.name],
        )?;
        Ok(())
    }

    /// Lists a tenant's staff ordered by ID.
    pub fn list_staff(&self, tenant_id: &TenantId) -> Result<Vec<StaffRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM staff WHERE tenant_id = ?1 ORDER BY id ASC")?;
        let rows = stmt.query_map([tenant_id.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut staff = Vec::new();
        for row in rows {
            let (id, name) = row?;
            staff.push(StaffRecord {
                id: StaffId::new(id)?,
                tenant_id: tenant_id.clone(),
                name,
            });
        }
        Ok(staff)
    }

    // ========== Schedule store ==========

    /// Stores a working interval and returns its row ID.
    pub fn insert_schedule(
        &self,
        tenant_id: &TenantId,
        interval: &WorkingInterval,
    ) -> Result<String, DbError> {
        interval.validate()?;
        ensure_staff(&self.conn, tenant_id, &interval.staff_id)?;

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "
            INSERT INTO schedules
            (id, tenant_id, staff_id, weekday, start_time, end_time, break_start, break_end, active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                id,
                tenant_id.as_str(),
                interval.staff_id.as_str(),
                interval.weekday,
                format_hhmm(interval.start_minute),
                format_hhmm(interval.end_minute),
                interval.break_start_minute.map(format_hhmm),
                interval.break_end_minute.map(format_hhmm),
                interval.active,
            ],
        )?;
        tracing::debug!(%tenant_id, staff = %interval.staff_id, weekday = interval.weekday, "schedule stored");
        Ok(id)
    }

    /// Lists every stored working interval of a tenant, active or not.
    pub fn list_schedules(&self, tenant_id: &TenantId) -> Result<Vec<ScheduleRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, staff_id, weekday, start_time, end_time, break_start, break_end, active
            FROM schedules
            WHERE tenant_id = ?1
            ORDER BY weekday ASC, staff_id ASC, start_time ASC
            ",
        )?;
        let rows = stmt.query_map([tenant_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ScheduleRow {
                    staff_id: row.get(1)?,
                    weekday: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    break_start: row.get(5)?,
                    break_end: row.get(6)?,
                    active: row.get(7)?,
                },
            ))
        })?;
        let mut schedules = Vec::new();
        for row in rows {
            let (id, schedule) = row?;
            schedules.push(ScheduleRecord {
                id,
                interval: schedule.into_interval()?,
            });
        }
        Ok(schedules)
    }

    /// Active working intervals for a weekday, optionally for one staff member.
    pub fn working_intervals(
        &self,
        tenant_id: &TenantId,
        weekday: u8,
        staff_id: Option<&StaffId>,
    ) -> Result<Vec<WorkingInterval>, DbError> {
        query_working(&self.conn, tenant_id, weekday, staff_id)
    }

    // ========== Booking and block stores ==========

    /// Bookings in a holding status overlapping `[from, to)`.
    ///
    /// With a staff filter, unassigned bookings are included since they
    /// compete with every staff member.
    pub fn booked_intervals(
        &self,
        tenant_id: &TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        staff_id: Option<&StaffId>,
    ) -> Result<Vec<BookedInterval>, DbError> {
        query_booked(&self.conn, tenant_id, from, to, staff_id, true)
    }

    /// Blocks overlapping `[from, to)`, including tenant-wide blocks.
    pub fn block_intervals(
        &self,
        tenant_id: &TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        staff_id: Option<&StaffId>,
    ) -> Result<Vec<BlockInterval>, DbError> {
        query_blocks(&self.conn, tenant_id, from, to, staff_id)
    }

    /// Stores a manual block and returns its row ID.
    pub fn insert_block(&self, block: &NewBlock) -> Result<String, DbError> {
        if block.end <= block.start {
            return Err(ValidationError::InvalidRange { field: "block" }.into());
        }
        self.get_tenant(&block.tenant_id)?;
        if let Some(staff_id) = &block.staff_id {
            ensure_staff(&self.conn, &block.tenant_id, staff_id)?;
        }

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "
            INSERT INTO blocks (id, tenant_id, staff_id, starts_at, ends_at, reason)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                id,
                block.tenant_id.as_str(),
                block.staff_id.as_ref().map(StaffId::as_str),
                format_timestamp(block.start),
                format_timestamp(block.end),
                block.reason,
            ],
        )?;
        Ok(id)
    }

    /// Resolves everything the slot engine needs for one local day.
    pub fn day_schedule(
        &self,
        tenant_id: &TenantId,
        date: NaiveDate,
        staff_id: Option<&StaffId>,
    ) -> Result<DaySchedule, DbError> {
        let (from, to) = local_day_bounds(date);
        Ok(DaySchedule {
            working: query_working(&self.conn, tenant_id, weekday_index(date), staff_id)?,
            bookings: query_booked(&self.conn, tenant_id, from, to, staff_id, true)?,
            blocks: query_blocks(&self.conn, tenant_id, from, to, staff_id)?,
        })
    }

    /// Computes candidate slots for a tenant's service on a date.
    ///
    /// Fails with [`DbError::NotFound`] when the tenant, service or staff
    /// member cannot be resolved; a closed day yields an empty list.
    pub fn available_slots(
        &self,
        query: &SlotQuery,
        defaults: SlotDefaults,
        now: DateTime<Utc>,
    ) -> Result<Vec<CandidateSlot>, DbError> {
        let tenant = self.get_tenant(&query.tenant_id)?;
        let service = self.get_service(&query.tenant_id, &query.service_id)?;
        if let Some(staff_id) = &query.staff_id {
            ensure_staff(&self.conn, &query.tenant_id, staff_id)?;
        }

        let settings = tenant.settings.resolve(defaults);
        let request = SlotRequest {
            date: query.date,
            service_duration_minutes: service.duration_minutes,
            staff_id: query.staff_id.clone(),
            slot_granularity_minutes: settings.slot_granularity_minutes,
            buffer_minutes: settings.buffer_minutes,
            now,
            view: query.view,
            filter: query.filter,
        };
        let day = self.day_schedule(&query.tenant_id, query.date, query.staff_id.as_ref())?;
        let slots: Vec<CandidateSlot> = generate_slots(&request, &day)?.collect();

        tracing::debug!(
            tenant = %query.tenant_id,
            service = %query.service_id,
            date = %query.date,
            slots = slots.len(),
            available = slots.iter().filter(|s| s.available).count(),
            "computed slots"
        );
        Ok(slots)
    }

    // ========== Booking commit ==========

    /// Books a slot, re-checking availability atomically.
    ///
    /// The start must be one the slot engine would offer under the tenant's
    /// settings: aligned to the granularity, inside a working interval with
    /// room for the duration and buffer, clear of the break, and free of
    /// bookings and blocks. Without a staff member the first free one in
    /// scan order is booked.
    ///
    /// The checks and the insert run inside one `IMMEDIATE` transaction, so
    /// two concurrent commits for the same slot cannot both succeed.
    pub fn create_booking(
        &mut self,
        booking: &NewBooking,
        defaults: SlotDefaults,
        now: DateTime<Utc>,
    ) -> Result<BookingRecord, DbError> {
        if booking.customer_name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "customer name",
            }
            .into());
        }
        if booking.customer_phone.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "customer phone",
            }
            .into());
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let tenant = query_tenant(&tx, &booking.tenant_id)?;
        let service = query_service(&tx, &booking.tenant_id, &booking.service_id)?;
        let start = local_instant(booking.date, booking.start_minute);
        let end = start + Duration::minutes(i64::from(service.duration_minutes));
        if start <= now {
            return Err(ValidationError::StartInPast {
                start: format_local(start),
            }
            .into());
        }

        let staff_id = booking.staff_id.as_ref();
        if let Some(staff_id) = staff_id {
            ensure_staff(&tx, &booking.tenant_id, staff_id)?;
        }

        let (day_start, day_end) = local_day_bounds(booking.date);
        let (from, to) = (day_start.min(start), day_end.max(end));
        let day = DaySchedule {
            working: query_working(
                &tx,
                &booking.tenant_id,
                weekday_index(booking.date),
                staff_id,
            )?,
            bookings: query_booked(&tx, &booking.tenant_id, from, to, staff_id, true)?,
            blocks: query_blocks(&tx, &booking.tenant_id, from, to, staff_id)?,
        };

        if let Some(conflict) = staff_id.and_then(|staff_id| {
            find_conflict(Some(staff_id), start, end, &day.bookings, &day.blocks)
        }) {
            tracing::info!(tenant = %booking.tenant_id, %conflict, "booking rejected");
            return Err(DbError::SlotUnavailable {
                start: format_local(start),
                reason: conflict.to_string(),
            });
        }

        let settings = tenant.settings.resolve(defaults);
        let request = SlotRequest {
            date: booking.date,
            service_duration_minutes: service.duration_minutes,
            staff_id: booking.staff_id.clone(),
            slot_granularity_minutes: settings.slot_granularity_minutes,
            buffer_minutes: settings.buffer_minutes,
            now,
            view: SlotView::AnyStaff,
            filter: SlotFilter::All,
        };
        let offered = generate_slots(&request, &day)?.find(|slot| slot.start == start);
        let outside_hours = || DbError::OutsideWorkingHours {
            staff_id: staff_id.map_or_else(|| "any".to_string(), ToString::to_string),
            start: format_local(start),
        };
        let Some(slot) = offered else {
            tracing::info!(
                tenant = %booking.tenant_id,
                start = %format_local(start),
                "start not offered"
            );
            return Err(outside_hours());
        };
        if !slot.available {
            // A named staff member has no conflicts left here, only the break.
            if staff_id.is_some() {
                return Err(outside_hours());
            }
            return Err(DbError::SlotUnavailable {
                start: format_local(start),
                reason: "no staff member is free".to_string(),
            });
        }
        let customer_id = upsert_customer(
            &tx,
            &booking.tenant_id,
            &booking.customer_name,
            &booking.customer_phone,
            booking.customer_email.as_deref(),
        )?;
        let record = BookingRecord {
            id: BookingId::new(Uuid::new_v4().to_string())?,
            tenant_id: booking.tenant_id.clone(),
            service_id: Some(service.id),
            staff_id: slot.staff_id,
            customer_id,
            start,
            end,
            status: BookingStatus::Confirmed,
            notes: booking.notes.clone(),
            origin: booking.origin,
        };
        insert_booking(&tx, &record, now)?;
        tx.commit()?;

        tracing::info!(
            booking = %record.id,
            tenant = %record.tenant_id,
            start = %format_local(record.start),
            "booking created"
        );
        Ok(record)
    }

    /// Looks up a booking.
    pub fn get_booking(&self, booking_id: &BookingId) -> Result<BookingRecord, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
                [booking_id.as_str()],
                BookingRow::from_row,
            )
            .optional()?;
        row.ok_or_else(|| DbError::not_found("booking", booking_id))?
            .into_record()
    }

    /// Lists a tenant's bookings overlapping a local day, in any status.
    pub fn list_bookings(
        &self,
        tenant_id: &TenantId,
        date: NaiveDate,
    ) -> Result<Vec<BookingRecord>, DbError> {
        let (from, to) = local_day_bounds(date);
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE tenant_id = ?1 AND starts_at < ?3 AND ends_at > ?2
            ORDER BY starts_at ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map(
            params![
                tenant_id.as_str(),
                format_timestamp(from),
                format_timestamp(to)
            ],
            BookingRow::from_row,
        )?;
        let mut bookings = Vec::new();
        for row in rows {
            bookings.push(row?.into_record()?);
        }
        Ok(bookings)
    }

    /// Changes a booking's status; leaving a holding status frees the slot.
    pub fn set_booking_status(
        &self,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "UPDATE bookings SET status = ?1 WHERE id = ?2",
            params![status.as_str(), booking_id.as_str()],
        )?;
        if changed == 0 {
            return Err(DbError::not_found("booking", booking_id));
        }
        tracing::info!(booking = %booking_id, %status, "booking status changed");
        Ok(())
    }

    // ========== Recurring clients ==========

    /// Stores a recurring client and returns its ID.
    pub fn insert_recurring_client(
        &self,
        client: &NewRecurringClient,
    ) -> Result<RecurringClientId, DbError> {
        if client.weekday > 6 {
            return Err(ValidationError::InvalidWeekday {
                value: client.weekday,
            }
            .into());
        }
        if client.client_name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "client name",
            }
            .into());
        }
        ensure_staff(&self.conn, &client.tenant_id, &client.staff_id)?;
        match &client.service_id {
            Some(service_id) => {
                query_service(&self.conn, &client.tenant_id, service_id)?;
            }
            None if client.duration_minutes.unwrap_or(0) == 0 => {
                return Err(ValidationError::NotPositive {
                    field: "recurring duration",
                }
                .into());
            }
            None => {}
        }

        let id = RecurringClientId::new(Uuid::new_v4().to_string())?;
        self.conn.execute(
            "
            INSERT INTO recurring_clients
            (id, tenant_id, staff_id, service_id, duration_minutes, weekday, start_time,
             start_date, active, client_name, client_phone, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?11)
            ",
            params![
                id.as_str(),
                client.tenant_id.as_str(),
                client.staff_id.as_str(),
                client.service_id.as_ref().map(ServiceId::as_str),
                client.duration_minutes,
                client.weekday,
                format_hhmm(client.start_minute),
                format_date(client.start_date),
                client.client_name,
                client.client_phone,
                client.notes,
            ],
        )?;
        Ok(id)
    }

    /// Records today's ended recurring appointments as completed bookings.
    ///
    /// Safe to run repeatedly: an appointment that already has a booking for
    /// the same staff at the same time is skipped.
    pub fn process_recurring(
        &mut self,
        tenant_id: &TenantId,
        now: DateTime<Utc>,
    ) -> Result<RecurringRunStats, DbError> {
        let today = local_date(now);
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let (clients, services) = query_recurring(&tx, tenant_id, today)?;
        let (from, to) = local_day_bounds(today);
        let existing = query_booked(&tx, tenant_id, from, to, None, false)?;
        let plan = plan_recurring(&clients, &existing, now);

        for occurrence in &plan.to_create {
            let client = occurrence.client;
            let customer_id =
                find_or_insert_customer(&tx, tenant_id, &client.client_name, &client.client_phone)?;
            let record = BookingRecord {
                id: BookingId::new(Uuid::new_v4().to_string())?,
                tenant_id: tenant_id.clone(),
                service_id: services.get(&client.id).cloned().flatten(),
                staff_id: Some(client.staff_id.clone()),
                customer_id,
                start: occurrence.start,
                end: occurrence.end,
                status: BookingStatus::Completed,
                notes: Some(client.booking_notes()),
                origin: BookingOrigin::Recurring,
            };
            insert_booking(&tx, &record, now)?;
        }
        tx.commit()?;

        let stats = RecurringRunStats {
            created: plan.to_create.len(),
            skipped: plan.skipped.len(),
            total: plan.total(),
        };
        tracing::info!(
            tenant = %tenant_id,
            date = %today,
            created = stats.created,
            skipped = stats.skipped,
            "recurring bookings processed"
        );
        Ok(stats)
    }

    // ========== Summary ==========

    /// Counts rows per table.
    pub fn summary(&self) -> Result<StoreSummary, DbError> {
        let count = |sql: &str| -> Result<i64, DbError> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(StoreSummary {
            tenants: count("SELECT COUNT(*) FROM tenants")?,
            services: count("SELECT COUNT(*) FROM services")?,
            staff: count("SELECT COUNT(*) FROM staff")?,
            schedules: count("SELECT COUNT(*) FROM schedules")?,
            holding_bookings: count(
                format!("SELECT COUNT(*) FROM bookings WHERE status IN {HOLDING_STATUSES_SQL}")
                    .as_str(),
            )?,
            blocks: count("SELECT COUNT(*) FROM blocks")?,
            recurring_clients: count("SELECT COUNT(*) FROM recurring_clients")?,
        })
    }
}

// ========== Row helpers ==========

/// Raw `schedules` row before validation.
struct ScheduleRow {
    staff_id: String,
    weekday: u8,
    start_time: String,
    end_time: String,
    break_start: Option<String>,
    break_end: Option<String>,
    active: bool,
}

impl ScheduleRow {
    fn into_interval(self) -> Result<WorkingInterval, DbError> {
        Ok(WorkingInterval {
            staff_id: StaffId::new(self.staff_id)?,
            weekday: self.weekday,
            start_minute: parse_hhmm(&self.start_time)?,
            end_minute: parse_hhmm(&self.end_time)?,
            break_start_minute: self.break_start.as_deref().map(parse_hhmm).transpose()?,
            break_end_minute: self.break_end.as_deref().map(parse_hhmm).transpose()?,
            active: self.active,
        })
    }
}

const BOOKING_COLUMNS: &str =
    "id, tenant_id, service_id, staff_id, customer_id, starts_at, ends_at, status, notes, created_via";

/// Raw `bookings` row before validation.
struct BookingRow {
    id: String,
    tenant_id: String,
    service_id: Option<String>,
    staff_id: Option<String>,
    customer_id: String,
    starts_at: String,
    ends_at: String,
    status: String,
    notes: Option<String>,
    created_via: String,
}

impl BookingRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            service_id: row.get(2)?,
            staff_id: row.get(3)?,
            customer_id: row.get(4)?,
            starts_at: row.get(5)?,
            ends_at: row.get(6)?,
            status: row.get(7)?,
            notes: row.get(8)?,
            created_via: row.get(9)?,
        })
    }

    fn into_record(self) -> Result<BookingRecord, DbError> {
        Ok(BookingRecord {
            id: BookingId::new(self.id)?,
            tenant_id: TenantId::new(self.tenant_id)?,
            service_id: self.service_id.map(ServiceId::new).transpose()?,
            staff_id: self.staff_id.map(StaffId::new).transpose()?,
            customer_id: self.customer_id,
            start: parse_timestamp(&self.starts_at, "starts_at")?,
            end: parse_timestamp(&self.ends_at, "ends_at")?,
            status: self.status.parse()?,
            notes: self.notes,
            origin: self.created_via.parse()?,
        })
    }
}

fn query_tenant(conn: &Connection, tenant_id: &TenantId) -> Result<TenantRecord, DbError> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT name, settings FROM tenants WHERE id = ?1",
            [tenant_id.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (name, settings) = row.ok_or_else(|| DbError::not_found("tenant", tenant_id))?;
    Ok(TenantRecord {
        id: tenant_id.clone(),
        name,
        settings: parse_settings(tenant_id, &settings)?,
    })
}

fn parse_settings(tenant_id: &TenantId, settings: &str) -> Result<TenantSettings, DbError> {
    serde_json::from_str(settings).map_err(|source| DbError::InvalidSettings {
        tenant_id: tenant_id.to_string(),
        source,
    })
}

fn query_service(
    conn: &Connection,
    tenant_id: &TenantId,
    service_id: &ServiceId,
) -> Result<ServiceRecord, DbError> {
    let row: Option<(String, u32, i64)> = conn
        .query_row(
            "
            SELECT name, duration_minutes, price_cents
            FROM services
            WHERE tenant_id = ?1 AND id = ?2
            ",
            [tenant_id.as_str(), service_id.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let (name, duration_minutes, price_cents) =
        row.ok_or_else(|| DbError::not_found("service", service_id))?;
    Ok(ServiceRecord {
        id: service_id.clone(),
        tenant_id: tenant_id.clone(),
        name,
        duration_minutes,
        price_cents,
    })
}

fn ensure_staff(
    conn: &Connection,
    tenant_id: &TenantId,
    staff_id: &StaffId,
) -> Result<(), DbError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM staff WHERE tenant_id = ?1 AND id = ?2",
            [tenant_id.as_str(), staff_id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    exists
        .map(|_| ())
        .ok_or_else(|| DbError::not_found("staff", staff_id))
}

fn query_working(
    conn: &Connection,
    tenant_id: &TenantId,
    weekday: u8,
    staff_id: Option<&StaffId>,
) -> Result<Vec<WorkingInterval>, DbError> {
    let mut stmt = conn.prepare(
        "
        SELECT staff_id, weekday, start_time, end_time, break_start, break_end, active
        FROM schedules
        WHERE tenant_id = ?1 AND weekday = ?2 AND active = 1
          AND (?3 IS NULL OR staff_id = ?3)
        ORDER BY staff_id ASC, start_time ASC
        ",
    )?;
    let rows = stmt.query_map(
        params![tenant_id.as_str(), weekday, staff_id.map(StaffId::as_str)],
        |row| {
            Ok(ScheduleRow {
                staff_id: row.get(0)?,
                weekday: row.get(1)?,
                start_time: row.get(2)?,
                end_time: row.get(3)?,
                break_start: row.get(4)?,
                break_end: row.get(5)?,
                active: row.get(6)?,
            })
        },
    )?;
    let mut intervals = Vec::new();
    for row in rows {
        intervals.push(row?.into_interval()?);
    }
    Ok(intervals)
}

fn query_booked(
    conn: &Connection,
    tenant_id: &TenantId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    staff_id: Option<&StaffId>,
    holding_only: bool,
) -> Result<Vec<BookedInterval>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "
        SELECT staff_id, starts_at, ends_at
        FROM bookings
        WHERE tenant_id = ?1 AND starts_at < ?3 AND ends_at > ?2
          AND (?4 IS NULL OR staff_id = ?4 OR staff_id IS NULL)
          AND (?5 = 0 OR status IN {HOLDING_STATUSES_SQL})
        ORDER BY starts_at ASC, id ASC
        "
    ))?;
    let rows = stmt.query_map(
        params![
            tenant_id.as_str(),
            format_timestamp(from),
            format_timestamp(to),
            staff_id.map(StaffId::as_str),
            holding_only,
        ],
        |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    )?;
    let mut bookings = Vec::new();
    for row in rows {
        let (staff_id, starts_at, ends_at) = row?;
        bookings.push(BookedInterval {
            staff_id: staff_id.map(StaffId::new).transpose()?,
            start: parse_timestamp(&starts_at, "starts_at")?,
            end: parse_timestamp(&ends_at, "ends_at")?,
        });
    }
    Ok(bookings)
}

fn query_blocks(
    conn: &Connection,
    tenant_id: &TenantId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    staff_id: Option<&StaffId>,
) -> Result<Vec<BlockInterval>, DbError> {
    let mut stmt = conn.prepare(
        "
        SELECT staff_id, starts_at, ends_at
        FROM blocks
        WHERE tenant_id = ?1 AND starts_at < ?3 AND ends_at > ?2
          AND (?4 IS NULL OR staff_id = ?4 OR staff_id IS NULL)
        ORDER BY starts_at ASC, id ASC
        ",
    )?;
    let rows = stmt.query_map(
        params![
            tenant_id.as_str(),
            format_timestamp(from),
            format_timestamp(to),
            staff_id.map(StaffId::as_str),
        ],
        |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    )?;
    let mut blocks = Vec::new();
    for row in rows {
        let (staff_id, starts_at, ends_at) = row?;
        blocks.push(BlockInterval {
            staff_id: staff_id.map(StaffId::new).transpose()?,
            start: parse_timestamp(&starts_at, "starts_at")?,
            end: parse_timestamp(&ends_at, "ends_at")?,
        });
    }
    Ok(blocks)
}

type RecurringServices = HashMap<RecurringClientId, Option<ServiceId>>;

/// Recurring clients for the weekday of `today`, with their linked services.
fn query_recurring(
    conn: &Connection,
    tenant_id: &TenantId,
    today: NaiveDate,
) -> Result<(Vec<RecurringClient>, RecurringServices), DbError> {
    let mut stmt = conn.prepare(
        "
        SELECT rc.id, rc.staff_id, rc.service_id, COALESCE(s.duration_minutes, rc.duration_minutes),
               rc.weekday, rc.start_time, rc.start_date, rc.active,
               rc.client_name, rc.client_phone, rc.notes
        FROM recurring_clients rc
        LEFT JOIN services s ON s.id = rc.service_id
        WHERE rc.tenant_id = ?1 AND rc.weekday = ?2 AND rc.active = 1 AND rc.start_date <= ?3
        ORDER BY rc.start_time ASC, rc.id ASC
        ",
    )?;
    let rows = stmt.query_map(
        params![tenant_id.as_str(), weekday_index(today), format_date(today)],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<u32>>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, bool>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
                row.get::<_, Option<String>>(10)?,
            ))
        },
    )?;

    let mut clients = Vec::new();
    let mut services = HashMap::new();
    for row in rows {
        let (
            id,
            staff_id,
            service_id,
            duration,
            weekday,
            start_time,
            start_date,
            active,
            client_name,
            client_phone,
            notes,
        ) = row?;
        let Some(duration_minutes) = duration.filter(|d| *d > 0) else {
            tracing::warn!(recurring_client = %id, "recurring client has no duration, skipping");
            continue;
        };
        let id = RecurringClientId::new(id)?;
        services.insert(id.clone(), service_id.map(ServiceId::new).transpose()?);
        clients.push(RecurringClient {
            id,
            staff_id: StaffId::new(staff_id)?,
            weekday,
            start_minute: parse_hhmm(&start_time)?,
            duration_minutes,
            start_date: parse_date(&start_date, "start_date")?,
            active,
            client_name,
            client_phone,
            notes,
        });
    }
    Ok((clients, services))
}

/// Finds a customer by phone within the tenant, refreshing their details, or
/// creates one. Returns the customer ID.
fn upsert_customer(
    conn: &Connection,
    tenant_id: &TenantId,
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<String, DbError> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM customers WHERE tenant_id = ?1 AND phone = ?2",
            [tenant_id.as_str(), phone],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        conn.execute(
            "UPDATE customers SET name = ?1, email = COALESCE(?2, email) WHERE id = ?3",
            params![name, email, id],
        )?;
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO customers (id, tenant_id, name, phone, email) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, tenant_id.as_str(), name, phone, email],
    )?;
    Ok(id)
}

/// Finds a customer by phone within the tenant, leaving their details as they
/// are, or creates one. Returns the customer ID.
fn find_or_insert_customer(
    conn: &Connection,
    tenant_id: &TenantId,
    name: &str,
    phone: &str,
) -> Result<String, DbError> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM customers WHERE tenant_id = ?1 AND phone = ?2",
            [tenant_id.as_str(), phone],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO customers (id, tenant_id, name, phone) VALUES (?1, ?2, ?3, ?4)",
        params![id, tenant_id.as_str(), name, phone],
    )?;
    Ok(id)
}

fn insert_booking(
    conn: &Connection,
    record: &BookingRecord,
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    conn.execute(
        "
        INSERT INTO bookings
        (id, tenant_id, service_id, staff_id, customer_id, starts_at, ends_at, status, notes,
         created_via, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ",
        params![
            record.id.as_str(),
            record.tenant_id.as_str(),
            record.service_id.as_ref().map(ServiceId::as_str),
            record.staff_id.as_ref().map(StaffId::as_str),
            record.customer_id,
            format_timestamp(record.start),
            format_timestamp(record.end),
            record.status.as_str(),
            record.notes,
            record.origin.as_str(),
            format_timestamp(now),
        ],
    )?;
    Ok(())
}

fn parse_timestamp(value: &str, column: &'static str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            column,
            value: value.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date(value: &str, column: &'static str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| DbError::TimestampParse {
        column,
        value: value.to_string(),
        source,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
