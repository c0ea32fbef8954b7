//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Booking availability engine.
///
/// Manages tenants, staff schedules and blocks, lists bookable slots and
/// commits bookings without double-booking.
#[derive(Debug, Parser)]
#[command(name = "agenda", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage tenants.
    #[command(subcommand)]
    Tenant(TenantAction),

    /// Manage services.
    #[command(subcommand)]
    Service(ServiceAction),

    /// Manage staff members.
    #[command(subcommand)]
    Staff(StaffAction),

    /// Manage weekly working hours.
    #[command(subcommand)]
    Schedule(ScheduleAction),

    /// Manage manual blocks.
    #[command(subcommand)]
    Block(BlockAction),

    /// List candidate slots for a service on a date.
    Slots(SlotsArgs),

    /// Book a slot.
    Book(BookArgs),

    /// Cancel a booking.
    Cancel {
        /// Booking ID.
        booking: String,
    },

    /// List a day's bookings.
    Bookings {
        #[arg(long)]
        tenant: String,

        /// Local date (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage recurring clients.
    #[command(subcommand)]
    Recurring(RecurringAction),

    /// Show database status.
    Status,
}

/// Tenant subcommands.
#[derive(Debug, Subcommand)]
pub enum TenantAction {
    /// Create or update a tenant.
    Add {
        /// Tenant ID (e.g. a URL slug).
        id: String,

        /// Display name.
        #[arg(long)]
        name: String,

        /// Minutes between candidate start times.
        #[arg(long)]
        granularity: Option<u32>,

        /// Minutes kept free after the last service of a shift.
        #[arg(long)]
        buffer: Option<u32>,
    },
    /// List tenants.
    List,
}

/// Service subcommands.
#[derive(Debug, Subcommand)]
pub enum ServiceAction {
    /// Add a service.
    Add {
        #[arg(long)]
        tenant: String,

        /// Service ID.
        id: String,

        #[arg(long)]
        name: String,

        /// Duration in minutes.
        #[arg(long)]
        duration: u32,

        /// Price in cents.
        #[arg(long, default_value_t = 0)]
        price: i64,
    },
}

/// Staff subcommands.
#[derive(Debug, Subcommand)]
pub enum StaffAction {
    /// Add a staff member.
    Add {
        #[arg(long)]
        tenant: String,

        /// Staff ID.
        id: String,

        #[arg(long)]
        name: String,
    },
    /// List a tenant's staff.
    List {
        #[arg(long)]
        tenant: String,
    },
}

/// Schedule subcommands.
#[derive(Debug, Subcommand)]
pub enum ScheduleAction {
    /// Add a working interval.
    Add {
        #[arg(long)]
        tenant: String,

        #[arg(long)]
        staff: String,

        /// Weekday: 0-6 (0 = Sunday) or a name such as `mon`.
        #[arg(long)]
        weekday: String,

        /// Start time (HH:MM).
        #[arg(long)]
        start: String,

        /// End time (HH:MM, `24:00` for midnight).
        #[arg(long)]
        end: String,

        /// Break start (HH:MM).
        #[arg(long, requires = "break_end")]
        break_start: Option<String>,

        /// Break end (HH:MM).
        #[arg(long, requires = "break_start")]
        break_end: Option<String>,
    },
    /// List a tenant's working intervals.
    List {
        #[arg(long)]
        tenant: String,
    },
}

/// Block subcommands.
#[derive(Debug, Subcommand)]
pub enum BlockAction {
    /// Block a period on a local date.
    Add {
        #[arg(long)]
        tenant: String,

        /// Staff member to block; omit to block everyone.
        #[arg(long)]
        staff: Option<String>,

        /// Local date (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// Start time (HH:MM).
        #[arg(long)]
        start: String,

        /// End time (HH:MM).
        #[arg(long)]
        end: String,

        #[arg(long)]
        reason: Option<String>,
    },
}

/// Arguments for `agenda slots`.
#[derive(Debug, Args)]
pub struct SlotsArgs {
    #[arg(long)]
    pub tenant: String,

    #[arg(long)]
    pub service: String,

    /// Local date (YYYY-MM-DD).
    #[arg(long)]
    pub date: String,

    /// Restrict to one staff member.
    #[arg(long)]
    pub staff: Option<String>,

    /// Collapse equal start times across staff.
    #[arg(long)]
    pub any_staff: bool,

    /// Hide occupied slots.
    #[arg(long)]
    pub available_only: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Current time (RFC 3339); defaults to the system clock.
    #[arg(long)]
    pub now: Option<String>,
}

/// Arguments for `agenda book`.
#[derive(Debug, Args)]
pub struct BookArgs {
    #[arg(long)]
    pub tenant: String,

    #[arg(long)]
    pub service: String,

    #[arg(long)]
    pub staff: Option<String>,

    /// Local date (YYYY-MM-DD).
    #[arg(long)]
    pub date: String,

    /// Local start time (HH:MM).
    #[arg(long)]
    pub time: String,

    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Customer phone.
    #[arg(long)]
    pub phone: String,

    /// Customer email.
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Record the booking as made by the business.
    #[arg(long)]
    pub admin: bool,

    /// Current time (RFC 3339); defaults to the system clock.
    #[arg(long)]
    pub now: Option<String>,
}

/// Recurring client subcommands.
#[derive(Debug, Subcommand)]
pub enum RecurringAction {
    /// Add a recurring client.
    Add {
        #[arg(long)]
        tenant: String,

        #[arg(long)]
        staff: String,

        /// Service whose duration applies.
        #[arg(long, required_unless_present = "duration")]
        service: Option<String>,

        /// Duration in minutes when no service is linked.
        #[arg(long)]
        duration: Option<u32>,

        /// Weekday: 0-6 (0 = Sunday) or a name such as `mon`.
        #[arg(long)]
        weekday: String,

        /// Local start time (HH:MM).
        #[arg(long)]
        time: String,

        /// First local date (YYYY-MM-DD).
        #[arg(long)]
        start_date: String,

        /// Client name.
        #[arg(long)]
        name: String,

        /// Client phone.
        #[arg(long)]
        phone: String,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Record today's ended recurring appointments as bookings.
    Run {
        #[arg(long)]
        tenant: String,

        /// Current time (RFC 3339); defaults to the system clock.
        #[arg(long)]
        now: Option<String>,
    },
}
