//! Booking commands: commit a slot, cancel, and list a day's bookings.

use std::io::Write;

use anyhow::{Context, Result};

use agenda_core::time::{format_hhmm, format_local, minute_of_day};
use agenda_core::{BookingId, BookingOrigin, BookingStatus, ServiceId, StaffId, TenantId};
use agenda_db::{BookingRecord, Database, NewBooking, SlotDefaults};

use super::util::{parse_date, parse_now, parse_time};
use crate::BookArgs;

/// Books a slot. Without `--staff` the first free staff member is assigned.
pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &BookArgs,
    defaults: SlotDefaults,
) -> Result<()> {
    let booking = NewBooking {
        tenant_id: TenantId::new(args.tenant.as_str())?,
        service_id: ServiceId::new(args.service.as_str())?,
        staff_id: args.staff.as_deref().map(StaffId::new).transpose()?,
        customer_name: args.name.clone(),
        customer_phone: args.phone.clone(),
        customer_email: args.email.clone(),
        date: parse_date(&args.date)?,
        start_minute: parse_time(&args.time)?,
        notes: args.notes.clone(),
        origin: if args.admin {
            BookingOrigin::Admin
        } else {
            BookingOrigin::Public
        },
    };
    let now = parse_now(args.now.as_deref())?;

    let record = db.create_booking(&booking, defaults, now)?;
    writeln!(
        writer,
        "Booked {} until {}{}",
        format_local(record.start),
        format_hhmm(minute_of_day(record.end)),
        record
            .staff_id
            .as_ref()
            .map(|s| format!(" with {s}"))
            .unwrap_or_default(),
    )?;
    writeln!(writer, "Booking ID: {}", record.id)?;
    Ok(())
}

pub fn cancel<W: Write>(writer: &mut W, db: &Database, booking: &str) -> Result<()> {
    let id = BookingId::new(booking)?;
    db.set_booking_status(&id, BookingStatus::Cancelled)
        .with_context(|| format!("failed to cancel booking {booking}"))?;
    writeln!(writer, "Cancelled booking {id}")?;
    Ok(())
}

pub fn list<W: Write>(
    writer: &mut W,
    db: &Database,
    tenant: &str,
    date: &str,
    json: bool,
) -> Result<()> {
    let bookings = db.list_bookings(&TenantId::new(tenant)?, parse_date(date)?)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&bookings)?)?;
        return Ok(());
    }

    if bookings.is_empty() {
        writeln!(writer, "No bookings.")?;
        return Ok(());
    }
    for booking in &bookings {
        writeln!(writer, "{}", format_booking(booking))?;
    }
    Ok(())
}

fn format_booking(booking: &BookingRecord) -> String {
    format!(
        "{}-{}  {:<12}  {:<10}  {:<9}  {}",
        format_hhmm(minute_of_day(booking.start)),
        format_hhmm(minute_of_day(booking.end)),
        booking.staff_id.as_ref().map_or("-", StaffId::as_str),
        booking.status.as_str(),
        booking.origin.as_str(),
        booking.notes.as_deref().unwrap_or(""),
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use agenda_core::WorkingInterval;
    use agenda_db::{DbError, ServiceRecord, StaffRecord, TenantRecord, TenantSettings};
    use insta::assert_snapshot;

    const NOW: &str = "2025-03-09T12:00:00Z";

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        let tenant = TenantId::new("barbearia").unwrap();
        db.upsert_tenant(&TenantRecord {
            id: tenant.clone(),
            name: "Barbearia".to_string(),
            settings: TenantSettings::default(),
        })
        .unwrap();
        db.insert_service(&ServiceRecord {
            id: ServiceId::new("corte").unwrap(),
            tenant_id: tenant.clone(),
            name: "Corte".to_string(),
            duration_minutes: 30,
            price_cents: 0,
        })
        .unwrap();
        let ana = StaffId::new("ana").unwrap();
        db.insert_staff(&StaffRecord {
            id: ana.clone(),
            tenant_id: tenant.clone(),
            name: "Ana".to_string(),
        })
        .unwrap();
        db.insert_schedule(&tenant, &WorkingInterval::new(ana, 1, 540, 1080))
            .unwrap();
        db
    }

    fn args(time: &str, phone: &str) -> BookArgs {
        BookArgs {
            tenant: "barbearia".to_string(),
            service: "corte".to_string(),
            staff: Some("ana".to_string()),
            date: "2025-03-10".to_string(),
            time: time.to_string(),
            name: "Maria".to_string(),
            phone: phone.to_string(),
            email: None,
            notes: None,
            admin: false,
            now: Some(NOW.to_string()),
        }
    }

    fn book(db: &mut Database, args: &BookArgs) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, db, args, SlotDefaults::default())?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_book_prints_local_times_and_id() {
        let mut db = seeded();
        let output = book(&mut db, &args("10:00", "+5571911110000")).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("Booked 2025-03-10 10:00 until 10:30 with ana"));
        assert!(lines.next().unwrap().starts_with("Booking ID: "));
    }

    #[test]
    fn test_book_without_staff_assigns_a_free_one() {
        let mut db = seeded();
        let mut any = args("10:00", "+5571911110000");
        any.staff = None;
        let output = book(&mut db, &any).unwrap();
        assert!(output.starts_with("Booked 2025-03-10 10:00 until 10:30 with ana\n"));

        let err = book(&mut db, &args("03:00", "+5571922220000")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "staff ana is not working at 2025-03-10 03:00"
        );
    }

    #[test]
    fn test_second_booking_of_same_slot_fails() {
        let mut db = seeded();
        book(&mut db, &args("10:00", "+5571911110000")).unwrap();
        let err = book(&mut db, &args("10:00", "+5571922220000")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::SlotUnavailable { .. })
        ));
        assert_eq!(
            err.to_string(),
            "slot at 2025-03-10 10:00 is no longer available: \
             overlaps booking 2025-03-10 10:00 to 2025-03-10 10:30"
        );
    }

    #[test]
    fn test_cancel_then_list_shows_status() {
        let mut db = seeded();
        book(&mut db, &args("10:00", "+5571911110000")).unwrap();
        let mut admin = args("11:00", "+5571922220000");
        admin.admin = true;
        admin.notes = Some("first visit".to_string());
        book(&mut db, &admin).unwrap();

        let first = db
            .list_bookings(
                &TenantId::new("barbearia").unwrap(),
                parse_date("2025-03-10").unwrap(),
            )
            .unwrap()
            .remove(0);

        let mut output = Vec::new();
        cancel(&mut output, &db, first.id.as_str()).unwrap();
        let mut listing = Vec::new();
        list(&mut listing, &db, "barbearia", "2025-03-10", false).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("Cancelled booking {}\n", first.id)
        );
        assert_snapshot!(String::from_utf8(listing).unwrap(), @r"
        10:00-10:30  ana           cancelled   public
        11:00-11:30  ana           confirmed   admin      first visit
        ");
    }

    #[test]
    fn test_cancel_unknown_booking_fails() {
        let db = seeded();
        let mut output = Vec::new();
        let err = cancel(&mut output, &db, "missing").unwrap_err();
        assert_eq!(err.to_string(), "failed to cancel booking missing");
    }

    #[test]
    fn test_list_empty_day() {
        let db = seeded();
        let mut output = Vec::new();
        list(&mut output, &db, "barbearia", "2025-03-11", false).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No bookings.\n");
    }
}
