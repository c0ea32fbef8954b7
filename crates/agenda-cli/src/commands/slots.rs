//! Slots command for listing bookable start times.
//!
//! This module implements `agenda slots`, which prints the candidate slots of
//! a service on a local date either as a table or as JSON.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use agenda_core::time::{format_hhmm, minute_of_day, weekday_index};
use agenda_core::{CandidateSlot, ServiceId, SlotFilter, SlotListing, SlotView, StaffId, TenantId};
use agenda_db::{Database, SlotDefaults, SlotQuery};

use super::util::{parse_date, parse_now, weekday_name};
use crate::SlotsArgs;

/// JSON shape of `agenda slots --json`.
#[derive(Debug, Serialize)]
struct SlotsReport<'a> {
    tenant: &'a str,
    service: &'a str,
    date: NaiveDate,
    duration_minutes: u32,
    view: SlotView,
    #[serde(flatten)]
    slots: SlotListing,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    args: &SlotsArgs,
    defaults: SlotDefaults,
) -> Result<()> {
    let query = SlotQuery {
        tenant_id: TenantId::new(args.tenant.as_str())?,
        service_id: ServiceId::new(args.service.as_str())?,
        staff_id: args.staff.as_deref().map(StaffId::new).transpose()?,
        date: parse_date(&args.date)?,
        view: if args.any_staff {
            SlotView::AnyStaff
        } else {
            SlotView::PerStaff
        },
        filter: if args.available_only {
            SlotFilter::AvailableOnly
        } else {
            SlotFilter::All
        },
    };
    let now = parse_now(args.now.as_deref())?;

    let service = db.get_service(&query.tenant_id, &query.service_id)?;
    let slots = db
        .available_slots(&query, defaults, now)
        .context("failed to compute slots")?;

    if args.json {
        let report = SlotsReport {
            tenant: &args.tenant,
            service: &args.service,
            date: query.date,
            duration_minutes: service.duration_minutes,
            view: query.view,
            slots: SlotListing::collect(slots),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "{} ({} min) on {} ({})",
        service.name,
        service.duration_minutes,
        query.date,
        weekday_name(weekday_index(query.date))
    )?;
    if slots.is_empty() {
        writeln!(writer, "No slots.")?;
        return Ok(());
    }
    for slot in &slots {
        writeln!(writer, "{}", format_slot(slot))?;
    }
    let available = slots.iter().filter(|s| s.available).count();
    writeln!(
        writer,
        "{available} available, {} occupied",
        slots.len() - available
    )?;
    Ok(())
}

fn format_slot(slot: &CandidateSlot) -> String {
    let staff = slot.staff_id.as_ref().map_or("-", StaffId::as_str);
    let status = if slot.available {
        "available"
    } else {
        "occupied"
    };
    format!(
        "{}  {:<12}  {status}",
        format_hhmm(minute_of_day(slot.start)),
        staff
    )
}
