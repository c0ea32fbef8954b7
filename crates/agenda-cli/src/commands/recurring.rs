//! Recurring client commands.

use std::io::Write;

use anyhow::{Context, Result};

use agenda_core::time::{format_hhmm, local_date};
use agenda_core::{ServiceId, StaffId, TenantId};
use agenda_db::{Database, NewRecurringClient};

use super::util::{parse_date, parse_now, parse_time, parse_weekday, weekday_name};

/// Arguments of `agenda recurring add`, still as typed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct RecurringInput<'a> {
    pub tenant: &'a str,
    pub staff: &'a str,
    pub service: Option<&'a str>,
    pub duration: Option<u32>,
    pub weekday: &'a str,
    pub time: &'a str,
    pub start_date: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub notes: Option<&'a str>,
}

pub fn add<W: Write>(writer: &mut W, db: &Database, input: RecurringInput<'_>) -> Result<()> {
    let client = NewRecurringClient {
        tenant_id: TenantId::new(input.tenant)?,
        staff_id: StaffId::new(input.staff)?,
        service_id: input.service.map(ServiceId::new).transpose()?,
        duration_minutes: input.duration,
        weekday: parse_weekday(input.weekday)?,
        start_minute: parse_time(input.time)?,
        start_date: parse_date(input.start_date)?,
        client_name: input.name.to_string(),
        client_phone: input.phone.to_string(),
        notes: input.notes.map(str::to_string),
    };
    let id = db
        .insert_recurring_client(&client)
        .context("failed to add recurring client")?;
    writeln!(
        writer,
        "Added recurring client {}: {} every {} at {} with {}",
        id,
        client.client_name,
        weekday_name(client.weekday),
        format_hhmm(client.start_minute),
        client.staff_id
    )?;
    Ok(())
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    tenant: &str,
    now: Option<&str>,
) -> Result<()> {
    let tenant_id = TenantId::new(tenant)?;
    let now = parse_now(now)?;
    db.get_tenant(&tenant_id)?;
    let stats = db
        .process_recurring(&tenant_id, now)
        .context("failed to process recurring clients")?;
    writeln!(
        writer,
        "Recurring bookings for {tenant_id} on {}: {} created, {} skipped, {} total",
        local_date(now),
        stats.created,
        stats.skipped,
        stats.total
    )?;
    Ok(())
}
