//! Working hours and block commands.

use std::io::Write;

use anyhow::{Context, Result};

use agenda_core::time::{format_hhmm, local_instant};
use agenda_core::{StaffId, TenantId, WorkingInterval};
use agenda_db::{Database, NewBlock};

use super::util::{parse_date, parse_time, parse_weekday, weekday_name};

/// Arguments of `agenda schedule add`, still as typed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleInput<'a> {
    pub tenant: &'a str,
    pub staff: &'a str,
    pub weekday: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub break_start: Option<&'a str>,
    pub break_end: Option<&'a str>,
}

/// Adds a working interval.
pub fn add<W: Write>(writer: &mut W, db: &Database, input: ScheduleInput<'_>) -> Result<()> {
    let mut interval = WorkingInterval::new(
        StaffId::new(input.staff)?,
        parse_weekday(input.weekday)?,
        parse_time(input.start)?,
        parse_time(input.end)?,
    );
    if let (Some(start), Some(end)) = (input.break_start, input.break_end) {
        interval = interval.with_break(parse_time(start)?, parse_time(end)?);
    }

    db.insert_schedule(&TenantId::new(input.tenant)?, &interval)
        .context("failed to add working hours")?;
    writeln!(writer, "Added {}", describe(&interval))?;
    Ok(())
}

/// Lists a tenant's working intervals by weekday.
pub fn list<W: Write>(writer: &mut W, db: &Database, tenant: &str) -> Result<()> {
    let schedules = db.list_schedules(&TenantId::new(tenant)?)?;
    if schedules.is_empty() {
        writeln!(writer, "No working hours.")?;
        return Ok(());
    }
    for schedule in schedules {
        writeln!(writer, "{}", describe(&schedule.interval))?;
    }
    Ok(())
}

fn describe(interval: &WorkingInterval) -> String {
    let mut line = format!(
        "{}  {:<12}  {}-{}",
        weekday_name(interval.weekday),
        interval.staff_id.as_str(),
        format_hhmm(interval.start_minute),
        format_hhmm(interval.end_minute),
    );
    if let Some((start, end)) = interval.break_window() {
        line.push_str(&format!("  break {}-{}", format_hhmm(start), format_hhmm(end)));
    }
    if !interval.active {
        line.push_str("  (inactive)");
    }
    line
}

/// Arguments of `agenda block add`, still as typed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct BlockInput<'a> {
    pub tenant: &'a str,
    pub staff: Option<&'a str>,
    pub date: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub reason: Option<&'a str>,
}

/// Blocks a period of a local day for one staff member or everyone.
pub fn add_block<W: Write>(writer: &mut W, db: &Database, input: BlockInput<'_>) -> Result<()> {
    let date = parse_date(input.date)?;
    let block = NewBlock {
        tenant_id: TenantId::new(input.tenant)?,
        staff_id: input.staff.map(StaffId::new).transpose()?,
        start: local_instant(date, parse_time(input.start)?),
        end: local_instant(date, parse_time(input.end)?),
        reason: input.reason.map(str::to_string),
    };
    db.insert_block(&block).context("failed to add block")?;

    let who = block
        .staff_id
        .as_ref()
        .map_or_else(|| "everyone".to_string(), ToString::to_string);
    writeln!(
        writer,
        "Blocked {who} on {date} {}-{}",
        input.start, input.end
    )?;
    Ok(())
}
