//! Tenant, service and staff management commands.

use std::io::Write;

use anyhow::{Context, Result};

use agenda_core::{ServiceId, StaffId, TenantId};
use agenda_db::{Database, ServiceRecord, StaffRecord, TenantRecord, TenantSettings};

/// Creates or updates a tenant.
pub fn add_tenant<W: Write>(
    writer: &mut W,
    db: &Database,
    id: &str,
    name: &str,
    granularity: Option<u32>,
    buffer: Option<u32>,
) -> Result<()> {
    let tenant = TenantRecord {
        id: TenantId::new(id)?,
        name: name.to_string(),
        settings: TenantSettings {
            slot_granularity_minutes: granularity,
            buffer_minutes: buffer,
        },
    };
    db.upsert_tenant(&tenant)
        .with_context(|| format!("failed to save tenant {id}"))?;
    writeln!(writer, "Saved tenant {} ({})", tenant.id, tenant.name)?;
    Ok(())
}

/// Lists tenants with their slot settings.
pub fn list_tenants<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let tenants = db.list_tenants()?;
    if tenants.is_empty() {
        writeln!(writer, "No tenants.")?;
        return Ok(());
    }
    for tenant in tenants {
        writeln!(
            writer,
            "{:<16}  {:<24}  granularity={}  buffer={}",
            tenant.id.as_str(),
            tenant.name,
            setting(tenant.settings.slot_granularity_minutes),
            setting(tenant.settings.buffer_minutes),
        )?;
    }
    Ok(())
}

fn setting(value: Option<u32>) -> String {
    value.map_or_else(|| "default".to_string(), |m| format!("{m}m"))
}

/// Adds a service to a tenant.
pub fn add_service<W: Write>(
    writer: &mut W,
    db: &Database,
    tenant: &str,
    id: &str,
    name: &str,
    duration_minutes: u32,
    price_cents: i64,
) -> Result<()> {
    let service = ServiceRecord {
        id: ServiceId::new(id)?,
        tenant_id: TenantId::new(tenant)?,
        name: name.to_string(),
        duration_minutes,
        price_cents,
    };
    db.insert_service(&service)
        .with_context(|| format!("failed to add service {id}"))?;
    writeln!(
        writer,
        "Added service {}: {} ({} min)",
        service.id, service.name, service.duration_minutes
    )?;
    Ok(())
}

/// Adds a staff member to a tenant.
pub fn add_staff<W: Write>(
    writer: &mut W,
    db: &Database,
    tenant: &str,
    id: &str,
    name: &str,
) -> Result<()> {
    let staff = StaffRecord {
        id: StaffId::new(id)?,
        tenant_id: TenantId::new(tenant)?,
        name: name.to_string(),
    };
    db.insert_staff(&staff)
        .with_context(|| format!("failed to add staff {id}"))?;
    writeln!(writer, "Added staff {}: {}", staff.id, staff.name)?;
    Ok(())
}

/// Lists a tenant's staff.
pub fn list_staff<W: Write>(writer: &mut W, db: &Database, tenant: &str) -> Result<()> {
    let staff = db.list_staff(&TenantId::new(tenant)?)?;
    if staff.is_empty() {
        writeln!(writer, "No staff.")?;
        return Ok(());
    }
    for member in staff {
        writeln!(writer, "{:<16}  {}", member.id.as_str(), member.name)?;
    }
    Ok(())
}
