//! Status command for showing what the database holds.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use agenda_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, database_path: &Path) -> Result<()> {
    let summary = db.summary()?;

    writeln!(writer, "Agenda status")?;
    writeln!(writer, "Database: {}", database_path.display())?;

    if summary.tenants == 0 {
        writeln!(writer, "No tenants configured.")?;
        return Ok(());
    }

    writeln!(writer, "Tenants: {}", summary.tenants)?;
    writeln!(writer, "Services: {}", summary.services)?;
    writeln!(writer, "Staff: {}", summary.staff)?;
    writeln!(writer, "Working intervals: {}", summary.schedules)?;
    writeln!(writer, "Active bookings: {}", summary.holding_bookings)?;
    writeln!(writer, "Blocks: {}", summary.blocks)?;
    writeln!(writer, "Recurring clients: {}", summary.recurring_clients)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use agenda_core::{StaffId, TenantId, WorkingInterval};
    use agenda_db::{StaffRecord, TenantRecord, TenantSettings};

    use insta::assert_snapshot;

    #[test]
    fn test_status_command_outputs_counts() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("agenda.db");
        let db = Database::open(&db_path).unwrap();

        let tenant = TenantId::new("barbearia").unwrap();
        db.upsert_tenant(&TenantRecord {
            id: tenant.clone(),
            name: "Barbearia".to_string(),
            settings: TenantSettings::default(),
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

        let mut output = Vec::new();
        run(&mut output, &db, &db_path).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/agenda.db");
        assert_snapshot!(output, @r"
        Agenda status
        Database: [TEMP]/agenda.db
        Tenants: 1
        Services: 0
        Staff: 1
        Working intervals: 1
        Active bookings: 0
        Blocks: 0
        Recurring clients: 0
        ");
    }

    #[test]
    fn test_status_command_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, Path::new("agenda.db")).unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Agenda status
        Database: agenda.db
        No tenants configured.
        ");
    }
}
