use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agenda_cli::commands::{book, catalog, recurring, schedule, slots, status};
use agenda_cli::{
    BlockAction, Cli, Commands, Config, RecurringAction, ScheduleAction, ServiceAction,
    StaffAction, TenantAction,
};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(agenda_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = agenda_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Tenant(TenantAction::Add {
            id,
            name,
            granularity,
            buffer,
        }) => catalog::add_tenant(&mut out, &db, id, name, *granularity, *buffer)?,
        Commands::Tenant(TenantAction::List) => catalog::list_tenants(&mut out, &db)?,
        Commands::Service(ServiceAction::Add {
            tenant,
            id,
            name,
            duration,
            price,
        }) => catalog::add_service(&mut out, &db, tenant, id, name, *duration, *price)?,
        Commands::Staff(StaffAction::Add { tenant, id, name }) => {
            catalog::add_staff(&mut out, &db, tenant, id, name)?;
        }
        Commands::Staff(StaffAction::List { tenant }) => {
            catalog::list_staff(&mut out, &db, tenant)?;
        }
        Commands::Schedule(ScheduleAction::Add {
            tenant,
            staff,
            weekday,
            start,
            end,
            break_start,
            break_end,
        }) => schedule::add(
            &mut out,
            &db,
            schedule::ScheduleInput {
                tenant,
                staff,
                weekday,
                start,
                end,
                break_start: break_start.as_deref(),
                break_end: break_end.as_deref(),
            },
        )?,
        Commands::Schedule(ScheduleAction::List { tenant }) => {
            schedule::list(&mut out, &db, tenant)?;
        }
        Commands::Block(BlockAction::Add {
            tenant,
            staff,
            date,
            start,
            end,
            reason,
        }) => schedule::add_block(
            &mut out,
            &db,
            schedule::BlockInput {
                tenant,
                staff: staff.as_deref(),
                date,
                start,
                end,
                reason: reason.as_deref(),
            },
        )?,
        Commands::Slots(args) => slots::run(&mut out, &db, args, config.slot_defaults())?,
        Commands::Book(args) => book::run(&mut out, &mut db, args, config.slot_defaults())?,
        Commands::Cancel { booking } => book::cancel(&mut out, &db, booking)?,
        Commands::Bookings { tenant, date, json } => {
            book::list(&mut out, &db, tenant, date, *json)?;
        }
        Commands::Recurring(RecurringAction::Add {
            tenant,
            staff,
            service,
            duration,
            weekday,
            time,
            start_date,
            name,
            phone,
            notes,
        }) => recurring::add(
            &mut out,
            &db,
            recurring::RecurringInput {
                tenant,
                staff,
                service: service.as_deref(),
                duration: *duration,
                weekday,
                time,
                start_date,
                name,
                phone,
                notes: notes.as_deref(),
            },
        )?,
        Commands::Recurring(RecurringAction::Run { tenant, now }) => {
            recurring::run(&mut out, &mut db, tenant, now.as_deref())?;
        }
        Commands::Status => status::run(&mut out, &db, &config.database_path)?,
    }

    out.flush()?;
    Ok(())
}
