//! Agenda CLI library.
//!
//! This crate provides the CLI interface for the booking engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{
    BlockAction, BookArgs, Cli, Commands, RecurringAction, ScheduleAction, ServiceAction,
    SlotsArgs, StaffAction, TenantAction,
};
pub use config::Config;
