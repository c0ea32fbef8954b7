//! CLI subcommand implementations.

pub mod book;
pub mod catalog;
pub mod recurring;
pub mod schedule;
pub mod slots;
pub mod status;
pub mod util;
