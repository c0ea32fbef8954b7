//! Configuration loading and management.

use std::path::{Path, PathBuf};

use agenda_core::{DEFAULT_BUFFER_MINUTES, DEFAULT_SLOT_GRANULARITY_MINUTES};
use agenda_db::SlotDefaults;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Slot granularity for tenants that do not set their own.
    pub default_slot_granularity_minutes: u32,

    /// Buffer for tenants that do not set their own.
    pub default_buffer_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("agenda.db"),
            default_slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            default_buffer_minutes: DEFAULT_BUFFER_MINUTES,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // AGENDA_DATABASE_PATH, AGENDA_DEFAULT_BUFFER_MINUTES, ...
        figment = figment.merge(Env::prefixed("AGENDA_"));

        figment.extract()
    }

    /// Slot settings applied when a tenant has no override.
    pub const fn slot_defaults(&self) -> SlotDefaults {
        SlotDefaults {
            slot_granularity_minutes: self.default_slot_granularity_minutes,
            buffer_minutes: self.default_buffer_minutes,
        }
    }
}

/// Returns the platform-specific config directory for agenda.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("agenda"))
}

/// Returns the platform-specific data directory for agenda.
///
/// On Linux: `~/.local/share/agenda`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("agenda"))
}
