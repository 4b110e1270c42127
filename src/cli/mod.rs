//! CLI command implementations

pub mod add;
pub mod archive;
pub mod habits;
pub mod init;
pub mod log;
pub mod stats;
pub mod today;

use anyhow::Result;

use ritual::config::Config;
use ritual::domain::Habit;
use ritual::progress::ProgressManager;
use ritual::ProgressError;

/// Open the progress manager for the configured database location
pub fn open_manager(config: &Config) -> Result<ProgressManager> {
    ProgressManager::with_path(&config.db_path())
}

/// Resolve a habit by name or id prefix, erroring the way the engine does
pub fn resolve_habit(manager: &ProgressManager, user: &str, needle: &str) -> Result<Habit> {
    manager
        .habits()
        .find(user, needle)?
        .ok_or_else(|| ProgressError::HabitNotFound(needle.to_string()).into())
}
