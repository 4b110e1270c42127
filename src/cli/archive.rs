//! Archive command implementation

use anyhow::Result;

use ritual::config::Config;

use super::{open_manager, resolve_habit};

/// Archive a habit: history is kept, but it is no longer due anywhere
pub fn archive_command(config: &Config, habit_needle: &str) -> Result<()> {
    let manager = open_manager(config)?;
    let habit = resolve_habit(&manager, &config.user, habit_needle)?;
    manager.habits().set_active(&config.user, &habit.id, false)?;
    println!("Archived \"{}\"", habit.name);
    Ok(())
}
