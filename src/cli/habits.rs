//! Habits listing command implementation

use anyhow::Result;

use ritual::config::Config;

use super::open_manager;

/// List habits with their streaks
pub fn habits_command(config: &Config, all: bool) -> Result<()> {
    let manager = open_manager(config)?;
    let habits = manager.habits().list(&config.user, all)?;

    if habits.is_empty() {
        println!("No habits yet. Try: ritual add \"Read\" --category mind");
        return Ok(());
    }

    println!("Habits ({}):\n", habits.len());
    for habit in habits {
        let status = if habit.active { "" } else { " (archived)" };
        let target = match habit.target {
            Some(t) => format!(", target {t}"),
            None => String::new(),
        };
        println!(
            "  {} {}{} [{}]",
            &habit.id[..8],
            habit.name,
            status,
            habit.category.as_str()
        );
        println!(
            "    {} ({}{}), streak {} (best {})",
            habit.recurrence.describe(),
            habit.mode.as_str(),
            target,
            habit.current_streak,
            habit.best_streak
        );
    }
    Ok(())
}
