//! Log command implementation

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;

use ritual::config::Config;
use ritual::domain::TrackingMode;
use ritual::progress::{parse_day_key, today};

use super::{open_manager, resolve_habit};

/// Record a check-in for a habit
pub fn log_command(
    config: &Config,
    habit_needle: &str,
    value: Option<f64>,
    date: Option<String>,
) -> Result<()> {
    let day = match date {
        Some(raw) => parse_day(&raw)?,
        None => today(),
    };

    let manager = open_manager(config)?;
    let habit = resolve_habit(&manager, &config.user, habit_needle)?;

    // The engine stores duration in seconds; the CLI takes minutes
    let raw_value = match habit.mode {
        TrackingMode::Binary => value.unwrap_or(1.0),
        TrackingMode::Duration => {
            let minutes = value.ok_or_else(|| anyhow!("Duration habits need a value in minutes"))?;
            minutes * 60.0
        }
        TrackingMode::Count => value.ok_or_else(|| anyhow!("Count habits need a value"))?,
    };
    if raw_value < 0.0 {
        bail!("Logged values cannot be negative");
    }

    let outcome = manager
        .recorder()
        .log_progress(&config.user, &habit.id, day, raw_value)?;

    let marker = if outcome.completed { "done" } else { "partial" };
    println!("{} - {} ({})", habit.name, marker, day);
    if outcome.newly_completed {
        println!(
            "  streak: {} (best {})",
            outcome.habit_streak, outcome.best_streak
        );
    }
    println!(
        "  {} xp today: {} | lifetime: {}",
        habit.category.as_str(),
        outcome.daily_xp,
        outcome.lifetime_xp
    );
    Ok(())
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    parse_day_key(raw).ok_or_else(|| anyhow!("Invalid date: {raw} (expected YYYY-MM-DD)"))
}
