//! Add command implementation

use std::collections::BTreeSet;

use anyhow::{Result, anyhow, bail};

use ritual::config::Config;
use ritual::domain::{Category, Recurrence, TrackingMode, parse_weekday};
use ritual::progress::NewHabit;

use super::open_manager;

/// Recurrence flags accepted by `ritual add`
pub struct ScheduleArgs {
    pub days: Option<Vec<String>>,
    pub weekdays: bool,
    pub weekends: bool,
    pub per_week: Option<u8>,
}

/// Define a new habit
pub fn add_command(
    config: &Config,
    name: &str,
    category: &str,
    mode: &str,
    target: Option<u32>,
    schedule: ScheduleArgs,
) -> Result<()> {
    let category = Category::from_str(category).ok_or_else(|| {
        anyhow!(
            "Unknown category: {} (expected one of: {})",
            category,
            Category::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    let mode = TrackingMode::from_str(mode)
        .ok_or_else(|| anyhow!("Unknown mode: {mode} (expected binary, duration or count)"))?;

    if matches!(mode, TrackingMode::Duration | TrackingMode::Count) && target.is_none() {
        bail!("--target is required for duration and count habits");
    }

    let recurrence = build_recurrence(schedule)?;

    let manager = open_manager(config)?;
    let habit = manager.habits().create(
        &config.user,
        &NewHabit {
            name: name.to_string(),
            category,
            mode,
            target,
            recurrence,
        },
    )?;

    println!(
        "Added \"{}\" [{}] ({}, {})",
        habit.name,
        &habit.id[..8],
        habit.category.as_str(),
        habit.recurrence.describe()
    );
    Ok(())
}

fn build_recurrence(schedule: ScheduleArgs) -> Result<Recurrence> {
    let picked = [
        schedule.days.is_some(),
        schedule.weekdays,
        schedule.weekends,
        schedule.per_week.is_some(),
    ]
    .iter()
    .filter(|&&set| set)
    .count();
    if picked > 1 {
        bail!("Pick at most one of --days, --weekdays, --weekends, --per-week");
    }

    if let Some(names) = schedule.days {
        let mut days = BTreeSet::new();
        for name in &names {
            let day =
                parse_weekday(name).ok_or_else(|| anyhow!("Unknown weekday: {name}"))?;
            days.insert(day);
        }
        if days.is_empty() {
            bail!("--days needs at least one weekday");
        }
        return Ok(Recurrence::Custom { days });
    }
    if schedule.weekdays {
        return Ok(Recurrence::Weekdays);
    }
    if schedule.weekends {
        return Ok(Recurrence::Weekends);
    }
    if let Some(times) = schedule.per_week {
        if times == 0 || times > 7 {
            bail!("--per-week must be between 1 and 7");
        }
        return Ok(Recurrence::PerWeek { times });
    }
    Ok(Recurrence::Daily)
}
