//! Today command implementation

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;

use ritual::config::Config;
use ritual::progress::{TodayLog, today};

use super::open_manager;

#[derive(Serialize)]
struct TodayView {
    day: String,
    global_streak: u32,
    habits: Vec<TodayHabit>,
}

#[derive(Serialize)]
struct TodayHabit {
    id: String,
    name: String,
    category: String,
    schedule: String,
    value: Option<f64>,
    completed: bool,
}

/// Show today's due habits, their logs, and the global streak
pub fn today_command(config: &Config, json: bool) -> Result<()> {
    let day = today();
    let manager = open_manager(config)?;
    let query = manager.query();

    let due = query.due_habits(&config.user, day)?;
    let logs: HashMap<String, TodayLog> = query
        .today_logs(&config.user, day)?
        .into_iter()
        .map(|l| (l.habit_id.clone(), l))
        .collect();
    let streak = query.global_streak(&config.user, day)?;

    let view = TodayView {
        day: day.to_string(),
        global_streak: streak.displayed,
        habits: due
            .into_iter()
            .map(|h| {
                let log = logs.get(&h.id);
                TodayHabit {
                    id: h.id.clone(),
                    name: h.name,
                    category: h.category.as_str().to_string(),
                    schedule: h.recurrence.describe(),
                    value: log.map(|l| l.value),
                    completed: log.map(|l| l.completed).unwrap_or(false),
                }
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{} - global streak: {}", view.day, view.global_streak);
    if view.habits.is_empty() {
        println!("Nothing due today.");
        return Ok(());
    }
    for habit in &view.habits {
        let mark = if habit.completed { "x" } else { " " };
        println!(
            "  [{}] {} ({}, {})",
            mark, habit.name, habit.category, habit.schedule
        );
    }
    Ok(())
}
