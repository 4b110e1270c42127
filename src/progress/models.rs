//! Data models for the progress engine.
//!
//! These structures cross the engine boundary: inputs for creating habits
//! and check-ins, and views assembled for display.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Category, Recurrence, TrackingMode};

/// Input for creating a habit
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub category: Category,
    pub mode: TrackingMode,
    /// Minutes for duration mode, repetitions for count mode
    pub target: Option<u32>,
    pub recurrence: Recurrence,
}

/// Result of upserting a daily log
#[derive(Debug, Clone, Copy)]
pub struct LogUpsert {
    /// Completion flag just written
    pub completed: bool,
    /// Completion flag of the pre-existing row, false on fresh insert.
    /// This is the only signal that gates streak transitions.
    pub was_already_completed: bool,
}

/// Result of one check-in
#[derive(Debug, Clone, Serialize)]
pub struct ProgressOutcome {
    pub completed: bool,
    /// True when this call flipped the day into "completed"
    pub newly_completed: bool,
    pub habit_streak: u32,
    pub best_streak: u32,
    /// Category XP for the logged day, 0-100
    pub daily_xp: i64,
    /// Lifetime XP for the habit's category after the delta
    pub lifetime_xp: i64,
}

/// Result of a daily category XP recompute
#[derive(Debug, Clone, Copy)]
pub struct XpRecompute {
    pub daily_xp: i64,
    /// Change versus the previously stored daily value
    pub delta: i64,
    pub lifetime_xp: i64,
}

/// One habit's log row for a day
#[derive(Debug, Clone, Serialize)]
pub struct TodayLog {
    pub habit_id: String,
    pub day: NaiveDate,
    pub value: f64,
    pub completed: bool,
}

/// A single day in the trailing XP window
#[derive(Debug, Clone, Serialize)]
pub struct DailyXpView {
    pub day: NaiveDate,
    pub xp: i64,
    pub due: u32,
    pub completed: u32,
}

/// Lifetime XP for one category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub lifetime_xp: i64,
}

/// Global streak as read for display
#[derive(Debug, Clone, Serialize)]
pub struct GlobalStreakView {
    /// Staleness-coerced value: zero unless the last completion was today
    /// or yesterday
    pub displayed: u32,
    /// Raw stored counter, possibly stale
    pub stored: u32,
    pub last_completed: Option<NaiveDate>,
}
