//! Progress engine: check-in logging, streaks, and category XP.
//!
//! Everything derived from a check-in flows through one entry point:
//!
//! ```text
//! log_progress(user, habit, day, value)
//!   ├─ completion: does the value count as done?
//!   ├─ logs:       upsert (habit, day), capture prior completion flag
//!   ├─ streak:     on a fresh completion, advance habit + global streaks
//!   └─ xp:         recompute the category's day cell, delta the lifetime
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let progress = ProgressManager::with_path(&db_path)?;
//! let habit = progress.habits().create("user", &new_habit)?;
//! let outcome = progress.recorder().log_progress("user", &habit.id, day, 8.0)?;
//! let logs = progress.query().today_logs("user", day)?;
//! ```

mod completion;
mod day;
mod db;
mod habits;
mod logs;
mod models;
mod queries;
mod recorder;
mod schedule;
mod streak;
mod xp;

pub use completion::is_completed;
pub use day::{day_key, parse_day_key, today, weekday_index};
pub use db::ProgressDb;
pub use habits::HabitStore;
pub use models::{
    CategoryTotal, DailyXpView, GlobalStreakView, LogUpsert, NewHabit, ProgressOutcome, TodayLog,
    XpRecompute,
};
pub use queries::ProgressQuery;
pub use recorder::ProgressRecorder;
pub use schedule::{LOOKBACK_DAYS, is_due, previous_due_date};
pub use streak::{StreakChange, StreakState};
pub use xp::daily_xp;

use anyhow::Result;

/// Central manager for progress tracking
///
/// Owns the database and hands out the write, read, and habit-management
/// interfaces. Thread-safe through the internal mutex on the connection.
#[derive(Clone)]
pub struct ProgressManager {
    db: ProgressDb,
}

impl ProgressManager {
    /// Create a manager on the default database location
    pub fn new() -> Result<Self> {
        let db = ProgressDb::open_default()?;
        Ok(Self { db })
    }

    /// Create a manager on a specific database path
    pub fn with_path(path: &std::path::Path) -> Result<Self> {
        let db = ProgressDb::open(path)?;
        Ok(Self { db })
    }

    /// Recorder for writing check-ins
    pub fn recorder(&self) -> ProgressRecorder {
        ProgressRecorder::new(self.db.clone())
    }

    /// Read-only query interface
    pub fn query(&self) -> ProgressQuery {
        ProgressQuery::new(self.db.clone())
    }

    /// Habit management interface
    pub fn habits(&self) -> HabitStore {
        HabitStore::new(self.db.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Recurrence, TrackingMode};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_manager_roundtrip() {
        let dir = tempdir().unwrap();
        let manager = ProgressManager::with_path(&dir.path().join("roundtrip.db")).unwrap();

        let habit = manager
            .habits()
            .create(
                "u1",
                &NewHabit {
                    name: "pushups".to_string(),
                    category: Category::Body,
                    mode: TrackingMode::Count,
                    target: Some(8),
                    recurrence: Recurrence::Daily,
                },
            )
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let outcome = manager
            .recorder()
            .log_progress("u1", &habit.id, day, 8.0)
            .unwrap();

        assert!(outcome.completed);
        assert!(outcome.newly_completed);
        assert_eq!(outcome.habit_streak, 1);
        assert_eq!(outcome.daily_xp, 100);

        let logs = manager.query().today_logs("u1", day).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].habit_id, habit.id);
        assert!(logs[0].completed);
    }
}
