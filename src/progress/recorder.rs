//! Progress recorder - the transactional check-in entry point.
//!
//! `log_progress` is the only way check-ins enter the system. One call is
//! one transaction: the log upsert, any streak patches, and the XP
//! recompute all land together or not at all. The connection mutex plus
//! that transaction serialize concurrent check-ins, so two calls for the
//! same (habit, day) can never both observe a fresh completion.

use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::day::{day_key, parse_day_key};
use super::db::ProgressDb;
use super::models::ProgressOutcome;
use super::streak::{StreakChange, StreakState};
use super::{completion, habits, logs, schedule, xp};
use crate::domain::{Habit, ProgressError};

/// Writes check-ins and the state derived from them
#[derive(Clone)]
pub struct ProgressRecorder {
    db: ProgressDb,
}

impl ProgressRecorder {
    pub fn new(db: ProgressDb) -> Self {
        Self { db }
    }

    /// Record a check-in for one habit on one day.
    ///
    /// Side effects, all inside one transaction: one log upsert, at most
    /// one habit streak patch, at most one user streak patch, one daily
    /// category stat upsert, one lifetime stat upsert. Nothing else.
    pub fn log_progress(
        &self,
        user_id: &str,
        habit_id: &str,
        day: NaiveDate,
        value: f64,
    ) -> Result<ProgressOutcome> {
        if user_id.is_empty() {
            return Err(ProgressError::Unauthenticated.into());
        }

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        let mut habit = habits::get_habit(&tx, user_id, habit_id)?
            .ok_or_else(|| ProgressError::HabitNotFound(habit_id.to_string()))?;

        let completed = completion::is_completed(&habit, value);
        let upsert = logs::upsert_log(&tx, user_id, &habit.id, day, value, completed)?;
        let newly_completed = upsert.completed && !upsert.was_already_completed;

        if newly_completed {
            advance_habit_streak(&tx, &mut habit, day)?;
            advance_global_streak(&tx, user_id, day)?;
        }

        let recompute = xp::recompute_daily_category_xp(&tx, user_id, habit.category, day)?;
        tx.commit()?;

        tracing::debug!(
            habit = %habit.name,
            day = %day_key(day),
            completed,
            newly_completed,
            daily_xp = recompute.daily_xp,
            "progress logged"
        );

        Ok(ProgressOutcome {
            completed,
            newly_completed,
            habit_streak: habit.current_streak,
            best_streak: habit.best_streak,
            daily_xp: recompute.daily_xp,
            lifetime_xp: recompute.lifetime_xp,
        })
    }
}

/// Advance a habit's streak for a newly completed day and patch the row.
/// `habit` is updated in place so the caller can report the new values.
fn advance_habit_streak(conn: &Connection, habit: &mut Habit, today: NaiveDate) -> Result<()> {
    let mut state = StreakState {
        current: habit.current_streak,
        best: habit.best_streak,
        last_completed: habit.last_completed,
    };
    let previous_due = schedule::previous_due_date(&habit.recurrence, today);
    if state.advance(today, previous_due) != StreakChange::AlreadyCounted {
        habits::patch_streak(conn, &habit.id, &state)?;
    }
    habit.current_streak = state.current;
    habit.best_streak = state.best;
    habit.last_completed = state.last_completed;
    Ok(())
}

/// Advance the user's global streak. Schedule-agnostic: continuity means
/// the last completion was literally yesterday.
fn advance_global_streak(conn: &Connection, user_id: &str, today: NaiveDate) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO users (user_id, current_streak, last_completed_day, created_at) \
         VALUES (?1, 0, NULL, ?2)",
        params![user_id, Utc::now().timestamp_millis()],
    )?;

    let (current, last_day): (u32, Option<String>) = conn
        .query_row(
            "SELECT current_streak, last_completed_day FROM users WHERE user_id = ?1",
            [user_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?
        .ok_or_else(|| ProgressError::UserNotFound(user_id.to_string()))?;

    let mut state = StreakState {
        current,
        best: current,
        last_completed: last_day.as_deref().and_then(parse_day_key),
    };
    let yesterday = today.checked_sub_days(Days::new(1));
    if state.advance(today, yesterday) != StreakChange::AlreadyCounted {
        conn.execute(
            "UPDATE users SET current_streak = ?1, last_completed_day = ?2 WHERE user_id = ?3",
            params![state.current, state.last_completed.map(day_key), user_id],
        )?;
    }
    Ok(())
}
