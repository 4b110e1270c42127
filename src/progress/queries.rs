//! Read-only queries over progress data.
//!
//! Nothing here writes. In particular, reading the global streak applies
//! the staleness coercion to the returned view only; the stored row keeps
//! its stale value until the next completion event.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use rusqlite::{OptionalExtension, params};

use super::day::{day_key, parse_day_key};
use super::db::ProgressDb;
use super::models::{CategoryTotal, DailyXpView, GlobalStreakView, TodayLog};
use super::streak::StreakState;
use super::{habits, logs, schedule};
use crate::domain::{Category, Habit, ProgressError};

/// Query interface for progress data
#[derive(Clone)]
pub struct ProgressQuery {
    db: ProgressDb,
}

impl ProgressQuery {
    pub fn new(db: ProgressDb) -> Self {
        Self { db }
    }

    /// All of the user's log rows for `day`
    pub fn today_logs(&self, user_id: &str, day: NaiveDate) -> Result<Vec<TodayLog>> {
        if user_id.is_empty() {
            return Err(ProgressError::Unauthenticated.into());
        }
        let conn = self.db.conn();
        logs::logs_for_day(&conn, user_id, day)
    }

    /// Active habits due on `day`
    pub fn due_habits(&self, user_id: &str, day: NaiveDate) -> Result<Vec<Habit>> {
        let conn = self.db.conn();
        let all = habits::list_habits(&conn, user_id, false)?;
        Ok(all
            .into_iter()
            .filter(|h| schedule::is_due(&h.recurrence, day))
            .collect())
    }

    /// The user's global streak as displayed for `today`.
    ///
    /// `displayed` is coerced to zero when the stored streak is stale;
    /// `stored` is the raw counter, untouched by this read.
    pub fn global_streak(&self, user_id: &str, today: NaiveDate) -> Result<GlobalStreakView> {
        let conn = self.db.conn();
        let row: Option<(u32, Option<String>)> = conn
            .query_row(
                "SELECT current_streak, last_completed_day FROM users WHERE user_id = ?1",
                [user_id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        let (stored, last_day) = row.unwrap_or((0, None));
        let state = StreakState {
            current: stored,
            best: stored,
            last_completed: last_day.as_deref().and_then(parse_day_key),
        };

        Ok(GlobalStreakView {
            displayed: state.displayed_current(today),
            stored,
            last_completed: state.last_completed,
        })
    }

    /// Trailing window of daily XP for one category, oldest day first.
    /// Days without a stored row come back zero-filled.
    pub fn xp_window(
        &self,
        user_id: &str,
        category: Category,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<DailyXpView>> {
        let days = days.max(1);
        let start = today
            .checked_sub_days(Days::new(u64::from(days) - 1))
            .unwrap_or(today);

        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT day, xp_earned, due_count, completed_count FROM daily_category_stats \
             WHERE user_id = ?1 AND category = ?2 AND day >= ?3 AND day <= ?4",
        )?;
        let rows: HashMap<String, (i64, u32, u32)> = stmt
            .query_map(
                params![user_id, category.as_str(), day_key(start), day_key(today)],
                |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        (r.get(1)?, r.get(2)?, r.get(3)?),
                    ))
                },
            )?
            .filter_map(|r| r.ok())
            .collect();

        let mut window = Vec::with_capacity(days as usize);
        for offset in 0..days {
            let Some(day) = start.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            let (xp, due, completed) = rows.get(&day_key(day)).copied().unwrap_or((0, 0, 0));
            window.push(DailyXpView {
                day,
                xp,
                due,
                completed,
            });
        }
        Ok(window)
    }

    /// Lifetime XP per category, in the fixed category order; categories
    /// with no stored row report zero.
    pub fn category_totals(&self, user_id: &str) -> Result<Vec<CategoryTotal>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT category, lifetime_xp FROM user_category_stats WHERE user_id = ?1",
        )?;
        let rows: HashMap<String, i64> = stmt
            .query_map([user_id], |r| Ok((r.get::<_, String>(0)?, r.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(Category::ALL
            .iter()
            .map(|category| CategoryTotal {
                category: *category,
                lifetime_xp: rows.get(category.as_str()).copied().unwrap_or(0),
            })
            .collect())
    }
}
