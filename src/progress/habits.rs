//! Habit persistence: create, load, list, archive, and streak patches.
//!
//! The free functions take a `&Connection` so the recorder can call them
//! inside its transaction; `HabitStore` wraps them for standalone use.

use std::collections::BTreeSet;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use super::day::{day_key, parse_day_key};
use super::db::ProgressDb;
use super::models::NewHabit;
use super::streak::StreakState;
use crate::domain::{Category, Habit, ProgressError, Recurrence, TrackingMode};

const HABIT_COLS: &str = "id, user_id, name, category, mode, target, schedule_kind, \
     schedule_days, schedule_times, active, current_streak, best_streak, \
     last_completed_day, created_at";

/// Habit management handle
#[derive(Clone)]
pub struct HabitStore {
    db: ProgressDb,
}

impl HabitStore {
    pub fn new(db: ProgressDb) -> Self {
        Self { db }
    }

    /// Create a habit owned by `user_id`
    pub fn create(&self, user_id: &str, new: &NewHabit) -> Result<Habit> {
        if user_id.is_empty() {
            return Err(ProgressError::Unauthenticated.into());
        }
        let conn = self.db.conn();
        insert_habit(&conn, user_id, new)
    }

    /// Load a habit by exact id
    pub fn get(&self, user_id: &str, habit_id: &str) -> Result<Option<Habit>> {
        let conn = self.db.conn();
        get_habit(&conn, user_id, habit_id)
    }

    /// Resolve a habit by exact name, then by id prefix
    pub fn find(&self, user_id: &str, needle: &str) -> Result<Option<Habit>> {
        let conn = self.db.conn();
        find_habit(&conn, user_id, needle)
    }

    /// List habits, newest first; inactive ones only when asked for
    pub fn list(&self, user_id: &str, include_inactive: bool) -> Result<Vec<Habit>> {
        let conn = self.db.conn();
        list_habits(&conn, user_id, include_inactive)
    }

    /// Activate or archive a habit. Archived habits keep their history but
    /// are never due. Returns the error the caller branches on when the
    /// habit does not exist.
    pub fn set_active(&self, user_id: &str, habit_id: &str, active: bool) -> Result<()> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "UPDATE habits SET active = ?1 WHERE id = ?2 AND user_id = ?3",
            params![active as i64, habit_id, user_id],
        )?;
        if changed == 0 {
            return Err(ProgressError::HabitNotFound(habit_id.to_string()).into());
        }
        Ok(())
    }
}

pub(crate) fn insert_habit(conn: &Connection, user_id: &str, new: &NewHabit) -> Result<Habit> {
    let habit = Habit {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: new.name.clone(),
        category: new.category,
        mode: new.mode,
        target: new.target,
        recurrence: new.recurrence.clone(),
        active: true,
        current_streak: 0,
        best_streak: 0,
        last_completed: None,
        created_at: Utc::now().timestamp_millis(),
    };
    let (kind, days, times) = encode_recurrence(&habit.recurrence)?;

    conn.execute(
        r#"INSERT INTO habits
           (id, user_id, name, category, mode, target, schedule_kind, schedule_days,
            schedule_times, active, current_streak, best_streak, last_completed_day, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, 0, 0, NULL, ?10)"#,
        params![
            habit.id,
            habit.user_id,
            habit.name,
            habit.category.as_str(),
            habit.mode.as_str(),
            habit.target,
            kind,
            days,
            times,
            habit.created_at,
        ],
    )?;
    Ok(habit)
}

pub(crate) fn get_habit(conn: &Connection, user_id: &str, habit_id: &str) -> Result<Option<Habit>> {
    let row = conn
        .query_row(
            &format!("SELECT {HABIT_COLS} FROM habits WHERE id = ?1 AND user_id = ?2"),
            params![habit_id, user_id],
            read_row,
        )
        .optional()?;
    row.map(decode_row).transpose()
}

pub(crate) fn find_habit(conn: &Connection, user_id: &str, needle: &str) -> Result<Option<Habit>> {
    let by_name = conn
        .query_row(
            &format!("SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 AND name = ?2"),
            params![user_id, needle],
            read_row,
        )
        .optional()?;
    if let Some(row) = by_name {
        return Ok(Some(decode_row(row)?));
    }

    let prefix = format!("{needle}%");
    let by_id = conn
        .query_row(
            &format!("SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 AND id LIKE ?2"),
            params![user_id, prefix],
            read_row,
        )
        .optional()?;
    by_id.map(decode_row).transpose()
}

pub(crate) fn list_habits(
    conn: &Connection,
    user_id: &str,
    include_inactive: bool,
) -> Result<Vec<Habit>> {
    let sql = if include_inactive {
        format!("SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 ORDER BY created_at DESC")
    } else {
        format!(
            "SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 AND active = 1 ORDER BY created_at DESC"
        )
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows: Vec<HabitRow> = stmt
        .query_map([user_id], read_row)?
        .filter_map(|r| r.ok())
        .collect();
    rows.into_iter().map(decode_row).collect()
}

/// Active habits in one category, the XP ledger's input set
pub(crate) fn active_habits_in_category(
    conn: &Connection,
    user_id: &str,
    category: Category,
) -> Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLS} FROM habits WHERE user_id = ?1 AND category = ?2 AND active = 1"
    ))?;
    let rows: Vec<HabitRow> = stmt
        .query_map(params![user_id, category.as_str()], read_row)?
        .filter_map(|r| r.ok())
        .collect();
    rows.into_iter().map(decode_row).collect()
}

/// Write a habit's streak fields
pub(crate) fn patch_streak(conn: &Connection, habit_id: &str, state: &StreakState) -> Result<()> {
    conn.execute(
        "UPDATE habits SET current_streak = ?1, best_streak = ?2, last_completed_day = ?3 WHERE id = ?4",
        params![
            state.current,
            state.best,
            state.last_completed.map(day_key),
            habit_id
        ],
    )?;
    Ok(())
}

/// Raw column values for one habit row
struct HabitRow {
    id: String,
    user_id: String,
    name: String,
    category: String,
    mode: String,
    target: Option<u32>,
    schedule_kind: String,
    schedule_days: Option<String>,
    schedule_times: Option<u8>,
    active: bool,
    current_streak: u32,
    best_streak: u32,
    last_completed_day: Option<String>,
    created_at: i64,
}

fn read_row(row: &Row) -> rusqlite::Result<HabitRow> {
    Ok(HabitRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        mode: row.get(4)?,
        target: row.get(5)?,
        schedule_kind: row.get(6)?,
        schedule_days: row.get(7)?,
        schedule_times: row.get(8)?,
        active: row.get::<_, i64>(9)? != 0,
        current_streak: row.get(10)?,
        best_streak: row.get(11)?,
        last_completed_day: row.get(12)?,
        created_at: row.get(13)?,
    })
}

fn decode_row(row: HabitRow) -> Result<Habit> {
    let category = Category::from_str(&row.category)
        .ok_or_else(|| anyhow!("Unknown category in habit {}: {}", row.id, row.category))?;
    let mode = TrackingMode::from_str(&row.mode)
        .ok_or_else(|| anyhow!("Unknown tracking mode in habit {}: {}", row.id, row.mode))?;
    let recurrence = decode_recurrence(&row.schedule_kind, row.schedule_days, row.schedule_times)
        .with_context(|| format!("Bad schedule on habit {}", row.id))?;

    Ok(Habit {
        id: row.id,
        user_id: row.user_id,
        name: row.name,
        category,
        mode,
        target: row.target,
        recurrence,
        active: row.active,
        current_streak: row.current_streak,
        best_streak: row.best_streak,
        last_completed: row.last_completed_day.as_deref().and_then(parse_day_key),
        created_at: row.created_at,
    })
}

fn encode_recurrence(r: &Recurrence) -> Result<(&'static str, Option<String>, Option<u8>)> {
    Ok(match r {
        Recurrence::Daily => ("daily", None, None),
        Recurrence::Weekdays => ("weekdays", None, None),
        Recurrence::Weekends => ("weekends", None, None),
        Recurrence::Custom { days } => {
            let encoded = serde_json::to_string(&days.iter().collect::<Vec<_>>())?;
            ("custom", Some(encoded), None)
        }
        Recurrence::PerWeek { times } => ("per_week", None, Some(*times)),
    })
}

fn decode_recurrence(kind: &str, days: Option<String>, times: Option<u8>) -> Result<Recurrence> {
    match kind {
        "daily" => Ok(Recurrence::Daily),
        "weekdays" => Ok(Recurrence::Weekdays),
        "weekends" => Ok(Recurrence::Weekends),
        "custom" => {
            let days: Vec<u8> = match days {
                Some(json) => serde_json::from_str(&json)?,
                None => Vec::new(),
            };
            Ok(Recurrence::Custom {
                days: BTreeSet::from_iter(days),
            })
        }
        "per_week" => Ok(Recurrence::PerWeek {
            times: times.unwrap_or(1),
        }),
        other => Err(anyhow!("Unknown schedule kind: {other}")),
    }
}
