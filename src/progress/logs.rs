//! Daily log store: one row per (habit, day), upsert semantics.
//!
//! The prior-flag read and the write are a pair: the recorder runs both
//! inside its transaction, and `was_already_completed` is only meaningful
//! under that isolation.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::day::{day_key, parse_day_key};
use super::models::{LogUpsert, TodayLog};

/// Insert or overwrite the log for (habit, day), capturing the prior
/// completion flag. Fresh inserts report `was_already_completed = false`.
pub(crate) fn upsert_log(
    conn: &Connection,
    user_id: &str,
    habit_id: &str,
    day: NaiveDate,
    value: f64,
    completed: bool,
) -> Result<LogUpsert> {
    let key = day_key(day);

    let prior: Option<bool> = conn
        .query_row(
            "SELECT completed FROM daily_logs WHERE habit_id = ?1 AND day = ?2",
            params![habit_id, key],
            |r| r.get::<_, i64>(0).map(|v| v != 0),
        )
        .optional()?;

    let now = Utc::now().timestamp_millis();
    conn.execute(
        r#"INSERT INTO daily_logs (habit_id, user_id, day, value, completed, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(habit_id, day) DO UPDATE SET
               value = ?4, completed = ?5, updated_at = ?6"#,
        params![habit_id, user_id, key, value, completed as i64, now],
    )?;

    Ok(LogUpsert {
        completed,
        was_already_completed: prior.unwrap_or(false),
    })
}

/// The stored (value, completed) pair for a habit on a day
pub(crate) fn get_log(
    conn: &Connection,
    habit_id: &str,
    day: NaiveDate,
) -> Result<Option<(f64, bool)>> {
    let row = conn
        .query_row(
            "SELECT value, completed FROM daily_logs WHERE habit_id = ?1 AND day = ?2",
            params![habit_id, day_key(day)],
            |r| Ok((r.get::<_, f64>(0)?, r.get::<_, i64>(1)? != 0)),
        )
        .optional()?;
    Ok(row)
}

/// All of a user's log rows for one day
pub(crate) fn logs_for_day(
    conn: &Connection,
    user_id: &str,
    day: NaiveDate,
) -> Result<Vec<TodayLog>> {
    let mut stmt = conn.prepare(
        "SELECT habit_id, day, value, completed FROM daily_logs \
         WHERE user_id = ?1 AND day = ?2 ORDER BY habit_id",
    )?;
    let rows = stmt.query_map(params![user_id, day_key(day)], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, f64>(2)?,
            r.get::<_, i64>(3)? != 0,
        ))
    })?;

    Ok(rows
        .filter_map(|r| r.ok())
        .filter_map(|(habit_id, day, value, completed)| {
            parse_day_key(&day).map(|day| TodayLog {
                habit_id,
                day,
                value,
                completed,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::db::ProgressDb;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn db() -> (tempfile::TempDir, ProgressDb) {
        let dir = tempdir().unwrap();
        let db = ProgressDb::open(&dir.path().join("logs.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_fresh_insert_reports_not_already_completed() {
        let (_dir, db) = db();
        let conn = db.conn();
        let result = upsert_log(&conn, "u1", "h1", date("2025-06-01"), 8.0, true).unwrap();
        assert!(result.completed);
        assert!(!result.was_already_completed);
    }

    #[test]
    fn test_reupsert_reports_prior_flag() {
        let (_dir, db) = db();
        let conn = db.conn();
        upsert_log(&conn, "u1", "h1", date("2025-06-01"), 8.0, true).unwrap();
        let second = upsert_log(&conn, "u1", "h1", date("2025-06-01"), 10.0, true).unwrap();
        assert!(second.was_already_completed);

        // Still exactly one row for the pair, with the new value
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM daily_logs WHERE habit_id = 'h1' AND day = '2025-06-01'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            get_log(&conn, "h1", date("2025-06-01")).unwrap(),
            Some((10.0, true))
        );
    }

    #[test]
    fn test_downgrade_keeps_prior_flag_observable() {
        let (_dir, db) = db();
        let conn = db.conn();
        upsert_log(&conn, "u1", "h1", date("2025-06-01"), 8.0, true).unwrap();
        let lowered = upsert_log(&conn, "u1", "h1", date("2025-06-01"), 3.0, false).unwrap();
        assert!(!lowered.completed);
        assert!(lowered.was_already_completed);
        assert_eq!(
            get_log(&conn, "h1", date("2025-06-01")).unwrap(),
            Some((3.0, false))
        );
    }

    #[test]
    fn test_logs_for_day_scoped_to_user_and_day() {
        let (_dir, db) = db();
        let conn = db.conn();
        upsert_log(&conn, "u1", "h1", date("2025-06-01"), 1.0, true).unwrap();
        upsert_log(&conn, "u1", "h2", date("2025-06-01"), 0.0, false).unwrap();
        upsert_log(&conn, "u1", "h1", date("2025-06-02"), 1.0, true).unwrap();
        upsert_log(&conn, "u2", "h3", date("2025-06-01"), 1.0, true).unwrap();

        let logs = logs_for_day(&conn, "u1", date("2025-06-01")).unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.day == date("2025-06-01")));
    }
}
