//! XP ledger: daily category XP and lifetime totals.
//!
//! Both stat tables are materialized views over the daily logs. Every
//! write path goes through `recompute_daily_category_xp`; nothing
//! increments the lifetime counter directly, so the tables cannot drift
//! from the logs they summarize.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::day::day_key;
use super::models::XpRecompute;
use super::{habits, logs, schedule};
use crate::domain::Category;

/// Daily XP from due/completed counts: the completion percentage, rounded
/// half-up, zero when nothing is due.
pub fn daily_xp(due: u32, completed: u32) -> i64 {
    if due == 0 {
        0
    } else {
        (100.0 * completed as f64 / due as f64).round() as i64
    }
}

/// Recompute one (user, category, day) cell and push the delta into the
/// lifetime counter.
///
/// Runs on the caller's connection so it participates in the check-in
/// transaction; the delta application is atomic with the daily recompute.
pub(crate) fn recompute_daily_category_xp(
    conn: &Connection,
    user_id: &str,
    category: Category,
    day: NaiveDate,
) -> Result<XpRecompute> {
    let mut due = 0u32;
    let mut completed = 0u32;
    for habit in habits::active_habits_in_category(conn, user_id, category)? {
        if !schedule::is_due(&habit.recurrence, day) {
            continue;
        }
        due += 1;
        if let Some((_, done)) = logs::get_log(conn, &habit.id, day)? {
            if done {
                completed += 1;
            }
        }
    }

    let xp = daily_xp(due, completed);
    let key = day_key(day);
    let now = Utc::now().timestamp_millis();

    let prior: i64 = conn
        .query_row(
            "SELECT xp_earned FROM daily_category_stats \
             WHERE user_id = ?1 AND category = ?2 AND day = ?3",
            params![user_id, category.as_str(), key],
            |r| r.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let delta = xp - prior;

    conn.execute(
        r#"INSERT INTO daily_category_stats
           (user_id, category, day, xp_earned, due_count, completed_count, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(user_id, category, day) DO UPDATE SET
               xp_earned = ?4, due_count = ?5, completed_count = ?6, updated_at = ?7"#,
        params![user_id, category.as_str(), key, xp, due, completed, now],
    )?;

    // A fresh lifetime row is seeded with the delta, which equals the
    // daily value when no prior daily row existed either.
    conn.execute(
        r#"INSERT INTO user_category_stats (user_id, category, lifetime_xp, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id, category) DO UPDATE SET
               lifetime_xp = lifetime_xp + ?3, updated_at = ?4"#,
        params![user_id, category.as_str(), delta, now],
    )?;

    let lifetime_xp: i64 = conn.query_row(
        "SELECT lifetime_xp FROM user_category_stats WHERE user_id = ?1 AND category = ?2",
        params![user_id, category.as_str()],
        |r| r.get(0),
    )?;

    tracing::debug!(
        category = category.as_str(),
        day = %key,
        xp,
        delta,
        "recomputed daily category xp"
    );

    Ok(XpRecompute {
        daily_xp: xp,
        delta,
        lifetime_xp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Recurrence, TrackingMode};
    use crate::progress::db::ProgressDb;
    use crate::progress::models::NewHabit;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn db() -> (tempfile::TempDir, ProgressDb) {
        let dir = tempdir().unwrap();
        let db = ProgressDb::open(&dir.path().join("xp.db")).unwrap();
        (dir, db)
    }

    fn binary_daily(name: &str) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            category: Category::Mind,
            mode: TrackingMode::Binary,
            target: None,
            recurrence: Recurrence::Daily,
        }
    }

    #[test]
    fn test_daily_xp_rounding() {
        assert_eq!(daily_xp(0, 0), 0);
        assert_eq!(daily_xp(1, 0), 0);
        assert_eq!(daily_xp(1, 1), 100);
        assert_eq!(daily_xp(2, 1), 50);
        assert_eq!(daily_xp(3, 2), 67);
        assert_eq!(daily_xp(3, 1), 33);
        assert_eq!(daily_xp(6, 1), 17); // 16.67 rounds up
        assert_eq!(daily_xp(8, 1), 13); // 12.5 rounds half-up
    }

    #[test]
    fn test_recompute_counts_due_and_completed() {
        let (_dir, db) = db();
        let conn = db.conn();
        let day = date("2025-06-02");

        let done = habits::insert_habit(&conn, "u1", &binary_daily("read")).unwrap();
        habits::insert_habit(&conn, "u1", &binary_daily("journal")).unwrap();
        logs::upsert_log(&conn, "u1", &done.id, day, 1.0, true).unwrap();

        let result = recompute_daily_category_xp(&conn, "u1", Category::Mind, day).unwrap();
        assert_eq!(result.daily_xp, 50);
        assert_eq!(result.delta, 50);
        assert_eq!(result.lifetime_xp, 50);

        let (due, completed): (u32, u32) = conn
            .query_row(
                "SELECT due_count, completed_count FROM daily_category_stats \
                 WHERE user_id = 'u1' AND category = 'mind' AND day = '2025-06-02'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!((due, completed), (2, 1));
    }

    #[test]
    fn test_recompute_ignores_non_due_habits() {
        let (_dir, db) = db();
        let conn = db.conn();
        // 2025-06-02 is a Monday; a weekends habit is not due
        let day = date("2025-06-02");
        habits::insert_habit(
            &conn,
            "u1",
            &NewHabit {
                recurrence: Recurrence::Weekends,
                ..binary_daily("hike")
            },
        )
        .unwrap();

        let result = recompute_daily_category_xp(&conn, "u1", Category::Mind, day).unwrap();
        assert_eq!(result.daily_xp, 0);
        assert_eq!(result.delta, 0);
    }

    #[test]
    fn test_repeated_recompute_applies_delta_only_once() {
        let (_dir, db) = db();
        let conn = db.conn();
        let day = date("2025-06-02");
        let habit = habits::insert_habit(&conn, "u1", &binary_daily("read")).unwrap();
        logs::upsert_log(&conn, "u1", &habit.id, day, 1.0, true).unwrap();

        let first = recompute_daily_category_xp(&conn, "u1", Category::Mind, day).unwrap();
        assert_eq!(first.lifetime_xp, 100);
        let second = recompute_daily_category_xp(&conn, "u1", Category::Mind, day).unwrap();
        assert_eq!(second.delta, 0);
        assert_eq!(second.lifetime_xp, 100);
    }

    #[test]
    fn test_revert_produces_negative_delta() {
        let (_dir, db) = db();
        let conn = db.conn();
        let day = date("2025-06-02");
        let habit = habits::insert_habit(&conn, "u1", &binary_daily("read")).unwrap();

        logs::upsert_log(&conn, "u1", &habit.id, day, 1.0, true).unwrap();
        recompute_daily_category_xp(&conn, "u1", Category::Mind, day).unwrap();

        logs::upsert_log(&conn, "u1", &habit.id, day, 0.0, false).unwrap();
        let reverted = recompute_daily_category_xp(&conn, "u1", Category::Mind, day).unwrap();
        assert_eq!(reverted.daily_xp, 0);
        assert_eq!(reverted.delta, -100);
        assert_eq!(reverted.lifetime_xp, 0);
    }
}
