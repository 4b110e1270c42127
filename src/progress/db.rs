//! SQLite connection and schema management for progress data
//!
//! Manages the `~/.ritual/ritual.db` database with automatic schema
//! migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::Config;

/// Database wrapper shared by the recorder, the query interface, and the
/// habit store
#[derive(Clone)]
pub struct ProgressDb {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl ProgressDb {
    /// Open or create the database at the default location (~/.ritual/ritual.db)
    pub fn open_default() -> Result<Self> {
        let db_path = Config::global_config_dir().join("ritual.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // WAL so a reading process never blocks a writer
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a guard on the connection (for queries and transactions)
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Progress DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: best-streak tracking on habits. Earlier databases
        // only carried current_streak; best_streak is read for display and
        // must exist on every row.
        if version < 2 {
            let has_best_streak: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('habits') WHERE name = 'best_streak'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_best_streak {
                conn.execute_batch(
                    r#"
                    ALTER TABLE habits ADD COLUMN best_streak INTEGER NOT NULL DEFAULT 0;
                    UPDATE habits SET best_streak = current_streak;
                    "#,
                )?;
            }

            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }
}

/// SQL schema for the progress database
const SCHEMA_SQL: &str = r#"
-- Tracked habits (one row per habit; streak fields written only by the
-- progress recorder)
CREATE TABLE IF NOT EXISTS habits (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    mode TEXT NOT NULL,
    target INTEGER,
    schedule_kind TEXT NOT NULL,
    schedule_days TEXT,
    schedule_times INTEGER,
    active INTEGER NOT NULL DEFAULT 1,
    current_streak INTEGER NOT NULL DEFAULT 0,
    best_streak INTEGER NOT NULL DEFAULT 0,
    last_completed_day TEXT,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
CREATE INDEX IF NOT EXISTS idx_habits_user_category ON habits(user_id, category);

-- Daily logs: exactly one row per (habit, day), upsert semantics
CREATE TABLE IF NOT EXISTS daily_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    day TEXT NOT NULL,
    value REAL NOT NULL DEFAULT 0,
    completed INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL,
    UNIQUE (habit_id, day)
);
CREATE INDEX IF NOT EXISTS idx_logs_user_day ON daily_logs(user_id, day);

-- Daily XP per category: materialized view, recomputed in place whenever
-- any log in that category/day changes
CREATE TABLE IF NOT EXISTS daily_category_stats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    category TEXT NOT NULL,
    day TEXT NOT NULL,
    xp_earned INTEGER NOT NULL DEFAULT 0,
    due_count INTEGER NOT NULL DEFAULT 0,
    completed_count INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL,
    UNIQUE (user_id, category, day)
);

-- Lifetime XP per category: adjusted by recompute deltas, never
-- incremented directly
CREATE TABLE IF NOT EXISTS user_category_stats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    category TEXT NOT NULL,
    lifetime_xp INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL,
    UNIQUE (user_id, category)
);

-- Global streak per user
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    current_streak INTEGER NOT NULL DEFAULT 0,
    last_completed_day TEXT,
    created_at INTEGER NOT NULL
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_ritual.db");
        let db = ProgressDb::open(&db_path).unwrap();

        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"habits".to_string()));
        assert!(tables.contains(&"daily_logs".to_string()));
        assert!(tables.contains(&"daily_category_stats".to_string()));
        assert!(tables.contains(&"user_category_stats".to_string()));
        assert!(tables.contains(&"users".to_string()));
    }

    #[test]
    fn test_schema_version_is_current() {
        let dir = tempdir().unwrap();
        let db = ProgressDb::open(&dir.path().join("v.db")).unwrap();
        let conn = db.conn();
        let version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        drop(ProgressDb::open(&db_path).unwrap());
        // Second open runs the schema batch and migrations again
        let db = ProgressDb::open(&db_path).unwrap();
        let conn = db.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM habits", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
