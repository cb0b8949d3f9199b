//! Database Migrations
//!
//! Schema migration definitions for the progress store.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: word progress and user streaks",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Study-minute accumulation and review history",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS word_progress (
    user_id TEXT NOT NULL,
    word_id TEXT NOT NULL,

    -- Scheduling state
    level INTEGER NOT NULL DEFAULT 0,
    next_review_date TEXT NOT NULL,

    -- Lifetime answer counters
    correct_count INTEGER NOT NULL DEFAULT 0,
    wrong_count INTEGER NOT NULL DEFAULT 0,

    created_at TEXT NOT NULL,
    -- Last-write-wins token: review writes are guarded on this value
    updated_at TEXT NOT NULL,

    PRIMARY KEY (user_id, word_id)
);

CREATE INDEX IF NOT EXISTS idx_progress_user_due ON word_progress(user_id, next_review_date);
CREATE INDEX IF NOT EXISTS idx_progress_level ON word_progress(level);

CREATE TABLE IF NOT EXISTS user_streaks (
    user_id TEXT PRIMARY KEY,
    current_streak INTEGER NOT NULL DEFAULT 0,
    last_completed_date TEXT,
    goal_minutes INTEGER NOT NULL DEFAULT 15,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
);

INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Study-minute accumulation + review history
const MIGRATION_V2_UP: &str = r#"
-- Minutes studied on last_active_date; rolls over when the day changes
ALTER TABLE user_streaks ADD COLUMN today_minutes INTEGER NOT NULL DEFAULT 0;
ALTER TABLE user_streaks ADD COLUMN last_active_date TEXT;

-- Append-only log of applied reviews
CREATE TABLE IF NOT EXISTS review_history (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    word_id TEXT NOT NULL,
    feedback TEXT NOT NULL,
    level_before INTEGER NOT NULL,
    level_after INTEGER NOT NULL,
    reviewed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_user_time ON review_history(user_id, reviewed_at);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            // execute_batch handles the multi-statement SQL
            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
