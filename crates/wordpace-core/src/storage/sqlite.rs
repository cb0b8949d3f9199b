//! SQLite Storage Implementation
//!
//! The persistence collaborator the pure engine assumes: read the current
//! record, compute the transition, write the result with conflict
//! detection. The write is guarded on the snapshot's `updated_at`, so a
//! submission computed against a stale record surfaces as
//! [`StorageError::StaleWrite`] instead of silently clobbering a newer one.

use chrono::{DateTime, NaiveDate, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::progress::{ProgressError, UserStreak, WordProgress};
use crate::srs::{self, ReviewFeedback};
use crate::stats::{self, ProgressStats};
use crate::streak;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Progress record not found
    #[error("Progress record not found: {0}")]
    NotFound(String),
    /// The record changed between read and write; refetch and retry
    #[error("Stale write for {user_id}/{word_id}: record changed since it was read")]
    StaleWrite {
        /// Owning user of the contested record
        user_id: String,
        /// Word whose record was contested
        word_id: String,
    },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// Rejected input or inconsistent dates, from the pure engine
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// REVIEW HISTORY
// ============================================================================

/// One applied review, as recorded in the append-only history
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    /// Unique entry id (UUID v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Reviewed word
    pub word_id: String,
    /// Feedback the learner gave
    pub feedback: ReviewFeedback,
    /// Level before the transition
    pub level_before: u8,
    /// Level after the transition
    pub level_after: u8,
    /// When the review was applied
    pub reviewed_at: DateTime<Utc>,
}

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage struct for learner progress
///
/// Uses separate reader/writer connections for interior mutability.
/// All methods take `&self` (not `&mut self`), making Storage `Send + Sync`
/// so the host application can share it behind an `Arc<Storage>`.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl Storage {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        // Apply encryption key if SQLCipher is enabled and key is provided
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("WORDPACE_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        // Configure SQLite for performance
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Create new storage instance
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "wordpace", "core").ok_or_else(|| {
                    StorageError::Init("Could not determine project directories".to_string())
                })?;

                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                // Restrict directory permissions to owner-only on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = std::fs::Permissions::from_mode(0o700);
                    let _ = std::fs::set_permissions(data_dir, perms);
                }
                data_dir.join("wordpace.db")
            }
        };

        // Open writer connection
        let writer_conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        // Open reader connection to same path
        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
        })
    }

    // ========================================================================
    // WORD PROGRESS
    // ========================================================================

    /// Create the level-0 record for a newly saved word, due immediately
    ///
    /// Idempotent: saving a word that is already saved returns the existing
    /// record untouched.
    pub fn save_word(
        &self,
        user_id: &str,
        word_id: &str,
        now: DateTime<Utc>,
    ) -> Result<WordProgress> {
        let record = WordProgress::new(user_id, word_id, now);

        let inserted = {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "INSERT INTO word_progress (
                    user_id, word_id, level, next_review_date,
                    correct_count, wrong_count, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(user_id, word_id) DO NOTHING",
                params![
                    record.user_id,
                    record.word_id,
                    record.level,
                    record.next_review_date.to_string(),
                    record.correct_count,
                    record.wrong_count,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?
        };

        if inserted == 0 {
            tracing::debug!("Word {}/{} already saved", user_id, word_id);
            return self
                .get_progress(user_id, word_id)?
                .ok_or_else(|| StorageError::NotFound(format!("{}/{}", user_id, word_id)));
        }

        Ok(record)
    }

    /// Get the progress record for one (user, word) pair
    pub fn get_progress(&self, user_id: &str, word_id: &str) -> Result<Option<WordProgress>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader
            .prepare("SELECT * FROM word_progress WHERE user_id = ?1 AND word_id = ?2")?;

        let record = stmt
            .query_row(params![user_id, word_id], |row| Self::row_to_progress(row))
            .optional()?;
        Ok(record)
    }

    /// All progress records for a user
    pub fn list_progress(&self, user_id: &str) -> Result<Vec<WordProgress>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt =
            reader.prepare("SELECT * FROM word_progress WHERE user_id = ?1 ORDER BY word_id")?;

        let rows = stmt.query_map(params![user_id], |row| Self::row_to_progress(row))?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Apply one review answer against a snapshot the caller read earlier
    ///
    /// Runs the pure scheduler, then writes the result guarded on the
    /// snapshot's `updated_at`. If another device got there first the
    /// guard misses, nothing is written, and the caller gets
    /// [`StorageError::StaleWrite`] — refetch and resubmit.
    pub fn apply_review(
        &self,
        snapshot: &WordProgress,
        feedback: ReviewFeedback,
        now: DateTime<Utc>,
    ) -> Result<WordProgress> {
        let next = srs::schedule_review(snapshot, feedback, now)?;

        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;

        let changed = writer.execute(
            "UPDATE word_progress SET
                level = ?1,
                next_review_date = ?2,
                correct_count = ?3,
                wrong_count = ?4,
                updated_at = ?5
            WHERE user_id = ?6 AND word_id = ?7 AND updated_at = ?8",
            params![
                next.level,
                next.next_review_date.to_string(),
                next.correct_count,
                next.wrong_count,
                next.updated_at.to_rfc3339(),
                snapshot.user_id,
                snapshot.word_id,
                snapshot.updated_at.to_rfc3339(),
            ],
        )?;

        if changed == 0 {
            drop(writer);
            return match self.get_progress(&snapshot.user_id, &snapshot.word_id)? {
                Some(_) => {
                    tracing::warn!(
                        "Stale review write for {}/{}",
                        snapshot.user_id,
                        snapshot.word_id
                    );
                    Err(StorageError::StaleWrite {
                        user_id: snapshot.user_id.clone(),
                        word_id: snapshot.word_id.clone(),
                    })
                }
                None => Err(StorageError::NotFound(format!(
                    "{}/{}",
                    snapshot.user_id, snapshot.word_id
                ))),
            };
        }

        writer.execute(
            "INSERT INTO review_history (
                id, user_id, word_id, feedback, level_before, level_after, reviewed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Uuid::new_v4().to_string(),
                snapshot.user_id,
                snapshot.word_id,
                feedback.as_str(),
                snapshot.level,
                next.level,
                next.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(next)
    }

    /// Record a review, creating the progress record if the word was never
    /// saved (first review always starts from level 0)
    pub fn record_review(
        &self,
        user_id: &str,
        word_id: &str,
        feedback: ReviewFeedback,
        now: DateTime<Utc>,
    ) -> Result<WordProgress> {
        let snapshot = match self.get_progress(user_id, word_id)? {
            Some(record) => record,
            None => self.save_word(user_id, word_id, now)?,
        };
        self.apply_review(&snapshot, feedback, now)
    }

    /// Build the review queue for a session
    ///
    /// Loads the user's records and delegates ordering to
    /// [`srs::select_due`], so queue semantics have a single home.
    pub fn due_reviews(
        &self,
        user_id: &str,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<WordProgress>> {
        let records = self.list_progress(user_id)?;
        Ok(srs::select_due(&records, today, limit))
    }

    /// Delete a saved word's record entirely (the "remove word" action)
    pub fn remove_word(&self, user_id: &str, word_id: &str) -> Result<bool> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        let deleted = writer.execute(
            "DELETE FROM word_progress WHERE user_id = ?1 AND word_id = ?2",
            params![user_id, word_id],
        )?;
        Ok(deleted > 0)
    }

    /// Most recent reviews for a user, newest first
    pub fn review_history(&self, user_id: &str, limit: usize) -> Result<Vec<ReviewLogEntry>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT * FROM review_history
             WHERE user_id = ?1
             ORDER BY reviewed_at DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            Self::row_to_log_entry(row)
        })?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    // ========================================================================
    // STREAKS
    // ========================================================================

    /// Get a user's streak state, creating the default lazily on first use
    pub fn get_streak(&self, user_id: &str) -> Result<UserStreak> {
        let existing = {
            let reader = self
                .reader
                .lock()
                .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
            let mut stmt = reader.prepare("SELECT * FROM user_streaks WHERE user_id = ?1")?;
            stmt.query_row(params![user_id], |row| Self::row_to_streak(row))
                .optional()?
        };

        match existing {
            Some(state) => Ok(state),
            None => {
                let state = UserStreak::new(user_id);
                self.write_streak(&state)?;
                Ok(state)
            }
        }
    }

    /// Set a user's daily goal in minutes
    pub fn set_goal_minutes(&self, user_id: &str, goal_minutes: u32) -> Result<UserStreak> {
        let mut state = self.get_streak(user_id)?;
        state.goal_minutes = goal_minutes;
        self.write_streak(&state)?;
        Ok(state)
    }

    /// Accumulate study minutes for `today`, rolling the per-day counter
    /// over when the calendar day has changed since the last activity
    pub fn log_study_minutes(
        &self,
        user_id: &str,
        today: NaiveDate,
        minutes: u32,
    ) -> Result<UserStreak> {
        let state = self.get_streak(user_id)?.log_minutes(today, minutes);
        self.write_streak(&state)?;
        Ok(state)
    }

    /// Evaluate the streak for `today`
    ///
    /// Derives the goal fact from accumulated minutes, runs the pure
    /// tracker, and persists the result. Safe to call any number of times
    /// per day.
    pub fn evaluate_streak(&self, user_id: &str, today: NaiveDate) -> Result<UserStreak> {
        let state = self.get_streak(user_id)?;
        let next = streak::evaluate(&state, today, state.goal_met(today))?;
        if next != state {
            self.write_streak(&next)?;
        }
        Ok(next)
    }

    /// Upsert a streak row
    fn write_streak(&self, state: &UserStreak) -> Result<()> {
        let now = Utc::now();
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;
        writer.execute(
            "INSERT INTO user_streaks (
                user_id, current_streak, last_completed_date,
                goal_minutes, today_minutes, last_active_date, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                current_streak = excluded.current_streak,
                last_completed_date = excluded.last_completed_date,
                goal_minutes = excluded.goal_minutes,
                today_minutes = excluded.today_minutes,
                last_active_date = excluded.last_active_date,
                updated_at = excluded.updated_at",
            params![
                state.user_id,
                state.current_streak,
                state.last_completed_date.map(|d| d.to_string()),
                state.goal_minutes,
                state.today_minutes,
                state.last_active_date.map(|d| d.to_string()),
                now.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ========================================================================
    // STATS
    // ========================================================================

    /// Dashboard counters for a user
    pub fn get_stats(&self, user_id: &str) -> Result<ProgressStats> {
        let records = self.list_progress(user_id)?;
        Ok(stats::compute_stats(&records))
    }

    // ========================================================================
    // ROW MAPPING
    // ========================================================================

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Invalid {} timestamp '{}': {}", field_name, value, e),
                    )),
                )
            })
    }

    /// Parse a bare `YYYY-MM-DD` calendar date
    fn parse_date(value: &str, field_name: &str) -> rusqlite::Result<NaiveDate> {
        value.parse::<NaiveDate>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Invalid {} date '{}': {}", field_name, value, e),
                )),
            )
        })
    }

    /// Convert a row to WordProgress
    fn row_to_progress(row: &rusqlite::Row) -> rusqlite::Result<WordProgress> {
        let next_review_date: String = row.get("next_review_date")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(WordProgress {
            user_id: row.get("user_id")?,
            word_id: row.get("word_id")?,
            level: row.get("level")?,
            next_review_date: Self::parse_date(&next_review_date, "next_review_date")?,
            correct_count: row.get("correct_count")?,
            wrong_count: row.get("wrong_count")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
            updated_at: Self::parse_timestamp(&updated_at, "updated_at")?,
        })
    }

    /// Convert a row to UserStreak
    fn row_to_streak(row: &rusqlite::Row) -> rusqlite::Result<UserStreak> {
        let last_completed: Option<String> = row.get("last_completed_date")?;
        let last_active: Option<String> = row.get("last_active_date")?;

        let last_completed_date = last_completed
            .map(|s| Self::parse_date(&s, "last_completed_date"))
            .transpose()?;
        let last_active_date = last_active
            .map(|s| Self::parse_date(&s, "last_active_date"))
            .transpose()?;

        Ok(UserStreak {
            user_id: row.get("user_id")?,
            current_streak: row.get("current_streak")?,
            last_completed_date,
            today_minutes: row.get("today_minutes")?,
            goal_minutes: row.get("goal_minutes")?,
            last_active_date,
        })
    }

    /// Convert a row to ReviewLogEntry
    fn row_to_log_entry(row: &rusqlite::Row) -> rusqlite::Result<ReviewLogEntry> {
        let feedback: String = row.get("feedback")?;
        let feedback = feedback.parse::<ReviewFeedback>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    e.to_string(),
                )),
            )
        })?;
        let reviewed_at: String = row.get("reviewed_at")?;

        Ok(ReviewLogEntry {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            word_id: row.get("word_id")?,
            feedback,
            level_before: row.get("level_before")?,
            level_after: row.get("level_after")?,
            reviewed_at: Self::parse_timestamp(&reviewed_at, "reviewed_at")?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
