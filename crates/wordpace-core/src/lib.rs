//! # Wordpace Core
//!
//! Learning-progress engine for vocabulary apps. Decides when each saved
//! word should next be reviewed and whether a learner's daily study goal
//! kept a streak alive:
//!
//! - **Leveled SRS**: five proficiency levels with a fixed interval ladder
//!   (1/3/7/14/30 days), promoted and demoted by hard/good/easy feedback
//! - **Review Queue**: most-overdue-first session building with a
//!   weakest-level tie-break
//! - **Streak Tracking**: lazy, idempotent daily-goal evaluation that needs
//!   no scheduled jobs
//! - **Progress Stats**: dashboard counters (totals, mastered, accuracy)
//!
//! The engine itself is pure: every function takes the caller's clock as an
//! argument and returns new values, so review submissions can be retried
//! safely and every transition is reproducible in tests. The bundled
//! [`Storage`] layer supplies the persistence contract the engine assumes —
//! read the current record, compute, write with conflict detection.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wordpace_core::{ReviewFeedback, Storage};
//! use chrono::Utc;
//!
//! // Create storage (uses default platform-specific location)
//! let storage = Storage::new(None)?;
//!
//! // Save a word; it is due immediately at level 0
//! let now = Utc::now();
//! storage.save_word("user-1", "word-犬", now)?;
//!
//! // Build a review session and answer the first card
//! let queue = storage.due_reviews("user-1", now.date_naive(), 20)?;
//! let updated = storage.record_review("user-1", &queue[0].word_id, ReviewFeedback::Good, now)?;
//!
//! // Accumulate study time and evaluate the streak
//! storage.log_study_minutes("user-1", now.date_naive(), 15)?;
//! let streak = storage.evaluate_streak("user-1", now.date_naive())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite in via `rusqlite/bundled`
//! - `encryption`: SQLCipher-backed store keyed by `WORDPACE_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
// Only warn about missing docs for public items exported from the crate root
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod progress;
pub mod srs;
pub mod stats;
pub mod storage;
pub mod streak;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Record types and core errors
pub use progress::{ProgressError, UserStreak, WordProgress, DEFAULT_GOAL_MINUTES};

// Scheduler + queue
pub use srs::{
    preview_review, schedule_review, select_due, PreviewOutcome, ReviewFeedback, ReviewPreview,
    DEFAULT_SESSION_LIMIT, EASY_LEVEL_STEP, MAX_LEVEL, REVIEW_INTERVALS_DAYS,
};

// Streak tracking
pub use streak::evaluate as evaluate_streak;

// Stats
pub use stats::{compute_stats, ProgressStats};

// Storage layer
pub use storage::{Result, ReviewLogEntry, Storage, StorageError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        compute_stats, evaluate_streak, schedule_review, select_due, ProgressError, ProgressStats,
        Result, ReviewFeedback, Storage, StorageError, UserStreak, WordProgress,
    };
}
