//! Progress module - Core record types and error taxonomy
//!
//! Holds the two units of learner state:
//! - Per-word scheduling records (level, due date, answer counters)
//! - Per-user streak state (daily goal, consecutive-day count)
//!
//! Everything here is plain data. The transitions that mutate these records
//! live in [`crate::srs`] and [`crate::streak`]; persistence lives in
//! [`crate::storage`].

mod record;

pub use record::{UserStreak, WordProgress, DEFAULT_GOAL_MINUTES};

use chrono::NaiveDate;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors produced by the pure progress transitions
///
/// Nothing here is fatal: every variant is recoverable by the caller
/// (fix the input, refetch, or surface to the user).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// Feedback value outside the closed hard/good/easy set
    #[error("invalid review feedback: {0:?}")]
    InvalidFeedback(String),
    /// The supplied calendar date predates already-recorded state.
    /// The engine propagates the inconsistency instead of clamping it.
    #[error("clock skew: supplied date {supplied} predates recorded date {recorded}")]
    ClockSkew {
        /// Calendar date the caller passed in
        supplied: NaiveDate,
        /// Date already present on the record
        recorded: NaiveDate,
    },
}
