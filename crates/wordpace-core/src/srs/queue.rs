//! Review Queue Selection
//!
//! Builds the ordered list of words for a review session: everything due on
//! or before `today`, most overdue first, weakest level first on ties,
//! capped at the session limit.
//!
//! Selection is a pure read. It never marks anything "in review", so two
//! devices building a session at the same time may see overlapping sets;
//! the write-time conflict check in storage resolves that race.

use chrono::NaiveDate;

use crate::progress::WordProgress;

/// Queue size used by a standard review session when the caller has no
/// preference of its own
pub const DEFAULT_SESSION_LIMIT: usize = 20;

/// Select the due words for a review session
///
/// Returns an empty vec when nothing is due — callers render an
/// "all caught up" state, not an error.
pub fn select_due(records: &[WordProgress], today: NaiveDate, limit: usize) -> Vec<WordProgress> {
    let mut due: Vec<WordProgress> = records
        .iter()
        .filter(|record| record.is_due(today))
        .cloned()
        .collect();

    // Most overdue first; weaker words surface before near-mastered ones
    // sharing the same due date
    due.sort_by_key(|record| (record.next_review_date, record.level));
    due.truncate(limit);
    due
}

// ============================================================================
// TESTS
// ============================================================================
