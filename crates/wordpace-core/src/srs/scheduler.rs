//! Review Scheduler
//!
//! Pure transition function over [`WordProgress`]: given the current record,
//! a feedback grade, and the caller's clock, produce the next record.
//!
//! Determinism is load-bearing: review submissions may be retried over a
//! flaky network, and a retry of the same `(record, feedback, now)` triple
//! must produce byte-identical output rather than double-counting. Nothing
//! here reads a clock or any other ambient state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::{ProgressError, WordProgress};

/// Highest proficiency level; a word at this level counts as mastered
pub const MAX_LEVEL: u8 = 4;

/// Review interval in days, indexed by the level a word just moved to.
/// The single source of interval truth — call sites never carry their own
/// copies of this table.
pub const REVIEW_INTERVALS_DAYS: [i64; MAX_LEVEL as usize + 1] = [1, 3, 7, 14, 30];

/// Levels gained by an `easy` answer (`good` always gains one)
pub const EASY_LEVEL_STEP: u8 = 2;

// ============================================================================
// FEEDBACK
// ============================================================================

/// Learner feedback for one review answer
///
/// A closed set: anything else arriving from the host application is a
/// caller error and must be rejected at the parse boundary, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFeedback {
    /// Wrong or a struggle; the word drops a level
    Hard,
    /// Correct; the word gains a level
    Good,
    /// Effortless; the word gains [`EASY_LEVEL_STEP`] levels
    Easy,
}

impl ReviewFeedback {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewFeedback::Hard => "hard",
            ReviewFeedback::Good => "good",
            ReviewFeedback::Easy => "easy",
        }
    }

    /// Whether this grade counts as a correct answer
    pub fn is_correct(&self) -> bool {
        !matches!(self, ReviewFeedback::Hard)
    }

    /// The level a word at `level` moves to under this grade,
    /// clamped to `[0, MAX_LEVEL]`
    pub fn apply_to(&self, level: u8) -> u8 {
        match self {
            ReviewFeedback::Hard => level.saturating_sub(1),
            ReviewFeedback::Good => level.saturating_add(1).min(MAX_LEVEL),
            ReviewFeedback::Easy => level.saturating_add(EASY_LEVEL_STEP).min(MAX_LEVEL),
        }
    }
}

impl std::fmt::Display for ReviewFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReviewFeedback {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hard" => Ok(ReviewFeedback::Hard),
            "good" => Ok(ReviewFeedback::Good),
            "easy" => Ok(ReviewFeedback::Easy),
            _ => Err(ProgressError::InvalidFeedback(s.to_string())),
        }
    }
}

// ============================================================================
// TRANSITION
// ============================================================================

/// Apply one review answer to a word's progress record
///
/// The scheduling date is the UTC calendar date of `now`; `updated_at`
/// receives the full timestamp so it stays usable as a last-write-wins
/// token. A `now` whose date predates the record's `updated_at` date is
/// reported as [`ProgressError::ClockSkew`] for the caller to resolve.
///
/// A word at level 0 answered `hard` stays at level 0 but is still pushed
/// one day out, so a struggling word cannot come due again the same day.
pub fn schedule_review(
    record: &WordProgress,
    feedback: ReviewFeedback,
    now: DateTime<Utc>,
) -> Result<WordProgress, ProgressError> {
    let today = now.date_naive();
    let recorded = record.updated_at.date_naive();
    if today < recorded {
        return Err(ProgressError::ClockSkew {
            supplied: today,
            recorded,
        });
    }

    let level = feedback.apply_to(record.level);

    let mut next = record.clone();
    next.level = level;
    next.next_review_date = today + Duration::days(REVIEW_INTERVALS_DAYS[level as usize]);
    if feedback.is_correct() {
        next.correct_count += 1;
    } else {
        next.wrong_count += 1;
    }
    next.updated_at = now;
    Ok(next)
}

// ============================================================================
// PREVIEW
// ============================================================================

/// Where one feedback grade would land a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOutcome {
    /// Resulting level
    pub level: u8,
    /// Resulting due date
    pub next_review_date: chrono::NaiveDate,
}

/// The would-be outcome of each feedback grade, for UIs that show
/// "again in 3 days / 7 days / 14 days" on the answer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    /// Outcome of answering `hard`
    pub hard: PreviewOutcome,
    /// Outcome of answering `good`
    pub good: PreviewOutcome,
    /// Outcome of answering `easy`
    pub easy: PreviewOutcome,
}

/// Preview all three outcomes without committing anything
pub fn preview_review(
    record: &WordProgress,
    now: DateTime<Utc>,
) -> Result<ReviewPreview, ProgressError> {
    let outcome = |feedback: ReviewFeedback| -> Result<PreviewOutcome, ProgressError> {
        let next = schedule_review(record, feedback, now)?;
        Ok(PreviewOutcome {
            level: next.level,
            next_review_date: next.next_review_date,
        })
    };

    Ok(ReviewPreview {
        hard: outcome(ReviewFeedback::Hard)?,
        good: outcome(ReviewFeedback::Good)?,
        easy: outcome(ReviewFeedback::Easy)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
