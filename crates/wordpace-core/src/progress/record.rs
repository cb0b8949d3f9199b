//! Learner progress records
//!
//! Each record represents one learner-facing unit of state:
//! - [`WordProgress`]: scheduling state for one (user, word) pair
//! - [`UserStreak`]: daily-goal state for one user

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::MAX_LEVEL;

/// Daily study goal applied to users who never set one, in minutes
pub const DEFAULT_GOAL_MINUTES: u32 = 15;

// ============================================================================
// WORD PROGRESS
// ============================================================================

/// Spaced-repetition state for one word saved by one user
///
/// `(user_id, word_id)` is the unique key. The record is created on the
/// first "save word" action and mutated only by
/// [`crate::srs::schedule_review`]; removing a saved word deletes the whole
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    /// Owning user
    pub user_id: String,
    /// The vocabulary item
    pub word_id: String,
    /// Proficiency level, `0` (unseen/weakest) to [`MAX_LEVEL`] (mastered)
    pub level: u8,
    /// Calendar date the word comes due; no time-of-day component
    pub next_review_date: NaiveDate,
    /// Number of good/easy answers, never decreases
    pub correct_count: u32,
    /// Number of hard answers, never decreases
    pub wrong_count: u32,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Changes on every scheduler transition; doubles as the
    /// last-write-wins token for conflict detection at write time
    pub updated_at: DateTime<Utc>,
}

impl WordProgress {
    /// Create the record written by a first "save word" action:
    /// level 0, due immediately.
    pub fn new(user_id: impl Into<String>, word_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            word_id: word_id.into(),
            level: 0,
            next_review_date: now.date_naive(),
            correct_count: 0,
            wrong_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the word should appear in a review session on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }

    /// Whether the word has reached the top level
    pub fn is_mastered(&self) -> bool {
        self.level >= MAX_LEVEL
    }
}

// ============================================================================
// USER STREAK
// ============================================================================

/// Daily-goal streak state for one user
///
/// Created lazily on first evaluation. `current_streak` counts consecutive
/// calendar days the goal was met; it is `0` exactly when
/// `last_completed_date` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStreak {
    /// Owning user
    pub user_id: String,
    /// Consecutive calendar days the daily goal was met
    pub current_streak: u32,
    /// Most recent day the goal was met
    pub last_completed_date: Option<NaiveDate>,
    /// Minutes studied on `last_active_date`
    pub today_minutes: u32,
    /// Daily target in minutes
    pub goal_minutes: u32,
    /// The day `today_minutes` refers to; lets accumulation roll over at
    /// midnight without a scheduled job
    pub last_active_date: Option<NaiveDate>,
}

impl UserStreak {
    /// Fresh state for a user who has never studied
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current_streak: 0,
            last_completed_date: None,
            today_minutes: 0,
            goal_minutes: DEFAULT_GOAL_MINUTES,
            last_active_date: None,
        }
    }

    /// Minutes studied on `today`; stale accumulation from an earlier day
    /// counts as zero.
    pub fn minutes_for(&self, today: NaiveDate) -> u32 {
        if self.last_active_date == Some(today) {
            self.today_minutes
        } else {
            0
        }
    }

    /// Whether the accumulated minutes meet the daily goal on `today`
    pub fn goal_met(&self, today: NaiveDate) -> bool {
        self.minutes_for(today) >= self.goal_minutes
    }

    /// Add study minutes for `today`, rolling the accumulator over when the
    /// calendar day has changed since the last activity.
    pub fn log_minutes(&self, today: NaiveDate, minutes: u32) -> Self {
        let mut next = self.clone();
        next.today_minutes = self.minutes_for(today).saturating_add(minutes);
        next.last_active_date = Some(today);
        next
    }
}

// ============================================================================
// TESTS
// ============================================================================
