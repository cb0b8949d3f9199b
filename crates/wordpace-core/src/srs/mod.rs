//! Spaced Repetition Module
//!
//! Five-level interval scheduling for vocabulary reviews:
//! - A word moves between levels 0..=4 on learner feedback
//! - Each level maps to a fixed review interval (1/3/7/14/30 days)
//! - Due-queue selection surfaces the most overdue, weakest words first
//!
//! Deliberately simpler than ease-factor schemes (SM-2 and descendants):
//! the interval ladder is a single lookup table, which keeps every
//! transition auditable and retry-safe.

mod queue;
mod scheduler;

pub use queue::{select_due, DEFAULT_SESSION_LIMIT};
pub use scheduler::{
    preview_review, schedule_review, PreviewOutcome, ReviewFeedback, ReviewPreview,
    EASY_LEVEL_STEP, MAX_LEVEL, REVIEW_INTERVALS_DAYS,
};
