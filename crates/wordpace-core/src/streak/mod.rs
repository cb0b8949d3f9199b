//! Streak Tracker
//!
//! State machine over `{last_completed_date, current_streak}`, advanced by
//! on-demand evaluation (app foreground, activity events) rather than a
//! daily job. The three-way date comparison makes the transition safe to
//! run zero or many times per day:
//! - goal met, last completion was today       → no change (idempotent)
//! - goal met, last completion was yesterday   → streak extends
//! - goal met, never completed or gap ≥ 1 day  → streak restarts at 1
//!
//! A day whose goal is not met changes nothing; the break shows up lazily
//! the next time the goal is met after a gap. Whether the goal was met is
//! the caller's fact to compute — accumulated minutes live on the state,
//! but the tracker itself only consumes the boolean.

use chrono::NaiveDate;

use crate::progress::{ProgressError, UserStreak};

/// Advance a user's streak state with today's completion fact
///
/// Pure: returns the next state, never touches the input. A
/// `last_completed_date` in the future relative to `today` is reported as
/// [`ProgressError::ClockSkew`] rather than silently restarting the streak.
pub fn evaluate(
    state: &UserStreak,
    today: NaiveDate,
    goal_met: bool,
) -> Result<UserStreak, ProgressError> {
    if let Some(last) = state.last_completed_date {
        if last > today {
            return Err(ProgressError::ClockSkew {
                supplied: today,
                recorded: last,
            });
        }
    }

    if !goal_met {
        return Ok(state.clone());
    }

    let mut next = state.clone();
    match state.last_completed_date {
        // Already counted today
        Some(last) if last == today => {}
        // Consecutive day
        Some(last) if last.succ_opt() == Some(today) => {
            next.current_streak += 1;
            next.last_completed_date = Some(today);
        }
        // First completion ever, or a gap broke continuity
        _ => {
            next.current_streak = 1;
            next.last_completed_date = Some(today);
        }
    }
    Ok(next)
}

// ============================================================================
// TESTS
// ============================================================================
