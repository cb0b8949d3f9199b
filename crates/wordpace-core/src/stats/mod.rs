//! Progress Statistics
//!
//! Read-only aggregation over a user's word-progress records for dashboard
//! surfaces: totals, mastered count, lifetime accuracy.

use serde::{Deserialize, Serialize};

use crate::progress::WordProgress;

/// Summary counters over one user's saved words
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    /// Number of saved words
    pub total_words: i64,
    /// Words at the top level
    pub mastered_words: i64,
    /// Lifetime good/easy answers across all words
    pub total_correct: i64,
    /// `correct / (correct + wrong)`; `0.0` before the first review
    pub accuracy: f64,
}

/// Aggregate a user's records
///
/// Pure and order-insensitive; an empty slice yields all zeros rather than
/// a NaN accuracy.
pub fn compute_stats(records: &[WordProgress]) -> ProgressStats {
    let total_words = records.len() as i64;
    let mastered_words = records.iter().filter(|r| r.is_mastered()).count() as i64;
    let total_correct: i64 = records.iter().map(|r| i64::from(r.correct_count)).sum();
    let total_wrong: i64 = records.iter().map(|r| i64::from(r.wrong_count)).sum();

    let answered = total_correct + total_wrong;
    let accuracy = if answered > 0 {
        total_correct as f64 / answered as f64
    } else {
        0.0
    };

    ProgressStats {
        total_words,
        mastered_words,
        total_correct,
        accuracy,
    }
}

// ============================================================================
// TESTS
// ============================================================================
