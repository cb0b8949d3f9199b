//! Journey: two devices race on the same word
//!
//! Review submissions are last-write-wins on the record's `updated_at`
//! token. The loser of a race gets a conflict it can recover from by
//! refetching; a blind retry of an already-applied submission can never
//! double-count.

use chrono::Duration;
use wordpace_core::{ProgressError, ReviewFeedback, StorageError};
use wordpace_e2e_tests::harness::TestDatabaseManager;
use wordpace_e2e_tests::mocks::TestDataFactory;

#[test]
fn losing_device_conflicts_and_recovers() {
    let db = TestDatabaseManager::new_temp();
    let user = TestDataFactory::user_id();
    let now = TestDataFactory::noon(2024, 3, 10);

    let snapshot = db.storage.save_word(&user, "word-1", now).unwrap();

    // Device A applies first
    let a_result = db
        .storage
        .apply_review(&snapshot, ReviewFeedback::Good, now + Duration::minutes(1))
        .unwrap();
    assert_eq!(a_result.level, 1);

    // Device B computed against the same pre-review snapshot and loses
    let b_err = db
        .storage
        .apply_review(&snapshot, ReviewFeedback::Easy, now + Duration::minutes(2))
        .unwrap_err();
    assert!(matches!(b_err, StorageError::StaleWrite { .. }));

    // Recovery: refetch, recompute, resubmit
    let fresh = db.storage.get_progress(&user, "word-1").unwrap().unwrap();
    let b_result = db
        .storage
        .apply_review(&fresh, ReviewFeedback::Easy, now + Duration::minutes(3))
        .unwrap();
    assert_eq!(b_result.level, 3);
    assert_eq!(b_result.correct_count, 2);
}

#[test]
fn blind_retry_of_an_applied_submission_cannot_double_count() {
    let db = TestDatabaseManager::new_temp();
    let user = TestDataFactory::user_id();
    let now = TestDataFactory::noon(2024, 3, 10);

    let snapshot = db.storage.save_word(&user, "word-1", now).unwrap();
    let submit_at = now + Duration::minutes(5);

    db.storage
        .apply_review(&snapshot, ReviewFeedback::Good, submit_at)
        .unwrap();

    // The network flaked and the client resends the identical submission.
    // The token guard misses, so the counters stay single-counted.
    let retry = db
        .storage
        .apply_review(&snapshot, ReviewFeedback::Good, submit_at)
        .unwrap_err();
    assert!(matches!(retry, StorageError::StaleWrite { .. }));

    let current = db.storage.get_progress(&user, "word-1").unwrap().unwrap();
    assert_eq!(current.correct_count, 1);
    assert_eq!(current.level, 1);
}

#[test]
fn clock_skew_is_surfaced_not_corrected() {
    let db = TestDatabaseManager::new_temp();
    let user = TestDataFactory::user_id();

    db.storage
        .save_word(&user, "word-1", TestDataFactory::noon(2024, 3, 10))
        .unwrap();

    // A device with a lagging clock submits "yesterday"
    let err = db
        .storage
        .record_review(
            &user,
            "word-1",
            ReviewFeedback::Good,
            TestDataFactory::noon(2024, 3, 8),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Progress(ProgressError::ClockSkew { .. })
    ));

    // Nothing was written
    let record = db.storage.get_progress(&user, "word-1").unwrap().unwrap();
    assert_eq!(record.level, 0);
    assert_eq!(record.correct_count, 0);
    assert!(db.storage.review_history(&user, 10).unwrap().is_empty());
}
