//! Journey: a week of study with one missed day
//!
//! The streak is evaluated on-demand (app foreground), never by a daily
//! job, so the journey leans on repeated evaluation being harmless.

use chrono::NaiveDate;
use wordpace_e2e_tests::harness::TestDatabaseManager;
use wordpace_e2e_tests::mocks::TestDataFactory;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
}

#[test]
fn missed_day_breaks_the_streak_lazily() {
    let db = TestDatabaseManager::new_temp();
    let user = TestDataFactory::user_id();
    db.storage.set_goal_minutes(&user, 10).unwrap();

    // Days 1-3: goal met each day
    for n in 1..=3 {
        db.storage.log_study_minutes(&user, day(n), 12).unwrap();
        let state = db.storage.evaluate_streak(&user, day(n)).unwrap();
        assert_eq!(state.current_streak, n);
    }

    // Day 4: only a short session, goal missed. Nothing changes yet —
    // the break is only visible once a later day completes.
    db.storage.log_study_minutes(&user, day(4), 4).unwrap();
    let state = db.storage.evaluate_streak(&user, day(4)).unwrap();
    assert_eq!(state.current_streak, 3);
    assert_eq!(state.last_completed_date, Some(day(3)));

    // Day 5: goal met after the gap; streak restarts at 1
    db.storage.log_study_minutes(&user, day(5), 15).unwrap();
    let state = db.storage.evaluate_streak(&user, day(5)).unwrap();
    assert_eq!(state.current_streak, 1);

    // Days 6-7 rebuild
    for n in 6..=7 {
        db.storage.log_study_minutes(&user, day(n), 15).unwrap();
        db.storage.evaluate_streak(&user, day(n)).unwrap();
    }
    let state = db.storage.get_streak(&user).unwrap();
    assert_eq!(state.current_streak, 3);
    assert_eq!(state.last_completed_date, Some(day(7)));
}

#[test]
fn repeated_foregrounds_never_double_count() {
    let db = TestDatabaseManager::new_temp();
    let user = TestDataFactory::user_id();
    db.storage.set_goal_minutes(&user, 10).unwrap();

    db.storage.log_study_minutes(&user, day(10), 20).unwrap();

    // The app comes to the foreground many times in one day
    for _ in 0..6 {
        let state = db.storage.evaluate_streak(&user, day(10)).unwrap();
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.last_completed_date, Some(day(10)));
    }
}

#[test]
fn study_minutes_reset_at_the_day_boundary() {
    let db = TestDatabaseManager::new_temp();
    let user = TestDataFactory::user_id();
    db.storage.set_goal_minutes(&user, 10).unwrap();

    // 8 minutes on day 1: goal missed
    db.storage.log_study_minutes(&user, day(1), 8).unwrap();
    let state = db.storage.evaluate_streak(&user, day(1)).unwrap();
    assert_eq!(state.current_streak, 0);

    // 5 minutes on day 2 must not stack onto yesterday's 8
    let state = db.storage.log_study_minutes(&user, day(2), 5).unwrap();
    assert_eq!(state.minutes_for(day(2)), 5);
    let state = db.storage.evaluate_streak(&user, day(2)).unwrap();
    assert_eq!(state.current_streak, 0);

    // Topping up past the goal completes day 2
    db.storage.log_study_minutes(&user, day(2), 6).unwrap();
    let state = db.storage.evaluate_streak(&user, day(2)).unwrap();
    assert_eq!(state.current_streak, 1);
    assert_eq!(state.last_completed_date, Some(day(2)));
}

#[test]
fn streak_survives_reopening_the_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("persistent.db");
    let user = TestDataFactory::user_id();

    {
        let db = TestDatabaseManager::new_at_path(path.clone());
        db.storage.set_goal_minutes(&user, 10).unwrap();
        db.storage.log_study_minutes(&user, day(1), 12).unwrap();
        db.storage.evaluate_streak(&user, day(1)).unwrap();
    }

    // A fresh process sees yesterday's completion and extends from it
    let db = TestDatabaseManager::new_at_path(path);
    let state = db.storage.get_streak(&user).unwrap();
    assert_eq!(state.current_streak, 1);

    db.storage.log_study_minutes(&user, day(2), 12).unwrap();
    let state = db.storage.evaluate_streak(&user, day(2)).unwrap();
    assert_eq!(state.current_streak, 2);
}
