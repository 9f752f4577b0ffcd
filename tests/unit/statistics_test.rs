//! Unit tests for workout statistics and weekly buckets.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use liftlog::recording::types::NewSet;
use liftlog::storage::MemoryStore;
use liftlog::WorkoutRecorder;

fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
}

fn log_workout(
    recorder: &mut WorkoutRecorder<MemoryStore>,
    date: NaiveDate,
    exercise: &str,
    sets: &[NewSet],
) {
    let start = at(date, 18);
    recorder.start_at(start, None, None, &[]).unwrap();
    let entry = recorder.add_exercise(exercise).unwrap();
    for set in sets {
        recorder.add_set(entry, set.clone()).unwrap();
    }
    recorder
        .finish_at(start + Duration::minutes(45), None, None)
        .unwrap();
}

fn day(d: u32) -> NaiveDate {
    // 2024-03-04 is a Monday
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn test_streak_of_consecutive_days() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    for d in [5, 6, 7] {
        log_workout(&mut recorder, day(d), "Squat", &[NewSet::kg(100.0, 5)]);
    }

    assert_eq!(recorder.statistics(day(7)).current_streak, 3);
    // Not trained yet today: the streak through yesterday still counts
    assert_eq!(recorder.statistics(day(8)).current_streak, 3);
    // A missed day ends it
    assert_eq!(recorder.statistics(day(9)).current_streak, 0);
}

#[test]
fn test_streak_broken_by_gap() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    for d in [4, 5, 7, 8] {
        log_workout(&mut recorder, day(d), "Squat", &[NewSet::kg(100.0, 5)]);
    }
    assert_eq!(recorder.statistics(day(8)).current_streak, 2);
}

#[test]
fn test_totals() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    log_workout(
        &mut recorder,
        day(4),
        "Squat",
        &[NewSet::kg(60.0, 5).warmup(), NewSet::kg(100.0, 5)],
    );
    log_workout(&mut recorder, day(6), "Bench Press", &[NewSet::kg(80.0, 5)]);
    log_workout(&mut recorder, day(8), "squat", &[NewSet::kg(90.0, 5)]);

    let stats = recorder.statistics(day(8));
    assert_eq!(stats.total_workouts, 3);
    assert_eq!(stats.total_volume, 500.0 + 400.0 + 450.0);
    assert_eq!(stats.total_duration_minutes, 135);
    // "Squat" and "squat" are the same exercise
    assert_eq!(stats.exercise_count, 2);
    assert_eq!(stats.total_prs, 2);
}

#[test]
fn test_weekly_buckets_oldest_first() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    log_workout(&mut recorder, day(4), "Squat", &[NewSet::kg(100.0, 5)]);
    log_workout(&mut recorder, day(10), "Squat", &[NewSet::kg(100.0, 3)]);
    log_workout(&mut recorder, day(12), "Squat", &[NewSet::kg(100.0, 2)]);

    let buckets = recorder.weekly_buckets(day(13), 3);
    assert_eq!(buckets.len(), 3);

    assert_eq!(buckets[0].week_start, NaiveDate::from_ymd_opt(2024, 2, 26).unwrap());
    assert_eq!(buckets[0].workouts, 0);

    assert_eq!(buckets[1].week_start, day(4));
    assert_eq!(buckets[1].workouts, 2);
    assert_eq!(buckets[1].volume, 800.0);

    assert_eq!(buckets[2].week_start, day(11));
    assert_eq!(buckets[2].workouts, 1);
    assert_eq!(buckets[2].volume, 200.0);
    assert_eq!(buckets[2].duration_minutes, 45);
}

#[test]
fn test_empty_history() {
    let recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    let stats = recorder.statistics(day(8));
    assert_eq!(stats.total_workouts, 0);
    assert_eq!(stats.current_streak, 0);
    assert!(recorder.weekly_buckets(day(8), 4).iter().all(|b| b.workouts == 0));
}
