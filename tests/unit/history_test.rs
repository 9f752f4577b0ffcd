//! Unit tests for per-exercise history.

use chrono::{Duration, Utc};
use liftlog::recording::history::{HistoryCache, LogCollection};
use liftlog::recording::types::{CatalogExercise, ExerciseIdentity, NewSet, WeightUnit};
use liftlog::storage::MemoryStore;
use liftlog::WorkoutRecorder;

#[test]
fn test_history_newest_first_with_best_set() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    let start = Utc::now() - Duration::days(10);

    for (offset, weights) in [(0, [80.0, 85.0]), (3, [90.0, 87.5])] {
        let begin = start + Duration::days(offset);
        recorder.start_at(begin, None, None, &[]).unwrap();
        let entry = recorder.add_exercise("Overhead Press").unwrap();
        for weight in weights {
            recorder.add_set(entry, NewSet::kg(weight / 2.0, 5)).unwrap();
        }
        recorder.finish_at(begin + Duration::hours(1), None, None).unwrap();
    }

    let press = ExerciseIdentity::custom("overhead  press");
    let history = recorder.history_for(&press);
    assert_eq!(history.len(), 2);
    assert!(history[0].date > history[1].date);
    assert_eq!(recorder.best_set(&press).unwrap().weight, 45.0);
}

#[test]
fn test_best_set_compares_in_kg() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    recorder.start(None, None, &[]).unwrap();
    let entry = recorder.add_exercise("Curl").unwrap();
    recorder.add_set(entry, NewSet::kg(20.0, 10)).unwrap();
    recorder
        .add_set(entry, NewSet::kg(40.0, 10).in_unit(WeightUnit::Lb))
        .unwrap();
    recorder.finish(None, None).unwrap();

    let best = recorder.best_set(&ExerciseIdentity::custom("Curl")).unwrap();
    assert_eq!(best.weight_unit, WeightUnit::Kg);
    assert_eq!(best.weight, 20.0);
}

#[test]
fn test_catalog_and_custom_are_distinct() {
    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    recorder.start(None, None, &[]).unwrap();
    let catalog = recorder
        .add_catalog_exercise(&CatalogExercise {
            exercise_id: "bench-press".to_string(),
            name: "Bench Press".to_string(),
        })
        .unwrap();
    let custom = recorder.add_exercise("Bench Press").unwrap();
    recorder.add_set(catalog, NewSet::kg(100.0, 5)).unwrap();
    recorder.add_set(custom, NewSet::kg(60.0, 5)).unwrap();
    recorder.finish(None, None).unwrap();

    let by_id = ExerciseIdentity::of(Some("bench-press"), "Bench Press");
    let by_name = ExerciseIdentity::custom("Bench Press");
    assert_eq!(recorder.history_for(&by_id).len(), 1);
    assert_eq!(recorder.history_for(&by_name).len(), 1);
    assert_eq!(recorder.ledger().len(), 2);
}

#[test]
fn test_cache_rebuilds_on_version_change() {
    let mut collection = LogCollection::new();
    let mut cache = HistoryCache::new();
    assert_eq!(cache.index(&collection).exercise_count(), 0);

    let mut recorder = WorkoutRecorder::open(MemoryStore::new()).unwrap();
    recorder.start(None, None, &[]).unwrap();
    let entry = recorder.add_exercise("Pull Up").unwrap();
    recorder.add_set(entry, NewSet::kg(0.0, 8)).unwrap();
    let log = recorder.finish(None, None).unwrap().log;

    collection.push(log);
    let index = cache.index(&collection);
    assert_eq!(index.version(), collection.version());
    assert_eq!(index.exercise_count(), 1);
}
