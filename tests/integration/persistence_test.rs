//! Integration tests for the SQLite-backed recorder.

use chrono::{Duration, Utc};
use liftlog::recording::types::{CatalogExercise, ExerciseIdentity, Mood, NewSet};
use liftlog::storage::{Database, WorkoutStore};
use liftlog::WorkoutRecorder;

#[test]
fn test_restart_restores_history_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("liftlog.db");

    let log_id = {
        let mut recorder = WorkoutRecorder::open(Database::open(&path).unwrap()).unwrap();
        let start = Utc::now() - Duration::hours(1);
        recorder.start_at(start, Some("Pull"), None, &[]).unwrap();
        let entry = recorder
            .add_catalog_exercise(&CatalogExercise {
                exercise_id: "barbell-row".to_string(),
                name: "Barbell Row".to_string(),
            })
            .unwrap();
        recorder.add_set(entry, NewSet::kg(80.0, 8)).unwrap();
        recorder
            .finish_at(Utc::now(), Some("grip slipping".to_string()), Some(Mood::Tired))
            .unwrap()
            .log
            .id
    };

    let mut recorder = WorkoutRecorder::open(Database::open(&path).unwrap()).unwrap();
    assert!(!recorder.is_active());
    assert_eq!(recorder.logs().len(), 1);

    let log = recorder.logs().get(&log_id).unwrap();
    assert_eq!(log.notes.as_deref(), Some("grip slipping"));
    assert_eq!(log.mood, Some(Mood::Tired));
    assert!(log.exercises[0].sets[0].is_pr);

    let row = ExerciseIdentity::of(Some("barbell-row"), "Barbell Row");
    assert_eq!(recorder.record_for(&row).unwrap().source_log_id, log_id);
    assert_eq!(recorder.history_for(&row).len(), 1);
}

#[test]
fn test_restart_recovers_workout_in_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("liftlog.db");

    let saved = {
        let mut recorder = WorkoutRecorder::open(Database::open(&path).unwrap()).unwrap();
        recorder.start(Some("Legs"), None, &[]).unwrap();
        let entry = recorder.add_exercise("Lunge").unwrap();
        recorder.add_set(entry, NewSet::kg(20.0, 12)).unwrap();
        recorder.add_set(entry, NewSet::kg(22.5, 10)).unwrap();
        recorder.active().unwrap().clone()
    };

    let mut recorder = WorkoutRecorder::open(Database::open(&path).unwrap()).unwrap();
    assert_eq!(recorder.active(), Some(&saved));

    let entry = saved.exercises[0].entry_id;
    assert_eq!(recorder.add_set(entry, NewSet::kg(25.0, 8)).unwrap(), Some(3));
    recorder.finish(None, None).unwrap();
    assert!(!recorder.store().has_active().unwrap());
}

#[test]
fn test_delete_log_keeps_records() {
    let mut recorder = WorkoutRecorder::open(Database::open_in_memory().unwrap()).unwrap();
    recorder.start(None, None, &[]).unwrap();
    let entry = recorder.add_exercise("Dip").unwrap();
    recorder.add_set(entry, NewSet::kg(20.0, 8)).unwrap();
    let log_id = recorder.finish(None, None).unwrap().log.id;

    assert!(recorder.delete_log(&log_id).unwrap());
    assert_eq!(recorder.store().count_logs().unwrap(), 0);
    assert_eq!(recorder.store().load_records().unwrap().len(), 1);
    assert!(recorder.logs().is_empty());
}
