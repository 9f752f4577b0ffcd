//! Unit tests for set numbering in the session state machine.

use chrono::Utc;
use liftlog::recording::session::SessionState;
use liftlog::recording::types::{NewSet, SessionError, SetUpdate};
use uuid::Uuid;

fn numbers(session: &SessionState, entry_id: Uuid) -> Vec<u32> {
    session
        .active()
        .and_then(|s| s.exercise(entry_id))
        .map(|e| e.sets.iter().map(|s| s.set_number).collect())
        .unwrap_or_default()
}

fn assert_dense(session: &SessionState, entry_id: Uuid) {
    let got = numbers(session, entry_id);
    let expected: Vec<u32> = (1..=got.len() as u32).collect();
    assert_eq!(got, expected);
}

#[test]
fn test_numbering_stays_dense() {
    let mut session = SessionState::Idle;
    session.start(Utc::now(), None, None, &[]).unwrap();
    let entry = session.add_exercise("Deadlift").unwrap();

    for reps in 1..=6 {
        session.add_set(entry, NewSet::kg(100.0, reps)).unwrap();
        assert_dense(&session, entry);
    }

    // Remove from the middle, the end and the front in turn
    for set_number in [3, 5, 1, 2] {
        assert!(session.remove_set(entry, set_number).unwrap());
        assert_dense(&session, entry);
    }
    session.add_set(entry, NewSet::kg(120.0, 1)).unwrap();
    assert_dense(&session, entry);
    assert_eq!(numbers(&session, entry), vec![1, 2, 3]);
}

#[test]
fn test_remove_middle_set_keeps_order() {
    let mut session = SessionState::Idle;
    session.start(Utc::now(), None, None, &[]).unwrap();
    let entry = session.add_exercise("Bench Press").unwrap();
    session.add_set(entry, NewSet::kg(60.0, 10)).unwrap();
    session.add_set(entry, NewSet::kg(70.0, 8)).unwrap();
    session.add_set(entry, NewSet::kg(80.0, 6)).unwrap();

    session.remove_set(entry, 2).unwrap();

    let sets = &session.active().unwrap().exercise(entry).unwrap().sets;
    assert_eq!(sets.len(), 2);
    assert_eq!((sets[0].set_number, sets[0].weight), (1, 60.0));
    assert_eq!((sets[1].set_number, sets[1].weight), (2, 80.0));
}

#[test]
fn test_unknown_references_are_noops() {
    let mut session = SessionState::Idle;
    session.start(Utc::now(), None, None, &[]).unwrap();
    let entry = session.add_exercise("Row").unwrap();
    session.add_set(entry, NewSet::kg(50.0, 10)).unwrap();
    let before = session.clone();

    let unknown = Uuid::new_v4();
    assert_eq!(session.add_set(unknown, NewSet::kg(50.0, 10)).unwrap(), None);
    assert!(!session.remove_set(entry, 7).unwrap());
    assert!(!session.remove_exercise(unknown).unwrap());
    let update = SetUpdate {
        reps: Some(12),
        ..Default::default()
    };
    assert!(!session.update_set(entry, 9, &update).unwrap());

    assert_eq!(session, before);
}

#[test]
fn test_mutations_while_idle() {
    let mut session = SessionState::Idle;
    assert!(matches!(
        session.add_exercise("Squat"),
        Err(SessionError::NoActiveSession)
    ));
    assert!(matches!(
        session.add_set(Uuid::new_v4(), NewSet::kg(100.0, 5)),
        Err(SessionError::NoActiveSession)
    ));
    assert!(!session.is_active());
}

#[test]
fn test_invalid_weights_are_rejected() {
    let mut session = SessionState::Idle;
    session.start(Utc::now(), None, None, &[]).unwrap();
    let entry = session.add_exercise("Press").unwrap();
    session.add_set(entry, NewSet::kg(40.0, 8)).unwrap();

    assert_eq!(session.add_set(entry, NewSet::kg(-20.0, 8)).unwrap(), None);
    assert_eq!(session.add_set(entry, NewSet::kg(f64::NAN, 8)).unwrap(), None);
    assert_eq!(session.add_set(entry, NewSet::kg(f64::INFINITY, 8)).unwrap(), None);

    let negative = SetUpdate {
        weight: Some(-5.0),
        reps: Some(10),
        ..Default::default()
    };
    assert!(!session.update_set(entry, 1, &negative).unwrap());

    let sets = &session.active().unwrap().exercise(entry).unwrap().sets;
    assert_eq!(sets.len(), 1);
    assert_eq!((sets[0].weight, sets[0].reps), (40.0, 8));

    // Bodyweight sets are fine
    assert_eq!(session.add_set(entry, NewSet::kg(0.0, 12)).unwrap(), Some(2));
    assert_dense(&session, entry);
}
