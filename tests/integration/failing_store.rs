//! Store double whose commits can be made to fail.

use std::cell::Cell;
use std::rc::Rc;

use liftlog::recording::types::{ActiveWorkoutState, ExercisePR, WorkoutLog};
use liftlog::storage::{DatabaseError, MemoryStore, WorkoutStore};
use uuid::Uuid;

/// Wraps a `MemoryStore`; commits fail while the shared switch is on.
pub struct FailingStore {
    inner: MemoryStore,
    fail_commits: Rc<Cell<bool>>,
}

impl FailingStore {
    pub fn failing() -> (Self, Rc<Cell<bool>>) {
        let switch = Rc::new(Cell::new(true));
        let store = Self {
            inner: MemoryStore::new(),
            fail_commits: Rc::clone(&switch),
        };
        (store, switch)
    }
}

impl WorkoutStore for FailingStore {
    fn load_logs(&self) -> Result<Vec<WorkoutLog>, DatabaseError> {
        self.inner.load_logs()
    }

    fn load_records(&self) -> Result<Vec<ExercisePR>, DatabaseError> {
        self.inner.load_records()
    }

    fn commit_finished(&mut self, log: &WorkoutLog, records: &[ExercisePR]) -> Result<(), DatabaseError> {
        if self.fail_commits.get() {
            return Err(DatabaseError::TransactionFailed("disk full".to_string()));
        }
        self.inner.commit_finished(log, records)
    }

    fn delete_log(&mut self, id: &Uuid) -> Result<(), DatabaseError> {
        self.inner.delete_log(id)
    }

    fn save_active(&mut self, state: &ActiveWorkoutState) -> Result<(), DatabaseError> {
        self.inner.save_active(state)
    }

    fn load_active(&self) -> Result<Option<ActiveWorkoutState>, DatabaseError> {
        self.inner.load_active()
    }

    fn clear_active(&mut self) -> Result<(), DatabaseError> {
        self.inner.clear_active()
    }
}
