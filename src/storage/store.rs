//! Durable storage contract used by the workout recorder.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::recording::types::{ActiveWorkoutState, ExercisePR, WorkoutLog};
use crate::storage::database::DatabaseError;

/// Storage for finished logs, personal records and the workout in progress.
///
/// Every value must round-trip without loss.
pub trait WorkoutStore {
    /// All finished logs, oldest first.
    fn load_logs(&self) -> Result<Vec<WorkoutLog>, DatabaseError>;

    /// All personal records.
    fn load_records(&self) -> Result<Vec<ExercisePR>, DatabaseError>;

    /// Persist a finished log together with the records it set, and clear the
    /// saved workout in progress. Either everything is written or nothing is.
    fn commit_finished(&mut self, log: &WorkoutLog, records: &[ExercisePR]) -> Result<(), DatabaseError>;

    /// Delete a finished log. Returns `DatabaseError::NotFound` if absent.
    fn delete_log(&mut self, id: &Uuid) -> Result<(), DatabaseError>;

    /// Save the workout in progress, replacing any earlier save.
    fn save_active(&mut self, state: &ActiveWorkoutState) -> Result<(), DatabaseError>;

    /// Load the saved workout in progress.
    fn load_active(&self) -> Result<Option<ActiveWorkoutState>, DatabaseError>;

    /// Forget the saved workout in progress.
    fn clear_active(&mut self) -> Result<(), DatabaseError>;
}

/// Non-durable store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    logs: Vec<WorkoutLog>,
    records: BTreeMap<String, ExercisePR>,
    active: Option<ActiveWorkoutState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkoutStore for MemoryStore {
    fn load_logs(&self) -> Result<Vec<WorkoutLog>, DatabaseError> {
        Ok(self.logs.clone())
    }

    fn load_records(&self) -> Result<Vec<ExercisePR>, DatabaseError> {
        Ok(self.records.values().cloned().collect())
    }

    fn commit_finished(&mut self, log: &WorkoutLog, records: &[ExercisePR]) -> Result<(), DatabaseError> {
        if self.logs.iter().any(|l| l.id == log.id) {
            return Err(DatabaseError::ConstraintViolation(format!(
                "Workout log {} already exists",
                log.id
            )));
        }

        self.logs.push(log.clone());
        for record in records {
            self.records.insert(record.identity.key(), record.clone());
        }
        self.active = None;
        Ok(())
    }

    fn delete_log(&mut self, id: &Uuid) -> Result<(), DatabaseError> {
        let index = self
            .logs
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Workout log {}", id)))?;
        self.logs.remove(index);
        Ok(())
    }

    fn save_active(&mut self, state: &ActiveWorkoutState) -> Result<(), DatabaseError> {
        self.active = Some(state.clone());
        Ok(())
    }

    fn load_active(&self) -> Result<Option<ActiveWorkoutState>, DatabaseError> {
        Ok(self.active.clone())
    }

    fn clear_active(&mut self) -> Result<(), DatabaseError> {
        self.active = None;
        Ok(())
    }
}
