//! Session state machine.
//!
//! A session is either `Idle` or `Active` with exactly one workout in flight.
//! Every mutation goes through this type so set numbering stays dense
//! (`1..=n`, no gaps) for each exercise.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::metrics::estimation::exercise_volume;
use crate::recording::types::{
    is_valid_weight, ActiveWorkoutState, CatalogExercise, LiveSessionSummary, LoggedExercise,
    NewSet, SessionError, SetUpdate, TemplateExercise,
};

/// Current state of the session store.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No workout in progress
    #[default]
    Idle,
    /// A workout is in progress
    Active(ActiveWorkoutState),
}

impl SessionState {
    /// Whether a workout is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    /// The workout in progress, if any.
    pub fn active(&self) -> Option<&ActiveWorkoutState> {
        match self {
            SessionState::Active(state) => Some(state),
            SessionState::Idle => None,
        }
    }

    fn active_mut(&mut self) -> Result<&mut ActiveWorkoutState, SessionError> {
        match self {
            SessionState::Active(state) => Ok(state),
            SessionState::Idle => Err(SessionError::NoActiveSession),
        }
    }

    /// Transition Idle → Active.
    pub fn start(
        &mut self,
        start_time: DateTime<Utc>,
        workout_name: Option<String>,
        template_id: Option<String>,
        initial_exercises: &[TemplateExercise],
    ) -> Result<&ActiveWorkoutState, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }

        *self = SessionState::Active(ActiveWorkoutState::new(
            start_time,
            workout_name,
            template_id,
            initial_exercises,
        ));

        match self {
            SessionState::Active(state) => Ok(&*state),
            SessionState::Idle => Err(SessionError::NoActiveSession),
        }
    }

    /// Restore a session recovered from storage. Fails if one is already active.
    pub fn resume(&mut self, state: ActiveWorkoutState) -> Result<(), SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        *self = SessionState::Active(state);
        Ok(())
    }

    /// Append a free-text exercise. Returns its entry id.
    pub fn add_exercise(&mut self, name: &str) -> Result<Uuid, SessionError> {
        let state = self.active_mut()?;
        let exercise = LoggedExercise::new(None, name.trim());
        let entry_id = exercise.entry_id;
        state.exercises.push(exercise);
        Ok(entry_id)
    }

    /// Append an exercise picked from the catalog. Returns its entry id.
    pub fn add_catalog_exercise(&mut self, entry: &CatalogExercise) -> Result<Uuid, SessionError> {
        let state = self.active_mut()?;
        let exercise = LoggedExercise::new(Some(entry.exercise_id.clone()), entry.name.clone());
        let entry_id = exercise.entry_id;
        state.exercises.push(exercise);
        Ok(entry_id)
    }

    /// Remove an exercise. Returns whether anything was removed.
    pub fn remove_exercise(&mut self, entry_id: Uuid) -> Result<bool, SessionError> {
        let state = self.active_mut()?;
        let before = state.exercises.len();
        state.exercises.retain(|e| e.entry_id != entry_id);
        let removed = state.exercises.len() != before;
        if !removed {
            tracing::warn!("remove_exercise: no exercise {} in session", entry_id);
        }
        Ok(removed)
    }

    /// Append a set, numbered after the exercise's existing sets.
    ///
    /// Returns the assigned set number, or `None` if the exercise is unknown
    /// or the weight is negative or not finite.
    pub fn add_set(&mut self, entry_id: Uuid, set: NewSet) -> Result<Option<u32>, SessionError> {
        let state = self.active_mut()?;
        if !is_valid_weight(set.weight) {
            tracing::warn!("add_set: rejected weight {} for exercise {}", set.weight, entry_id);
            return Ok(None);
        }
        let Some(exercise) = state.exercise_mut(entry_id) else {
            tracing::warn!("add_set: no exercise {} in session", entry_id);
            return Ok(None);
        };

        let set_number = exercise.sets.len() as u32 + 1;
        exercise.sets.push(set.into_set(set_number));
        Ok(Some(set_number))
    }

    /// Merge an update into a set. Returns whether the set was changed.
    ///
    /// An update carrying a negative or non-finite weight is ignored whole.
    pub fn update_set(
        &mut self,
        entry_id: Uuid,
        set_number: u32,
        update: &SetUpdate,
    ) -> Result<bool, SessionError> {
        let state = self.active_mut()?;
        if let Some(weight) = update.weight.filter(|w| !is_valid_weight(*w)) {
            tracing::warn!(
                "update_set: rejected weight {} for set {} of exercise {}",
                weight,
                set_number,
                entry_id
            );
            return Ok(false);
        }
        let set = state
            .exercise_mut(entry_id)
            .and_then(|e| e.sets.iter_mut().find(|s| s.set_number == set_number));

        match set {
            Some(set) => {
                update.apply_to(set);
                Ok(true)
            }
            None => {
                tracing::warn!("update_set: no set {} for exercise {}", set_number, entry_id);
                Ok(false)
            }
        }
    }

    /// Remove a set and renumber the rest from 1, keeping their order.
    pub fn remove_set(&mut self, entry_id: Uuid, set_number: u32) -> Result<bool, SessionError> {
        let state = self.active_mut()?;
        let Some(exercise) = state.exercise_mut(entry_id) else {
            tracing::warn!("remove_set: no exercise {} in session", entry_id);
            return Ok(false);
        };

        let before = exercise.sets.len();
        exercise.sets.retain(|s| s.set_number != set_number);
        if exercise.sets.len() == before {
            tracing::warn!("remove_set: no set {} for exercise {}", set_number, entry_id);
            return Ok(false);
        }

        for (index, set) in exercise.sets.iter_mut().enumerate() {
            set.set_number = index as u32 + 1;
        }
        Ok(true)
    }

    /// Transition Active → Idle, handing back the discarded workout.
    pub fn take(&mut self) -> Result<ActiveWorkoutState, SessionError> {
        match std::mem::take(self) {
            SessionState::Active(state) => Ok(state),
            SessionState::Idle => Err(SessionError::NoActiveSession),
        }
    }

    /// Live figures for the workout in progress.
    pub fn live_summary(&self, now: DateTime<Utc>) -> Option<LiveSessionSummary> {
        let state = self.active()?;
        let sets = state.exercises.iter().flat_map(|e| e.sets.iter());

        Some(LiveSessionSummary {
            exercise_count: state.exercises.len(),
            set_count: sets.clone().count(),
            completed_sets: sets.filter(|s| s.completed).count(),
            volume: state.exercises.iter().map(exercise_volume).sum(),
            elapsed_seconds: state.elapsed(now).num_seconds(),
        })
    }
}
