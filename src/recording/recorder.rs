//! Workout recorder.
//!
//! Owns the session state machine, the personal-record ledger and the
//! finished log collection, and keeps them in step with durable storage.
//! Finishing persists the log and its records before any in-memory state
//! changes, so a storage failure leaves the workout active for a retry.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::metrics::statistics::{compute_statistics, weekly_buckets, WeeklyBucket, WorkoutStatistics};
use crate::recording::history::{HistoryCache, HistoryEntry, HistoryIndex, LogCollection};
use crate::recording::session::SessionState;
use crate::recording::types::{
    ActiveWorkoutState, CatalogExercise, ExerciseIdentity, ExercisePR, FinishedWorkout,
    LiveSessionSummary, Mood, NewSet, SessionError, SetUpdate, TemplateExercise, WeightUnit,
    WorkoutLog, WorkoutSet,
};
use crate::records::{mark_record_sets, PrLedger};
use crate::storage::store::WorkoutStore;

/// Records workouts and tracks personal records across them.
pub struct WorkoutRecorder<S: WorkoutStore> {
    /// Durable storage
    store: S,
    /// Idle or the workout in progress
    session: SessionState,
    /// Best lift per exercise
    ledger: PrLedger,
    /// Finished workouts
    logs: LogCollection,
    /// Per-exercise history, rebuilt when `logs` changes
    history: HistoryCache,
    /// Save the workout in progress after each change
    autosave: bool,
    /// Unit for sets built by `new_set`
    default_unit: WeightUnit,
}

impl<S: WorkoutStore> WorkoutRecorder<S> {
    /// Load logs, records and any saved workout in progress from `store`.
    pub fn open(store: S) -> Result<Self, SessionError> {
        let logs = store
            .load_logs()
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
        let records = store
            .load_records()
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
        let active = store
            .load_active()
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;

        let mut session = SessionState::Idle;
        if let Some(state) = active {
            tracing::info!(
                "Recovered workout {} in progress since {}",
                state.id,
                state.start_time
            );
            session.resume(state)?;
        }

        tracing::info!(
            "Loaded {} workout logs and {} personal records",
            logs.len(),
            records.len()
        );

        Ok(Self {
            store,
            session,
            ledger: PrLedger::from_records(records),
            logs: LogCollection::from_logs(logs),
            history: HistoryCache::new(),
            autosave: true,
            default_unit: WeightUnit::default(),
        })
    }

    /// Enable or disable saving the workout in progress after each change.
    pub fn set_autosave(&mut self, enabled: bool) {
        self.autosave = enabled;
    }

    /// Builder form of [`set_autosave`](Self::set_autosave).
    pub fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }

    /// Use `unit` for sets built by [`new_set`](Self::new_set).
    pub fn with_default_unit(mut self, unit: WeightUnit) -> Self {
        self.default_unit = unit;
        self
    }

    pub fn default_unit(&self) -> WeightUnit {
        self.default_unit
    }

    /// A completed working set in the configured default unit.
    pub fn new_set(&self, weight: f64, reps: u32) -> NewSet {
        NewSet::working(weight, reps, self.default_unit)
    }

    /// Start a new workout now.
    pub fn start(
        &mut self,
        workout_name: Option<&str>,
        template_id: Option<&str>,
        initial_exercises: &[TemplateExercise],
    ) -> Result<Uuid, SessionError> {
        self.start_at(Utc::now(), workout_name, template_id, initial_exercises)
    }

    /// Start a new workout at `start_time`.
    pub fn start_at(
        &mut self,
        start_time: DateTime<Utc>,
        workout_name: Option<&str>,
        template_id: Option<&str>,
        initial_exercises: &[TemplateExercise],
    ) -> Result<Uuid, SessionError> {
        let state = self.session.start(
            start_time,
            workout_name.map(str::to_string),
            template_id.map(str::to_string),
            initial_exercises,
        )?;
        let id = state.id;

        tracing::info!(
            "Started workout {} ({})",
            id,
            workout_name.unwrap_or("untitled")
        );
        self.autosave_active();
        Ok(id)
    }

    /// Add a free-text exercise to the workout. Returns its entry id.
    pub fn add_exercise(&mut self, name: &str) -> Result<Uuid, SessionError> {
        let entry_id = self.session.add_exercise(name)?;
        self.autosave_active();
        Ok(entry_id)
    }

    /// Add an exercise picked from the catalog. Returns its entry id.
    pub fn add_catalog_exercise(&mut self, entry: &CatalogExercise) -> Result<Uuid, SessionError> {
        let entry_id = self.session.add_catalog_exercise(entry)?;
        self.autosave_active();
        Ok(entry_id)
    }

    /// Remove an exercise and its sets. Unknown ids are ignored.
    pub fn remove_exercise(&mut self, entry_id: Uuid) -> Result<(), SessionError> {
        if self.session.remove_exercise(entry_id)? {
            self.autosave_active();
        }
        Ok(())
    }

    /// Log a set. Returns the assigned set number, `None` for an unknown exercise.
    pub fn add_set(&mut self, entry_id: Uuid, set: NewSet) -> Result<Option<u32>, SessionError> {
        let set_number = self.session.add_set(entry_id, set)?;
        if set_number.is_some() {
            self.autosave_active();
        }
        Ok(set_number)
    }

    /// Edit a logged set. Unknown sets are ignored.
    pub fn update_set(
        &mut self,
        entry_id: Uuid,
        set_number: u32,
        update: &SetUpdate,
    ) -> Result<(), SessionError> {
        if self.session.update_set(entry_id, set_number, update)? {
            self.autosave_active();
        }
        Ok(())
    }

    /// Delete a set; the remaining sets are renumbered from 1.
    pub fn remove_set(&mut self, entry_id: Uuid, set_number: u32) -> Result<(), SessionError> {
        if self.session.remove_set(entry_id, set_number)? {
            self.autosave_active();
        }
        Ok(())
    }

    /// Discard the workout in progress. Nothing is persisted.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let state = self.session.take()?;

        if let Err(e) = self.store.clear_active() {
            tracing::warn!("Failed to clear saved workout {}: {}", state.id, e);
        }

        tracing::info!("Cancelled workout {}", state.id);
        Ok(())
    }

    /// Finish the workout now.
    pub fn finish(
        &mut self,
        notes: Option<String>,
        mood: Option<Mood>,
    ) -> Result<FinishedWorkout, SessionError> {
        self.finish_at(Utc::now(), notes, mood)
    }

    /// Finish the workout at `end_time`.
    ///
    /// On a storage failure the workout stays active and nothing else changes.
    pub fn finish_at(
        &mut self,
        end_time: DateTime<Utc>,
        notes: Option<String>,
        mood: Option<Mood>,
    ) -> Result<FinishedWorkout, SessionError> {
        let state = self.session.active().ok_or(SessionError::NoActiveSession)?;

        let mut log = WorkoutLog::from_active(state, end_time, notes, mood);
        let staged = self.ledger.stage(&log);
        mark_record_sets(&mut log, &staged);
        let new_prs: Vec<ExercisePR> = staged.into_iter().map(|s| s.record).collect();

        if let Err(e) = self.store.commit_finished(&log, &new_prs) {
            tracing::error!("Failed to save workout {}: {}", log.id, e);
            return Err(SessionError::PersistenceFailure(e.to_string()));
        }

        self.ledger.apply(&new_prs);
        self.logs.push(log.clone());
        self.session = SessionState::Idle;

        for pr in &new_prs {
            tracing::info!(
                "New personal record for {}: {} {} x {} (est. 1RM {})",
                pr.exercise_name,
                pr.weight,
                pr.weight_unit,
                pr.reps,
                pr.estimated_1rm
            );
        }
        tracing::info!(
            "Finished workout {} after {} min with {} new records",
            log.id,
            log.duration_minutes,
            new_prs.len()
        );

        Ok(FinishedWorkout { log, new_prs })
    }

    /// Delete a finished log. Records it set are kept.
    ///
    /// Returns whether a log was deleted.
    pub fn delete_log(&mut self, id: &Uuid) -> Result<bool, SessionError> {
        if self.logs.get(id).is_none() {
            tracing::warn!("delete_log: no workout log {}", id);
            return Ok(false);
        }

        self.store
            .delete_log(id)
            .map_err(|e| SessionError::PersistenceFailure(e.to_string()))?;
        self.logs.remove(id);

        tracing::info!("Deleted workout log {}", id);
        Ok(true)
    }

    /// Current session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The workout in progress, if any.
    pub fn active(&self) -> Option<&ActiveWorkoutState> {
        self.session.active()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Live figures for the workout in progress.
    pub fn live_summary(&self, now: DateTime<Utc>) -> Option<LiveSessionSummary> {
        self.session.live_summary(now)
    }

    /// Personal-record ledger.
    pub fn ledger(&self) -> &PrLedger {
        &self.ledger
    }

    /// Current record for an exercise.
    pub fn record_for(&self, identity: &ExerciseIdentity) -> Option<&ExercisePR> {
        self.ledger.get(identity)
    }

    /// Finished logs.
    pub fn logs(&self) -> &LogCollection {
        &self.logs
    }

    /// Per-exercise history index for the current logs.
    pub fn history(&mut self) -> &HistoryIndex {
        self.history.index(&self.logs)
    }

    /// Past appearances of an exercise, most recent first.
    pub fn history_for(&mut self, identity: &ExerciseIdentity) -> &[HistoryEntry] {
        self.history.index(&self.logs).history_for(identity)
    }

    /// Heaviest set from the last time the exercise was done.
    pub fn best_set(&mut self, identity: &ExerciseIdentity) -> Option<WorkoutSet> {
        self.history.index(&self.logs).best_set(identity).cloned()
    }

    /// Best estimated one-rep max from the last time the exercise was done.
    pub fn best_estimate(&mut self, identity: &ExerciseIdentity) -> Option<f64> {
        self.history.index(&self.logs).best_estimate(identity)
    }

    /// Lifetime statistics as of `today`.
    pub fn statistics(&self, today: NaiveDate) -> WorkoutStatistics {
        compute_statistics(self.logs.logs(), &self.ledger, today)
    }

    /// Weekly totals for the trailing `weeks` weeks as of `today`.
    pub fn weekly_buckets(&self, today: NaiveDate, weeks: u32) -> Vec<WeeklyBucket> {
        weekly_buckets(self.logs.logs(), today, weeks)
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the recorder, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn autosave_active(&mut self) {
        if !self.autosave {
            return;
        }
        if let Some(state) = self.session.active() {
            match self.store.save_active(state) {
                Ok(()) => tracing::debug!("Autosaved workout {}", state.id),
                Err(e) => tracing::warn!("Failed to autosave workout {}: {}", state.id, e),
            }
        }
    }
}
