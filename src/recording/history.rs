//! Finished workout logs and the per-exercise history derived from them.
//!
//! `LogCollection` is the in-memory mirror of the persisted logs. Every change
//! bumps its version, and `HistoryCache` rebuilds its index only when the
//! version it was built from is stale.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::metrics::estimation::best_estimated_one_rep_max;
use crate::recording::types::{ExerciseIdentity, WorkoutLog, WorkoutSet};

/// Finished logs, kept in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct LogCollection {
    logs: Vec<WorkoutLog>,
    version: u64,
}

impl LogCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from stored logs.
    pub fn from_logs(logs: Vec<WorkoutLog>) -> Self {
        Self { logs, version: 1 }
    }

    /// Version stamp, changed by every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn logs(&self) -> &[WorkoutLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Find a log by id.
    pub fn get(&self, id: &Uuid) -> Option<&WorkoutLog> {
        self.logs.iter().find(|l| &l.id == id)
    }

    /// Append a finished log.
    pub fn push(&mut self, log: WorkoutLog) {
        self.logs.push(log);
        self.version += 1;
    }

    /// Remove a log. Returns it if it existed.
    pub fn remove(&mut self, id: &Uuid) -> Option<WorkoutLog> {
        let index = self.logs.iter().position(|l| &l.id == id)?;
        self.version += 1;
        Some(self.logs.remove(index))
    }
}

/// One past appearance of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    pub log_id: Uuid,
    pub exercise_name: String,
    /// All sets for the exercise in that log, in session order
    pub sets: Vec<WorkoutSet>,
}

/// History of every exercise, most recent first.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    version: u64,
    by_identity: HashMap<ExerciseIdentity, Vec<HistoryEntry>>,
}

impl HistoryIndex {
    /// Index a log collection.
    pub fn build(collection: &LogCollection) -> Self {
        let mut logs: Vec<&WorkoutLog> = collection.logs().iter().collect();
        logs.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));

        let mut by_identity: HashMap<ExerciseIdentity, Vec<HistoryEntry>> = HashMap::new();

        for log in logs {
            let mut per_log: Vec<(ExerciseIdentity, HistoryEntry)> = Vec::new();

            for exercise in &log.exercises {
                let identity = exercise.identity();
                match per_log.iter_mut().find(|(id, _)| id == &identity) {
                    Some((_, entry)) => entry.sets.extend(exercise.sets.iter().cloned()),
                    None => per_log.push((
                        identity,
                        HistoryEntry {
                            date: log.start_time,
                            log_id: log.id,
                            exercise_name: exercise.exercise_name.clone(),
                            sets: exercise.sets.clone(),
                        },
                    )),
                }
            }

            for (identity, entry) in per_log {
                by_identity.entry(identity).or_default().push(entry);
            }
        }

        Self {
            version: collection.version(),
            by_identity,
        }
    }

    /// Collection version this index was built from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Past appearances of an exercise, most recent first.
    pub fn history_for(&self, identity: &ExerciseIdentity) -> &[HistoryEntry] {
        self.by_identity
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Heaviest set from the most recent appearance of an exercise.
    ///
    /// Weights are compared in kilograms; the first set wins a tie.
    pub fn best_set(&self, identity: &ExerciseIdentity) -> Option<&WorkoutSet> {
        let latest = self.history_for(identity).first()?;
        latest.sets.iter().fold(None, |best: Option<&WorkoutSet>, set| match best {
            Some(b) if b.weight_kg() >= set.weight_kg() => Some(b),
            _ => Some(set),
        })
    }

    /// Best estimated one-rep max from the most recent appearance of an
    /// exercise, in the units its sets were logged in.
    pub fn best_estimate(&self, identity: &ExerciseIdentity) -> Option<f64> {
        let latest = self.history_for(identity).first()?;
        best_estimated_one_rep_max(&latest.sets)
    }

    /// Number of distinct exercises ever logged.
    pub fn exercise_count(&self) -> usize {
        self.by_identity.len()
    }
}

/// Lazily rebuilt history index.
#[derive(Debug, Default)]
pub struct HistoryCache {
    index: Option<HistoryIndex>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for the collection, rebuilt if the collection changed.
    pub fn index(&mut self, collection: &LogCollection) -> &HistoryIndex {
        let stale = self
            .index
            .as_ref()
            .map_or(true, |index| index.version() != collection.version());
        if stale {
            tracing::debug!("Rebuilding history index at version {}", collection.version());
            self.index = Some(HistoryIndex::build(collection));
        }
        self.index.get_or_insert_with(|| HistoryIndex::build(collection))
    }
}
