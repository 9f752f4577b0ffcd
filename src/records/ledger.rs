//! Personal-record ledger.
//!
//! Holds one record per exercise identity. A record is replaced only by a
//! strictly greater estimated one-rep max; ties never count. Estimates are
//! compared in kilograms so records logged in pounds and kilograms compete
//! fairly, while each record keeps the unit it was lifted in.

use std::collections::BTreeMap;

use crate::metrics::estimation::set_one_rep_max;
use crate::recording::types::{ExerciseIdentity, ExercisePR, WorkoutLog};

/// A record candidate found in a log, with the position of the set that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedRecord {
    pub record: ExercisePR,
    /// Index into `WorkoutLog::exercises`
    pub exercise_index: usize,
    /// Index into that exercise's `sets`
    pub set_index: usize,
}

/// Best lift per exercise identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrLedger {
    records: BTreeMap<ExerciseIdentity, ExercisePR>,
}

impl PrLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored records.
    ///
    /// If storage somehow holds two records for one identity, the better one wins.
    pub fn from_records(records: impl IntoIterator<Item = ExercisePR>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            let keep = ledger
                .records
                .get(&record.identity)
                .map_or(true, |current| record.estimated_1rm_kg() > current.estimated_1rm_kg());
            if keep {
                ledger.records.insert(record.identity.clone(), record);
            }
        }
        ledger
    }

    /// Current record for an exercise.
    pub fn get(&self, identity: &ExerciseIdentity) -> Option<&ExercisePR> {
        self.records.get(identity)
    }

    /// Number of exercises with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by identity.
    pub fn records(&self) -> impl Iterator<Item = &ExercisePR> {
        self.records.values()
    }

    /// Find the records a finished log would set, without changing the ledger.
    ///
    /// At most one candidate per identity: the qualifying set with the highest
    /// estimate, provided it strictly beats the current record. The first set
    /// wins among equal estimates.
    pub fn stage(&self, log: &WorkoutLog) -> Vec<StagedRecord> {
        let mut best: BTreeMap<ExerciseIdentity, StagedRecord> = BTreeMap::new();

        for (exercise_index, exercise) in log.exercises.iter().enumerate() {
            let identity = exercise.identity();

            for (set_index, set) in exercise.sets.iter().enumerate() {
                if !set.qualifies_for_record() {
                    continue;
                }

                let estimate = set_one_rep_max(set);
                let estimate_kg = set.weight_unit.to_kg(estimate);

                let beats_ledger = self
                    .records
                    .get(&identity)
                    .map_or(true, |current| estimate_kg > current.estimated_1rm_kg());
                let beats_staged = best
                    .get(&identity)
                    .map_or(true, |staged| estimate_kg > staged.record.estimated_1rm_kg());

                if beats_ledger && beats_staged {
                    best.insert(
                        identity.clone(),
                        StagedRecord {
                            record: ExercisePR {
                                identity: identity.clone(),
                                exercise_name: exercise.exercise_name.clone(),
                                weight: set.weight,
                                weight_unit: set.weight_unit,
                                reps: set.reps,
                                estimated_1rm: estimate,
                                date: log.end_time,
                                source_log_id: log.id,
                            },
                            exercise_index,
                            set_index,
                        },
                    );
                }
            }
        }

        best.into_values().collect()
    }

    /// Replace the ledger entries for every given record.
    pub fn apply(&mut self, records: &[ExercisePR]) {
        for record in records {
            self.records.insert(record.identity.clone(), record.clone());
        }
    }

    /// Stage and apply in one step, returning the new or raised records.
    ///
    /// Running it again with the same log returns nothing.
    pub fn diff_and_update(&mut self, log: &WorkoutLog) -> Vec<ExercisePR> {
        let records: Vec<ExercisePR> = self.stage(log).into_iter().map(|s| s.record).collect();
        self.apply(&records);
        records
    }
}

/// Mark the sets that produced staged records. Any previous marks are cleared.
pub fn mark_record_sets(log: &mut WorkoutLog, staged: &[StagedRecord]) {
    for set in log.exercises.iter_mut().flat_map(|e| e.sets.iter_mut()) {
        set.is_pr = false;
    }
    for s in staged {
        if let Some(set) = log
            .exercises
            .get_mut(s.exercise_index)
            .and_then(|e| e.sets.get_mut(s.set_index))
        {
            set.is_pr = true;
        }
    }
}
