//! Workout statistics over the finished log collection.
//!
//! Everything here is a pure function of the logs, the record ledger and the
//! reference date. A log belongs to the UTC calendar day its workout started.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::metrics::estimation::exercise_volume;
use crate::recording::types::{ExerciseIdentity, WorkoutLog};
use crate::records::PrLedger;

/// Lifetime totals shown on the statistics screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStatistics {
    pub total_workouts: usize,
    pub total_volume: f64,
    pub total_duration_minutes: u64,
    pub total_prs: usize,
    /// Distinct exercises ever logged
    pub exercise_count: usize,
    /// Consecutive training days up to today
    pub current_streak: u32,
}

/// Volume and workout count for one calendar week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub workouts: u32,
    pub volume: f64,
    pub duration_minutes: u64,
}

/// Calendar day a log counts toward.
pub fn log_date(log: &WorkoutLog) -> NaiveDate {
    log.start_time.date_naive()
}

/// Working volume of a whole log.
pub fn log_volume(log: &WorkoutLog) -> f64 {
    log.exercises.iter().map(exercise_volume).sum()
}

/// Compute lifetime statistics.
pub fn compute_statistics(logs: &[WorkoutLog], ledger: &PrLedger, today: NaiveDate) -> WorkoutStatistics {
    let exercises: HashSet<ExerciseIdentity> = logs
        .iter()
        .flat_map(|l| l.exercises.iter().map(|e| e.identity()))
        .collect();

    WorkoutStatistics {
        total_workouts: logs.len(),
        total_volume: logs.iter().map(log_volume).sum(),
        total_duration_minutes: logs.iter().map(|l| l.duration_minutes as u64).sum(),
        total_prs: ledger.len(),
        exercise_count: exercises.len(),
        current_streak: current_streak(logs, today),
    }
}

/// Consecutive days with at least one workout, counting back from `today`.
///
/// Not having trained yet today keeps a streak that ran through yesterday;
/// any earlier missing day ends it.
pub fn current_streak(logs: &[WorkoutLog], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = logs.iter().map(log_date).collect();

    let mut day = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Totals for the trailing `weeks` calendar weeks, oldest first.
///
/// The last bucket is the current week. Weeks without workouts are present
/// with zero totals.
pub fn weekly_buckets(logs: &[WorkoutLog], today: NaiveDate, weeks: u32) -> Vec<WeeklyBucket> {
    let current = week_start(today);

    let mut buckets: Vec<WeeklyBucket> = (0..weeks as i64)
        .rev()
        .map(|offset| WeeklyBucket {
            week_start: current - Duration::weeks(offset),
            workouts: 0,
            volume: 0.0,
            duration_minutes: 0,
        })
        .collect();

    for log in logs {
        let start = week_start(log_date(log));
        if let Some(bucket) = buckets.iter_mut().find(|b| b.week_start == start) {
            bucket.workouts += 1;
            bucket.volume += log_volume(log);
            bucket.duration_minutes += log.duration_minutes as u64;
        }
    }

    buckets
}
