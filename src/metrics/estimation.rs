//! One-rep-max estimation and training volume.
//!
//! Uses the Epley formula: `1RM = weight × (1 + reps / 30)`, rounded to the
//! nearest whole unit and never below the weight itself. A single rep (or
//! none) is returned as-is, with no extrapolation.

use crate::recording::types::{LoggedExercise, WorkoutSet};

/// Epley denominator.
const EPLEY_REPS_DIVISOR: f64 = 30.0;

/// Estimate the one-rep max for `weight` lifted for `reps` repetitions.
///
/// The result is in the same unit as `weight`.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    if reps <= 1 {
        return weight;
    }
    // Rounding alone would drop light weights below their single-rep value
    (weight * (1.0 + reps as f64 / EPLEY_REPS_DIVISOR))
        .round()
        .max(weight)
}

/// Estimated one-rep max of a logged set.
pub fn set_one_rep_max(set: &WorkoutSet) -> f64 {
    estimate_one_rep_max(set.weight, set.reps)
}

/// Total `weight × reps` over working sets. Warmups contribute nothing.
pub fn compute_volume(sets: &[WorkoutSet]) -> f64 {
    sets.iter()
        .filter(|s| !s.is_warmup)
        .map(|s| s.weight * s.reps as f64)
        .sum()
}

/// Working volume of one exercise entry.
pub fn exercise_volume(exercise: &LoggedExercise) -> f64 {
    compute_volume(&exercise.sets)
}

/// Highest estimated one-rep max among sets that could set a record.
pub fn best_estimated_one_rep_max(sets: &[WorkoutSet]) -> Option<f64> {
    sets.iter()
        .filter(|s| s.qualifies_for_record())
        .map(set_one_rep_max)
        .fold(None, |best, e| match best {
            Some(b) if b >= e => Some(b),
            _ => Some(e),
        })
}
