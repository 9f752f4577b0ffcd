//! Unit tests for one-rep-max estimation and volume.

use liftlog::metrics::estimation::{compute_volume, estimate_one_rep_max};
use liftlog::recording::types::{WeightUnit, WorkoutSet};

fn set(weight: f64, reps: u32, is_warmup: bool) -> WorkoutSet {
    WorkoutSet {
        set_number: 1,
        weight,
        weight_unit: WeightUnit::Kg,
        reps,
        is_warmup,
        completed: true,
        is_pr: false,
    }
}

#[test]
fn test_single_rep_is_the_weight() {
    assert_eq!(estimate_one_rep_max(140.0, 1), 140.0);
    assert_eq!(estimate_one_rep_max(62.5, 1), 62.5);
}

#[test]
fn test_monotonic_in_weight() {
    for reps in 1..=15 {
        for weight in 20..200 {
            let lighter = estimate_one_rep_max(weight as f64, reps);
            let heavier = estimate_one_rep_max(weight as f64 + 1.0, reps);
            assert!(heavier > lighter, "{}x{} vs {}x{}", weight + 1, reps, weight, reps);
        }
    }
}

#[test]
fn test_monotonic_in_reps() {
    for weight in (30..=200).step_by(5) {
        for reps in 1..15 {
            let fewer = estimate_one_rep_max(weight as f64, reps);
            let more = estimate_one_rep_max(weight as f64, reps + 1);
            assert!(more > fewer, "{}x{} vs {}x{}", weight, reps + 1, weight, reps);
        }
    }
}

#[test]
fn test_reps_never_lower_light_estimates() {
    for quarter in 1..=40 {
        let weight = quarter as f64 * 0.25;
        for reps in 1..15 {
            let fewer = estimate_one_rep_max(weight, reps);
            let more = estimate_one_rep_max(weight, reps + 1);
            assert!(more >= fewer, "{}x{}={} > {}x{}={}", weight, reps, fewer, weight, reps + 1, more);
        }
    }
    assert_eq!(estimate_one_rep_max(0.4, 2), 0.4);
    assert_eq!(estimate_one_rep_max(1.25, 2), 1.25);
}

#[test]
fn test_volume_is_additive() {
    let a = vec![set(100.0, 5, false), set(80.0, 8, false)];
    let b = vec![set(60.0, 10, false), set(40.0, 10, true)];
    let combined: Vec<WorkoutSet> = a.iter().chain(b.iter()).cloned().collect();

    assert_eq!(compute_volume(&combined), compute_volume(&a) + compute_volume(&b));
    assert_eq!(compute_volume(&combined), 500.0 + 640.0 + 600.0);
}

#[test]
fn test_warmup_only_volume_is_zero() {
    let sets = vec![set(40.0, 10, true), set(60.0, 5, true)];
    assert_eq!(compute_volume(&sets), 0.0);
    assert_eq!(compute_volume(&[]), 0.0);
}
