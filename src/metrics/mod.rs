//! Metrics module for strength estimates and training statistics.

pub mod estimation;
pub mod statistics;

pub use estimation::{compute_volume, estimate_one_rep_max};
pub use statistics::{compute_statistics, weekly_buckets, WeeklyBucket, WorkoutStatistics};
