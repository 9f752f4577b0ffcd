//! LiftLog - Strength Training Log
//!
//! Records strength workouts as they happen, keeps a history of every
//! finished session, and tracks personal records per exercise using an
//! estimated one-rep max.

pub mod metrics;
pub mod recording;
pub mod records;
pub mod storage;

// Re-export commonly used types
pub use metrics::statistics::{WeeklyBucket, WorkoutStatistics};
pub use recording::recorder::WorkoutRecorder;
pub use records::PrLedger;
pub use storage::config::AppConfig;
pub use storage::database::Database;
