//! Storage module for the workout database and configuration.

pub mod config;
pub mod database;
pub mod schema;
pub mod store;

pub use config::{AppConfig, ConfigError, TrackingSettings};
pub use database::{Database, DatabaseError};
pub use store::{MemoryStore, WorkoutStore};
