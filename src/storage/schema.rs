//! Database schema definitions for LiftLog.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Finished workouts
CREATE TABLE IF NOT EXISTS workout_logs (
    id TEXT PRIMARY KEY,
    workout_name TEXT,
    template_id TEXT,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL,
    exercises_json TEXT NOT NULL,
    notes TEXT,
    mood TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_workout_logs_start_time ON workout_logs(start_time);

-- One personal record per exercise identity
CREATE TABLE IF NOT EXISTS personal_records (
    identity_key TEXT PRIMARY KEY,
    identity_json TEXT NOT NULL,
    exercise_name TEXT NOT NULL,
    weight REAL NOT NULL,
    weight_unit TEXT NOT NULL,
    reps INTEGER NOT NULL,
    estimated_1rm REAL NOT NULL,
    achieved_at TEXT NOT NULL,
    source_log_id TEXT NOT NULL
);

-- Workout in progress (crash recovery)
CREATE TABLE IF NOT EXISTS active_session (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    state_json TEXT NOT NULL,
    saved_at TEXT NOT NULL
);
"#;

/// Schema version table creation.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
