//! Database operations using rusqlite.
//!
//! Finished logs keep their exercises and sets as a JSON column; personal
//! records are one row per exercise identity; the workout in progress lives
//! in a single-row autosave table.

use crate::recording::types::{ActiveWorkoutState, ExerciseIdentity, ExercisePR, Mood, WeightUnit, WorkoutLog};
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::storage::store::WorkoutStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        tracing::info!("Opened workout database at {}", path.display());
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    // ========== Workout Log Operations ==========

    /// Get a finished log by ID.
    pub fn get_log(&self, id: &Uuid) -> Result<Option<WorkoutLog>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, workout_name, template_id, start_time, end_time, duration_minutes,
                 exercises_json, notes, mood FROM workout_logs WHERE id = ?1",
                params![id.to_string()],
                LogRow::from_row,
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        row.map(LogRow::into_log).transpose()
    }

    /// List finished logs ordered by start time, oldest first.
    pub fn list_logs(&self) -> Result<Vec<WorkoutLog>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, workout_name, template_id, start_time, end_time, duration_minutes,
                 exercises_json, notes, mood FROM workout_logs ORDER BY start_time ASC, id ASC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], LogRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut logs = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            logs.push(row.into_log()?);
        }

        Ok(logs)
    }

    /// Count finished logs.
    pub fn count_logs(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM workout_logs", [], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as usize)
    }

    // ========== Personal Record Operations ==========

    /// List all personal records.
    pub fn list_records(&self) -> Result<Vec<ExercisePR>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT identity_json, exercise_name, weight, weight_unit, reps, estimated_1rm,
                 achieved_at, source_log_id FROM personal_records ORDER BY identity_key",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RecordRow {
                    identity_json: row.get(0)?,
                    exercise_name: row.get(1)?,
                    weight: row.get(2)?,
                    weight_unit: row.get(3)?,
                    reps: row.get(4)?,
                    estimated_1rm: row.get(5)?,
                    achieved_at: row.get(6)?,
                    source_log_id: row.get(7)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            records.push(row.into_record()?);
        }

        Ok(records)
    }

    // ========== Active Session (Autosave) Operations ==========

    /// Check if a workout in progress was saved.
    pub fn has_active(&self) -> Result<bool, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM active_session", [], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count > 0)
    }
}

fn insert_log(conn: &Connection, log: &WorkoutLog) -> Result<(), DatabaseError> {
    let exercises_json = serde_json::to_string(&log.exercises)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

    conn.execute(
        "INSERT INTO workout_logs (id, workout_name, template_id, start_time, end_time,
         duration_minutes, exercises_json, notes, mood, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            log.id.to_string(),
            log.workout_name,
            log.template_id,
            log.start_time.to_rfc3339(),
            log.end_time.to_rfc3339(),
            log.duration_minutes,
            exercises_json,
            log.notes,
            log.mood.map(Mood::as_str),
            Utc::now().to_rfc3339(),
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(format!("Workout log {} already exists", log.id))
        }
        e => DatabaseError::QueryFailed(e.to_string()),
    })?;

    Ok(())
}

fn upsert_record(conn: &Connection, record: &ExercisePR) -> Result<(), DatabaseError> {
    let identity_json = serde_json::to_string(&record.identity)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

    conn.execute(
        "INSERT OR REPLACE INTO personal_records (identity_key, identity_json, exercise_name,
         weight, weight_unit, reps, estimated_1rm, achieved_at, source_log_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.identity.key(),
            identity_json,
            record.exercise_name,
            record.weight,
            record.weight_unit.as_str(),
            record.reps,
            record.estimated_1rm,
            record.date.to_rfc3339(),
            record.source_log_id.to_string(),
        ],
    )
    .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(())
}

impl WorkoutStore for Database {
    fn load_logs(&self) -> Result<Vec<WorkoutLog>, DatabaseError> {
        self.list_logs()
    }

    fn load_records(&self) -> Result<Vec<ExercisePR>, DatabaseError> {
        self.list_records()
    }

    fn commit_finished(&mut self, log: &WorkoutLog, records: &[ExercisePR]) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        insert_log(&tx, log)?;
        for record in records {
            upsert_record(&tx, record)?;
        }
        tx.execute("DELETE FROM active_session", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::debug!("Committed workout log {} with {} records", log.id, records.len());
        Ok(())
    }

    fn delete_log(&mut self, id: &Uuid) -> Result<(), DatabaseError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM workout_logs WHERE id = ?1", params![id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("Workout log {}", id)));
        }

        Ok(())
    }

    fn save_active(&mut self, state: &ActiveWorkoutState) -> Result<(), DatabaseError> {
        let state_json = serde_json::to_string(state)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO active_session (id, state_json, saved_at)
                 VALUES (1, ?1, datetime('now'))",
                params![state_json],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn load_active(&self) -> Result<Option<ActiveWorkoutState>, DatabaseError> {
        let result: Result<String, _> = self.conn.query_row(
            "SELECT state_json FROM active_session WHERE id = 1",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(state_json) => {
                let state: ActiveWorkoutState = serde_json::from_str(&state_json)
                    .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;
                Ok(Some(state))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    fn clear_active(&mut self) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM active_session", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

fn parse_timestamp(value: &str, what: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid {}: {}", what, e)))
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value)
        .map_err(|e| DatabaseError::DeserializationError(format!("Invalid {} UUID: {}", what, e)))
}

/// Intermediate struct for reading workout log rows from database.
struct LogRow {
    id: String,
    workout_name: Option<String>,
    template_id: Option<String>,
    start_time: String,
    end_time: String,
    duration_minutes: u32,
    exercises_json: String,
    notes: Option<String>,
    mood: Option<String>,
}

impl LogRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(LogRow {
            id: row.get(0)?,
            workout_name: row.get(1)?,
            template_id: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            duration_minutes: row.get(5)?,
            exercises_json: row.get(6)?,
            notes: row.get(7)?,
            mood: row.get(8)?,
        })
    }

    fn into_log(self) -> Result<WorkoutLog, DatabaseError> {
        let exercises = serde_json::from_str(&self.exercises_json)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        let mood = self
            .mood
            .map(|m| {
                Mood::parse(&m)
                    .ok_or_else(|| DatabaseError::DeserializationError(format!("Invalid mood: {}", m)))
            })
            .transpose()?;

        Ok(WorkoutLog {
            id: parse_uuid(&self.id, "log")?,
            start_time: parse_timestamp(&self.start_time, "start time")?,
            end_time: parse_timestamp(&self.end_time, "end time")?,
            duration_minutes: self.duration_minutes,
            workout_name: self.workout_name,
            template_id: self.template_id,
            exercises,
            notes: self.notes,
            mood,
        })
    }
}

/// Intermediate struct for reading personal record rows from database.
struct RecordRow {
    identity_json: String,
    exercise_name: String,
    weight: f64,
    weight_unit: String,
    reps: u32,
    estimated_1rm: f64,
    achieved_at: String,
    source_log_id: String,
}

impl RecordRow {
    fn into_record(self) -> Result<ExercisePR, DatabaseError> {
        let identity: ExerciseIdentity = serde_json::from_str(&self.identity_json)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        let weight_unit = WeightUnit::parse(&self.weight_unit).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Invalid weight unit: {}", self.weight_unit))
        })?;

        Ok(ExercisePR {
            identity,
            exercise_name: self.exercise_name,
            weight: self.weight,
            weight_unit,
            reps: self.reps,
            estimated_1rm: self.estimated_1rm,
            date: parse_timestamp(&self.achieved_at, "record date")?,
            source_log_id: parse_uuid(&self.source_log_id, "source log")?,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}
