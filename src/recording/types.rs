//! Recording types for workout sessions, finished logs and personal records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Kilograms per pound.
const KG_PER_LB: f64 = 0.453_592_37;

/// Unit a weight was logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms
    #[default]
    Kg,
    /// Pounds
    Lb,
}

impl WeightUnit {
    /// Convert a value in this unit to kilograms.
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }

    /// Short label used in display and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }

    /// Parse the storage label back into a unit.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "kg" => Some(WeightUnit::Kg),
            "lb" => Some(WeightUnit::Lb),
            _ => None,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an exercise is identified for PR and history lookups.
///
/// Catalog exercises are keyed by their catalog id. Exercises typed in freely
/// are keyed by their normalized name, so "Back  Squat" and "back squat" are
/// the same exercise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExerciseIdentity {
    /// Exercise picked from the catalog.
    Catalog { id: String },
    /// Ad hoc exercise known only by name.
    Custom { normalized_name: String },
}

impl ExerciseIdentity {
    /// Identity of an exercise given its optional catalog id and display name.
    ///
    /// A blank catalog id is treated as absent.
    pub fn of(exercise_id: Option<&str>, name: &str) -> Self {
        match exercise_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => ExerciseIdentity::Catalog { id: id.to_string() },
            None => ExerciseIdentity::custom(name),
        }
    }

    /// Identity of a free-text exercise name.
    pub fn custom(name: &str) -> Self {
        ExerciseIdentity::Custom {
            normalized_name: normalize_name(name),
        }
    }

    /// Stable string key, used as the primary key of stored records.
    pub fn key(&self) -> String {
        match self {
            ExerciseIdentity::Catalog { id } => format!("catalog:{}", id),
            ExerciseIdentity::Custom { normalized_name } => format!("custom:{}", normalized_name),
        }
    }
}

impl fmt::Display for ExerciseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Trim, collapse inner whitespace and lowercase an exercise name.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A single logged attempt within an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// 1-based position within the owning exercise, always dense
    pub set_number: u32,
    /// Weight lifted
    pub weight: f64,
    /// Unit of `weight`
    pub weight_unit: WeightUnit,
    /// Completed repetitions
    pub reps: u32,
    /// Warmup sets count toward neither volume nor records
    pub is_warmup: bool,
    /// Whether the user ticked the set off
    pub completed: bool,
    /// Set at finish time when this set produced a new record
    pub is_pr: bool,
}

impl WorkoutSet {
    /// Weight converted to kilograms.
    pub fn weight_kg(&self) -> f64 {
        self.weight_unit.to_kg(self.weight)
    }

    /// Whether this set may produce a personal record.
    pub fn qualifies_for_record(&self) -> bool {
        !self.is_warmup && self.reps > 0 && self.weight > 0.0
    }
}

/// Whether `weight` can be stored on a set: finite and not negative.
pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

/// A set as entered by the user, before the store numbers it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewSet {
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub reps: u32,
    pub is_warmup: bool,
    pub completed: bool,
}

impl NewSet {
    /// A completed working set in `unit`.
    pub fn working(weight: f64, reps: u32, unit: WeightUnit) -> Self {
        Self {
            weight,
            weight_unit: unit,
            reps,
            is_warmup: false,
            completed: true,
        }
    }

    /// A working set in kilograms.
    pub fn kg(weight: f64, reps: u32) -> Self {
        Self::working(weight, reps, WeightUnit::Kg)
    }

    /// Mark the set as a warmup.
    pub fn warmup(mut self) -> Self {
        self.is_warmup = true;
        self
    }

    /// Change the unit the weight is expressed in.
    pub fn in_unit(mut self, unit: WeightUnit) -> Self {
        self.weight_unit = unit;
        self
    }

    pub(crate) fn into_set(self, set_number: u32) -> WorkoutSet {
        WorkoutSet {
            set_number,
            weight: self.weight,
            weight_unit: self.weight_unit,
            reps: self.reps,
            is_warmup: self.is_warmup,
            completed: self.completed,
            is_pr: false,
        }
    }
}

/// Partial update merged into an existing set.
///
/// There is no `is_pr` field: only finishing a session writes it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetUpdate {
    pub weight: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub reps: Option<u32>,
    pub is_warmup: Option<bool>,
    pub completed: Option<bool>,
}

impl SetUpdate {
    pub(crate) fn apply_to(&self, set: &mut WorkoutSet) {
        if let Some(weight) = self.weight {
            set.weight = weight;
        }
        if let Some(unit) = self.weight_unit {
            set.weight_unit = unit;
        }
        if let Some(reps) = self.reps {
            set.reps = reps;
        }
        if let Some(is_warmup) = self.is_warmup {
            set.is_warmup = is_warmup;
        }
        if let Some(completed) = self.completed {
            set.completed = completed;
        }
    }
}

/// One exercise performed within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedExercise {
    /// Session-local handle used by set operations
    pub entry_id: Uuid,
    /// Catalog id, absent for exercises typed in freely
    pub exercise_id: Option<String>,
    /// Display name
    pub exercise_name: String,
    /// Sets in the order they were logged
    pub sets: Vec<WorkoutSet>,
}

impl LoggedExercise {
    /// Create an empty exercise entry.
    pub fn new(exercise_id: Option<String>, exercise_name: impl Into<String>) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            exercise_id,
            exercise_name: exercise_name.into(),
            sets: Vec::new(),
        }
    }

    /// Identity used for records and history.
    pub fn identity(&self) -> ExerciseIdentity {
        ExerciseIdentity::of(self.exercise_id.as_deref(), &self.exercise_name)
    }
}

/// Exercise supplied by the catalog picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogExercise {
    pub exercise_id: String,
    pub name: String,
}

/// Exercise entry of a workout template or generated plan.
///
/// Targets are informational only and never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub name: String,
    pub exercise_id: Option<String>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<String>,
}

impl TemplateExercise {
    /// Template entry with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// The workout currently in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWorkoutState {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub workout_name: Option<String>,
    pub template_id: Option<String>,
    pub exercises: Vec<LoggedExercise>,
}

impl ActiveWorkoutState {
    /// Create a session started at `start_time`, seeded from template entries.
    pub fn new(
        start_time: DateTime<Utc>,
        workout_name: Option<String>,
        template_id: Option<String>,
        initial_exercises: &[TemplateExercise],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            workout_name,
            template_id,
            exercises: initial_exercises
                .iter()
                .map(|e| LoggedExercise::new(e.exercise_id.clone(), e.name.clone()))
                .collect(),
        }
    }

    /// Time since the session started, never negative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }

    pub(crate) fn exercise_mut(&mut self, entry_id: Uuid) -> Option<&mut LoggedExercise> {
        self.exercises.iter_mut().find(|e| e.entry_id == entry_id)
    }

    /// Look up an exercise entry by its handle.
    pub fn exercise(&self, entry_id: Uuid) -> Option<&LoggedExercise> {
        self.exercises.iter().find(|e| e.entry_id == entry_id)
    }
}

/// How the user felt after a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Tired,
    Bad,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Tired => "tired",
            Mood::Bad => "bad",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "great" => Some(Mood::Great),
            "good" => Some(Mood::Good),
            "okay" => Some(Mood::Okay),
            "tired" => Some(Mood::Tired),
            "bad" => Some(Mood::Bad),
            _ => None,
        }
    }
}

/// Immutable record of a finished workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whole minutes between start and end, rounded to nearest
    pub duration_minutes: u32,
    pub workout_name: Option<String>,
    pub template_id: Option<String>,
    pub exercises: Vec<LoggedExercise>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
}

impl WorkoutLog {
    /// Snapshot an active session finished at `end_time`.
    pub fn from_active(
        state: &ActiveWorkoutState,
        end_time: DateTime<Utc>,
        notes: Option<String>,
        mood: Option<Mood>,
    ) -> Self {
        Self {
            id: state.id,
            start_time: state.start_time,
            end_time,
            duration_minutes: duration_minutes(state.start_time, end_time),
            workout_name: state.workout_name.clone(),
            template_id: state.template_id.clone(),
            exercises: state.exercises.clone(),
            notes,
            mood,
        }
    }

    /// Whether any exercise in the log has the given identity.
    pub fn contains(&self, identity: &ExerciseIdentity) -> bool {
        self.exercises.iter().any(|e| &e.identity() == identity)
    }
}

/// Minutes between two instants, rounded to nearest and clamped at zero.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let millis = (end - start).num_milliseconds().max(0) as f64;
    (millis / 60_000.0).round() as u32
}

/// Best known lift for one exercise identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePR {
    pub identity: ExerciseIdentity,
    pub exercise_name: String,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub reps: u32,
    /// Estimated one-rep max, in `weight_unit`
    pub estimated_1rm: f64,
    pub date: DateTime<Utc>,
    pub source_log_id: Uuid,
}

impl ExercisePR {
    /// Estimated one-rep max in kilograms, used to compare across units.
    pub fn estimated_1rm_kg(&self) -> f64 {
        self.weight_unit.to_kg(self.estimated_1rm)
    }
}

/// Result of finishing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedWorkout {
    pub log: WorkoutLog,
    /// Records set or raised by this workout, empty when none
    pub new_prs: Vec<ExercisePR>,
}

/// Live statistics for the session in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSessionSummary {
    pub exercise_count: usize,
    pub set_count: usize,
    pub completed_sets: usize,
    /// Working volume (warmups excluded)
    pub volume: f64,
    pub elapsed_seconds: i64,
}

/// Format an elapsed duration as `MM:SS`, or `H:MM:SS` past the hour.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Errors from the workout recorder.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session is already in progress
    #[error("A workout session is already in progress")]
    AlreadyActive,

    /// No session is in progress
    #[error("No workout session in progress")]
    NoActiveSession,

    /// Storage failed; in-memory state was left untouched so the call can be retried
    #[error("Failed to persist workout data: {0}")]
    PersistenceFailure(String),
}
