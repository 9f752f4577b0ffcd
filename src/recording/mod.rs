//! Recording module for workout sessions and their history.

pub mod history;
pub mod recorder;
pub mod session;
pub mod types;

pub use history::{HistoryCache, HistoryEntry, HistoryIndex, LogCollection};
pub use recorder::WorkoutRecorder;
pub use session::SessionState;
pub use types::{
    format_elapsed, ActiveWorkoutState, CatalogExercise, ExerciseIdentity, ExercisePR,
    FinishedWorkout, LiveSessionSummary, LoggedExercise, Mood, NewSet, SessionError, SetUpdate,
    TemplateExercise, WeightUnit, WorkoutLog, WorkoutSet,
};
