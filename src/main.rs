//! LiftLog - Strength Training Log
//!
//! Prints lifetime statistics, personal records and recent weekly volume
//! from the configured workout database.

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use liftlog::recording::types::format_elapsed;
use liftlog::storage::config::load_config;
use liftlog::{Database, WorkoutRecorder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LiftLog v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let database = Database::open(&config.database_path())?;
    let recorder = WorkoutRecorder::open(database)?
        .with_autosave(config.tracking.autosave_active_session)
        .with_default_unit(config.tracking.default_weight_unit);

    let now = Utc::now();
    let today = now.date_naive();

    let stats = recorder.statistics(today);
    println!("Workouts:        {}", stats.total_workouts);
    println!("Total volume:    {:.1}", stats.total_volume);
    println!("Training time:   {} min", stats.total_duration_minutes);
    println!("Exercises:       {}", stats.exercise_count);
    println!("Personal records: {}", stats.total_prs);
    println!("Current streak:  {} days", stats.current_streak);
    println!("Weight unit:     {}", recorder.default_unit());

    if let Some(summary) = recorder.live_summary(now) {
        println!();
        println!(
            "Workout in progress: {} exercises, {} sets, {}",
            summary.exercise_count,
            summary.set_count,
            format_elapsed(chrono::Duration::seconds(summary.elapsed_seconds))
        );
    }

    if !recorder.ledger().is_empty() {
        println!();
        println!("Personal records");
        for pr in recorder.ledger().records() {
            println!(
                "  {:<24} {} {} x {}  (est. 1RM {}, {})",
                pr.exercise_name,
                pr.weight,
                pr.weight_unit,
                pr.reps,
                pr.estimated_1rm,
                pr.date.format("%Y-%m-%d")
            );
        }
    }

    println!();
    println!("Weekly volume");
    for bucket in recorder.weekly_buckets(today, config.tracking.weekly_chart_weeks) {
        println!(
            "  {}  {:>2} workouts  {:>10.1}",
            bucket.week_start, bucket.workouts, bucket.volume
        );
    }

    Ok(())
}
