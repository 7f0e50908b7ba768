//! Health Coach Core Library
//!
//! Daily intake and check-in tracking, workout sessions, and the bounded
//! history of both.

pub mod catalog;
pub mod clock;
pub mod models;
pub mod rollover;
pub mod session;
pub mod store;
pub mod tracker;

pub use catalog::{Catalog, CatalogError, Exercise, Workout, WorkoutSection};
pub use clock::{Clock, FixedClock, SystemClock};
pub use models::{
    assemble_history, day_label, CheckInUpdate, CompletedWorkout, DailyRecord, EnergyLevel,
    ExerciseLog, History, Mood, WorkoutLog, WorkoutLogArchive,
};
pub use rollover::{roll_over, RolloverOutcome};
pub use session::{format_elapsed, parse_weight, ActiveSession, WeightInputs};
pub use store::{DurableStore, FileBackend, KeyValueBackend, MemoryBackend, StoreError, StoreKey};
pub use tracker::{Tracker, TrackerError, WeightEdit, WorkoutState};

/// Daily protein goal in grams.
pub const PROTEIN_GOAL: u32 = 150;

/// Daily water goal in ounces.
pub const WATER_GOAL: u32 = 100;

/// Quick-add buttons for protein, in grams.
pub const PROTEIN_PRESETS: [u32; 3] = [10, 25, 50];

/// Quick-add buttons for water, in ounces.
pub const WATER_PRESETS: [u32; 3] = [8, 16, 32];

/// Parses a custom intake amount from its leading digits.
///
/// `"25g"` gives 25. Text without leading digits, or an amount of zero, gives
/// `None`. A leading sign is not accepted (`"+5"` gives `None`), and neither
/// is an amount that does not fit in a `u32`.
pub fn parse_amount(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<u32>().ok().filter(|n| *n > 0)
}

/// Share of `goal` reached by `total`, as a whole percentage capped at 100.
pub fn progress_percent(total: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 100;
    }
    let percent = u64::from(total) * 100 / u64::from(goal);
    percent.min(100) as u32
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
