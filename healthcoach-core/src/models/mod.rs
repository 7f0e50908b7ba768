mod check_in;
mod daily;
mod history;
mod workout_log;

pub use check_in::{CheckInUpdate, EnergyLevel, Mood};
pub use daily::{CompletedWorkout, DailyRecord};
pub use history::{assemble_history, day_label, History};
pub use workout_log::{ExerciseLog, WorkoutLog, WorkoutLogArchive};
