use clap::ValueEnum;

mod checkin;
mod config_cmd;
mod history;
mod intake;
mod status;
mod workout;

pub use checkin::CheckinCommand;
pub use config_cmd::ConfigCommand;
pub use history::HistoryCommand;
pub use intake::{Intake, IntakeCommand};
pub use status::StatusCommand;
pub use workout::WorkoutCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const BAR_WIDTH: usize = 20;

/// Fixed-width bar for a 0-100 percentage.
pub(crate) fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
