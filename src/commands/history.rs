use chrono::NaiveDate;
use clap::Args;
use healthcoach_core::{day_label, Clock, DailyRecord, Tracker};

use super::OutputFormat;

/// Show archived days plus today, newest first
#[derive(Args)]
pub struct HistoryCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only show the most recent N days
    #[arg(long, short)]
    limit: Option<usize>,
}

impl HistoryCommand {
    pub fn run<C: Clock>(&self, tracker: &mut Tracker<C>) -> Result<(), Box<dyn std::error::Error>> {
        tracker.ensure_current_day()?;
        let mut records = tracker.history_view();
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            OutputFormat::Text => {
                if records.is_empty() {
                    println!("No history yet.");
                    return Ok(());
                }

                let today = tracker.clock().today();
                for record in &records {
                    println!("{}", history_line(record, today));
                }
            }
        }

        Ok(())
    }
}

fn history_line(record: &DailyRecord, today: NaiveDate) -> String {
    let mut line = format!(
        "{:<12} {:>4}g protein  {:>4}oz water",
        day_label(record.date, today),
        record.protein_total,
        record.water_total
    );

    if let Some(workout) = &record.completed_workout {
        line.push_str(&format!("  {} ({})", workout.day, workout.duration));
    }
    if let Some(mood) = &record.mood {
        line.push_str(&format!("  mood {}", mood));
    }
    if record.checked_in {
        line.push_str("  checked in");
    }
    line
}
