use clap::{Args, Subcommand};
use healthcoach_core::{CheckInUpdate, Clock, DailyRecord, EnergyLevel, Mood, Tracker};
use serde_json::json;

use super::OutputFormat;

#[derive(Args)]
pub struct CheckinCommand {
    #[command(subcommand)]
    pub command: CheckinSubcommand,
}

#[derive(Subcommand)]
pub enum CheckinSubcommand {
    /// Show today's check-in
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update check-in fields (only the ones given are changed)
    Set {
        /// Mood from 1 (rough) to 5 (great)
        #[arg(long)]
        mood: Option<Mood>,

        /// Energy level (low, medium, high)
        #[arg(long)]
        energy: Option<EnergyLevel>,

        /// Hours slept last night
        #[arg(long)]
        sleep: Option<String>,

        /// Any other training done today
        #[arg(long = "other-workout", value_name = "TEXT")]
        other_workout: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Submit today's check-in
    Submit,
}

impl CheckinCommand {
    pub fn run<C: Clock>(&self, tracker: &mut Tracker<C>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CheckinSubcommand::Show { format } => {
                tracker.ensure_current_day()?;
                let daily = tracker.daily();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&check_in_json(daily))?);
                    }
                    OutputFormat::Text => print_check_in(daily),
                }
                Ok(())
            }
            CheckinSubcommand::Set {
                mood,
                energy,
                sleep,
                other_workout,
                notes,
            } => {
                let mut update = CheckInUpdate::new();
                if let Some(mood) = mood {
                    update = update.with_mood(*mood);
                }
                if let Some(energy) = energy {
                    update = update.with_energy(*energy);
                }
                if let Some(sleep) = sleep {
                    update = update.with_sleep_hours(sleep);
                }
                if let Some(note) = other_workout {
                    update = update.with_other_workout_note(note);
                }
                if let Some(notes) = notes {
                    update = update.with_notes(notes);
                }

                if update.is_empty() {
                    return Err("Nothing to update. Pass at least one of --mood, --energy, --sleep, --other-workout, --notes".into());
                }

                tracker.update_check_in(update)?;
                println!("Updated check-in:");
                println!();
                print_check_in(tracker.daily());
                Ok(())
            }
            CheckinSubcommand::Submit => {
                let already = tracker.daily().checked_in && tracker.daily().date == tracker.clock().today();
                tracker.check_in()?;
                if already {
                    println!("Already checked in for {}.", tracker.daily().date);
                } else {
                    println!("Checked in for {}.", tracker.daily().date);
                }
                Ok(())
            }
        }
    }
}

fn check_in_json(daily: &DailyRecord) -> serde_json::Value {
    json!({
        "date": daily.date,
        "checkedIn": daily.checked_in,
        "mood": daily.mood,
        "energy": daily.energy,
        "sleepHours": daily.sleep_hours,
        "otherWorkoutNote": daily.other_workout_note,
        "notes": daily.notes,
    })
}

fn print_check_in(daily: &DailyRecord) {
    fn or_dash(value: &str) -> &str {
        if value.is_empty() {
            "-"
        } else {
            value
        }
    }

    println!("Check-in for {}", daily.date);
    println!(
        "  Mood:          {}",
        daily.mood.map(|m| m.to_string()).unwrap_or_else(|| "-".into())
    );
    println!(
        "  Energy:        {}",
        daily.energy.map(|e| e.to_string()).unwrap_or_else(|| "-".into())
    );
    println!("  Sleep:         {}", or_dash(&daily.sleep_hours));
    println!("  Other workout: {}", or_dash(&daily.other_workout_note));
    println!("  Notes:         {}", or_dash(&daily.notes));
    println!(
        "  Status:        {}",
        if daily.checked_in { "submitted" } else { "not submitted" }
    );
}
