use clap::Args;
use healthcoach_core::{format_elapsed, progress_percent, Clock, Tracker, WorkoutState};
use serde_json::json;

use super::{Intake, OutputFormat};
use crate::config::Config;

/// Show today's totals, check-in and workout state
#[derive(Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl StatusCommand {
    pub fn run<C: Clock>(
        &self,
        tracker: &mut Tracker<C>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        tracker.ensure_current_day()?;
        let daily = tracker.daily();
        let now = tracker.clock().now();

        let active = tracker.session().map(|session| {
            let elapsed = session.clone().sync_elapsed(now);
            let (filled, total) = tracker
                .session_workout()
                .map(|w| (session.weights.filled_count(w), w.exercise_count()))
                .unwrap_or((0, 0));
            (elapsed, filled, total)
        });

        match self.format {
            OutputFormat::Json => {
                let value = json!({
                    "date": daily.date,
                    "protein": {
                        "total": daily.protein_total,
                        "goal": config.protein_goal.value,
                        "percent": progress_percent(daily.protein_total, config.protein_goal.value),
                    },
                    "water": {
                        "total": daily.water_total,
                        "goal": config.water_goal.value,
                        "percent": progress_percent(daily.water_total, config.water_goal.value),
                    },
                    "checkedIn": daily.checked_in,
                    "workout": match (tracker.workout_state(), active) {
                        (WorkoutState::Active(session), Some((elapsed, filled, total))) => json!({
                            "state": "active",
                            "day": session.day,
                            "elapsedSeconds": elapsed,
                            "weightsEntered": filled,
                            "exercises": total,
                        }),
                        (WorkoutState::Completed(log), _) => json!({
                            "state": "completed",
                            "day": log.day,
                            "elapsedSeconds": log.elapsed_seconds,
                            "completedAt": log.completed_at,
                        }),
                        _ => json!({ "state": "idle" }),
                    },
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                println!("{}", daily.date.format("%A, %B %-d"));
                println!();
                for intake in [Intake::Protein, Intake::Water] {
                    println!(
                        "{}",
                        intake.summary(intake.total(daily), intake.goal(config))
                    );
                }
                println!();
                println!(
                    "Check-in: {}",
                    if daily.checked_in { "submitted" } else { "pending" }
                );

                match (tracker.workout_state(), active) {
                    (WorkoutState::Active(session), Some((elapsed, filled, total))) => println!(
                        "Workout:  {} in progress ({}, {} of {} weights entered)",
                        session.day,
                        format_elapsed(elapsed),
                        filled,
                        total
                    ),
                    (WorkoutState::Completed(log), _) => println!(
                        "Workout:  {} done in {}",
                        log.day,
                        format_elapsed(log.elapsed_seconds)
                    ),
                    _ => println!("Workout:  not started"),
                }
            }
        }

        Ok(())
    }
}
