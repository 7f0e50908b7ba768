use clap::{Args, Subcommand};
use healthcoach_core::{
    format_elapsed, Catalog, Clock, Tracker, TrackerError, WorkoutState,
};
use std::io::Write;
use std::time::Duration;

use crate::ticker::tick_until;

#[derive(Args)]
pub struct WorkoutCommand {
    #[command(subcommand)]
    pub command: WorkoutSubcommand,
}

#[derive(Subcommand)]
pub enum WorkoutSubcommand {
    /// List the workouts in the catalog
    List,

    /// Show a workout's exercises with last session's weights
    Show {
        /// Workout position (1, 2, ...) or day name (e.g. "Day 2")
        day: String,
    },

    /// Start a workout; the timer keeps running until `end`
    Start {
        /// Workout position (1, 2, ...) or day name (e.g. "Day 2")
        day: String,

        /// Weight for an exercise, as ID=WEIGHT (can be repeated)
        #[arg(long = "weight", value_name = "ID=WEIGHT", value_parser = parse_weight_arg)]
        weights: Vec<(String, String)>,
    },

    /// Enter the weight used for an exercise of the active workout
    Weight {
        /// Exercise ID (e.g. d1-4)
        exercise_id: String,

        /// Weight, digits with an optional decimal point; empty clears it
        weight: String,
    },

    /// Show the active workout
    Status,

    /// Finish the active workout and log it
    End,

    /// Discard the active workout without logging it
    Cancel,

    /// Start a workout and time it live until Ctrl-C, then log it
    Run {
        /// Workout position (1, 2, ...) or day name (e.g. "Day 2")
        day: String,

        /// Weight for an exercise, as ID=WEIGHT (can be repeated)
        #[arg(long = "weight", value_name = "ID=WEIGHT", value_parser = parse_weight_arg)]
        weights: Vec<(String, String)>,
    },

    /// Change the weights of today's completed workout
    Edit {
        /// New weight for an exercise, as ID=WEIGHT (can be repeated)
        #[arg(long = "weight", value_name = "ID=WEIGHT", value_parser = parse_weight_arg, required = true)]
        weights: Vec<(String, String)>,
    },
}

impl WorkoutCommand {
    pub fn run<C: Clock>(&self, tracker: &mut Tracker<C>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WorkoutSubcommand::List => {
                tracker.ensure_current_day()?;
                let done_today = tracker
                    .daily()
                    .completed_workout
                    .as_ref()
                    .map(|w| w.day.clone());

                for (index, workout) in tracker.catalog().workouts().iter().enumerate() {
                    let marker = if done_today.as_deref() == Some(workout.day.as_str()) {
                        "  (done today)"
                    } else {
                        ""
                    };
                    println!(
                        "{}. {}: {} - {}, {} cal{}",
                        index + 1,
                        workout.day,
                        workout.title,
                        workout.duration,
                        workout.calories,
                        marker
                    );
                }
                Ok(())
            }
            WorkoutSubcommand::Show { day } => {
                let index = resolve_day(tracker.catalog(), day)?;
                let workout = &tracker.catalog().workouts()[index];
                print!("{}", workout);

                let last: Vec<String> = workout
                    .exercises()
                    .filter_map(|e| {
                        tracker
                            .last_weight(&workout.day, &e.id)
                            .map(|w| format!("  {}: {}", e.name, w))
                    })
                    .collect();
                if !last.is_empty() {
                    println!("\nLast session:");
                    for line in last {
                        println!("{}", line);
                    }
                }
                Ok(())
            }
            WorkoutSubcommand::Start { day, weights } => {
                start(tracker, day, weights)?;
                println!("Use 'coach workout end' when you're done.");
                Ok(())
            }
            WorkoutSubcommand::Weight {
                exercise_id,
                weight,
            } => {
                if tracker.set_workout_weight(exercise_id, weight)? {
                    println!("Set {} to {}.", exercise_id, display_weight(weight));
                } else {
                    println!(
                        "Ignored '{}': weights are digits with an optional decimal point.",
                        weight
                    );
                }
                Ok(())
            }
            WorkoutSubcommand::Status => {
                print_active(tracker)?;
                Ok(())
            }
            WorkoutSubcommand::End => {
                let log = tracker.end_workout()?;
                println!("Workout complete!");
                println!();
                print!("{}", log);
                Ok(())
            }
            WorkoutSubcommand::Cancel => {
                let session = tracker.cancel_workout()?;
                println!("Cancelled {}. Nothing was logged.", session.day);
                Ok(())
            }
            WorkoutSubcommand::Run { day, weights } => {
                start(tracker, day, weights)?;
                println!("Timing workout. Press Ctrl-C to finish.");

                let rt = tokio::runtime::Runtime::new()?;
                let result = rt.block_on(tick_until(
                    Duration::from_secs(1),
                    async {
                        if let Err(e) = tokio::signal::ctrl_c().await {
                            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                            std::future::pending::<()>().await;
                        }
                    },
                    || {
                        let elapsed = tracker.tick_workout()?;
                        print!("\r  {}", format_elapsed(elapsed));
                        let _ = std::io::stdout().flush();
                        Ok::<_, TrackerError>(())
                    },
                ));
                println!();
                result?;

                let log = tracker.end_workout()?;
                println!("Workout complete!");
                println!();
                print!("{}", log);
                Ok(())
            }
            WorkoutSubcommand::Edit { weights } => {
                let edit = tracker.save_edited_weights(weights)?;
                for exercise_id in &edit.rejected {
                    println!("Ignored weight for {}: not a number.", exercise_id);
                }
                println!("Updated weights:");
                println!();
                print!("{}", edit.log);
                Ok(())
            }
        }
    }
}

fn start<C: Clock>(
    tracker: &mut Tracker<C>,
    day: &str,
    weights: &[(String, String)],
) -> Result<(), Box<dyn std::error::Error>> {
    let index = resolve_day(tracker.catalog(), day)?;
    let workout = tracker
        .catalog()
        .get(index)
        .ok_or(TrackerError::UnknownWorkout(index))?;
    if let Some((exercise_id, _)) = weights
        .iter()
        .find(|(id, _)| workout.find_exercise(id).is_none())
    {
        return Err(TrackerError::UnknownExercise {
            day: workout.day.clone(),
            exercise_id: exercise_id.clone(),
        }
        .into());
    }

    let session = tracker.start_workout(index)?;
    let name = session.day.clone();
    let prefilled = !session.weights.is_empty();

    for (exercise_id, weight) in weights {
        if !tracker.set_workout_weight(exercise_id, weight)? {
            println!("Ignored weight for {}: not a number.", exercise_id);
        }
    }

    println!("Started {}.", name);
    if prefilled {
        println!("Weights pre-filled from today's earlier session.");
    }
    Ok(())
}

fn print_active<C: Clock>(tracker: &Tracker<C>) -> Result<(), Box<dyn std::error::Error>> {
    let session = match tracker.workout_state() {
        WorkoutState::Active(session) => session,
        WorkoutState::Completed(log) => {
            println!("No workout in progress. Today's workout:");
            println!();
            print!("{}", log);
            return Ok(());
        }
        WorkoutState::Idle => return Err(TrackerError::NoActiveSession.into()),
    };
    let workout = tracker
        .session_workout()
        .ok_or_else(|| TrackerError::MissingWorkout(session.day.clone()))?;

    let elapsed = session.clone().sync_elapsed(tracker.clock().now());
    println!("{}: {}", workout.day, workout.title);
    println!(
        "Elapsed {} | {} of {} weights entered",
        format_elapsed(elapsed),
        session.weights.filled_count(workout),
        workout.exercise_count()
    );

    for section in &workout.sections {
        println!("\n{}", section.title);
        for exercise in &section.exercises {
            let weight = session.weights.get(&exercise.id).unwrap_or("-");
            let last = tracker
                .last_weight(&workout.day, &exercise.id)
                .map(|w| format!(" (last: {})", w))
                .unwrap_or_default();
            println!("  [{}] {}: {}{}", exercise.id, exercise.name, weight, last);
        }
    }
    Ok(())
}

fn display_weight(weight: &str) -> &str {
    if weight.is_empty() {
        "-"
    } else {
        weight
    }
}

/// Resolves a 1-based position or a day name to a catalog index.
fn resolve_day(catalog: &Catalog, day: &str) -> Result<usize, String> {
    if let Ok(position) = day.trim().parse::<usize>() {
        return if (1..=catalog.len()).contains(&position) {
            Ok(position - 1)
        } else {
            Err(format!(
                "No workout at position {}. Choose 1 to {}.",
                position,
                catalog.len()
            ))
        };
    }

    catalog
        .workouts()
        .iter()
        .position(|w| w.day.eq_ignore_ascii_case(day.trim()))
        .ok_or_else(|| format!("Workout not found: {}", day))
}

/// Parses `ID=WEIGHT`. The weight may be empty to clear it.
fn parse_weight_arg(arg: &str) -> Result<(String, String), String> {
    let (id, weight) = arg
        .split_once('=')
        .ok_or_else(|| format!("Invalid weight '{}'. Use ID=WEIGHT, e.g. d1-4=35", arg))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("Invalid weight '{}': missing exercise ID", arg));
    }
    Ok((id.to_string(), weight.trim().to_string()))
}
