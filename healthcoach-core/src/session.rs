//! In-progress workout session and weight entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Workout;
use crate::models::{ExerciseLog, WorkoutLog};

/// True if `text` is an acceptable weight entry: digits with at most one
/// decimal point, or empty.
pub fn is_weight_input(text: &str) -> bool {
    let mut seen_point = false;
    text.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_point => {
            seen_point = true;
            true
        }
        _ => false,
    })
}

/// Parses an accepted weight entry. Blank or non-numeric entries (`""`, `"."`)
/// yield `None`.
pub fn parse_weight(text: &str) -> Option<f64> {
    if !is_weight_input(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|w| w.is_finite())
}

pub fn format_weight(weight: f64) -> String {
    format!("{}", weight)
}

/// `MM:SS`, or `H:MM:SS` from one hour on.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Raw weight text per exercise id, as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightInputs(BTreeMap<String, String>);

impl WeightInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills inputs from the weights of a logged session.
    pub fn from_log(log: &WorkoutLog) -> Self {
        let inputs = log
            .exercises
            .iter()
            .filter_map(|e| e.weight.map(|w| (e.exercise_id.clone(), format_weight(w))))
            .collect();
        Self(inputs)
    }

    /// Stores `text` for `exercise_id`. Rejected text leaves the input as it
    /// was and returns `false`. Empty text clears the input.
    pub fn set(&mut self, exercise_id: impl Into<String>, text: &str) -> bool {
        if !is_weight_input(text) {
            return false;
        }
        let exercise_id = exercise_id.into();
        if text.is_empty() {
            self.0.remove(&exercise_id);
        } else {
            self.0.insert(exercise_id, text.to_string());
        }
        true
    }

    pub fn get(&self, exercise_id: &str) -> Option<&str> {
        self.0.get(exercise_id).map(String::as_str)
    }

    pub fn weight(&self, exercise_id: &str) -> Option<f64> {
        self.get(exercise_id).and_then(parse_weight)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One log entry per catalog exercise, in catalog order.
    pub fn to_exercise_logs(&self, workout: &Workout) -> Vec<ExerciseLog> {
        workout
            .exercises()
            .map(|e| ExerciseLog::new(&e.id, &e.name, self.weight(&e.id)))
            .collect()
    }

    /// Re-weighs already logged exercises, keeping their ids, names and order.
    pub fn reweigh(&self, exercises: &[ExerciseLog]) -> Vec<ExerciseLog> {
        exercises
            .iter()
            .map(|e| ExerciseLog {
                weight: self.weight(&e.exercise_id),
                ..e.clone()
            })
            .collect()
    }

    /// Number of `workout`'s exercises with a usable weight entered.
    pub fn filled_count(&self, workout: &Workout) -> usize {
        workout
            .exercises()
            .filter(|e| self.weight(&e.id).is_some())
            .count()
    }
}

/// A workout that has been started and not yet ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub day_index: usize,
    pub day: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub weights: WeightInputs,
}

impl ActiveSession {
    pub fn start(
        day_index: usize,
        workout: &Workout,
        started_at: DateTime<Utc>,
        weights: WeightInputs,
    ) -> Self {
        Self {
            day_index,
            day: workout.day.clone(),
            started_at,
            elapsed_seconds: 0,
            weights,
        }
    }

    /// Advances the elapsed counter by one second.
    pub fn tick(&mut self) -> u64 {
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        self.elapsed_seconds
    }

    /// Raises the elapsed counter to the wall-clock time since start. Ticks
    /// already counted are never lost.
    pub fn sync_elapsed(&mut self, now: DateTime<Utc>) -> u64 {
        let wall = (now - self.started_at).num_seconds().max(0) as u64;
        self.elapsed_seconds = self.elapsed_seconds.max(wall);
        self.elapsed_seconds
    }

    /// Builds the completed log for this session.
    pub fn finish(&self, workout: &Workout, completed_at: DateTime<Utc>) -> WorkoutLog {
        WorkoutLog {
            day: workout.day.clone(),
            duration: workout.duration.clone(),
            elapsed_seconds: self.elapsed_seconds,
            exercises: self.weights.to_exercise_logs(workout),
            completed_at,
        }
    }
}
