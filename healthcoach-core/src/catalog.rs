//! Static workout catalog.
//!
//! The catalog is read-only reference data. A three-day split is bundled with
//! the crate; callers may supply their own list instead.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

const BUNDLED_WORKOUTS: &str = include_str!("../data/workouts.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
}

impl Exercise {
    /// Prescription line, e.g. `4 sets × 10-12 • Dumbbells or barbell`.
    pub fn prescription(&self) -> String {
        let mut line = self.sets.clone();
        if let Some(reps) = &self.reps {
            line.push_str(&format!(" × {}", reps));
        }
        if let Some(rest) = &self.rest {
            line.push_str(&format!(" • {}", rest));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSection {
    pub title: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub day: String,
    pub title: String,
    pub duration: String,
    pub calories: u32,
    pub sections: Vec<WorkoutSection>,
}

impl Workout {
    /// All exercises in section order.
    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.sections.iter().flat_map(|s| s.exercises.iter())
    }

    pub fn exercise_count(&self) -> usize {
        self.sections.iter().map(|s| s.exercises.len()).sum()
    }

    pub fn find_exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises().find(|e| e.id == exercise_id)
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.day, self.title)?;
        writeln!(f, "{} | {} cal", self.duration, self.calories)?;

        for section in &self.sections {
            writeln!(f, "\n{}", section.title)?;
            for exercise in &section.exercises {
                writeln!(f, "  [{}] {}", exercise.id, exercise.name)?;
                writeln!(f, "        {}", exercise.prescription())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse workout catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Workout catalog is empty")]
    Empty,

    #[error("Workout catalog lists day '{0}' more than once")]
    DuplicateDay(String),

    #[error("Workout '{day}' lists exercise '{exercise_id}' more than once")]
    DuplicateExercise { day: String, exercise_id: String },
}

/// Ordered list of workouts, addressed by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    workouts: Vec<Workout>,
}

impl Catalog {
    /// Validates and wraps a list of workouts.
    ///
    /// Days must be unique, and exercise ids unique within a workout.
    pub fn new(workouts: Vec<Workout>) -> Result<Self, CatalogError> {
        if workouts.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut days = HashSet::new();
        for workout in &workouts {
            if !days.insert(workout.day.as_str()) {
                return Err(CatalogError::DuplicateDay(workout.day.clone()));
            }

            let mut ids = HashSet::new();
            for exercise in workout.exercises() {
                if !ids.insert(exercise.id.as_str()) {
                    return Err(CatalogError::DuplicateExercise {
                        day: workout.day.clone(),
                        exercise_id: exercise.id.clone(),
                    });
                }
            }
        }

        Ok(Self { workouts })
    }

    /// Parses a JSON array of workouts.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let workouts: Vec<Workout> = serde_json::from_str(json)?;
        Self::new(workouts)
    }

    /// The three-day split shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_WORKOUTS)
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Workout at zero-based `index`.
    pub fn get(&self, index: usize) -> Option<&Workout> {
        self.workouts.get(index)
    }

    /// Position and workout for a day id such as `Day 2`.
    pub fn by_day(&self, day: &str) -> Option<(usize, &Workout)> {
        self.workouts.iter().enumerate().find(|(_, w)| w.day == day)
    }
}
