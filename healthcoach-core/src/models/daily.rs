use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::check_in::{CheckInUpdate, EnergyLevel, Mood};
use super::workout_log::WorkoutLog;

/// Summary of today's completed catalog workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedWorkout {
    pub day: String,
    pub duration: String,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Everything tracked for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub protein_total: u32,
    #[serde(default)]
    pub water_total: u32,
    #[serde(default)]
    pub completed_workout: Option<CompletedWorkout>,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub energy: Option<EnergyLevel>,
    #[serde(default)]
    pub sleep_hours: String,
    #[serde(default)]
    pub other_workout_note: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub workout_log: Option<WorkoutLog>,
}

impl DailyRecord {
    /// A fresh record: counters zero, flags cleared.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            protein_total: 0,
            water_total: 0,
            completed_workout: None,
            checked_in: false,
            mood: None,
            energy: None,
            sleep_hours: String::new(),
            other_workout_note: String::new(),
            notes: String::new(),
            workout_log: None,
        }
    }

    /// True if the record carries anything worth archiving.
    ///
    /// Check-in fields alone don't count until the check-in is submitted.
    pub fn has_data(&self) -> bool {
        self.protein_total > 0
            || self.water_total > 0
            || self.completed_workout.is_some()
            || self.checked_in
    }

    /// Adds protein grams, saturating at `u32::MAX`. Returns the new total.
    pub fn add_protein(&mut self, amount: u32) -> u32 {
        self.protein_total = self.protein_total.saturating_add(amount);
        self.protein_total
    }

    /// Adds water ounces, saturating at `u32::MAX`. Returns the new total.
    pub fn add_water(&mut self, amount: u32) -> u32 {
        self.water_total = self.water_total.saturating_add(amount);
        self.water_total
    }

    pub fn check_in(&mut self) {
        self.checked_in = true;
    }

    /// Merges the fields present in `update`.
    pub fn apply_check_in(&mut self, update: CheckInUpdate) {
        if let Some(mood) = update.mood {
            self.mood = Some(mood);
        }
        if let Some(energy) = update.energy {
            self.energy = Some(energy);
        }
        if let Some(sleep) = update.sleep_hours {
            self.sleep_hours = sleep;
        }
        if let Some(note) = update.other_workout_note {
            self.other_workout_note = note;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }

    /// Records `log` as today's completed workout.
    pub fn complete_workout(&mut self, log: WorkoutLog) {
        self.completed_workout = Some(CompletedWorkout {
            day: log.day.clone(),
            duration: log.duration.clone(),
            completed_at: Some(log.completed_at),
        });
        self.workout_log = Some(log);
    }
}

impl fmt::Display for DailyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.date)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "Protein: {}g", self.protein_total)?;
        writeln!(f, "Water:   {}oz", self.water_total)?;

        match &self.completed_workout {
            Some(workout) => writeln!(f, "Workout: {} ({})", workout.day, workout.duration)?,
            None => writeln!(f, "Workout: -")?,
        }

        if let Some(mood) = &self.mood {
            writeln!(f, "Mood:    {}", mood)?;
        }
        if let Some(energy) = &self.energy {
            writeln!(f, "Energy:  {}", energy)?;
        }
        if !self.sleep_hours.is_empty() {
            writeln!(f, "Sleep:   {}h", self.sleep_hours)?;
        }
        if !self.other_workout_note.is_empty() {
            writeln!(f, "Other:   {}", self.other_workout_note)?;
        }
        if !self.notes.is_empty() {
            writeln!(f, "\nNotes: {}", self.notes)?;
        }
        if self.checked_in {
            writeln!(f, "\nChecked in")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseLog;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = DailyRecord::new(date());
        assert_eq!(record.date, date());
        assert_eq!(record.protein_total, 0);
        assert_eq!(record.water_total, 0);
        assert!(!record.checked_in);
        assert!(!record.has_data());
    }

    #[test]
    fn test_add_protein_accumulates() {
        let mut record = DailyRecord::new(date());
        record.add_protein(25);
        assert_eq!(record.add_protein(10), 35);
        assert!(record.has_data());
    }

    #[test]
    fn test_add_water_saturates() {
        let mut record = DailyRecord::new(date());
        record.add_water(u32::MAX - 1);
        assert_eq!(record.add_water(8), u32::MAX);
    }

    #[test]
    fn test_check_in_fields_alone_are_not_data() {
        let mut record = DailyRecord::new(date());
        record.apply_check_in(CheckInUpdate::new().with_notes("tired"));
        assert!(!record.has_data());

        record.check_in();
        assert!(record.has_data());
    }

    #[test]
    fn test_apply_check_in_merges_fields() {
        let mut record = DailyRecord::new(date());
        record.apply_check_in(
            CheckInUpdate::new()
                .with_mood(Mood::new(4).unwrap())
                .with_sleep_hours("7.5"),
        );
        record.apply_check_in(CheckInUpdate::new().with_energy(EnergyLevel::High));

        assert_eq!(record.mood, Some(Mood::new(4).unwrap()));
        assert_eq!(record.energy, Some(EnergyLevel::High));
        assert_eq!(record.sleep_hours, "7.5");
        assert_eq!(record.notes, "");
    }

    #[test]
    fn test_complete_workout_sets_summary_and_log() {
        let mut record = DailyRecord::new(date());
        let completed_at = Utc.with_ymd_and_hms(2025, 1, 1, 18, 30, 0).unwrap();
        record.complete_workout(WorkoutLog {
            day: "Day 2".to_string(),
            duration: "55 min".to_string(),
            elapsed_seconds: 3000,
            exercises: vec![ExerciseLog::new("d2-4", "Bench Press", Some(40.0))],
            completed_at,
        });

        let summary = record.completed_workout.as_ref().unwrap();
        assert_eq!(summary.day, "Day 2");
        assert_eq!(summary.completed_at, Some(completed_at));
        assert_eq!(record.workout_log.as_ref().unwrap().completed_at, completed_at);
        assert!(record.has_data());
    }

    #[test]
    fn test_legacy_record_without_check_in_fields() {
        let json = r#"{"date":"2025-01-01","proteinTotal":40,"waterTotal":16,"completedWorkout":{"day":"Day 1","duration":"50 min"},"checkedIn":true}"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.protein_total, 40);
        assert_eq!(record.completed_workout.unwrap().completed_at, None);
        assert!(record.mood.is_none());
        assert!(record.workout_log.is_none());
    }

    #[test]
    fn test_daily_record_json_roundtrip() {
        let mut record = DailyRecord::new(date());
        record.add_protein(60);
        record.apply_check_in(
            CheckInUpdate::new()
                .with_mood(Mood::new(2).unwrap())
                .with_energy(EnergyLevel::Low)
                .with_other_workout_note("yoga"),
        );

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"proteinTotal\":60"));
        assert!(json.contains("\"date\":\"2025-01-01\""));

        let parsed: DailyRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_daily_record_display() {
        let mut record = DailyRecord::new(date());
        record.add_water(32);
        record.apply_check_in(CheckInUpdate::new().with_notes("Felt strong"));

        let output = format!("{}", record);
        assert!(output.contains("2025-01-01"));
        assert!(output.contains("32oz"));
        assert!(output.contains("Felt strong"));
    }
}
