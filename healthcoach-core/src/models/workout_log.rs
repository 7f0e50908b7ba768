use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Weight recorded for one exercise of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight: Option<f64>,
}

impl ExerciseLog {
    pub fn new(
        exercise_id: impl Into<String>,
        exercise_name: impl Into<String>,
        weight: Option<f64>,
    ) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            exercise_name: exercise_name.into(),
            weight,
        }
    }
}

/// One completed training session. `completed_at` identifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub day: String,
    pub duration: String,
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    pub completed_at: DateTime<Utc>,
}

impl WorkoutLog {
    /// Weight logged for `exercise_id`, if the exercise was logged with one.
    pub fn weight_for(&self, exercise_id: &str) -> Option<f64> {
        self.exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .and_then(|e| e.weight)
    }

    /// Number of exercises that have a weight.
    pub fn weighted_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.weight.is_some()).count()
    }
}

impl fmt::Display for WorkoutLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}) completed {}",
            self.day,
            crate::session::format_elapsed(self.elapsed_seconds),
            self.completed_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        for exercise in &self.exercises {
            match exercise.weight {
                Some(w) => writeln!(f, "  - {}: {}", exercise.exercise_name, w)?,
                None => writeln!(f, "  - {}: -", exercise.exercise_name)?,
            }
        }
        Ok(())
    }
}

/// Capped archive of completed sessions, oldest first.
///
/// Deserializing goes through [`From<Vec<WorkoutLog>>`], so a stored archive
/// is capped and deduplicated the same way appends are.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkoutLogArchive {
    logs: Vec<WorkoutLog>,
}

impl From<Vec<WorkoutLog>> for WorkoutLogArchive {
    /// Later entries win over earlier ones with the same `completed_at`.
    fn from(logs: Vec<WorkoutLog>) -> Self {
        let mut archive = Self::new();
        for log in logs {
            archive.logs.retain(|l| l.completed_at != log.completed_at);
            archive.append(log);
        }
        archive
    }
}

impl<'de> Deserialize<'de> for WorkoutLogArchive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<WorkoutLog>::deserialize(deserializer).map(Self::from)
    }
}

impl WorkoutLogArchive {
    pub const CAPACITY: usize = 90;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WorkoutLog> {
        self.logs.iter()
    }

    pub fn get(&self, completed_at: DateTime<Utc>) -> Option<&WorkoutLog> {
        self.logs.iter().find(|l| l.completed_at == completed_at)
    }

    /// Appends a log, evicting the oldest entries beyond capacity.
    pub(crate) fn append(&mut self, log: WorkoutLog) {
        self.logs.push(log);
        if self.logs.len() > Self::CAPACITY {
            let excess = self.logs.len() - Self::CAPACITY;
            self.logs.drain(..excess);
        }
    }

    /// Records the log of a session started at `started_at`.
    ///
    /// A log of the same day completed since `started_at` can only come from
    /// an earlier attempt to end this session, so it is replaced.
    pub(crate) fn record_session(&mut self, log: WorkoutLog, started_at: DateTime<Utc>) {
        let previous = self
            .logs
            .iter_mut()
            .rev()
            .find(|l| l.day == log.day && l.completed_at >= started_at);
        match previous {
            Some(previous) => *previous = log,
            None => self.append(log),
        }
    }

    /// Replaces the exercises of the entry completed at `completed_at`.
    ///
    /// Returns `false` if no such entry exists.
    pub(crate) fn update_exercises(
        &mut self,
        completed_at: DateTime<Utc>,
        exercises: Vec<ExerciseLog>,
    ) -> bool {
        match self.logs.iter_mut().find(|l| l.completed_at == completed_at) {
            Some(log) => {
                log.exercises = exercises;
                true
            }
            None => false,
        }
    }

    /// Most recent log for `day`, skipping the one completed at `exclude`.
    pub fn last_for_day(
        &self,
        day: &str,
        exclude: Option<DateTime<Utc>>,
    ) -> Option<&WorkoutLog> {
        self.logs
            .iter()
            .rev()
            .find(|l| l.day == day && Some(l.completed_at) != exclude)
    }

    /// Weight used for `exercise_id` in the most recent other `day` session.
    pub fn last_weight(
        &self,
        day: &str,
        exercise_id: &str,
        exclude: Option<DateTime<Utc>>,
    ) -> Option<f64> {
        self.last_for_day(day, exclude)
            .and_then(|log| log.weight_for(exercise_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn log(day: &str, completed_at: DateTime<Utc>, weight: Option<f64>) -> WorkoutLog {
        WorkoutLog {
            day: day.to_string(),
            duration: "50 min".to_string(),
            elapsed_seconds: 1800,
            exercises: vec![ExerciseLog::new("d1-4", "Goblet Squats", weight)],
            completed_at,
        }
    }

    #[test]
    fn test_weight_for() {
        let log = log("Day 1", at(0), Some(35.0));
        assert_eq!(log.weight_for("d1-4"), Some(35.0));
        assert_eq!(log.weight_for("d1-5"), None);
        assert_eq!(log.weighted_count(), 1);
    }

    #[test]
    fn test_archive_evicts_oldest_beyond_capacity() {
        let mut archive = WorkoutLogArchive::new();
        for i in 0..=WorkoutLogArchive::CAPACITY as i64 {
            archive.append(log("Day 1", at(i), None));
        }

        assert_eq!(archive.len(), WorkoutLogArchive::CAPACITY);
        assert!(archive.get(at(0)).is_none());
        assert!(archive.get(at(1)).is_some());
        assert_eq!(archive.iter().last().unwrap().completed_at, at(90));
    }

    #[test]
    fn test_update_exercises_in_place() {
        let mut archive = WorkoutLogArchive::new();
        archive.append(log("Day 1", at(0), Some(20.0)));

        let updated = archive.update_exercises(
            at(0),
            vec![ExerciseLog::new("d1-4", "Goblet Squats", Some(25.0))],
        );

        assert!(updated);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.get(at(0)).unwrap().weight_for("d1-4"), Some(25.0));
        assert!(!archive.update_exercises(at(5), Vec::new()));
    }

    #[test]
    fn test_record_session_replaces_earlier_attempt() {
        let mut archive = WorkoutLogArchive::new();
        archive.append(log("Day 1", at(0), Some(20.0)));

        archive.record_session(log("Day 1", at(40), Some(25.0)), at(10));
        archive.record_session(log("Day 1", at(45), Some(25.0)), at(10));
        assert_eq!(archive.len(), 2);
        assert!(archive.get(at(40)).is_none());
        assert_eq!(archive.get(at(45)).unwrap().weight_for("d1-4"), Some(25.0));

        archive.record_session(log("Day 2", at(50), None), at(10));
        assert_eq!(archive.len(), 3);
    }

    #[test]
    fn test_loading_caps_and_dedups() {
        let mut logs: Vec<WorkoutLog> = (0..95).map(|i| log("Day 1", at(i), None)).collect();
        logs.push(log("Day 1", at(94), Some(40.0)));
        let json = serde_json::to_string(&logs).unwrap();

        let archive: WorkoutLogArchive = serde_json::from_str(&json).unwrap();

        assert_eq!(archive.len(), WorkoutLogArchive::CAPACITY);
        assert!(archive.get(at(4)).is_none());
        assert!(archive.get(at(5)).is_some());
        let last = archive.iter().last().unwrap();
        assert_eq!(last.completed_at, at(94));
        assert_eq!(last.weight_for("d1-4"), Some(40.0));
    }

    #[test]
    fn test_last_weight_skips_excluded_and_other_days() {
        let mut archive = WorkoutLogArchive::new();
        archive.append(log("Day 1", at(0), Some(20.0)));
        archive.append(log("Day 2", at(10), Some(99.0)));
        archive.append(log("Day 1", at(20), Some(30.0)));

        assert_eq!(archive.last_weight("Day 1", "d1-4", None), Some(30.0));
        assert_eq!(archive.last_weight("Day 1", "d1-4", Some(at(20))), Some(20.0));
        assert_eq!(archive.last_weight("Day 3", "d1-4", None), None);
    }

    #[test]
    fn test_workout_log_json_uses_camel_case() {
        let log = log("Day 1", at(0), None);
        let json = serde_json::to_value(&log).unwrap();

        assert!(json.get("elapsedSeconds").is_some());
        assert!(json.get("completedAt").is_some());
        assert_eq!(json["exercises"][0]["exerciseId"], "d1-4");
        assert!(json["exercises"][0]["weight"].is_null());
    }

    #[test]
    fn test_archive_json_roundtrip() {
        let mut archive = WorkoutLogArchive::new();
        archive.append(log("Day 1", at(0), Some(12.5)));
        archive.append(log("Day 2", at(3), None));

        let json = serde_json::to_string(&archive).unwrap();
        assert!(json.starts_with('['));
        let parsed: WorkoutLogArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, archive);
    }
}
