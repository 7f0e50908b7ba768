//! The tracker owns all persisted state and is the only way to change it.
//!
//! Every mutating operation first brings the daily record up to the current
//! date, then writes through to the store. In-memory state is only updated
//! after the matching write succeeded, so it never runs ahead of disk.
//! Operations that write several keys are safe to retry after a failure, and
//! `open` repairs the one gap a partial weight edit can leave.

use thiserror::Error;

use crate::catalog::{Catalog, Workout};
use crate::clock::{Clock, SystemClock};
use crate::models::{
    assemble_history, CheckInUpdate, DailyRecord, History, WorkoutLog, WorkoutLogArchive,
};
use crate::rollover::{roll_over, RolloverOutcome};
use crate::session::{ActiveSession, WeightInputs};
use crate::store::{DurableStore, StoreError, StoreKey};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("No workout at position {}", .0 + 1)]
    UnknownWorkout(usize),

    #[error("Workout '{0}' is no longer in the catalog")]
    MissingWorkout(String),

    #[error("A workout is already in progress ({0})")]
    SessionActive(String),

    #[error("No workout is in progress")]
    NoActiveSession,

    #[error("Workout '{day}' has no exercise '{exercise_id}'")]
    UnknownExercise { day: String, exercise_id: String },

    #[error("No workout has been completed today")]
    NoCompletedWorkout,
}

/// Where today's catalog workout stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutState<'a> {
    Idle,
    Active(&'a ActiveSession),
    Completed(&'a WorkoutLog),
}

/// Result of saving edited weights.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEdit {
    pub log: WorkoutLog,
    /// Exercise ids whose new text was not a valid weight and was ignored.
    pub rejected: Vec<String>,
}

pub struct Tracker<C: Clock = SystemClock> {
    store: DurableStore,
    clock: C,
    catalog: Catalog,
    daily: DailyRecord,
    history: History,
    archive: WorkoutLogArchive,
    session: Option<ActiveSession>,
}

impl<C: Clock> Tracker<C> {
    /// Loads all state from `store` and runs the rollover check.
    pub fn open(mut store: DurableStore, catalog: Catalog, clock: C) -> Result<Self, TrackerError> {
        let daily = store.get(StoreKey::DailyData, DailyRecord::new(clock.today()));
        let history: History = store.get_or_default(StoreKey::History);
        let archive: WorkoutLogArchive = store.get_or_default(StoreKey::WorkoutLogs);
        let session: Option<ActiveSession> = store.get_or_default(StoreKey::ActiveSession);

        tracing::debug!(
            date = %daily.date,
            history = history.len(),
            workout_logs = archive.len(),
            active_session = session.is_some(),
            "opened tracker"
        );

        let mut tracker = Self {
            store,
            clock,
            catalog,
            daily,
            history,
            archive,
            session,
        };
        tracker.ensure_current_day()?;
        tracker.reconcile_archive()?;
        Ok(tracker)
    }

    /// Copies the weights of today's logged workout into its archive entry
    /// when an interrupted edit left them apart.
    fn reconcile_archive(&mut self) -> Result<(), TrackerError> {
        let Some(log) = &self.daily.workout_log else {
            return Ok(());
        };
        let stale = self
            .archive
            .get(log.completed_at)
            .is_some_and(|archived| archived.exercises != log.exercises);
        if !stale {
            return Ok(());
        }

        let mut archive = self.archive.clone();
        archive.update_exercises(log.completed_at, log.exercises.clone());
        self.store.set(StoreKey::WorkoutLogs, &archive)?;
        self.archive = archive;
        tracing::info!(completed_at = %log.completed_at, "repaired archived workout weights");
        Ok(())
    }

    /// Rolls the daily record over if the calendar date has changed since it
    /// was created. Hosts that stay open across midnight should call this on
    /// resume; mutating operations call it themselves.
    pub fn ensure_current_day(&mut self) -> Result<RolloverOutcome, TrackerError> {
        let today = self.clock.today();
        if self.daily.date == today {
            return Ok(RolloverOutcome::Current);
        }

        let mut daily = self.daily.clone();
        let mut history = self.history.clone();
        let outcome = roll_over(&mut daily, &mut history, today);

        if let RolloverOutcome::Archived { .. } = outcome {
            self.store.set(StoreKey::History, &history)?;
            self.history = history;
        }
        self.store.set(StoreKey::DailyData, &daily)?;
        self.daily = daily;

        Ok(outcome)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Today's record as of the last rollover check.
    pub fn daily(&self) -> &DailyRecord {
        &self.daily
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn archive(&self) -> &WorkoutLogArchive {
        &self.archive
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    /// Catalog workout of the active session.
    pub fn session_workout(&self) -> Option<&Workout> {
        self.session
            .as_ref()
            .and_then(|s| resolve_workout(&self.catalog, s.day_index, &s.day).ok())
    }

    pub fn workout_state(&self) -> WorkoutState<'_> {
        match (&self.session, &self.daily.workout_log) {
            (Some(session), _) => WorkoutState::Active(session),
            (None, Some(log)) => WorkoutState::Completed(log),
            (None, None) => WorkoutState::Idle,
        }
    }

    /// Archived days plus today, newest first.
    pub fn history_view(&self) -> Vec<DailyRecord> {
        assemble_history(&self.history, &self.daily)
    }

    pub fn add_protein(&mut self, grams: u32) -> Result<u32, TrackerError> {
        if grams == 0 {
            return Err(TrackerError::InvalidAmount);
        }
        let total = self.update_daily(|daily| daily.add_protein(grams))?;
        tracing::debug!(grams, total, "added protein");
        Ok(total)
    }

    pub fn add_water(&mut self, ounces: u32) -> Result<u32, TrackerError> {
        if ounces == 0 {
            return Err(TrackerError::InvalidAmount);
        }
        let total = self.update_daily(|daily| daily.add_water(ounces))?;
        tracing::debug!(ounces, total, "added water");
        Ok(total)
    }

    pub fn check_in(&mut self) -> Result<(), TrackerError> {
        self.update_daily(DailyRecord::check_in)
    }

    pub fn update_check_in(&mut self, update: CheckInUpdate) -> Result<(), TrackerError> {
        self.update_daily(|daily| daily.apply_check_in(update))
    }

    /// Starts the workout at catalog position `index`.
    ///
    /// If today's logged workout is the same day, its weights are pre-filled.
    pub fn start_workout(&mut self, index: usize) -> Result<&ActiveSession, TrackerError> {
        self.ensure_current_day()?;
        if let Some(session) = &self.session {
            return Err(TrackerError::SessionActive(session.day.clone()));
        }

        let workout = self
            .catalog
            .get(index)
            .ok_or(TrackerError::UnknownWorkout(index))?;
        let weights = match &self.daily.workout_log {
            Some(log) if log.day == workout.day => WeightInputs::from_log(log),
            _ => WeightInputs::new(),
        };

        let session = ActiveSession::start(index, workout, self.clock.now(), weights);
        self.store.set(StoreKey::ActiveSession, &session)?;
        tracing::info!(day = %session.day, "started workout");

        Ok(&*self.session.insert(session))
    }

    /// Advances the active session's timer by one second. Ticks are kept in
    /// memory; [`end_workout`](Self::end_workout) persists the final count.
    pub fn tick_workout(&mut self) -> Result<u64, TrackerError> {
        let session = self.session.as_mut().ok_or(TrackerError::NoActiveSession)?;
        Ok(session.tick())
    }

    /// Sets the weight text for one exercise of the active session.
    ///
    /// Returns `Ok(false)` if the text is not a valid weight; the previous
    /// entry is kept.
    pub fn set_workout_weight(&mut self, exercise_id: &str, text: &str) -> Result<bool, TrackerError> {
        let session = self.session.as_mut().ok_or(TrackerError::NoActiveSession)?;
        let workout = resolve_workout(&self.catalog, session.day_index, &session.day)?;
        if workout.find_exercise(exercise_id).is_none() {
            return Err(TrackerError::UnknownExercise {
                day: workout.day.clone(),
                exercise_id: exercise_id.to_string(),
            });
        }

        let mut weights = session.weights.clone();
        if !weights.set(exercise_id, text) {
            return Ok(false);
        }

        let updated = ActiveSession {
            weights,
            ..session.clone()
        };
        self.store.set(StoreKey::ActiveSession, &updated)?;
        *session = updated;
        Ok(true)
    }

    /// Ends the active session, logging it as today's workout and appending
    /// it to the archive.
    ///
    /// The archive is written first. If a later write fails the session stays
    /// active, and ending it again replaces the archived entry instead of
    /// adding a second one.
    pub fn end_workout(&mut self) -> Result<WorkoutLog, TrackerError> {
        self.ensure_current_day()?;
        let mut session = self.session.clone().ok_or(TrackerError::NoActiveSession)?;
        let workout = resolve_workout(&self.catalog, session.day_index, &session.day)?;

        let now = self.clock.now();
        session.sync_elapsed(now);
        let log = session.finish(workout, now);

        let mut archive = self.archive.clone();
        archive.record_session(log.clone(), session.started_at);
        self.store.set(StoreKey::WorkoutLogs, &archive)?;
        self.archive = archive;

        let mut daily = self.daily.clone();
        daily.complete_workout(log.clone());
        self.store.set(StoreKey::DailyData, &daily)?;
        self.daily = daily;

        self.store.remove(StoreKey::ActiveSession)?;
        self.session = None;

        tracing::info!(
            day = %log.day,
            elapsed_seconds = log.elapsed_seconds,
            "completed workout"
        );
        Ok(log)
    }

    /// Drops the active session without logging anything.
    pub fn cancel_workout(&mut self) -> Result<ActiveSession, TrackerError> {
        if self.session.is_none() {
            return Err(TrackerError::NoActiveSession);
        }
        self.store.remove(StoreKey::ActiveSession)?;
        self.session.take().ok_or(TrackerError::NoActiveSession)
    }

    /// Applies `(exercise_id, text)` edits to the weights of today's
    /// completed workout.
    ///
    /// The log keeps its `completed_at`; the matching archive entry is updated
    /// in place rather than appended. The daily record is written first; if
    /// the archive write then fails, the next `open` brings the archive in
    /// line.
    pub fn save_edited_weights(&mut self, edits: &[(String, String)]) -> Result<WeightEdit, TrackerError> {
        self.ensure_current_day()?;
        if let Some(session) = &self.session {
            return Err(TrackerError::SessionActive(session.day.clone()));
        }
        let log = self
            .daily
            .workout_log
            .as_ref()
            .ok_or(TrackerError::NoCompletedWorkout)?;

        let mut inputs = WeightInputs::from_log(log);
        let mut rejected = Vec::new();
        for (exercise_id, text) in edits {
            if !log.exercises.iter().any(|e| &e.exercise_id == exercise_id) {
                return Err(TrackerError::UnknownExercise {
                    day: log.day.clone(),
                    exercise_id: exercise_id.clone(),
                });
            }
            if !inputs.set(exercise_id.as_str(), text) {
                rejected.push(exercise_id.clone());
            }
        }

        let updated = WorkoutLog {
            exercises: inputs.reweigh(&log.exercises),
            ..log.clone()
        };

        let mut daily = self.daily.clone();
        daily.workout_log = Some(updated.clone());
        self.store.set(StoreKey::DailyData, &daily)?;
        self.daily = daily;

        let mut archive = self.archive.clone();
        if archive.update_exercises(updated.completed_at, updated.exercises.clone()) {
            self.store.set(StoreKey::WorkoutLogs, &archive)?;
            self.archive = archive;
        } else {
            tracing::warn!(
                completed_at = %updated.completed_at,
                "today's workout is missing from the archive"
            );
        }

        Ok(WeightEdit {
            log: updated,
            rejected,
        })
    }

    /// The most recent other session of `day`, ignoring today's own log.
    pub fn last_session(&self, day: &str) -> Option<&WorkoutLog> {
        self.archive.last_for_day(day, self.todays_completed_at())
    }

    /// Weight used for `exercise_id` in the most recent other session of
    /// `day`.
    pub fn last_weight(&self, day: &str, exercise_id: &str) -> Option<f64> {
        self.archive
            .last_weight(day, exercise_id, self.todays_completed_at())
    }

    fn todays_completed_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.daily.workout_log.as_ref().map(|l| l.completed_at)
    }

    fn update_daily<R>(&mut self, f: impl FnOnce(&mut DailyRecord) -> R) -> Result<R, TrackerError> {
        self.ensure_current_day()?;
        let mut daily = self.daily.clone();
        let result = f(&mut daily);
        self.store.set(StoreKey::DailyData, &daily)?;
        self.daily = daily;
        Ok(result)
    }
}

/// Finds the session's workout by position, falling back to its day id if the
/// catalog was reordered.
fn resolve_workout<'a>(catalog: &'a Catalog, index: usize, day: &str) -> Result<&'a Workout, TrackerError> {
    match catalog.get(index) {
        Some(workout) if workout.day == day => Ok(workout),
        _ => catalog
            .by_day(day)
            .map(|(_, workout)| workout)
            .ok_or_else(|| TrackerError::MissingWorkout(day.to_string())),
    }
}
