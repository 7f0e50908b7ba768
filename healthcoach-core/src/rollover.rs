//! Daily rollover: archive yesterday, start today.

use chrono::NaiveDate;

use crate::models::{DailyRecord, History};

/// What a rollover check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The record was already dated today.
    Current,
    /// The stale record had data and was archived before the reset.
    Archived { previous: NaiveDate },
    /// The stale record was empty and was discarded.
    Reset { previous: NaiveDate },
}

impl RolloverOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, RolloverOutcome::Current)
    }
}

/// Brings `record` up to `today`.
///
/// A stale record with data is upserted into `history`; either way it is
/// replaced by a fresh record dated `today`. Calling this again for the same
/// `today` is a no-op.
pub fn roll_over(record: &mut DailyRecord, history: &mut History, today: NaiveDate) -> RolloverOutcome {
    if record.date == today {
        return RolloverOutcome::Current;
    }

    let stale = std::mem::replace(record, DailyRecord::new(today));
    let previous = stale.date;

    if stale.has_data() {
        history.upsert(stale);
        tracing::info!(%previous, %today, "archived previous day");
        RolloverOutcome::Archived { previous }
    } else {
        tracing::debug!(%previous, %today, "discarded empty previous day");
        RolloverOutcome::Reset { previous }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn d2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_current_record_is_untouched() {
        let mut record = DailyRecord::new(d1());
        record.add_water(8);
        let mut history = History::new();

        let outcome = roll_over(&mut record, &mut history, d1());

        assert_eq!(outcome, RolloverOutcome::Current);
        assert!(!outcome.changed());
        assert_eq!(record.water_total, 8);
        assert!(history.is_empty());
    }

    #[test]
    fn test_stale_record_with_data_is_archived() {
        let mut record = DailyRecord::new(d1());
        record.add_protein(40);
        let mut history = History::new();

        let outcome = roll_over(&mut record, &mut history, d2());

        assert_eq!(outcome, RolloverOutcome::Archived { previous: d1() });
        assert_eq!(history.get(d1()).unwrap().protein_total, 40);
        assert_eq!(record, DailyRecord::new(d2()));
    }

    #[test]
    fn test_empty_stale_record_is_not_archived() {
        let mut record = DailyRecord::new(d1());
        let mut history = History::new();

        let outcome = roll_over(&mut record, &mut history, d2());

        assert_eq!(outcome, RolloverOutcome::Reset { previous: d1() });
        assert!(history.get(d1()).is_none());
        assert_eq!(record.date, d2());
    }

    #[test]
    fn test_checked_in_only_record_is_archived() {
        let mut record = DailyRecord::new(d1());
        record.check_in();
        let mut history = History::new();

        roll_over(&mut record, &mut history, d2());

        assert!(history.get(d1()).unwrap().checked_in);
    }

    #[test]
    fn test_rollover_is_idempotent() {
        let mut record = DailyRecord::new(d1());
        record.add_protein(40);
        let mut history = History::new();

        roll_over(&mut record, &mut history, d2());
        let record_after_first = record.clone();
        let history_after_first = history.clone();

        let outcome = roll_over(&mut record, &mut history, d2());

        assert_eq!(outcome, RolloverOutcome::Current);
        assert_eq!(record, record_after_first);
        assert_eq!(history, history_after_first);
    }

    #[test]
    fn test_rollover_replaces_existing_history_entry() {
        let mut history = History::new();
        let mut first = DailyRecord::new(d1());
        first.add_protein(10);
        roll_over(&mut first, &mut history, d2());

        let mut again = DailyRecord::new(d1());
        again.add_protein(70);
        roll_over(&mut again, &mut history, d2());

        assert_eq!(history.len(), 1);
        assert_eq!(history.get(d1()).unwrap().protein_total, 70);
    }

    #[test]
    fn test_clock_moving_backwards_still_resets() {
        let mut record = DailyRecord::new(d2());
        record.add_water(16);
        let mut history = History::new();

        let outcome = roll_over(&mut record, &mut history, d1());

        assert_eq!(outcome, RolloverOutcome::Archived { previous: d2() });
        assert_eq!(record.date, d1());
    }
}
