use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::daily::DailyRecord;

/// Archived daily records, unique by date, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct History {
    days: Vec<DailyRecord>,
}

impl From<Vec<DailyRecord>> for History {
    fn from(days: Vec<DailyRecord>) -> Self {
        let mut history = Self::new();
        for record in days {
            history.upsert(record);
        }
        history
    }
}

impl<'de> Deserialize<'de> for History {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DailyRecord>::deserialize(deserializer).map(Self::from)
    }
}

impl History {
    pub const CAPACITY: usize = 30;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DailyRecord> {
        self.days.iter()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Replaces the entry with the same date, or appends and evicts the
    /// oldest entries beyond capacity.
    ///
    /// Only rollover archives days.
    pub(crate) fn upsert(&mut self, record: DailyRecord) {
        if let Some(existing) = self.days.iter_mut().find(|d| d.date == record.date) {
            *existing = record;
            return;
        }

        self.days.push(record);
        if self.days.len() > Self::CAPACITY {
            let excess = self.days.len() - Self::CAPACITY;
            self.days.drain(..excess);
        }
    }
}

/// Builds the history listing: archived days plus the live record when it
/// has data, newest first. An archived entry for the live date is replaced by
/// the live record.
pub fn assemble_history(history: &History, live: &DailyRecord) -> Vec<DailyRecord> {
    let mut days: Vec<DailyRecord> = history
        .iter()
        .filter(|d| d.date != live.date)
        .cloned()
        .collect();

    if live.has_data() {
        days.push(live.clone());
    }

    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

/// Human label for a history row: "Today", "Yesterday" or e.g. "Mon, Jan 6".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.checked_sub_days(Days::new(1)) == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Days::new(n as u64)
    }

    fn record(n: u32, protein: u32) -> DailyRecord {
        let mut record = DailyRecord::new(day(n));
        record.add_protein(protein);
        record
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let mut history = History::new();
        history.upsert(record(0, 10));
        history.upsert(record(0, 50));

        assert_eq!(history.len(), 1);
        assert_eq!(history.get(day(0)).unwrap().protein_total, 50);
    }

    #[test]
    fn test_upsert_evicts_oldest_beyond_capacity() {
        let mut history = History::new();
        for n in 0..=History::CAPACITY as u32 {
            history.upsert(record(n, 1));
        }

        assert_eq!(history.len(), History::CAPACITY);
        assert!(history.get(day(0)).is_none());
        assert!(history.get(day(1)).is_some());
        assert!(history.get(day(30)).is_some());
    }

    #[test]
    fn test_eviction_follows_insertion_order_not_date() {
        let mut history = History::new();
        history.upsert(record(100, 1));
        for n in 0..History::CAPACITY as u32 {
            history.upsert(record(n, 1));
        }

        assert!(history.get(day(100)).is_none());
        assert_eq!(history.len(), History::CAPACITY);
    }

    #[test]
    fn test_assemble_includes_live_record_with_data() {
        let mut history = History::new();
        history.upsert(record(0, 10));
        history.upsert(record(2, 30));
        let live = record(1, 20);

        let days = assemble_history(&history, &live);
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day(2), day(1), day(0)]);
    }

    #[test]
    fn test_assemble_skips_empty_live_record() {
        let mut history = History::new();
        history.upsert(record(0, 10));

        let days = assemble_history(&history, &DailyRecord::new(day(1)));
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_assemble_live_record_shadows_archived_same_date() {
        let mut history = History::new();
        history.upsert(record(1, 10));

        let days = assemble_history(&history, &record(1, 99));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].protein_total, 99);

        let days = assemble_history(&history, &DailyRecord::new(day(1)));
        assert!(days.is_empty());
    }

    #[test]
    fn test_day_label() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        assert_eq!(day_label(today, today), "Today");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(), today),
            "Yesterday"
        );
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), today),
            "Mon, Jan 6"
        );
    }

    #[test]
    fn test_loading_caps_and_dedups() {
        let mut days: Vec<DailyRecord> = (0..35).map(|n| record(n, 1)).collect();
        days.push(record(34, 80));
        let json = serde_json::to_string(&days).unwrap();

        let history: History = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), History::CAPACITY);
        assert!(history.get(day(4)).is_none());
        assert!(history.get(day(5)).is_some());
        assert_eq!(history.get(day(34)).unwrap().protein_total, 80);
    }

    #[test]
    fn test_history_json_roundtrip() {
        let mut history = History::new();
        history.upsert(record(0, 10));
        history.upsert(record(1, 20));

        let json = serde_json::to_string(&history).unwrap();
        let parsed: History = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, history);
    }
}
