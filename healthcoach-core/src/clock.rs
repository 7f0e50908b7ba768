//! Time source for the tracker.
//!
//! Rollover and workout timestamps read the clock through this trait so that
//! tests can pin the calendar date.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, Utc};
use std::cell::Cell;

/// Provides the current instant and the local calendar date.
pub trait Clock {
    /// Current instant, used for `completedAt` and session start stamps.
    fn now(&self) -> DateTime<Utc>;

    /// Current local calendar date, used for rollover.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A manually driven clock with a fixed UTC offset.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Creates a clock pinned to `now`, reporting dates in UTC.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
            offset: Utc.fix(),
        }
    }

    /// Creates a clock at noon UTC on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(noon_utc(date))
    }

    /// Reports calendar dates in the given offset instead of UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    /// Moves the clock to noon on `date`, keeping the offset.
    pub fn set_date(&self, date: NaiveDate) {
        self.set(noon_utc(date));
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::default()) + Duration::hours(12)).and_utc()
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().with_timezone(&self.offset).date_naive()
    }
}
