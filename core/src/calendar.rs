//! Simulation calendar: generation windows and inclusive date ranges.

use crate::{
    error::{DashError, DashResult},
    types::DayCount,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// The span of days a dataset is generated for. Also the cache key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SimWindow {
    pub start: NaiveDate,
    pub days:  DayCount,
}

impl SimWindow {
    pub fn new(start: NaiveDate, days: DayCount) -> Self {
        Self { start, days }
    }

    /// Date of the `index`-th simulated day (day 0 is `start`).
    /// None past the end of the calendar.
    pub fn date_at(&self, index: DayCount) -> Option<NaiveDate> {
        self.start.checked_add_signed(Duration::days(i64::from(index)))
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.checked_sub(1).and_then(|i| self.date_at(i))
    }

    /// Stops early if the window runs past the end of the calendar.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.days).map_while(move |i| self.date_at(i))
    }
}

/// Inclusive calendar range. An inverted range (end before start) is empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Days covered, counting both ends. Zero or negative when inverted.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// A range containing no dates.
    pub fn empty() -> Self {
        Self {
            start: NaiveDate::MAX,
            end:   NaiveDate::MIN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The range of equal length ending the day before `start`.
    /// Empty for an empty range; truncated at the start of the calendar.
    pub fn preceding(&self) -> DateRange {
        let len = self.len_days();
        if len <= 0 {
            return DateRange::empty();
        }
        let Some(end) = self.start.pred_opt() else {
            return DateRange::empty();
        };
        let start = self
            .start
            .checked_sub_signed(Duration::days(len))
            .unwrap_or(NaiveDate::MIN);
        DateRange { start, end }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> DashResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|source| {
        DashError::InvalidDate {
            input: input.to_string(),
            source,
        }
    })
}
