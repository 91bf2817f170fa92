//! Calendar window helpers.

use chrono::{Datelike, Duration, NaiveDate};

/// The Monday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday on or after `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// The Monday on or before the first day of the month containing `date`.
///
/// This is the top-left tile of a Monday-first month grid.
pub fn first_grid_monday(date: NaiveDate) -> NaiveDate {
    start_of_week(start_of_month(date))
}

/// Every date from `start` to `end`, both inclusive, ascending.
pub fn enumerate_days(start: NaiveDate, end: NaiveDate) -> Days {
    DateRange::new(start, end).days()
}

/// Closed interval `[start, end]` of calendar dates.
///
/// An interval whose `end` precedes `start` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Monday..=Sunday of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        Self::new(start_of_week(date), end_of_week(date))
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Restartable ascending iterator over the dates of this range.
    pub fn days(&self) -> Days {
        Days {
            next: (!self.is_empty()).then_some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.days()
    }
}

/// Lazy ascending walk over a `DateRange`.
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|next| *next <= self.end);
        Some(current)
    }
}
