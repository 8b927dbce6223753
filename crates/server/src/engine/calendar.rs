//! Business-day arithmetic over the judicial holiday calendar.
//!
//! All deadline math runs through this module. The holiday set is built
//! from `holiday_calendar` rows with `considera_para_slas = true`; an
//! empty set degrades silently to weekend-only arithmetic.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

use shared_types::HolidayCalendarEntry;

/// Check if a date is a weekend.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Holiday-aware business-day calendar. Pure value type; rebuild it when
/// the holiday table is refreshed.
#[derive(Debug, Clone, Default)]
pub struct BusinessCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// Build from holiday table rows. Entries with
    /// `considera_para_slas = false` are commemorative only and do not
    /// affect deadline arithmetic.
    pub fn new(entries: &[HolidayCalendarEntry]) -> Self {
        Self {
            holidays: entries
                .iter()
                .filter(|e| e.considera_para_slas)
                .map(|e| e.date)
                .collect(),
        }
    }

    /// Calendar with no holidays (weekends only).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.holidays.contains(&date)
    }

    /// Find the next business day at or after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_business_day(current) {
            current = current.succ_opt().unwrap_or(current);
        }
        current
    }

    /// The nth business day after `start` (n ≥ 0). n = 0 returns `start`
    /// itself when it is a business day, otherwise the next business day,
    /// so a due date always lands on a working day.
    pub fn add_business_days(&self, start: NaiveDate, n: i64) -> NaiveDate {
        if n <= 0 {
            return self.next_business_day(start);
        }
        let mut current = start;
        let mut counted = 0i64;
        while counted < n {
            current = current.succ_opt().unwrap_or(current);
            if self.is_business_day(current) {
                counted += 1;
            }
        }
        current
    }

    /// Signed count of business days between two dates: the number of
    /// business days d with `from < d <= to`, negated when `to < from`.
    pub fn business_days_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        if to < from {
            return -self.business_days_between(to, from);
        }
        let mut current = from;
        let mut count = 0i64;
        while current < to {
            current = current.succ_opt().unwrap_or(current);
            if self.is_business_day(current) {
                count += 1;
            }
        }
        count
    }
}
