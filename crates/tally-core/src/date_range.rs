//! Inclusive calendar-day range used by period queries and balances.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn is_single_day(&self) -> bool {
        self.day_count() == 1
    }

    /// Number of days in the range, inclusive of both ends.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_day_range() {
        let r = DateRange::single_day(d(2026, 3, 14));
        assert!(r.is_single_day());
        assert_eq!(r.day_count(), 1);
        assert!(r.contains(d(2026, 3, 14)));
        assert!(!r.contains(d(2026, 3, 15)));
    }

    #[test]
    fn multi_day_range() {
        let r = DateRange::new(d(2026, 1, 1), d(2026, 1, 31));
        assert_eq!(r.day_count(), 31);
        assert!(!r.is_single_day());
        assert!(r.contains(d(2026, 1, 15)));
        assert!(!r.contains(d(2026, 2, 1)));
    }
}
