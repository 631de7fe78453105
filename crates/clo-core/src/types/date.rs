//! Civil calendar date newtype.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A civil calendar date with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

/// Sentinel date used by the asset model to mark "no further maturity action".
pub fn far_future() -> Date {
    Date(NaiveDate::from_ymd_opt(9999, 12, 31).expect("9999-12-31 is always a valid date"))
}

impl Date {
    /// Builds a `Date` from a year/month/day triple.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| {
                CoreError::invalid_date(format!("{year:04}-{month:02}-{day:02} is not a valid date"))
            })
    }

    /// Wraps an existing `NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// The underlying `chrono` date.
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The last valid day of this date's month.
    pub fn days_in_month(&self) -> u32 {
        let (y, m) = (self.year(), self.month());
        let next_month_first = if m == 12 {
            NaiveDate::from_ymd_opt(y + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(y, m + 1, 1)
        }
        .expect("adjacent month is always constructible");
        next_month_first.pred_opt().expect("day before 1st exists").day()
    }

    /// Returns the same year/month as `self.add_months(months)` with `day` clamped
    /// to the target month's last valid day if it would otherwise overflow.
    pub fn safe_set_day(&self, day: u32) -> Self {
        let max_day = self.days_in_month();
        let clamped = day.clamp(1, max_day);
        Date(
            NaiveDate::from_ymd_opt(self.year(), self.month(), clamped)
                .expect("clamped day is always valid for this year/month"),
        )
    }

    /// Adds a number of whole months, clamping the day-of-month via [`Date::safe_set_day`].
    pub fn add_months(&self, months: i32) -> Self {
        let total_months = self.year() as i64 * 12 + (self.month() as i64 - 1) + months as i64;
        let year = (total_months.div_euclid(12)) as i32;
        let month = (total_months.rem_euclid(12)) as u32 + 1;
        let probe = Date(
            NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid"),
        );
        probe.safe_set_day(self.day())
    }

    /// Adds a number of whole years.
    pub fn add_years(&self, years: i32) -> Self {
        self.add_months(years * 12)
    }

    /// Adds a number of calendar days.
    pub fn add_days(&self, days: i64) -> Self {
        Date(
            self.0
                .checked_add_signed(chrono::Duration::days(days))
                .expect("date arithmetic within supported range"),
        )
    }

    /// Number of calendar days between two dates (`other - self`).
    pub fn days_between(&self, other: Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// `chrono` weekday.
    pub fn weekday(&self) -> chrono::Weekday {
        self.0.weekday()
    }

    /// True if Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

impl From<Date> for NaiveDate {
    fn from(d: Date) -> Self {
        d.0
    }
}

impl Add<i64> for Date {
    type Output = Date;

    fn add(self, days: i64) -> Date {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Date;

    fn sub(self, days: i64) -> Date {
        self.add_days(-days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_set_day_clamps_to_month_end() {
        let d = Date::from_ymd(2024, 1, 31).unwrap();
        let feb = d.add_months(1);
        assert_eq!(feb, Date::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn add_months_wraps_years() {
        let d = Date::from_ymd(2024, 11, 15).unwrap();
        assert_eq!(d.add_months(3), Date::from_ymd(2025, 2, 15).unwrap());
    }

    #[test]
    fn days_between_is_directional() {
        let a = Date::from_ymd(2024, 1, 1).unwrap();
        let b = Date::from_ymd(2024, 1, 11).unwrap();
        assert_eq!(a.days_between(b), 10);
        assert_eq!(b.days_between(a), -10);
    }

    #[test]
    fn far_future_sentinel_is_valid() {
        assert_eq!(far_future().year(), 9999);
    }
}
