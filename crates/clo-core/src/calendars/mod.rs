//! Business day calendars.

mod bitmap;
mod uk;

pub use uk::UKCalendar;

use chrono::Datelike;

use crate::types::Date;

/// A calendar that can classify dates as business days or not, and roll
/// dates forward/backward across non-business days.
pub trait Calendar: Send + Sync {
    /// Calendar name.
    fn name(&self) -> &'static str;

    /// Whether `date` is a business day under this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Whether `date` is not a business day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Advances `date` by `n` business days (negative `n` moves backward).
    fn add_business_days(&self, date: Date, n: i64) -> Date {
        let mut result = date;
        let mut remaining = n.abs();
        let direction: i64 = if n >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }
}

/// A calendar with no holidays, only weekends. Useful for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !matches!(
            date.as_naive_date().weekday(),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        )
    }
}

/// Advances `start` by `days` UK business days (skipping weekends and bank holidays).
pub fn add_uk_business_days(start: Date, days: i64) -> Date {
    UKCalendar::global().add_business_days(start, days)
}

/// Moves `start` back by `days` UK business days.
pub fn sub_uk_business_days(start: Date, days: i64) -> Date {
    UKCalendar::global().add_business_days(start, -days)
}
