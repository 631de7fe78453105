//! Bitmap-based holiday calendar for O(1) lookups.

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// Minimum year supported by the calendar.
pub const MIN_YEAR: i32 = 1970;
/// Maximum year supported by the calendar.
pub const MAX_YEAR: i32 = 2100;

const YEAR_COUNT: usize = (MAX_YEAR - MIN_YEAR + 1) as usize;
const MAX_DAYS_PER_YEAR: usize = 366;
const TOTAL_BITS: usize = YEAR_COUNT * MAX_DAYS_PER_YEAR;
const WORD_COUNT: usize = (TOTAL_BITS + 63) / 64;

/// Which weekdays count as weekend for a given market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekendType {
    /// Saturday and Sunday (most markets, including UK).
    #[default]
    SaturdaySunday,
}

impl WeekendType {
    /// Whether the given weekday is a weekend day under this convention.
    #[inline]
    pub fn is_weekend(&self, weekday: chrono::Weekday) -> bool {
        match self {
            WeekendType::SaturdaySunday => {
                matches!(weekday, chrono::Weekday::Sat | chrono::Weekday::Sun)
            }
        }
    }
}

/// Bitmap-backed holiday calendar supporting O(1) business-day lookups.
#[derive(Clone)]
pub struct HolidayBitmap {
    name: &'static str,
    bits: Box<[u64; WORD_COUNT]>,
    weekend: WeekendType,
}

impl std::fmt::Debug for HolidayBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayBitmap")
            .field("name", &self.name)
            .field("holiday_count", &self.count_holidays())
            .finish()
    }
}

impl HolidayBitmap {
    fn new(name: &'static str, weekend: WeekendType) -> Self {
        Self {
            name,
            bits: Box::new([0u64; WORD_COUNT]),
            weekend,
        }
    }

    fn from_holidays(name: &'static str, weekend: WeekendType, holidays: &HashSet<NaiveDate>) -> Self {
        let mut bitmap = Self::new(name, weekend);
        for &date in holidays {
            bitmap.add_holiday(date);
        }
        bitmap
    }

    fn add_holiday(&mut self, date: NaiveDate) {
        if let Some((word_idx, bit_idx)) = Self::date_to_indices(date) {
            self.bits[word_idx] |= 1u64 << bit_idx;
        }
    }

    /// Whether `date` is a holiday (weekends are not holidays; see [`Self::is_business_day`]).
    #[inline]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        match Self::date_to_indices(date) {
            Some((word_idx, bit_idx)) => (self.bits[word_idx] & (1u64 << bit_idx)) != 0,
            None => false,
        }
    }

    /// Whether `date` is neither a weekend day nor a holiday.
    #[inline]
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        if self.weekend.is_weekend(date.weekday()) {
            return false;
        }
        !self.is_holiday(date)
    }

    fn count_holidays(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    fn date_to_indices(date: NaiveDate) -> Option<(usize, usize)> {
        let year = date.year();
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        let year_offset = (year - MIN_YEAR) as usize;
        let day_of_year = date.ordinal0() as usize;
        let bit_position = year_offset * MAX_DAYS_PER_YEAR + day_of_year;
        Some((bit_position / 64, bit_position % 64))
    }
}

/// Builder assembling a [`HolidayBitmap`] from fixed, floating, and custom holiday rules.
pub struct HolidayCalendarBuilder {
    name: &'static str,
    weekend: WeekendType,
    holidays: HashSet<NaiveDate>,
    start_year: i32,
    end_year: i32,
}

impl HolidayCalendarBuilder {
    /// Starts a new builder with the given calendar name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            weekend: WeekendType::SaturdaySunday,
            holidays: HashSet::new(),
            start_year: MIN_YEAR,
            end_year: MAX_YEAR,
        }
    }

    /// Sets the weekend convention.
    pub fn weekend(mut self, weekend: WeekendType) -> Self {
        self.weekend = weekend;
        self
    }

    /// Restricts the year range over which generator functions are invoked.
    pub fn year_range(mut self, start: i32, end: i32) -> Self {
        self.start_year = start.max(MIN_YEAR);
        self.end_year = end.min(MAX_YEAR);
        self
    }

    /// Adds holidays produced by `generator(year)` for every year in range.
    pub fn add_custom_holidays<F>(mut self, generator: F) -> Self
    where
        F: Fn(i32) -> Vec<NaiveDate>,
    {
        for year in self.start_year..=self.end_year {
            self.holidays.extend(generator(year));
        }
        self
    }

    /// Adds a holiday at a fixed offset (in days) from Easter Sunday, every year.
    pub fn add_easter_holiday(mut self, offset_days: i64) -> Self {
        for year in self.start_year..=self.end_year {
            if let Some(easter) = easter_sunday(year) {
                if let Some(date) = easter.checked_add_signed(chrono::Duration::days(offset_days)) {
                    self.holidays.insert(date);
                }
            }
        }
        self
    }

    /// Adds the last occurrence of `weekday` in `month`, every year.
    pub fn add_last_weekday_holiday(mut self, month: u32, weekday: chrono::Weekday) -> Self {
        for year in self.start_year..=self.end_year {
            if let Some(date) = last_weekday_of_month(year, month, weekday) {
                self.holidays.insert(date);
            }
        }
        self
    }

    /// Builds the finished calendar.
    pub fn build(self) -> HolidayBitmap {
        HolidayBitmap::from_holidays(self.name, self.weekend, &self.holidays)
    }
}

/// The nth occurrence of `weekday` in `month`/`year` (1-indexed).
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: chrono::Weekday, n: u32) -> Option<NaiveDate> {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_weekday = first_of_month.weekday();
    let days_until = (weekday.num_days_from_monday() as i32 - first_weekday.num_days_from_monday() as i32)
        .rem_euclid(7) as u32;
    let day = 1 + days_until + (n - 1) * 7;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The last occurrence of `weekday` in `month`/`year`.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: chrono::Weekday) -> Option<NaiveDate> {
    let last_day = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?.pred_opt()?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?
    };
    let days_back = (last_day.weekday().num_days_from_monday() as i32
        - weekday.num_days_from_monday() as i32)
        .rem_euclid(7);
    last_day.checked_sub_signed(chrono::Duration::days(days_back as i64))
}

/// Easter Sunday via the Anonymous Gregorian algorithm.
#[allow(clippy::many_single_char_names)]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
