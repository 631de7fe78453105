//! UK bank holidays calendar (England & Wales), used for loan/bond settlement dates.

use super::bitmap::{HolidayBitmap, HolidayCalendarBuilder, WeekendType, MAX_YEAR, MIN_YEAR};
use super::Calendar;
use crate::types::Date;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::OnceCell;

static UK_CALENDAR: OnceCell<UKCalendar> = OnceCell::new();

/// UK bank holidays calendar.
///
/// Fixed rule table (not fetched at runtime): New Year's Day, Good Friday,
/// Easter Monday, Early May Bank Holiday, Spring Bank Holiday, Summer Bank
/// Holiday, Christmas Day and Boxing Day, each with weekend-substitution
/// rules, plus the historically known one-off holidays.
#[derive(Debug, Clone)]
pub struct UKCalendar {
    bitmap: HolidayBitmap,
}

impl UKCalendar {
    /// Builds a fresh UK calendar.
    pub fn new() -> Self {
        Self {
            bitmap: build_uk_holidays(),
        }
    }

    /// The process-wide shared UK calendar instance.
    pub fn global() -> &'static UKCalendar {
        UK_CALENDAR.get_or_init(UKCalendar::new)
    }
}

impl Default for UKCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar for UKCalendar {
    fn name(&self) -> &'static str {
        "UK Bank Holidays"
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.bitmap.is_business_day(date.as_naive_date())
    }
}

fn build_uk_holidays() -> HolidayBitmap {
    HolidayCalendarBuilder::new("UK Bank Holidays")
        .weekend(WeekendType::SaturdaySunday)
        .year_range(MIN_YEAR, MAX_YEAR)
        .add_custom_holidays(uk_new_years)
        .add_easter_holiday(-2) // Good Friday
        .add_easter_holiday(1) // Easter Monday
        .add_custom_holidays(early_may_bank_holiday)
        .add_custom_holidays(spring_bank_holiday)
        .add_last_weekday_holiday(8, chrono::Weekday::Mon) // Summer Bank Holiday
        .add_custom_holidays(uk_christmas)
        .add_custom_holidays(special_uk_holidays)
        .build()
}

fn uk_new_years(year: i32) -> Vec<NaiveDate> {
    let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    match date.weekday() {
        chrono::Weekday::Sat => NaiveDate::from_ymd_opt(year, 1, 3).into_iter().collect(),
        chrono::Weekday::Sun => NaiveDate::from_ymd_opt(year, 1, 2).into_iter().collect(),
        _ => vec![date],
    }
}

/// 1st Monday in May, except 2020 (moved to May 8 for the VE Day 75th anniversary).
fn early_may_bank_holiday(year: i32) -> Vec<NaiveDate> {
    if year == 2020 {
        NaiveDate::from_ymd_opt(2020, 5, 8).into_iter().collect()
    } else {
        super::bitmap::nth_weekday_of_month(year, 5, chrono::Weekday::Mon, 1)
            .into_iter()
            .collect()
    }
}

/// Last Monday in May, except 2022 (moved to June 2 for the Platinum Jubilee).
fn spring_bank_holiday(year: i32) -> Vec<NaiveDate> {
    if year == 2022 {
        NaiveDate::from_ymd_opt(2022, 6, 2).into_iter().collect()
    } else {
        super::bitmap::last_weekday_of_month(year, 5, chrono::Weekday::Mon)
            .into_iter()
            .collect()
    }
}

fn uk_christmas(year: i32) -> Vec<NaiveDate> {
    let (Some(xmas), Some(boxing_day)) = (
        NaiveDate::from_ymd_opt(year, 12, 25),
        NaiveDate::from_ymd_opt(year, 12, 26),
    ) else {
        return Vec::new();
    };

    match xmas.weekday() {
        chrono::Weekday::Sat => vec![
            NaiveDate::from_ymd_opt(year, 12, 27).unwrap(),
            NaiveDate::from_ymd_opt(year, 12, 28).unwrap(),
        ],
        chrono::Weekday::Sun => vec![NaiveDate::from_ymd_opt(year, 12, 27).unwrap(), boxing_day],
        chrono::Weekday::Fri => vec![xmas, NaiveDate::from_ymd_opt(year, 12, 28).unwrap()],
        _ => vec![xmas, boxing_day],
    }
}

/// One-off UK bank holidays for royal and national events.
fn special_uk_holidays(year: i32) -> Vec<NaiveDate> {
    match year {
        2011 => vec![NaiveDate::from_ymd_opt(2011, 4, 29).unwrap()], // Royal Wedding
        2012 => vec![NaiveDate::from_ymd_opt(2012, 6, 5).unwrap()],  // Diamond Jubilee
        2022 => vec![
            NaiveDate::from_ymd_opt(2022, 6, 3).unwrap(),  // Platinum Jubilee extra day
            NaiveDate::from_ymd_opt(2022, 9, 19).unwrap(), // Queen's funeral
        ],
        2023 => vec![NaiveDate::from_ymd_opt(2023, 5, 8).unwrap()], // Coronation
        _ => Vec::new(),
    }
}
