//! 30E/360 ISDA day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// 30E/360 ISDA (2006 ISDA Definitions, §4.16(g)), used for fixed-rate tranche accrual.
///
/// Both period-end dates are adjusted to day 30 when they fall on the last
/// calendar day of their month (this includes non-31-day months, e.g. the
/// last day of February). The maturity-date carve-out in the full ISDA
/// definition (D2 is left unadjusted when it is the bond's final maturity
/// date) is not modelled here: `year_fraction` has no notion of "is this the
/// final period", so both ends are treated uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360EIsda;

impl DayCount for Thirty360EIsda {
    fn name(&self) -> &'static str {
        "30E/360 ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let d1 = adjusted_day(start);
        let d2 = adjusted_day(end);

        let days = 360 * (end.year() as i64 - start.year() as i64)
            + 30 * (end.month() as i64 - start.month() as i64)
            + (d2 - d1);

        Decimal::from(days) / Decimal::from(360)
    }
}

fn adjusted_day(date: Date) -> i64 {
    if date.day() == date.days_in_month() {
        30
    } else {
        date.day() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn full_year() {
        let dc = Thirty360EIsda;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();
        assert_eq!(dc.year_fraction(start, end), dec!(1));
    }

    #[test]
    fn end_of_february_treated_as_day_30() {
        let dc = Thirty360EIsda;
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 2, 28).unwrap();
        // d1 -> 30 (31st), d2 -> 30 (last day of Feb in a non-leap year)
        // days = 30*(2-1) + (30-30) = 30
        assert_eq!(dc.year_fraction(start, end), dec!(30) / dec!(360));
    }

    #[test]
    fn leap_february_end_is_also_day_30() {
        let dc = Thirty360EIsda;
        let start = Date::from_ymd(2024, 2, 29).unwrap();
        let end = Date::from_ymd(2024, 3, 29).unwrap();
        // d1 -> 30 (last day of Feb 2024), d2 stays 29
        // days = 30*(3-2) + (29-30) = 29
        assert_eq!(dc.year_fraction(start, end), dec!(29) / dec!(360));
    }
}
