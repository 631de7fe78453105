//! ACT/360 day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// ACT/360: actual calendar days elapsed, divided by 360.
#[derive(Debug, Clone, Copy, Default)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(start.days_between(end)) / Decimal::from(360)
    }
}
