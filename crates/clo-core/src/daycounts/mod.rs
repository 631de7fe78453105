//! Day-count conventions used for accrual year-fractions.

mod act360;
mod thirty_360e_isda;

pub use act360::Act360;
pub use thirty_360e_isda::Thirty360EIsda;

use rust_decimal::Decimal;

use crate::types::Date;

/// A day-count convention: computes a year fraction between two dates.
pub trait DayCount {
    /// Convention name, e.g. `"ACT/360"`.
    fn name(&self) -> &'static str;

    /// Year fraction between `start` and `end` (can be negative if `end < start`).
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;
}

/// The two conventions this engine needs: ACT/360 for floating accrual,
/// 30E/360 ISDA for fixed-rate tranche accrual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCountConvention {
    /// Actual days over 360.
    Act360,
    /// 30E/360 ISDA (2006 definitions).
    Thirty360EIsda,
}

impl DayCountConvention {
    /// Returns a boxed implementation of this convention.
    pub fn to_day_count(self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Thirty360EIsda => Box::new(Thirty360EIsda),
        }
    }
}
