//! Dates, day-count conventions, UK business-day calendars, and the
//! `Money`/`Rate` newtypes shared across the CLO cashflow projection engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency, Money, Rate};

/// Re-exports for glob-importing the common surface of this crate.
pub mod prelude {
    pub use crate::calendars::{add_uk_business_days, sub_uk_business_days, Calendar, UKCalendar, WeekendCalendar};
    pub use crate::daycounts::{Act360, DayCount, DayCountConvention, Thirty360EIsda};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{far_future, Date, Frequency, Money, Rate};
}
