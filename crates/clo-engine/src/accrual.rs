//! Shared accrual bookkeeping embedded by [`crate::asset::Asset`],
//! [`crate::tranche::Tranche`], and [`crate::fee::Fee`].
//!
//! The source models this as a base class (`InterestVehicle`) that `Asset`,
//! `Tranche`, and `Fee` extend, overriding the accrual formula. Rust has no
//! inheritance; each owner embeds an [`AccrualState`] by composition and
//! calls [`AccrualState::accrue`] with whatever balance it wants to treat as
//! the accrual base (tranches add deferred interest; fees call `accrue`
//! directly and layer a fixed expense on top).

use clo_core::{Date, Money, Rate};

/// Balance, rate, and running accrual bookkeeping shared by every
/// interest-bearing entity in the engine.
#[derive(Debug, Clone, Copy)]
pub struct AccrualState {
    /// Current coupon/accrual rate.
    pub rate: Rate,
    /// Cumulative interest accrued but not yet paid.
    pub accrued: Money,
    /// Interest accrued within the current reporting period (reset at snapshot).
    pub period_accrual: Money,
    /// Last date this entity was advanced to.
    pub last_sim_date: Date,
}

impl AccrualState {
    /// Starts a fresh accrual state as of `last_sim_date`.
    pub fn new(rate: Rate, last_sim_date: Date) -> Self {
        Self {
            rate,
            accrued: Money::zero(),
            period_accrual: Money::zero(),
            last_sim_date,
        }
    }

    /// Accrues interest on `base` over `year_fraction`, adding the result to
    /// both `accrued` and `period_accrual`.
    pub fn accrue(&mut self, base: Money, year_fraction: rust_decimal::Decimal) {
        let delta = base * self.rate.inner() * year_fraction;
        self.accrued += delta;
        self.period_accrual += delta;
    }

    /// Resets the per-period accrual bucket (called after each snapshot).
    pub fn reset_period_accrual(&mut self) {
        self.period_accrual = Money::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accrue_adds_to_both_buckets() {
        let mut state = AccrualState::new(Rate::from(dec!(0.05)), Date::from_ymd(2025, 1, 1).unwrap());
        state.accrue(Money::from(dec!(1_000_000)), dec!(0.25));
        assert_eq!(state.accrued.inner(), dec!(12500.00));
        assert_eq!(state.period_accrual.inner(), dec!(12500.00));
    }

    #[test]
    fn reset_period_accrual_leaves_accrued_untouched() {
        let mut state = AccrualState::new(Rate::from(dec!(0.05)), Date::from_ymd(2025, 1, 1).unwrap());
        state.accrue(Money::from(dec!(1_000_000)), dec!(0.25));
        state.reset_period_accrual();
        assert_eq!(state.period_accrual.inner(), dec!(0));
        assert_eq!(state.accrued.inner(), dec!(12500.00));
    }
}
