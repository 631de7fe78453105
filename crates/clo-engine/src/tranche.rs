//! Debt and equity tranches.
//!
//! Modelled as one struct with an `is_equity` flag rather than a trait
//! object or enum: the two behave identically for accrual and differ only
//! in `pay_interest`/`pay_principal`, which is a handful of branches, not a
//! full second implementation.

use rust_decimal::prelude::ToPrimitive;

use clo_core::daycounts::{Act360, DayCount, Thirty360EIsda};
use clo_core::{Date, Money, Rate};

use crate::account::CashAccount;
use crate::accrual::AccrualState;
use crate::error::{EngineError, EngineResult};
use crate::snapshot::{History, TrancheSnapshot};
use crate::xirr;

/// A single slice of the capital structure: a debt tranche or the residual
/// equity tranche.
#[derive(Debug, Clone)]
pub struct Tranche {
    rating: String,
    is_equity: bool,
    is_fixed: bool,
    initial_balance: Money,
    balance: Money,
    unfloored_balance: Money,
    margin: Rate,
    base_rate: Rate,
    state: AccrualState,
    deferred_interest: Money,
    clo_call_date: Date,
    interest_paid_this_step: Money,
    principal_paid_this_step: Money,
    deferred_interest_pik_this_step: Money,
    deferred_interest_paid_this_step: Money,
    fee_rebate_this_step: Money,
    history: History<TrancheSnapshot>,
}

impl Tranche {
    /// Builds a tranche. `coupon_or_margin` is the fixed coupon for fixed
    /// tranches, or the floating margin otherwise (the reference-curve
    /// component is applied later via [`Tranche::update_coupon`]).
    pub fn new(
        rating: impl Into<String>,
        is_equity: bool,
        is_fixed: bool,
        balance: Money,
        coupon_or_margin: Rate,
        last_sim_date: Date,
    ) -> Self {
        let initial_rate = if is_fixed { coupon_or_margin } else { Rate::zero() };
        Self {
            rating: rating.into(),
            is_equity,
            is_fixed,
            initial_balance: balance,
            balance,
            unfloored_balance: balance,
            margin: coupon_or_margin,
            base_rate: Rate::zero(),
            state: AccrualState::new(initial_rate, last_sim_date),
            deferred_interest: Money::zero(),
            clo_call_date: clo_core::far_future(),
            interest_paid_this_step: Money::zero(),
            principal_paid_this_step: Money::zero(),
            deferred_interest_pik_this_step: Money::zero(),
            deferred_interest_paid_this_step: Money::zero(),
            fee_rebate_this_step: Money::zero(),
            history: Vec::new(),
        }
    }

    /// Rating/name, e.g. `"AAA"`, `"B"`, `"Equity"`.
    pub fn rating(&self) -> &str {
        &self.rating
    }

    /// Whether this is the residual equity tranche.
    pub fn is_equity(&self) -> bool {
        self.is_equity
    }

    /// Current outstanding balance (floored at 0 for equity).
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Cumulative PIK'd deferred interest outstanding.
    pub fn deferred_interest(&self) -> Money {
        self.deferred_interest
    }

    /// Rewinds this tranche's last-simulated date, used once at CLO
    /// construction to seed the first coupon period's accrual start.
    pub fn rewind(&mut self, last_sim_date: Date) {
        self.state.last_sim_date = last_sim_date;
    }

    fn day_count(&self) -> Box<dyn DayCount> {
        if self.is_fixed {
            Box::new(Thirty360EIsda)
        } else {
            Box::new(Act360)
        }
    }

    /// Accrues interest on `balance + deferred_interest` through
    /// `min(target, clo_call_date)`.
    pub fn simulate(&mut self, target: Date) {
        let accrue_until = target.min(self.clo_call_date);
        let yf = self.day_count().year_fraction(self.state.last_sim_date, accrue_until);
        let base = self.balance + self.deferred_interest;
        self.state.accrue(base, yf);
        self.state.last_sim_date = accrue_until;
    }

    /// Resets the floating coupon for the next accrual period.
    pub fn update_coupon(&mut self, base_rate: Rate) {
        if !self.is_fixed {
            self.base_rate = base_rate;
            self.state.rate = base_rate + self.margin;
        }
    }

    /// Marks this tranche as no longer accruing past `date` (liquidation call).
    pub fn notify_of_liquidation(&mut self, date: Date) {
        self.clo_call_date = date;
    }

    /// Credits a management-fee rebate to be reported on this tranche's next snapshot.
    pub fn record_fee_rebate(&mut self, amount: Money) {
        self.fee_rebate_this_step += amount;
    }

    /// Pays deferred interest first, then period-accrued interest, PIKing
    /// any shortfall back into deferred interest. Equity instead sweeps the
    /// entire source balance unconditionally.
    pub fn pay_interest(&mut self, src: &mut CashAccount) {
        if self.is_equity {
            let debited = src.debit(src.balance());
            self.interest_paid_this_step += debited;
            return;
        }

        let deferred_paid = src.debit(self.deferred_interest);
        self.deferred_interest -= deferred_paid;
        self.interest_paid_this_step += deferred_paid;
        self.deferred_interest_paid_this_step += deferred_paid;

        let accrued_paid = src.debit(self.state.accrued);
        self.state.accrued -= accrued_paid;
        self.interest_paid_this_step += accrued_paid;

        if self.state.accrued.inner() > rust_decimal::Decimal::ZERO {
            self.deferred_interest += self.state.accrued;
            self.deferred_interest_pik_this_step += self.state.accrued;
            self.state.accrued = Money::zero();
        }
    }

    /// Pays down principal. Equity debits the entire source balance and
    /// floors the live balance at 0 without re-flooring the historical
    /// snapshot value (see [`Tranche::push_snapshot`]).
    pub fn pay_principal(&mut self, src: &mut CashAccount) {
        if self.is_equity {
            let debited = src.debit(src.balance());
            self.principal_paid_this_step += debited;
            self.unfloored_balance -= debited;
            self.balance = self.unfloored_balance.floor_at_zero();
            return;
        }

        let paid = src.debit(self.balance);
        self.balance -= paid;
        self.unfloored_balance = self.balance;
        self.principal_paid_this_step += paid;
    }

    /// Pushes this step's snapshot and resets the per-step buckets.
    pub fn push_snapshot(&mut self, date: Date) {
        let pct_principal = if self.initial_balance.inner().is_zero() {
            rust_decimal::Decimal::ZERO
        } else {
            self.principal_paid_this_step.inner() / self.initial_balance.inner()
        };

        self.history.push(TrancheSnapshot {
            date,
            balance: if self.is_equity { self.unfloored_balance } else { self.balance },
            interest_paid: self.interest_paid_this_step,
            interest_accrued: self.state.accrued,
            interest_accrued_over_period: self.state.period_accrual,
            deferred_interest: self.deferred_interest,
            deferred_interest_paid: self.deferred_interest_paid_this_step,
            deferred_interest_accrued_over_period: self.deferred_interest_pik_this_step,
            principal_paid: self.principal_paid_this_step,
            pct_principal,
            pct_amortization: pct_principal,
            coupon: self.state.rate,
            base_rate: self.base_rate,
            fee_rebate: self.fee_rebate_this_step,
        });

        self.state.reset_period_accrual();
        self.interest_paid_this_step = Money::zero();
        self.principal_paid_this_step = Money::zero();
        self.deferred_interest_pik_this_step = Money::zero();
        self.deferred_interest_paid_this_step = Money::zero();
        self.fee_rebate_this_step = Money::zero();
    }

    /// This tranche's snapshot history.
    pub fn history(&self) -> &[TrancheSnapshot] {
        &self.history
    }

    /// Internal rate of return against a hypothetical purchase of this
    /// tranche at `purchase_price * initial_balance` on its first history
    /// date, against the realised `interest_paid + principal_paid` stream.
    pub fn irr(&self, purchase_price: rust_decimal::Decimal) -> EngineResult<f64> {
        if self.history.is_empty() {
            return Err(EngineError::invalid_input("tranche has no history to compute an IRR from"));
        }

        let outlay = (self.initial_balance.inner() * purchase_price)
            .to_f64()
            .ok_or_else(|| EngineError::invalid_input("purchase outlay is not representable as f64"))?;

        let mut flows: Vec<(Date, f64)> = Vec::with_capacity(self.history.len());
        for (i, snap) in self.history.iter().enumerate() {
            let received = (snap.interest_paid.inner() + snap.principal_paid.inner())
                .to_f64()
                .ok_or_else(|| EngineError::invalid_input("cashflow is not representable as f64"))?;
            let amount = if i == 0 { received - outlay } else { received };
            flows.push((snap.date, amount));
        }

        xirr::xirr(&flows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn debt_tranche_accrues_on_balance_plus_deferred() {
        let mut t = Tranche::new(
            "AAA",
            false,
            false,
            Money::from(dec!(900_000)),
            Rate::from(dec!(0.01)),
            Date::from_ymd(2025, 1, 1).unwrap(),
        );
        t.update_coupon(Rate::zero());
        t.simulate(Date::from_ymd(2025, 4, 1).unwrap());
        assert!(t.state.accrued.inner() > dec!(0));
    }

    #[test]
    fn unpaid_accrued_interest_piks_into_deferred() {
        let mut t = Tranche::new(
            "B",
            false,
            false,
            Money::from(dec!(100_000)),
            Rate::from(dec!(0.15)),
            Date::from_ymd(2025, 1, 1).unwrap(),
        );
        t.update_coupon(Rate::zero());
        t.simulate(Date::from_ymd(2025, 4, 1).unwrap());
        let mut account = CashAccount::new(Money::zero());
        t.pay_interest(&mut account);
        assert_eq!(t.interest_paid_this_step.inner(), dec!(0));
        assert!(t.deferred_interest.inner() > dec!(0));
    }

    #[test]
    fn equity_pay_principal_can_snapshot_negative_while_balance_stays_floored() {
        let mut equity = Tranche::new(
            "Equity",
            true,
            false,
            Money::from(dec!(100)),
            Rate::zero(),
            Date::from_ymd(2025, 1, 1).unwrap(),
        );
        let mut account = CashAccount::new(Money::from(dec!(150)));
        equity.pay_principal(&mut account);
        assert_eq!(equity.balance().inner(), dec!(0));
        equity.push_snapshot(Date::from_ymd(2025, 4, 1).unwrap());
        assert_eq!(equity.history()[0].balance.inner(), dec!(-50));
    }

    #[test]
    fn pct_principal_is_relative_to_initial_balance() {
        let mut t = Tranche::new(
            "AAA",
            false,
            false,
            Money::from(dec!(1_000_000)),
            Rate::from(dec!(0.01)),
            Date::from_ymd(2025, 1, 1).unwrap(),
        );
        let mut account = CashAccount::new(Money::from(dec!(250_000)));
        t.pay_principal(&mut account);
        t.push_snapshot(Date::from_ymd(2025, 4, 1).unwrap());
        assert_eq!(t.history()[0].pct_principal, dec!(0.25));
    }
}
