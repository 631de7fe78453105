//! Management fee and incentive (carried-interest) fee.

use clo_core::daycounts::{Act360, DayCount};
use clo_core::{Date, Money, Rate};

use crate::account::CashAccount;
use crate::accrual::AccrualState;
use crate::error::EngineResult;
use crate::snapshot::{FeeSnapshot, History};

/// A management fee: variable rate on a collateral-pegged balance, plus an
/// optional fixed annual expense, with an optional rebate of the variable
/// portion routed back to equity.
#[derive(Debug, Clone)]
pub struct Fee {
    name: String,
    state: AccrualState,
    balance: Money,
    fixed_expense: Money,
    rebate_fraction: Rate,
    clo_call_date: Date,
    paid_this_step: Money,
    rebate_this_step: Money,
    history: History<FeeSnapshot>,
}

impl Fee {
    /// Opens a fee with `rate` as its variable annual rate, accruing from
    /// `last_sim_date` against `balance`.
    pub fn new(
        name: impl Into<String>,
        rate: Rate,
        fixed_expense: Money,
        rebate_fraction: Rate,
        balance: Money,
        last_sim_date: Date,
    ) -> Self {
        Self {
            name: name.into(),
            state: AccrualState::new(rate, last_sim_date),
            balance,
            fixed_expense,
            rebate_fraction,
            clo_call_date: clo_core::far_future(),
            paid_this_step: Money::zero(),
            rebate_this_step: Money::zero(),
            history: Vec::new(),
        }
    }

    /// This fee's name (e.g. `"Senior Management Fee"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cumulative accrued but unpaid amount.
    pub fn accrued(&self) -> Money {
        self.state.accrued
    }

    /// Reassigns the collateral-pegged accrual base. The CLO refreshes this
    /// to the current aggregate collateral balance at each payment date.
    pub fn set_balance(&mut self, balance: Money) {
        self.balance = balance;
    }

    /// Rewinds this fee's last-simulated date and balance, used once at CLO
    /// construction to seed the first period's accrual.
    pub fn rewind(&mut self, last_sim_date: Date, balance: Money) {
        self.state.last_sim_date = last_sim_date;
        self.balance = balance;
    }

    /// Marks this fee as no longer accruing past `date` (portfolio liquidation).
    pub fn notify_of_liquidation(&mut self, date: Date) {
        self.clo_call_date = date;
    }

    /// Accrues `balance * yf * rate + yf * fixed_expense` from the last
    /// simulated date through `min(target, clo_call_date)`.
    pub fn simulate(&mut self, target: Date) {
        let accrue_until = target.min(self.clo_call_date);
        let yf = Act360.year_fraction(self.state.last_sim_date, accrue_until);
        self.state.accrue(self.balance, yf);
        let fixed = self.fixed_expense * yf;
        self.state.accrued += fixed;
        self.state.period_accrual += fixed;
        self.state.last_sim_date = accrue_until;
    }

    /// Debits as much of the accrued amount as `src` can cover, routes the
    /// rebate fraction back, and returns the rebate amount to the caller so
    /// it can be credited onward to equity.
    pub fn pay(&mut self, src: &mut CashAccount) -> EngineResult<Money> {
        let paid = src.debit(self.state.accrued);
        let rebate = paid * self.rebate_fraction.inner();
        let actual = paid - rebate;
        self.state.accrued -= paid;
        self.paid_this_step += actual;
        self.rebate_this_step += rebate;
        src.credit(rebate)?;
        Ok(rebate)
    }

    /// Pushes this step's snapshot and resets the per-step buckets. Called
    /// by the `Clo` once per monthly step, after any waterfall payment has
    /// run, so the snapshot reflects this period's `paid`/`rebate`.
    pub fn push_snapshot(&mut self, date: Date) {
        self.history.push(FeeSnapshot {
            date,
            balance: self.balance,
            period_accrual: self.state.period_accrual,
            accrued: self.state.accrued,
            paid: self.paid_this_step,
            rebate: self.rebate_this_step,
        });
        self.state.reset_period_accrual();
        self.paid_this_step = Money::zero();
        self.rebate_this_step = Money::zero();
    }

    /// This fee's snapshot history.
    pub fn history(&self) -> &[FeeSnapshot] {
        &self.history
    }
}

/// A carried-interest tail paid to the manager once equity clears an IRR hurdle.
#[derive(Debug, Clone)]
pub struct IncentiveFee {
    balance: Money,
    irr_hurdle_rate: Rate,
    diversion_rate: Rate,
    last_sim_date: Date,
    clo_call_date: Date,
    paid_this_step: Money,
    history: History<FeeSnapshot>,
}

impl IncentiveFee {
    /// Opens an incentive fee with the manager's initial IRR-hurdle balance.
    pub fn new(irr_balance: Money, irr_hurdle_rate: Rate, diversion_rate: Rate, last_sim_date: Date) -> Self {
        Self {
            balance: irr_balance,
            irr_hurdle_rate,
            diversion_rate,
            last_sim_date,
            clo_call_date: clo_core::far_future(),
            paid_this_step: Money::zero(),
            history: Vec::new(),
        }
    }

    /// Current outstanding IRR-hurdle cushion.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Marks this fee as no longer accruing past `date` (portfolio liquidation).
    pub fn notify_of_liquidation(&mut self, date: Date) {
        self.clo_call_date = date;
    }

    /// Accrues the hurdle cushion: `balance += balance * yf * irr_hurdle_rate`.
    pub fn simulate(&mut self, target: Date) {
        let accrue_until = target.min(self.clo_call_date);
        let yf = Act360.year_fraction(self.last_sim_date, accrue_until);
        let accrual = self.balance * self.irr_hurdle_rate.inner() * yf;
        self.balance += accrual;
        self.last_sim_date = accrue_until;
    }

    /// Sweeps all residual equity cash in `src`, reducing the hurdle cushion
    /// and diverting a fraction of any excess over the hurdle as carry.
    pub fn pay(&mut self, src: &mut CashAccount) -> EngineResult<()> {
        let funds = src.debit(src.balance());
        self.balance -= funds;
        let payment = (-self.balance).max_with_zero() * self.diversion_rate.inner();
        self.paid_this_step += payment;
        src.credit(funds - payment)?;
        self.balance = self.balance.max_with_zero();
        Ok(())
    }

    /// Pushes this step's snapshot and resets the per-step paid bucket.
    pub fn push_snapshot(&mut self, date: Date) {
        self.history.push(FeeSnapshot {
            date,
            balance: self.balance,
            period_accrual: Money::zero(),
            accrued: self.balance,
            paid: self.paid_this_step,
            rebate: Money::zero(),
        });
        self.paid_this_step = Money::zero();
    }

    /// This fee's snapshot history.
    pub fn history(&self) -> &[FeeSnapshot] {
        &self.history
    }
}
