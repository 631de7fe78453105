//! The top-level CLO state machine.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use clo_core::calendars::sub_uk_business_days;
use clo_core::{Date, Frequency, Money, Rate};
use clo_curves::ForwardRateCurve;

use crate::account::CashAccount;
use crate::asset::Asset;
use crate::error::{EngineError, EngineResult};
use crate::fee::{Fee, IncentiveFee};
use crate::input::{AssetKind, LiquidationType};
use crate::portfolio::Portfolio;
use crate::snapshot::{CloSnapshot, History};
use crate::tranche::Tranche;
use crate::waterfall::{PaymentSource, Waterfall};

/// Binds portfolio, cash accounts, tranches, fees, waterfalls, and the
/// reinvestment/liquidation policy into one time-stepped state machine.
pub struct Clo {
    report_date: Date,
    next_payment_date: Date,
    reinvestment_end_date: Date,
    payment_frequency: Frequency,
    payment_day: u32,
    cursor: Date,
    in_liquidation: bool,
    liquidation_date: Date,
    liquidation_type: LiquidationType,

    portfolio: Portfolio,
    interest_account: CashAccount,
    principal_account: CashAccount,
    tranches: Vec<Tranche>,
    senior_fee: Fee,
    junior_fee: Fee,
    incentive_fee: IncentiveFee,
    interest_waterfall: Waterfall,
    principal_waterfall: Waterfall,

    cpr: Decimal,
    cdr: Decimal,
    recovery_rate: Decimal,
    reinvestment_maturity_months: i32,
    wal_limit_years: Option<Decimal>,
    reinvestment_curve: ForwardRateCurve,

    history: History<CloSnapshot>,
}

#[allow(clippy::too_many_arguments)]
impl Clo {
    /// Assembles a CLO, performing construction-time backdating: tranches
    /// and fees are rewound to the prior payment date, the portfolio's
    /// accrual is backdated to 8 UK business days before it, and the
    /// portfolio is then advanced forward to `report_date`.
    pub fn new(
        report_date: Date,
        next_payment_date: Date,
        reinvestment_end_date: Date,
        payment_frequency: Frequency,
        mut portfolio: Portfolio,
        collection_account_principal_balance: Money,
        tranches: Vec<Tranche>,
        mut senior_fee: Fee,
        mut junior_fee: Fee,
        mut incentive_fee: IncentiveFee,
        interest_waterfall: Waterfall,
        principal_waterfall: Waterfall,
        cpr: Decimal,
        cdr: Decimal,
        recovery_rate: Decimal,
        reinvestment_maturity_months: i32,
        wal_limit_years: Option<Decimal>,
        reinvestment_curve: ForwardRateCurve,
        liquidation_type: LiquidationType,
    ) -> EngineResult<Self> {
        if report_date >= next_payment_date {
            return Err(EngineError::invalid_input("report_date must be strictly before next_payment_date"));
        }
        if portfolio.is_empty() {
            return Err(EngineError::data_integrity("portfolio is empty after filtering matured assets"));
        }
        if !tranches.iter().any(Tranche::is_equity) {
            return Err(EngineError::invalid_input("deal has no equity tranche"));
        }

        let payment_interval = payment_frequency.months_per_period();
        let payment_day = next_payment_date.day();
        let prior_payment_date = next_payment_date.add_months(-payment_interval);

        let mut tranches = tranches;
        for tranche in &mut tranches {
            tranche.rewind(prior_payment_date);
        }

        let initial_collateral_balance = portfolio.total_balance() + collection_account_principal_balance;
        senior_fee.rewind(prior_payment_date, initial_collateral_balance);
        junior_fee.rewind(prior_payment_date, initial_collateral_balance);

        let cutoff = sub_uk_business_days(prior_payment_date, 8);
        portfolio.backdate(cutoff);

        let mut interest_account = CashAccount::new(Money::zero());
        let mut principal_account = CashAccount::new(collection_account_principal_balance);

        portfolio.simulate(report_date, Some(&reinvestment_curve));
        portfolio.sweep_interest(&mut interest_account)?;
        portfolio.sweep_principal(&mut principal_account)?;

        let anchor = latest_monthly_anchor_on_or_before(next_payment_date, report_date);
        let cursor = anchor.add_months(1);

        info!(%report_date, %next_payment_date, %cursor, "CLO constructed and backdated");

        Ok(Self {
            report_date,
            next_payment_date,
            reinvestment_end_date,
            payment_frequency,
            payment_day,
            cursor,
            in_liquidation: false,
            liquidation_date: clo_core::far_future(),
            liquidation_type,
            portfolio,
            interest_account,
            principal_account,
            tranches,
            senior_fee,
            junior_fee,
            incentive_fee,
            interest_waterfall,
            principal_waterfall,
            cpr,
            cdr,
            recovery_rate,
            reinvestment_maturity_months,
            wal_limit_years,
            reinvestment_curve,
            history: Vec::new(),
        })
    }

    /// The CLO's snapshot history.
    pub fn history(&self) -> &[CloSnapshot] {
        &self.history
    }

    /// Read-only access to the collateral pool.
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Read-only access to the capital structure, senior to junior as configured.
    pub fn tranches(&self) -> &[Tranche] {
        &self.tranches
    }

    /// The senior management fee.
    pub fn senior_fee(&self) -> &Fee {
        &self.senior_fee
    }

    /// The junior (subordinated) management fee.
    pub fn junior_fee(&self) -> &Fee {
        &self.junior_fee
    }

    /// The incentive fee.
    pub fn incentive_fee(&self) -> &IncentiveFee {
        &self.incentive_fee
    }

    /// Computes the auto-liquidation date per the reinvestment-end-based
    /// policy. Exposed so callers can compare against an externally driven
    /// liquidation date before calling [`Clo::liquidate`] directly.
    pub fn policy_liquidation_date(&self) -> Date {
        if self.report_date <= self.reinvestment_end_date {
            self.reinvestment_end_date.add_years(2)
        } else {
            let wal_months = (self.portfolio.weighted_average_life(self.report_date) * Decimal::from(12))
                .round()
                .to_i32()
                .unwrap_or(0);
            self.report_date
                .add_months(18)
                .min(self.report_date.add_months(wal_months - 18))
        }
    }

    /// Drives liquidation explicitly (the externally-triggered entrypoint
    /// used by historical one-off "sell on date X" scenarios), instead of
    /// waiting for the cursor to cross the computed policy date. Idempotent
    /// when called twice with the same `(accrual_date, liquidation_date)`.
    pub fn liquidate(&mut self, accrual_date: Date, liquidation_date: Date) {
        self.portfolio.liquidate(accrual_date);
        self.portfolio.apply_liquidation_pricing(self.liquidation_type);
        for tranche in &mut self.tranches {
            tranche.notify_of_liquidation(liquidation_date);
        }
        self.senior_fee.notify_of_liquidation(liquidation_date);
        self.junior_fee.notify_of_liquidation(liquidation_date);
        self.incentive_fee.notify_of_liquidation(liquidation_date);
        self.in_liquidation = true;
        self.liquidation_date = liquidation_date;
    }

    fn should_continue(&self) -> bool {
        let cash_remaining = self.portfolio.total_balance() + self.principal_account.balance();
        let still_funded = cash_remaining.inner() > Decimal::ZERO;
        let winding_down_liquidation = self.in_liquidation && self.cursor <= self.liquidation_date;
        let any_asset_still_accruing = self
            .portfolio
            .assets()
            .iter()
            .any(|a| a.accrued_interest().inner() > Decimal::ZERO);

        still_funded || winding_down_liquidation || any_asset_still_accruing
    }

    /// Runs the monthly state machine to exhaustion: while collateral or
    /// cash remains, or the portfolio is winding down through liquidation,
    /// or any asset still carries accrued interest.
    pub fn simulate(&mut self) -> EngineResult<()> {
        while self.should_continue() {
            self.step()?;
        }
        Ok(())
    }

    fn step(&mut self) -> EngineResult<()> {
        if !self.in_liquidation && self.cursor >= self.policy_liquidation_date() {
            let accrual_date = self.cursor.add_days(14);
            let redemption_date = self.cursor.add_months(1);
            debug!(%accrual_date, %redemption_date, "auto-liquidation triggered");
            self.liquidate(accrual_date, redemption_date);
        }

        self.portfolio.simulate(self.cursor, Some(&self.reinvestment_curve));
        let interest_swept = self.portfolio.sweep_interest(&mut self.interest_account)?;
        let principal_swept = self.portfolio.sweep_principal(&mut self.principal_account)?;

        self.senior_fee.simulate(self.cursor);
        self.junior_fee.simulate(self.cursor);
        self.incentive_fee.simulate(self.cursor);

        for tranche in &mut self.tranches {
            tranche.simulate(self.cursor);
        }

        let mut principal_reinvested = Money::zero();
        if self.cursor <= self.reinvestment_end_date && self.principal_account.balance().inner() > Decimal::ZERO {
            principal_reinvested = self.reinvest()?;
        }

        if self.cursor == self.next_payment_date {
            let collateral_balance = self.portfolio.total_balance() + self.principal_account.balance();
            self.senior_fee.set_balance(collateral_balance);
            self.junior_fee.set_balance(collateral_balance);

            self.interest_waterfall.pay(
                PaymentSource::Interest,
                &mut self.interest_account,
                &mut self.tranches,
                &mut self.senior_fee,
                &mut self.junior_fee,
                &mut self.incentive_fee,
            )?;
            self.principal_waterfall.pay(
                PaymentSource::Principal,
                &mut self.principal_account,
                &mut self.tranches,
                &mut self.senior_fee,
                &mut self.junior_fee,
                &mut self.incentive_fee,
            )?;

            let next_fixing = self.cursor.add_months(self.payment_frequency.months_per_period());
            let base_rate = Rate::from(self.reinvestment_curve.rate_at(next_fixing));
            for tranche in &mut self.tranches {
                tranche.update_coupon(base_rate);
            }

            self.next_payment_date = self.next_payment_date.add_months(self.payment_frequency.months_per_period());
        }

        self.push_snapshot(principal_reinvested, interest_swept, principal_swept);

        self.cursor = self.cursor.add_months(1).safe_set_day(self.payment_day);

        Ok(())
    }

    fn reinvest(&mut self) -> EngineResult<Money> {
        let cash = self.principal_account.debit(self.principal_account.balance());
        if cash.inner().is_zero() {
            return Ok(Money::zero());
        }

        let price = self.portfolio.weighted_average_price().min(Decimal::ONE);
        let coupon = self.portfolio.weighted_average_coupon();
        let spread = self.portfolio.weighted_average_spread();
        let balance = cash / price;

        let next_payment_date = if self.cursor == self.next_payment_date {
            self.next_payment_date.add_months(self.payment_frequency.months_per_period())
        } else {
            self.next_payment_date
        };

        let maturity = self.wal_constrained_maturity(balance)?;
        let cpr_lockout_end = self.portfolio.cpr_lockout_end_date().unwrap_or(self.report_date);
        let cdr_lockout_end = self.portfolio.cdr_lockout_end_date().unwrap_or(self.report_date);

        let asset = Asset::new(
            format!("REINV-{}", self.cursor),
            AssetKind::Loan,
            balance,
            price,
            coupon,
            spread,
            true,
            self.payment_frequency,
            next_payment_date,
            maturity,
            self.cpr,
            self.cdr,
            self.recovery_rate,
            cpr_lockout_end,
            cdr_lockout_end,
            self.cursor,
        )?;
        self.portfolio.push(asset);

        Ok(cash)
    }

    /// Sizes a reinvestment asset's maturity to stay within `wal_limit_years`
    /// when configured, falling back to a flat `reinvestment_maturity_months`
    /// tenor otherwise. Disabled by default: most deals leave `wal_limit_years`
    /// unset and take the flat tenor.
    fn wal_constrained_maturity(&self, new_asset_balance: Money) -> EngineResult<Date> {
        let Some(wal_limit) = self.wal_limit_years else {
            return Ok(self.cursor.add_months(self.reinvestment_maturity_months));
        };

        let existing_balance = self.portfolio.total_balance();
        let total_balance = existing_balance + new_asset_balance;
        let current_wal = self.portfolio.weighted_average_life(self.cursor);

        let max_wal_contribution =
            (wal_limit * total_balance.inner() - current_wal * existing_balance.inner()) / new_asset_balance.inner();

        if max_wal_contribution <= Decimal::ZERO {
            return Err(EngineError::wal_limit_breached(
                wal_limit,
                "no valid maturity keeps the portfolio within the WAL limit",
            ));
        }

        let max_maturity_months = (max_wal_contribution * Decimal::from(12)).to_i32().unwrap_or(0);
        let candidate = self.report_date.add_months(max_maturity_months);
        let floor = self.cursor.add_months(1);
        let ceiling = self.report_date.add_years(15);

        Ok(candidate.max(floor).min(ceiling))
    }

    fn push_snapshot(&mut self, principal_reinvested: Money, interest_swept: Money, principal_swept: Money) {
        for tranche in &mut self.tranches {
            tranche.push_snapshot(self.cursor);
        }
        self.senior_fee.push_snapshot(self.cursor);
        self.junior_fee.push_snapshot(self.cursor);
        self.incentive_fee.push_snapshot(self.cursor);

        let total_debt: Money = self
            .tranches
            .iter()
            .filter(|t| !t.is_equity())
            .map(Tranche::balance)
            .sum();

        let interest_accrued: Money = self
            .portfolio
            .assets()
            .iter()
            .map(Asset::accrued_interest)
            .sum();

        self.history.push(CloSnapshot {
            date: self.cursor,
            total_debt,
            total_asset_par: self.portfolio.total_balance(),
            interest_accrued,
            interest_swept,
            interest_account_balance: self.interest_account.balance(),
            principal_swept,
            principal_account_balance: self.principal_account.balance(),
            principal_reinvested,
            weighted_average_spread: self.portfolio.weighted_average_spread(),
            weighted_average_coupon: self.portfolio.weighted_average_coupon(),
            weighted_average_price: self.portfolio.weighted_average_price(),
            weighted_average_life: self.portfolio.weighted_average_life(self.report_date),
            nav: self.portfolio.market_value(),
            nav_90: self.portfolio.market_value_90(),
        });
    }
}

fn latest_monthly_anchor_on_or_before(anchor: Date, limit: Date) -> Date {
    let mut candidate = anchor;
    if candidate <= limit {
        loop {
            let next = candidate.add_months(1);
            if next > limit {
                return candidate;
            }
            candidate = next;
        }
    } else {
        loop {
            candidate = candidate.add_months(-1);
            if candidate <= limit {
                return candidate;
            }
        }
    }
}
