//! Single-obligor loan or bond cashflow model.

use clo_core::calendars::add_uk_business_days;
use clo_core::daycounts::{Act360, DayCount};
use clo_core::{Date, Frequency, Money, Rate};
use clo_curves::ForwardRateCurve;

use crate::accrual::AccrualState;
use crate::error::{EngineError, EngineResult};
use crate::input::AssetKind;
use crate::snapshot::{AssetSnapshot, History};

/// A single loan or bond held by the portfolio.
#[derive(Debug, Clone)]
pub struct Asset {
    figi: String,
    kind: AssetKind,
    balance: Money,
    price: rust_decimal::Decimal,
    spread: Rate,
    is_floating: bool,
    payment_frequency: Frequency,
    next_payment_date: Date,
    maturity: Date,
    settlement_date: Date,
    cpr: rust_decimal::Decimal,
    cdr: rust_decimal::Decimal,
    recovery_rate: rust_decimal::Decimal,
    cpr_lockout_end: Date,
    cdr_lockout_end: Date,
    price_override: Option<rust_decimal::Decimal>,
    state: AccrualState,

    // Current-step accumulators, carried across suppressed interim snapshots.
    interest_paid: Money,
    principal_paid: Money,
    scheduled_principal: Money,
    unscheduled_principal: Money,
    defaulted_principal: Money,
    recovered_principal: Money,

    history: History<AssetSnapshot>,
}

#[allow(clippy::too_many_arguments)]
impl Asset {
    /// Builds an asset and backdates its accrued interest to `report_date`
    /// from the coupon date immediately preceding it.
    pub fn new(
        figi: impl Into<String>,
        kind: AssetKind,
        balance: Money,
        price: rust_decimal::Decimal,
        coupon: Rate,
        spread: Rate,
        is_floating: bool,
        payment_frequency: Frequency,
        next_payment_date: Date,
        maturity: Date,
        cpr: rust_decimal::Decimal,
        cdr: rust_decimal::Decimal,
        recovery_rate: rust_decimal::Decimal,
        cpr_lockout_end: Date,
        cdr_lockout_end: Date,
        report_date: Date,
    ) -> EngineResult<Self> {
        let figi = figi.into();

        if maturity <= report_date {
            return Err(EngineError::data_integrity(format!(
                "asset {figi} is already matured at construction"
            )));
        }

        let prior_payment_date = Self::prior_payment_date(next_payment_date, payment_frequency, report_date);
        let backdated_accrual = balance * coupon.inner() * Act360.year_fraction(prior_payment_date, report_date);

        let mut state = AccrualState::new(coupon, report_date);
        state.accrued = backdated_accrual;

        Ok(Self {
            figi,
            kind,
            balance,
            price,
            spread,
            is_floating,
            payment_frequency,
            next_payment_date,
            maturity,
            settlement_date: clo_core::far_future(),
            cpr,
            cdr,
            recovery_rate,
            cpr_lockout_end,
            cdr_lockout_end,
            price_override: None,
            state,
            interest_paid: Money::zero(),
            principal_paid: Money::zero(),
            scheduled_principal: Money::zero(),
            unscheduled_principal: Money::zero(),
            defaulted_principal: Money::zero(),
            recovered_principal: Money::zero(),
            history: Vec::new(),
        })
    }

    fn prior_payment_date(next_payment_date: Date, frequency: Frequency, report_date: Date) -> Date {
        let mut prior = next_payment_date;
        loop {
            let candidate = prior.add_months(-frequency.months_per_period());
            if candidate > report_date {
                prior = candidate;
            } else {
                return candidate;
            }
        }
    }

    /// This asset's identifier.
    pub fn figi(&self) -> &str {
        &self.figi
    }

    /// Outstanding balance.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Current quoted price (fraction of par).
    pub fn price(&self) -> rust_decimal::Decimal {
        self.price
    }

    /// Current all-in coupon (base rate + spread for floaters).
    pub fn coupon(&self) -> Rate {
        self.state.rate
    }

    /// Cumulative interest accrued but not yet paid.
    pub fn accrued_interest(&self) -> Money {
        self.state.accrued
    }

    /// Spread over the reference curve (floating only).
    pub fn spread(&self) -> Rate {
        self.spread
    }

    /// Overrides the price used at settlement (e.g. the NAV-90 or an
    /// explicit liquidation valuation), in place of the quoted `price`.
    pub fn set_price_override(&mut self, price: Option<rust_decimal::Decimal>) {
        self.price_override = price;
    }

    /// Legal maturity date.
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Next scheduled coupon payment date.
    pub fn next_payment_date(&self) -> Date {
        self.next_payment_date
    }

    /// End of the prepayment lockout window.
    pub fn cpr_lockout_end(&self) -> Date {
        self.cpr_lockout_end
    }

    /// End of the default lockout window.
    pub fn cdr_lockout_end(&self) -> Date {
        self.cdr_lockout_end
    }

    /// This asset's snapshot history.
    pub fn history(&self) -> &[AssetSnapshot] {
        &self.history
    }

    /// Advances this asset to `target`, unrolling any intermediate payment
    /// dates or maturity first. `curve` supplies floating-rate resets.
    ///
    /// The source recurses across payment dates and maturity; a loop with
    /// two early-exit conditions (payment date crossed, maturity crossed)
    /// is equivalent and avoids unbounded recursion depth for long-dated
    /// assets simulated in one large jump.
    pub fn simulate(&mut self, target: Date, curve: Option<&ForwardRateCurve>) {
        if self.balance.inner().is_zero() && self.state.accrued.inner().is_zero() {
            return;
        }

        loop {
            let next_boundary = if self.next_payment_date < target && self.next_payment_date < self.maturity {
                self.next_payment_date
            } else if self.maturity < target {
                self.maturity
            } else {
                target
            };

            let interim = next_boundary < target;
            self.step(next_boundary, curve, interim);

            if !interim {
                break;
            }
        }
    }

    fn step(&mut self, target: Date, curve: Option<&ForwardRateCurve>, interim: bool) {
        let accrue_until = target.min(self.settlement_date);
        let yf = Act360.year_fraction(self.state.last_sim_date, accrue_until);
        self.state.accrue(self.balance, yf);

        let eff_cpr = if accrue_until > self.cpr_lockout_end { self.cpr } else { rust_decimal::Decimal::ZERO };
        let eff_cdr = if accrue_until > self.cdr_lockout_end { self.cdr } else { rust_decimal::Decimal::ZERO };

        let one = rust_decimal::Decimal::ONE;
        let prepayments = self.balance * (one - pow_decimal(one - eff_cpr, yf));
        let balance_after_prepay = self.balance - prepayments;
        let defaults = balance_after_prepay * (one - pow_decimal(one - eff_cdr, yf));

        if !self.balance.inner().is_zero() {
            let recovery = defaults * self.recovery_rate;
            self.principal_paid += recovery;
            self.recovered_principal += recovery;
            self.defaulted_principal += defaults;

            let wipe_fraction = defaults.inner() / self.balance.inner();
            self.state.accrued -= self.state.accrued * wipe_fraction;

            let prepay_fraction = prepayments.inner() / self.balance.inner();
            let prepaid_accrual = self.state.accrued * prepay_fraction;
            self.state.accrued -= prepaid_accrual;
            self.interest_paid += prepaid_accrual;

            self.principal_paid += prepayments;
            self.unscheduled_principal += prepayments;
        }

        self.balance -= prepayments + defaults;

        if target == self.next_payment_date {
            self.interest_paid += self.state.accrued;
            self.state.accrued = Money::zero();

            if self.is_floating {
                if let Some(curve) = curve {
                    self.state.rate = Rate::from(curve.rate_at(target)) + self.spread;
                }
            }
            self.next_payment_date = self.next_payment_date.add_months(self.payment_frequency.months_per_period());
        }

        if target >= self.maturity {
            self.principal_paid += self.balance;
            self.scheduled_principal += self.balance;
            self.balance = Money::zero();
            self.interest_paid += self.state.accrued;
            self.state.accrued = Money::zero();
            self.maturity = clo_core::far_future();
        }

        if target >= self.settlement_date {
            let effective_price = self.price_override.unwrap_or(self.price);
            let proceeds = effective_price * self.balance.inner();
            self.principal_paid += Money::from(proceeds);
            self.unscheduled_principal += Money::from(proceeds);
            self.balance = Money::zero();
        }

        self.state.last_sim_date = accrue_until;

        if interim {
            return;
        }

        self.push_snapshot(accrue_until);
    }

    fn push_snapshot(&mut self, date: Date) {
        self.history.push(AssetSnapshot {
            date,
            balance: self.balance,
            principal_paid: self.principal_paid,
            scheduled_principal: self.scheduled_principal,
            unscheduled_principal: self.unscheduled_principal,
            defaulted_principal: self.defaulted_principal,
            recovered_principal: self.recovered_principal,
            interest_paid: self.interest_paid,
            period_accrual: self.state.period_accrual,
            interest_accrued: self.state.accrued,
            coupon: self.state.rate,
            spread: self.spread,
            base_rate: if self.is_floating { self.state.rate - self.spread } else { Rate::zero() },
            price: self.price,
        });

        self.state.reset_period_accrual();
        self.interest_paid = Money::zero();
        self.principal_paid = Money::zero();
        self.scheduled_principal = Money::zero();
        self.unscheduled_principal = Money::zero();
        self.defaulted_principal = Money::zero();
        self.recovered_principal = Money::zero();
    }

    /// Re-seeds accrued interest to a portfolio-supplied cutoff date, using
    /// the same formula as construction-time backdating.
    pub fn backdate(&mut self, cutoff_date: Date) {
        let prior_payment_date = Self::prior_payment_date(self.next_payment_date, self.payment_frequency, cutoff_date);
        self.state.accrued = self.balance * self.state.rate.inner() * Act360.year_fraction(prior_payment_date, cutoff_date);
        self.state.last_sim_date = cutoff_date;
    }

    /// This step's realised principal, as recorded on the last snapshot.
    pub fn principal_paid(&self) -> Money {
        self.history.last().map(|s| s.principal_paid).unwrap_or(Money::zero())
    }

    /// Moves this step's realised interest (as recorded on the last
    /// snapshot) into `dst`.
    pub fn sweep_interest(&mut self, dst: &mut Money) {
        let amount = self.history.last().map(|s| s.interest_paid).unwrap_or(Money::zero());
        *dst += amount;
    }

    /// Moves this step's realised principal into `dst`.
    pub fn sweep_principal(&mut self, dst: &mut Money) {
        let amount = self.history.last().map(|s| s.principal_paid).unwrap_or(Money::zero());
        *dst += amount;
    }

    /// Schedules settlement `T+n` UK business days after `accrual_date`
    /// (10 days for loans, 2 for bonds). Idempotent when called again with
    /// the same `accrual_date`.
    pub fn liquidate(&mut self, accrual_date: Date) {
        let settlement_days = match self.kind {
            AssetKind::Loan => 10,
            AssetKind::Bond => 2,
        };
        self.settlement_date = add_uk_business_days(accrual_date, settlement_days);
    }
}

/// `base.powf(exponent)` for `Decimal`, via an `f64` round-trip (the source
/// only ever raises a rate-complement to a sub-1 year fraction, where
/// `f64` precision is ample).
fn pow_decimal(base: rust_decimal::Decimal, exponent: rust_decimal::Decimal) -> rust_decimal::Decimal {
    use rust_decimal::prelude::ToPrimitive;
    let base_f = base.to_f64().unwrap_or(1.0);
    let exponent_f = exponent.to_f64().unwrap_or(0.0);
    rust_decimal::Decimal::from_f64_retain(base_f.powf(exponent_f)).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_asset(cpr: rust_decimal::Decimal, cdr: rust_decimal::Decimal, recovery_rate: rust_decimal::Decimal) -> Asset {
        Asset::new(
            "FIGI1",
            AssetKind::Loan,
            Money::from(dec!(1_000_000)),
            dec!(1.0),
            Rate::from(dec!(0.05)),
            Rate::zero(),
            false,
            Frequency::Quarterly,
            Date::from_ymd(2025, 4, 1).unwrap(),
            Date::from_ymd(2026, 1, 1).unwrap(),
            cpr,
            cdr,
            recovery_rate,
            Date::from_ymd(2000, 1, 1).unwrap(),
            Date::from_ymd(2000, 1, 1).unwrap(),
            Date::from_ymd(2025, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_already_matured_assets() {
        let result = Asset::new(
            "FIGI2",
            AssetKind::Loan,
            Money::from(dec!(100)),
            dec!(1.0),
            Rate::from(dec!(0.05)),
            Rate::zero(),
            false,
            Frequency::Quarterly,
            Date::from_ymd(2024, 1, 1).unwrap(),
            Date::from_ymd(2024, 6, 1).unwrap(),
            dec!(0),
            dec!(0),
            dec!(1),
            clo_core::far_future(),
            clo_core::far_future(),
            Date::from_ymd(2025, 1, 1).unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_cpr_cdr_amortises_at_maturity_only() {
        let mut asset = sample_asset(dec!(0), dec!(0), dec!(1));
        asset.simulate(Date::from_ymd(2026, 1, 1).unwrap(), None);
        assert_eq!(asset.balance().inner(), dec!(0));
        assert_eq!(asset.history().last().unwrap().scheduled_principal.inner(), dec!(1_000_000));
    }

    #[test]
    fn full_prepayment_clears_balance_in_first_step() {
        let mut asset = sample_asset(dec!(1.0), dec!(0), dec!(1));
        asset.simulate(Date::from_ymd(2025, 4, 1).unwrap(), None);
        assert_eq!(asset.balance().inner(), dec!(0));
    }

    #[test]
    fn full_default_with_zero_recovery_pays_no_principal() {
        let mut asset = sample_asset(dec!(0), dec!(1.0), dec!(0));
        asset.simulate(Date::from_ymd(2025, 4, 1).unwrap(), None);
        assert_eq!(asset.balance().inner(), dec!(0));
        assert_eq!(asset.history().last().unwrap().principal_paid.inner(), dec!(0));
    }

    #[test]
    fn liquidate_is_idempotent_for_the_same_accrual_date() {
        let mut asset = sample_asset(dec!(0), dec!(0), dec!(1));
        let accrual_date = Date::from_ymd(2025, 6, 1).unwrap();
        asset.liquidate(accrual_date);
        let first = asset.settlement_date;
        asset.liquidate(accrual_date);
        assert_eq!(asset.settlement_date, first);
    }
}
