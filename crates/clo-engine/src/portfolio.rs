//! Ordered collection of assets: a thin aggregator, not an owner of policy.

use clo_core::{Date, Money, Rate};
use clo_curves::ForwardRateCurve;

use crate::account::CashAccount;
use crate::asset::Asset;
use crate::error::EngineResult;
use crate::input::LiquidationType;

/// The collateral pool backing a CLO, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    assets: Vec<Asset>,
}

impl Portfolio {
    /// An empty portfolio.
    pub fn new() -> Self {
        Self { assets: Vec::new() }
    }

    /// Appends an asset (used at construction and by the reinvestment policy).
    pub fn push(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    /// All assets, in insertion order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Mutable access to all assets, in insertion order.
    pub fn assets_mut(&mut self) -> &mut [Asset] {
        &mut self.assets
    }

    /// Number of assets currently held.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the portfolio holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Advances every asset to `target`, in insertion order.
    pub fn simulate(&mut self, target: Date, curve: Option<&ForwardRateCurve>) {
        for asset in &mut self.assets {
            asset.simulate(target, curve);
        }
    }

    /// Sums each asset's realised interest for the step, credits it to `dst`,
    /// and returns the swept total as a flow distinct from the account's
    /// resulting stock balance.
    pub fn sweep_interest(&mut self, dst: &mut CashAccount) -> EngineResult<Money> {
        let mut total = Money::zero();
        for asset in &mut self.assets {
            asset.sweep_interest(&mut total);
        }
        dst.credit(total)?;
        Ok(total)
    }

    /// Sums each asset's realised principal for the step, credits it to
    /// `dst`, and returns the swept total.
    pub fn sweep_principal(&mut self, dst: &mut CashAccount) -> EngineResult<Money> {
        let mut total = Money::zero();
        for asset in &mut self.assets {
            asset.sweep_principal(&mut total);
        }
        dst.credit(total)?;
        Ok(total)
    }

    /// Schedules settlement on every asset.
    pub fn liquidate(&mut self, accrual_date: Date) {
        for asset in &mut self.assets {
            asset.liquidate(accrual_date);
        }
    }

    /// Re-seeds accrued interest on every asset to `cutoff_date`.
    pub fn backdate(&mut self, cutoff_date: Date) {
        for asset in &mut self.assets {
            asset.backdate(cutoff_date);
        }
    }

    /// Sum of every asset's outstanding balance.
    pub fn total_balance(&self) -> Money {
        self.assets.iter().map(Asset::balance).sum()
    }

    /// Balance-weighted average coupon; zero if the portfolio is empty.
    pub fn weighted_average_coupon(&self) -> Rate {
        self.weighted_average(|a| a.coupon().inner())
    }

    /// Balance-weighted average quoted price; zero if the portfolio is empty.
    pub fn weighted_average_price(&self) -> rust_decimal::Decimal {
        self.weighted_average(|a| a.price())
    }

    /// Balance-weighted average spread; zero if the portfolio is empty.
    pub fn weighted_average_spread(&self) -> Rate {
        self.weighted_average(|a| a.spread().inner())
    }

    /// Sets (or clears) every asset's settlement price override per the
    /// chosen liquidation valuation. NAV-90 floors prices at or above 0.90
    /// to par; Market leaves each asset's own quoted price in force;
    /// Override applies one uniform proceeds-per-dollar-of-balance price
    /// derived from a caller-supplied total.
    pub fn apply_liquidation_pricing(&mut self, liquidation_type: LiquidationType) {
        let floor = rust_decimal::Decimal::new(90, 2);
        let one = rust_decimal::Decimal::ONE;

        match liquidation_type {
            LiquidationType::Market => {
                for asset in &mut self.assets {
                    asset.set_price_override(None);
                }
            }
            LiquidationType::Nav90 => {
                for asset in &mut self.assets {
                    let effective = if asset.price() >= floor { one } else { asset.price() };
                    asset.set_price_override(Some(effective));
                }
            }
            LiquidationType::Override(amount) => {
                let total = self.total_balance();
                let uniform_price = if total.inner().is_zero() {
                    rust_decimal::Decimal::ZERO
                } else {
                    amount.inner() / total.inner()
                };
                for asset in &mut self.assets {
                    asset.set_price_override(Some(uniform_price));
                }
            }
        }
    }

    fn weighted_average<F>(&self, f: F) -> Rate
    where
        F: Fn(&Asset) -> rust_decimal::Decimal,
    {
        let total = self.total_balance();
        if total.inner().is_zero() {
            return Rate::zero();
        }
        let weighted: rust_decimal::Decimal = self
            .assets
            .iter()
            .map(|a| a.balance().inner() * f(a))
            .sum();
        Rate::from(weighted / total.inner())
    }

    /// Balance-weighted year-fraction (ACT/360) from `report_date` to each
    /// asset's maturity.
    pub fn weighted_average_life(&self, report_date: Date) -> rust_decimal::Decimal {
        use clo_core::daycounts::{Act360, DayCount};

        let total = self.total_balance();
        if total.inner().is_zero() {
            return rust_decimal::Decimal::ZERO;
        }
        let weighted: rust_decimal::Decimal = self
            .assets
            .iter()
            .map(|a| a.balance().inner() * Act360.year_fraction(report_date, a.maturity()))
            .sum();
        weighted / total.inner()
    }

    /// `Σ (price · balance + principal_paid)`.
    pub fn market_value(&self) -> Money {
        self.assets
            .iter()
            .map(|a| a.balance() * a.price() + a.principal_paid())
            .sum()
    }

    /// NAV-90: values assets priced at or above 0.90 at par, and below 0.90
    /// at their quoted price.
    pub fn market_value_90(&self) -> Money {
        let one = rust_decimal::Decimal::ONE;
        let floor = rust_decimal::Decimal::new(90, 2);
        self.assets
            .iter()
            .map(|a| {
                let effective_price = if a.price() >= floor { one } else { a.price() };
                a.balance() * effective_price
            })
            .sum()
    }

    /// The first asset's CPR lockout end, the portfolio-uniform value every
    /// factory-built asset shares.
    pub fn cpr_lockout_end_date(&self) -> Option<Date> {
        self.assets.first().map(Asset::cpr_lockout_end)
    }

    /// The first asset's CDR lockout end.
    pub fn cdr_lockout_end_date(&self) -> Option<Date> {
        self.assets.first().map(Asset::cdr_lockout_end)
    }
}
