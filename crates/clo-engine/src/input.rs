//! Typed input records consumed by [`crate::factory::build`].
//!
//! These are this crate's entire "configuration" surface: there is no file
//! or environment-variable parsing here, only plain data handed over by the
//! (out-of-scope) loader.

use clo_core::{Date, Frequency, Money, Rate};

/// Kind of collateral asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// A leveraged loan, settling T+10 UK business days.
    Loan,
    /// A bond, settling T+2 UK business days.
    Bond,
}

impl AssetKind {
    /// Parses a case-insensitive `"loan"` / `"bond"` string.
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "loan" => Some(AssetKind::Loan),
            "bond" => Some(AssetKind::Bond),
            _ => None,
        }
    }
}

/// How a triggered liquidation values the portfolio's proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidationType {
    /// `portfolio.market_value()`.
    Market,
    /// `portfolio.market_value_90()`.
    Nav90,
    /// A caller-supplied override amount, carried alongside this variant.
    Override(Money),
}

/// Deal-level parameters, constant for the life of the simulation.
#[derive(Debug, Clone)]
pub struct DealInput {
    /// Reporting date the deal snapshot was taken on.
    pub report_date: Date,
    /// The next scheduled tranche/fee payment date.
    pub next_payment_date: Date,
    /// Tranche/fee coupon payment frequency (the CLO's own cadence, distinct
    /// from any individual asset's payment frequency).
    pub payment_frequency: Frequency,
    /// End of the reinvestment period.
    pub reinvestment_end_date: Date,
    /// End of the non-call period (informational; not enforced by the core).
    pub non_call_end_date: Date,
    /// Starting balance of the principal collection account.
    pub collection_account_principal_balance: Money,
    /// Senior management fee, annualised decimal rate.
    pub senior_management_fee_rate: Rate,
    /// Senior management fee's optional fixed annual expense component.
    pub senior_fee_fixed_expense: Money,
    /// Fraction of the senior fee's variable portion rebated back to equity.
    pub senior_fee_rebate_fraction: Rate,
    /// Junior (subordinated) management fee, annualised decimal rate.
    pub junior_management_fee_rate: Rate,
    /// Junior management fee's optional fixed annual expense component.
    pub junior_fee_fixed_expense: Money,
    /// Fraction of the junior fee's variable portion rebated back to equity.
    pub junior_fee_rebate_fraction: Rate,
    /// Incentive fee's initial IRR-hurdle balance.
    pub incentive_fee_irr_balance: Money,
    /// Incentive fee's IRR hurdle rate.
    pub incentive_fee_irr_hurdle_rate: Rate,
    /// Incentive fee's diversion rate applied to excess over the hurdle.
    pub incentive_fee_diversion_rate: Rate,
    /// Optional WAL ceiling (years) used to size reinvestment maturities.
    pub wal_limit_years: Option<rust_decimal::Decimal>,
}

/// One row of the tranche capital structure.
#[derive(Debug, Clone)]
pub struct TrancheInput {
    /// Rating/name, e.g. `"AAA"`, `"B"`, `"Equity"`.
    pub rating: String,
    /// Whether this is the equity (residual) tranche.
    pub is_equity: bool,
    /// Whether this tranche pays a fixed coupon (30E/360 ISDA) rather than floating (ACT/360).
    pub is_fixed: bool,
    /// Current balance.
    pub balance: Money,
    /// Coupon (fixed tranches) or margin over the reference curve (floating tranches).
    pub coupon_or_margin: Rate,
}

/// One row of the collateral pool.
#[derive(Debug, Clone)]
pub struct CollateralInput {
    /// Bloomberg id, or LoanX id fallback — the asset's identifier.
    pub figi: String,
    /// Loan or bond.
    pub kind: AssetKind,
    /// Face value / current balance.
    pub balance: Money,
    /// Quoted price, as a fraction of par (e.g. `0.97`).
    pub price: rust_decimal::Decimal,
    /// Current all-in coupon.
    pub coupon: Rate,
    /// Spread over the reference curve (floating only).
    pub spread: Rate,
    /// Whether the asset resets against a floating reference curve.
    pub is_floating: bool,
    /// Coupon payment frequency.
    pub payment_frequency: Frequency,
    /// Next scheduled coupon payment date.
    pub next_payment_date: Date,
    /// Legal maturity date.
    pub maturity_date: Date,
}

/// Scenario-level behavioural assumptions.
#[derive(Debug, Clone)]
pub struct ScenarioInput {
    /// Constant Prepayment Rate, annualised.
    pub cpr: rust_decimal::Decimal,
    /// Constant Default Rate, annualised.
    pub cdr: rust_decimal::Decimal,
    /// Fraction of defaulted principal recovered.
    pub recovery_rate: rust_decimal::Decimal,
    /// Months after `report_date` before CPR applies.
    pub cpr_lockout_months: i32,
    /// Months after `report_date` before CDR applies.
    pub cdr_lockout_months: i32,
    /// When true, CDR lockout never expires (`cdr_lockout_end_date = 9999-12-31`).
    pub use_top_down_defaults: bool,
    /// Reinvestment-asset maturity, in months from purchase.
    pub reinvestment_maturity_months: i32,
    /// Optional WAL ceiling (years); enables WAL-constrained reinvestment sizing.
    pub wal_limit_years: Option<rust_decimal::Decimal>,
    /// How a triggered liquidation should value proceeds.
    pub liquidation_type: LiquidationType,
}
