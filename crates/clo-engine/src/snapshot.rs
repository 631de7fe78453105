//! Append-only per-entity snapshot history.
//!
//! Snapshots reference their owning entity by position in its `History`, not
//! by pointer; each entity pushes exactly one snapshot per simulated step.

use clo_core::{Date, Money, Rate};
use serde::{Deserialize, Serialize};

/// An append-only, ordered list of snapshots for one entity.
pub type History<S> = Vec<S>;

/// A snapshot of the CLO as a whole, taken once per monthly step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CloSnapshot {
    /// The date this snapshot was taken.
    pub date: Date,
    /// Sum of all debt tranche balances.
    pub total_debt: Money,
    /// Sum of all asset par balances.
    pub total_asset_par: Money,
    /// Portfolio interest accrued but not yet swept.
    pub interest_accrued: Money,
    /// Interest swept into the interest account this step.
    pub interest_swept: Money,
    /// Interest account balance after this step.
    pub interest_account_balance: Money,
    /// Principal swept into the principal account this step.
    pub principal_swept: Money,
    /// Principal account balance after this step.
    pub principal_account_balance: Money,
    /// Principal used to buy reinvestment assets this step.
    pub principal_reinvested: Money,
    /// Portfolio balance-weighted average spread.
    pub weighted_average_spread: Rate,
    /// Portfolio balance-weighted average coupon.
    pub weighted_average_coupon: Rate,
    /// Portfolio balance-weighted average price.
    pub weighted_average_price: rust_decimal::Decimal,
    /// Portfolio balance-weighted average life, in years.
    pub weighted_average_life: rust_decimal::Decimal,
    /// Market-value NAV.
    pub nav: Money,
    /// NAV-90 valuation.
    pub nav_90: Money,
}

/// A snapshot of a single [`crate::asset::Asset`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// The date this snapshot was taken.
    pub date: Date,
    /// Outstanding balance after this step.
    pub balance: Money,
    /// Principal paid this step (scheduled + unscheduled + recovered).
    pub principal_paid: Money,
    /// Scheduled principal paid at maturity this step.
    pub scheduled_principal: Money,
    /// Unscheduled principal (prepayment or sale proceeds) this step.
    pub unscheduled_principal: Money,
    /// Principal that defaulted this step.
    pub defaulted_principal: Money,
    /// Principal recovered out of this step's defaults.
    pub recovered_principal: Money,
    /// Interest paid this step.
    pub interest_paid: Money,
    /// Interest accrued within this step.
    pub period_accrual: Money,
    /// Cumulative interest accrued but not yet paid.
    pub interest_accrued: Money,
    /// Current all-in coupon.
    pub coupon: Rate,
    /// Current spread over the reference curve (floating only).
    pub spread: Rate,
    /// Current reference-curve base rate (floating only; zero for fixed).
    pub base_rate: Rate,
    /// Current quoted price (fraction of par).
    pub price: rust_decimal::Decimal,
}

/// A snapshot of a single [`crate::tranche::Tranche`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrancheSnapshot {
    /// The date this snapshot was taken.
    pub date: Date,
    /// Outstanding balance after this step.
    pub balance: Money,
    /// Interest paid this step.
    pub interest_paid: Money,
    /// Cumulative interest accrued but not yet paid.
    pub interest_accrued: Money,
    /// Interest accrued within this step.
    pub interest_accrued_over_period: Money,
    /// Cumulative PIK'd deferred interest outstanding.
    pub deferred_interest: Money,
    /// Deferred interest paid down this step.
    pub deferred_interest_paid: Money,
    /// Deferred interest newly accrued this step.
    pub deferred_interest_accrued_over_period: Money,
    /// Principal paid this step.
    pub principal_paid: Money,
    /// `principal_paid / initial_balance` for this step.
    pub pct_principal: rust_decimal::Decimal,
    /// Amortisation percentage recorded under a principal-sourced payment.
    pub pct_amortization: rust_decimal::Decimal,
    /// Current coupon.
    pub coupon: Rate,
    /// Current reference-curve base rate (floating only).
    pub base_rate: Rate,
    /// Management-fee rebate routed through this tranche's waterfall entry, if any.
    pub fee_rebate: Money,
}

/// A snapshot of a [`crate::fee::Fee`] or [`crate::fee::IncentiveFee`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeeSnapshot {
    /// The date this snapshot was taken.
    pub date: Date,
    /// Current balance (collateral-pegged for management fees, IRR cushion for incentive fees).
    pub balance: Money,
    /// Interest accrued within this step.
    pub period_accrual: Money,
    /// Cumulative accrued but unpaid amount.
    pub accrued: Money,
    /// Amount paid this step.
    pub paid: Money,
    /// Rebate routed back to equity this step.
    pub rebate: Money,
}
