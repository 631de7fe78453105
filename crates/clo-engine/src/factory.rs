//! Assembles a [`Clo`] from plain input records.
//!
//! Mirrors the source factory's wiring order: build assets (dropping
//! matured collateral), build tranches sorted senior to junior with the
//! equity tranche forced last, wire both waterfalls against that same
//! ordering, then hand everything to [`Clo::new`] for the backdating pass.

use tracing::warn;

use clo_curves::ForwardRateCurve;

use crate::asset::Asset;
use crate::clo::Clo;
use crate::error::{EngineError, EngineResult};
use crate::fee::{Fee, IncentiveFee};
use crate::input::{CollateralInput, DealInput, ScenarioInput, TrancheInput};
use crate::portfolio::Portfolio;
use crate::tranche::Tranche;
use crate::waterfall::{Waterfall, WaterfallEntry};

/// Seniority rank used to sort debt tranches; unrecognised ratings sort
/// to the most junior end, ahead of equity only.
fn rating_rank(rating: &str) -> i32 {
    match rating.to_ascii_uppercase().as_str() {
        "AAA" => 0,
        "AA" => 1,
        "A" => 2,
        "BBB" => 3,
        "BB" => 4,
        "B" => 5,
        _ => 6,
    }
}

/// Builds a ready-to-run [`Clo`] from deal, tranche, collateral, and
/// scenario inputs, plus the named forward curve used for floating
/// resets and reinvestment pricing.
pub fn build(
    deal: &DealInput,
    tranche_inputs: &[TrancheInput],
    collateral: &[CollateralInput],
    scenario: &ScenarioInput,
    reinvestment_curve: ForwardRateCurve,
) -> EngineResult<Clo> {
    let mut portfolio = Portfolio::new();
    for row in collateral {
        if row.maturity_date <= deal.report_date {
            warn!(figi = %row.figi, maturity = %row.maturity_date, "dropping matured collateral row");
            continue;
        }

        let cpr_lockout_end = deal.report_date.add_months(scenario.cpr_lockout_months);
        let cdr_lockout_end = if scenario.use_top_down_defaults {
            clo_core::far_future()
        } else {
            deal.report_date.add_months(scenario.cdr_lockout_months)
        };

        let asset = Asset::new(
            row.figi.clone(),
            row.kind,
            row.balance,
            row.price,
            row.coupon,
            row.spread,
            row.is_floating,
            row.payment_frequency,
            row.next_payment_date,
            row.maturity_date,
            scenario.cpr,
            scenario.cdr,
            scenario.recovery_rate,
            cpr_lockout_end,
            cdr_lockout_end,
            deal.report_date,
        )?;
        portfolio.push(asset);
    }

    if portfolio.is_empty() {
        return Err(EngineError::data_integrity("no unmatured collateral rows to build a portfolio from"));
    }

    let mut debts: Vec<&TrancheInput> = tranche_inputs.iter().filter(|t| !t.is_equity).collect();
    debts.sort_by_key(|t| rating_rank(&t.rating));

    let equity_input = tranche_inputs
        .iter()
        .find(|t| t.is_equity)
        .ok_or_else(|| EngineError::invalid_input("deal has no equity tranche row"))?;

    let mut tranches = Vec::with_capacity(tranche_inputs.len());
    for input in &debts {
        tranches.push(Tranche::new(
            input.rating.clone(),
            false,
            input.is_fixed,
            input.balance,
            input.coupon_or_margin,
            deal.next_payment_date,
        ));
    }
    let equity_index = tranches.len();
    tranches.push(Tranche::new(
        equity_input.rating.clone(),
        true,
        equity_input.is_fixed,
        equity_input.balance,
        equity_input.coupon_or_margin,
        deal.next_payment_date,
    ));

    let mut entries = vec![WaterfallEntry::SeniorManagementFee];
    entries.extend((0..debts.len()).map(WaterfallEntry::DebtTranche));
    entries.push(WaterfallEntry::JuniorManagementFee);
    entries.push(WaterfallEntry::IncentiveFee);
    entries.push(WaterfallEntry::Equity(equity_index));

    let interest_waterfall = Waterfall::new(entries.clone());
    let principal_waterfall = Waterfall::new(entries);

    let senior_fee = Fee::new(
        "Senior Management Fee",
        deal.senior_management_fee_rate,
        deal.senior_fee_fixed_expense,
        deal.senior_fee_rebate_fraction,
        clo_core::Money::zero(),
        deal.next_payment_date,
    );
    let junior_fee = Fee::new(
        "Junior Management Fee",
        deal.junior_management_fee_rate,
        deal.junior_fee_fixed_expense,
        deal.junior_fee_rebate_fraction,
        clo_core::Money::zero(),
        deal.next_payment_date,
    );
    let incentive_fee = IncentiveFee::new(
        deal.incentive_fee_irr_balance,
        deal.incentive_fee_irr_hurdle_rate,
        deal.incentive_fee_diversion_rate,
        deal.next_payment_date,
    );

    Clo::new(
        deal.report_date,
        deal.next_payment_date,
        deal.reinvestment_end_date,
        deal.payment_frequency,
        portfolio,
        deal.collection_account_principal_balance,
        tranches,
        senior_fee,
        junior_fee,
        incentive_fee,
        interest_waterfall,
        principal_waterfall,
        scenario.cpr,
        scenario.cdr,
        scenario.recovery_rate,
        scenario.reinvestment_maturity_months,
        scenario.wal_limit_years,
        reinvestment_curve,
        scenario.liquidation_type,
    )
}
