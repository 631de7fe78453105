//! End-to-end scenarios run through the public `build`/`simulate` surface.

use clo_core::{Date, Frequency};
use clo_curves::ForwardRateCurve;
use rust_decimal_macros::dec;

use clo_engine::input::{AssetKind, CollateralInput, DealInput, LiquidationType, ScenarioInput, TrancheInput};
use clo_engine::{build, Asset, IncentiveFee, Portfolio};

fn flat_curve(rate: rust_decimal::Decimal) -> ForwardRateCurve {
    ForwardRateCurve::new(
        "FLAT",
        vec![Date::from_ymd(2020, 1, 1).unwrap(), Date::from_ymd(2035, 1, 1).unwrap()],
        vec![rate, rate],
    )
    .unwrap()
}

fn base_deal(report_date: Date, next_payment_date: Date, reinvestment_end_date: Date) -> DealInput {
    DealInput {
        report_date,
        next_payment_date,
        payment_frequency: Frequency::Quarterly,
        reinvestment_end_date,
        non_call_end_date: next_payment_date,
        collection_account_principal_balance: clo_core::Money::zero(),
        senior_management_fee_rate: clo_core::Rate::zero(),
        senior_fee_fixed_expense: clo_core::Money::zero(),
        senior_fee_rebate_fraction: clo_core::Rate::zero(),
        junior_management_fee_rate: clo_core::Rate::zero(),
        junior_fee_fixed_expense: clo_core::Money::zero(),
        junior_fee_rebate_fraction: clo_core::Rate::zero(),
        incentive_fee_irr_balance: clo_core::Money::zero(),
        incentive_fee_irr_hurdle_rate: clo_core::Rate::from(dec!(0.08)),
        incentive_fee_diversion_rate: clo_core::Rate::from(dec!(0.20)),
        wal_limit_years: None,
    }
}

fn base_scenario(cpr: rust_decimal::Decimal, cdr: rust_decimal::Decimal, recovery_rate: rust_decimal::Decimal) -> ScenarioInput {
    ScenarioInput {
        cpr,
        cdr,
        recovery_rate,
        cpr_lockout_months: 0,
        cdr_lockout_months: 0,
        use_top_down_defaults: false,
        reinvestment_maturity_months: 60,
        wal_limit_years: None,
        liquidation_type: LiquidationType::Market,
    }
}

fn one_loan(maturity: Date, next_payment_date: Date) -> CollateralInput {
    CollateralInput {
        figi: "LOAN1".to_string(),
        kind: AssetKind::Loan,
        balance: clo_core::Money::from(dec!(1_000_000)),
        price: dec!(1.0),
        coupon: clo_core::Rate::from(dec!(0.05)),
        spread: clo_core::Rate::zero(),
        is_floating: false,
        payment_frequency: Frequency::Quarterly,
        next_payment_date,
        maturity_date: maturity,
    }
}

fn single_debt_tranche(rating: &str, balance: rust_decimal::Decimal, coupon: rust_decimal::Decimal) -> TrancheInput {
    TrancheInput {
        rating: rating.to_string(),
        is_equity: false,
        is_fixed: true,
        balance: clo_core::Money::from(balance),
        coupon_or_margin: clo_core::Rate::from(coupon),
    }
}

fn equity_tranche(balance: rust_decimal::Decimal) -> TrancheInput {
    TrancheInput {
        rating: "Equity".to_string(),
        is_equity: true,
        is_fixed: false,
        balance: clo_core::Money::from(balance),
        coupon_or_margin: clo_core::Rate::zero(),
    }
}

fn sum_money<'a>(amounts: impl Iterator<Item = &'a clo_core::Money>) -> rust_decimal::Decimal {
    amounts.fold(rust_decimal::Decimal::ZERO, |acc, m| acc + m.inner())
}

#[test]
fn scenario_a_trivial_amortisation_pays_par_at_maturity_and_splits_residual_interest() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2026, 1, 1).unwrap();
    let reinvestment_end_date = Date::from_ymd(2025, 6, 1).unwrap();

    let deal = base_deal(report_date, next_payment_date, reinvestment_end_date);
    let scenario = base_scenario(dec!(0), dec!(0), dec!(1));
    let collateral = vec![one_loan(maturity, next_payment_date)];
    let tranches = vec![single_debt_tranche("AAA", dec!(1_000_000), dec!(0.02)), equity_tranche(dec!(0))];

    let mut clo = build(&deal, &tranches, &collateral, &scenario, flat_curve(dec!(0.0))).unwrap();
    clo.simulate().unwrap();

    let aaa = &clo.tranches()[0];
    assert!(!aaa.is_equity());
    assert_eq!(aaa.balance().inner(), rust_decimal::Decimal::ZERO);

    let aaa_principal: rust_decimal::Decimal = sum_money(aaa.history().iter().map(|s| &s.principal_paid));
    assert_eq!(aaa_principal, dec!(1_000_000));

    let aaa_interest: rust_decimal::Decimal = sum_money(aaa.history().iter().map(|s| &s.interest_paid));
    // 30E/360 ISDA over a full Jan1-Jan1 year is exactly 1.0, so this is exact.
    assert_eq!(aaa_interest, dec!(20_000));

    let equity = &clo.tranches()[1];
    let equity_interest: rust_decimal::Decimal = sum_money(equity.history().iter().map(|s| &s.interest_paid));
    // Asset side accrues ACT/360, so the full-year total is slightly above the
    // naively-quarterly 50,000; equity sweeps whatever remains after AAA.
    assert!(equity_interest > dec!(29_000) && equity_interest < dec!(32_000));
}

#[test]
fn scenario_b_full_prepayment_returns_all_principal_in_first_period() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2026, 1, 1).unwrap();
    let reinvestment_end_date = Date::from_ymd(2025, 1, 1).unwrap();

    let deal = base_deal(report_date, next_payment_date, reinvestment_end_date);
    let scenario = base_scenario(dec!(1.0), dec!(0), dec!(1));
    let collateral = vec![one_loan(maturity, next_payment_date)];
    let tranches = vec![single_debt_tranche("AAA", dec!(1_000_000), dec!(0.02)), equity_tranche(dec!(0))];

    let mut clo = build(&deal, &tranches, &collateral, &scenario, flat_curve(dec!(0.0))).unwrap();
    clo.simulate().unwrap();

    assert_eq!(clo.portfolio().total_balance().inner(), rust_decimal::Decimal::ZERO);

    let total_principal: rust_decimal::Decimal = clo
        .tranches()
        .iter()
        .flat_map(|t| t.history().iter())
        .fold(rust_decimal::Decimal::ZERO, |acc, s| acc + s.principal_paid.inner());
    assert_eq!(total_principal, dec!(1_000_000));
}

#[test]
fn scenario_c_full_default_zero_recovery_pays_no_principal_to_any_tranche() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2026, 1, 1).unwrap();
    let reinvestment_end_date = Date::from_ymd(2025, 1, 1).unwrap();

    let deal = base_deal(report_date, next_payment_date, reinvestment_end_date);
    let scenario = base_scenario(dec!(0), dec!(1.0), dec!(0));
    let collateral = vec![one_loan(maturity, next_payment_date)];
    let tranches = vec![single_debt_tranche("AAA", dec!(1_000_000), dec!(0.02)), equity_tranche(dec!(0))];

    let mut clo = build(&deal, &tranches, &collateral, &scenario, flat_curve(dec!(0.0))).unwrap();
    clo.simulate().unwrap();

    assert_eq!(clo.portfolio().total_balance().inner(), rust_decimal::Decimal::ZERO);

    let total_principal: rust_decimal::Decimal = clo
        .tranches()
        .iter()
        .flat_map(|t| t.history().iter())
        .fold(rust_decimal::Decimal::ZERO, |acc, s| acc + s.principal_paid.inner());
    assert_eq!(total_principal, rust_decimal::Decimal::ZERO);
}

#[test]
fn scenario_d_pik_cascade_grows_deferred_interest_on_the_junior_tranche() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2026, 1, 1).unwrap();
    let reinvestment_end_date = Date::from_ymd(2025, 1, 1).unwrap();

    let deal = base_deal(report_date, next_payment_date, reinvestment_end_date);
    let scenario = base_scenario(dec!(0), dec!(0), dec!(1));

    let collateral = vec![CollateralInput {
        coupon: clo_core::Rate::from(dec!(0.02)),
        ..one_loan(maturity, next_payment_date)
    }];
    let tranches = vec![
        single_debt_tranche("AAA", dec!(900_000), dec!(0.01)),
        single_debt_tranche("B", dec!(100_000), dec!(0.15)),
        equity_tranche(dec!(0)),
    ];

    let mut clo = build(&deal, &tranches, &collateral, &scenario, flat_curve(dec!(0.0))).unwrap();
    clo.simulate().unwrap();

    let junior = clo.tranches().iter().find(|t| t.rating() == "B").unwrap();
    assert!(junior.deferred_interest().inner() > rust_decimal::Decimal::ZERO);

    let aaa = clo.tranches().iter().find(|t| t.rating() == "AAA").unwrap();
    assert_eq!(aaa.deferred_interest().inner(), rust_decimal::Decimal::ZERO);
}

#[test]
fn scenario_e_nav90_liquidation_floors_high_priced_assets_and_leaves_low_priced_assets_alone() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2030, 1, 1).unwrap();

    let mut portfolio = Portfolio::new();
    portfolio.push(
        Asset::new(
            "HIGH",
            AssetKind::Loan,
            clo_core::Money::from(dec!(1_000_000)),
            dec!(0.95),
            clo_core::Rate::from(dec!(0.05)),
            clo_core::Rate::zero(),
            false,
            Frequency::Quarterly,
            next_payment_date,
            maturity,
            dec!(0),
            dec!(0),
            dec!(1),
            Date::from_ymd(2000, 1, 1).unwrap(),
            Date::from_ymd(2000, 1, 1).unwrap(),
            report_date,
        )
        .unwrap(),
    );
    portfolio.push(
        Asset::new(
            "LOW",
            AssetKind::Loan,
            clo_core::Money::from(dec!(1_000_000)),
            dec!(0.60),
            clo_core::Rate::from(dec!(0.05)),
            clo_core::Rate::zero(),
            false,
            Frequency::Quarterly,
            next_payment_date,
            maturity,
            dec!(0),
            dec!(0),
            dec!(1),
            Date::from_ymd(2000, 1, 1).unwrap(),
            Date::from_ymd(2000, 1, 1).unwrap(),
            report_date,
        )
        .unwrap(),
    );

    let accrual_date = Date::from_ymd(2025, 6, 1).unwrap();
    portfolio.apply_liquidation_pricing(LiquidationType::Nav90);
    portfolio.liquidate(accrual_date);

    let settlement_date = clo_core::calendars::add_uk_business_days(accrual_date, 10);
    portfolio.simulate(settlement_date, None);

    let high = portfolio.assets().iter().find(|a| a.figi() == "HIGH").unwrap();
    let low = portfolio.assets().iter().find(|a| a.figi() == "LOW").unwrap();

    let high_proceeds: rust_decimal::Decimal = sum_money(high.history().iter().map(|s| &s.unscheduled_principal));
    let low_proceeds: rust_decimal::Decimal = sum_money(low.history().iter().map(|s| &s.unscheduled_principal));

    assert_eq!(high_proceeds, dec!(1_000_000));
    assert_eq!(low_proceeds, dec!(600_000));
}

#[test]
fn scenario_f_incentive_fee_kicks_in_only_after_the_irr_hurdle_clears() {
    let start = Date::from_ymd(2025, 1, 1).unwrap();
    let mut fee = IncentiveFee::new(
        clo_core::Money::from(dec!(1_000_000)),
        clo_core::Rate::from(dec!(0.08)),
        clo_core::Rate::from(dec!(0.20)),
        start,
    );

    let mut paid_each_period = Vec::new();
    let mut cursor = start;
    for _ in 0..5 {
        cursor = cursor.add_months(3);
        fee.simulate(cursor);
        let mut account = clo_engine::CashAccount::new(clo_core::Money::from(dec!(50_000)));
        fee.pay(&mut account).unwrap();
        fee.push_snapshot(cursor);
        paid_each_period.push(fee.history().last().unwrap().paid);
        assert!(fee.balance().inner() > rust_decimal::Decimal::ZERO);
    }
    assert!(paid_each_period.iter().all(|p| p.inner().is_zero()));

    cursor = cursor.add_months(3);
    fee.simulate(cursor);
    let mut account = clo_engine::CashAccount::new(clo_core::Money::from(dec!(2_000_000)));
    fee.pay(&mut account).unwrap();
    fee.push_snapshot(cursor);

    let sixth_period_paid = fee.history().last().unwrap().paid;
    assert!(sixth_period_paid.inner() > rust_decimal::Decimal::ZERO);
    assert_eq!(fee.balance().inner(), rust_decimal::Decimal::ZERO);

    // Once fully cleared, a further payment keeps diverting the 20% carry
    // and the hurdle balance stays pinned at zero (never negative).
    cursor = cursor.add_months(3);
    fee.simulate(cursor);
    let mut account = clo_engine::CashAccount::new(clo_core::Money::from(dec!(100_000)));
    fee.pay(&mut account).unwrap();
    assert_eq!(fee.balance().inner(), rust_decimal::Decimal::ZERO);
}

#[test]
fn law_cdr_cpr_zero_conserves_total_principal_paid() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2026, 1, 1).unwrap();

    let mut portfolio = Portfolio::new();
    portfolio.push(
        Asset::new(
            "LOAN1",
            AssetKind::Loan,
            clo_core::Money::from(dec!(1_000_000)),
            dec!(1.0),
            clo_core::Rate::from(dec!(0.05)),
            clo_core::Rate::zero(),
            false,
            Frequency::Quarterly,
            next_payment_date,
            maturity,
            dec!(0),
            dec!(0),
            dec!(1),
            Date::from_ymd(2000, 1, 1).unwrap(),
            Date::from_ymd(2000, 1, 1).unwrap(),
            report_date,
        )
        .unwrap(),
    );

    portfolio.simulate(maturity, None);
    let asset = &portfolio.assets()[0];
    let total_principal: rust_decimal::Decimal = sum_money(asset.history().iter().map(|s| &s.principal_paid));
    assert_eq!(total_principal, dec!(1_000_000));
}

#[test]
fn law_liquidation_is_idempotent_at_the_portfolio_level() {
    let report_date = Date::from_ymd(2025, 1, 1).unwrap();
    let next_payment_date = Date::from_ymd(2025, 4, 1).unwrap();
    let maturity = Date::from_ymd(2030, 1, 1).unwrap();

    let mut portfolio = Portfolio::new();
    portfolio.push(
        Asset::new(
            "LOAN1",
            AssetKind::Loan,
            clo_core::Money::from(dec!(1_000_000)),
            dec!(0.90),
            clo_core::Rate::from(dec!(0.05)),
            clo_core::Rate::zero(),
            false,
            Frequency::Quarterly,
            next_payment_date,
            maturity,
            dec!(0),
            dec!(0),
            dec!(1),
            Date::from_ymd(2000, 1, 1).unwrap(),
            Date::from_ymd(2000, 1, 1).unwrap(),
            report_date,
        )
        .unwrap(),
    );

    let accrual_date = Date::from_ymd(2025, 6, 1).unwrap();
    portfolio.liquidate(accrual_date);
    let first_asset_state = format!("{:?}", portfolio.assets()[0]);
    portfolio.liquidate(accrual_date);
    let second_asset_state = format!("{:?}", portfolio.assets()[0]);
    assert_eq!(first_asset_state, second_asset_state);
}

