//! Invariants that must hold for any portfolio, checked over a spread of
//! hand-picked degenerate inputs.

use chrono::{Duration, NaiveDate};
use easyzakat::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

fn awkward_portfolios() -> Vec<Portfolio> {
    vec![
        Portfolio::new(),
        Portfolio::new().add(CashAccount::new("Zero").amount(0)),
        Portfolio::new().add(CashAccount::new("Negative").amount(-5000)),
        Portfolio::new().add(Liability::new("Only debt").amount(1_000_000)),
        Portfolio::new()
            .add(CashAccount::new("Bank").amount(200_000))
            .add(PakistanStock::new("Overpaid").shares(1).price(1).deducted_at_source(Some(1_000_000))),
        Portfolio::new()
            .add(GoldHolding::new("Huge").weight(Decimal::MAX).price(Decimal::MAX))
            .add(CashAccount::new("Bank").amount(Decimal::MAX)),
        Portfolio::new().add(FundHolding::new("Odd fund").units(10).nav(10).equity_ratio(-50)),
    ]
}

#[test]
fn test_net_owed_never_negative() {
    for portfolio in awkward_portfolios() {
        let result = calculate_obligation(&portfolio, today());
        assert!(result.net_zakat_owed >= Decimal::ZERO);
        assert!(result.net_zakatable_wealth >= Decimal::ZERO);
        for category in &result.categories {
            assert!(category.net_zakat_due >= Decimal::ZERO);
        }
    }
}

#[test]
fn test_gate_zeroes_totals_below_nisab() {
    for portfolio in awkward_portfolios() {
        let result = calculate_obligation(&portfolio, today());
        if !result.meets_nisab {
            assert_eq!(result.total_zakat_due, Decimal::ZERO);
            assert_eq!(result.net_zakat_owed, Decimal::ZERO);
        }
    }
}

#[test]
fn test_liabilities_never_generate_due() {
    let portfolio = Portfolio::new()
        .add(CashAccount::new("Bank").amount(100_000))
        .add(Liability::new("Loan").amount(10_000));
    let result = calculate_obligation(&portfolio, today());

    let liabilities = result.category("liability").unwrap();
    assert_eq!(liabilities.zakat_due, Decimal::ZERO);
    assert_eq!(result.total_liabilities, dec!(10000));
    assert_eq!(result.total_zakat_due, dec!(2500));
}

#[test]
fn test_zero_valued_assets_contribute_nothing() {
    let with_zero = Portfolio::new()
        .add(CashAccount::new("Bank").amount(100_000))
        .add(SilverHolding::new("Empty").weight(0).price(10))
        .add(BusinessInventory::new("Nothing"));
    let without = Portfolio::new().add(CashAccount::new("Bank").amount(100_000));

    let a = calculate_obligation(&with_zero, today());
    let b = calculate_obligation(&without, today());

    assert_eq!(a.total_wealth, b.total_wealth);
    assert_eq!(a.total_zakat_due, b.total_zakat_due);
    assert_eq!(a.net_zakat_owed, b.net_zakat_owed);
    for item in a.valuations().filter(|v| v.zakatable_value.is_zero()) {
        assert_eq!(item.zakat_due, Decimal::ZERO);
    }
}

#[test]
fn test_hawl_rules() {
    let tracker = HawlTracker::new(today());
    for days in [0_i64, 1, 100, 353, 354, 355, 1000] {
        let start = today() - Duration::days(days);

        let broken = tracker.status(&HawlConfiguration { nisab_met_date: Some(start), broken: true });
        assert_eq!(broken.state, HawlState::Broken);

        let status = tracker.status(&HawlConfiguration::started_on(start));
        assert_eq!(status.state == HawlState::Complete, days >= HIJRI_YEAR_DAYS);
        assert!(status.progress_percent <= 100);
    }
    assert_eq!(tracker.status(&HawlConfiguration::default()).state, HawlState::NotStarted);
}

#[test]
fn test_engine_does_not_mutate_input() {
    let portfolio = Portfolio::new().add(CashAccount::new("Bank").amount(100_000));
    let snapshot = portfolio.clone();
    let _ = calculate_obligation(&portfolio, today());
    assert_eq!(portfolio, snapshot);
}
