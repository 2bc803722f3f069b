//! # Portfolio Aggregation
//!
//! Gold, silver, cash, trade goods and the rest are joined into one pool of
//! wealth before comparing against the nisab (*dam' al-amwal*). Debts the
//! user owes are deducted from the pool first.
//!
//! Per-item figures are always reported ungated; the nisab gate applies only
//! to the portfolio totals.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::currency::{from_base, Currency};
use crate::hawl::{HawlStatus, HawlTracker};
use crate::nisab::nisab_in_base;
use crate::portfolio::Portfolio;
use crate::types::{AssetCategory, AssetValuation};

/// Totals for one asset category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub label: String,
    pub total_value: Decimal,
    pub zakat_due: Decimal,
    pub zakat_already_paid: Decimal,
    /// `max(0, zakat_due - zakat_already_paid)`.
    pub net_zakat_due: Decimal,
    pub items: Vec<AssetValuation>,
}

impl CategorySummary {
    fn new(category: String, label: String, items: Vec<AssetValuation>) -> Self {
        let total_value = sum(items.iter().map(|i| i.zakatable_value));
        let zakat_due = sum(items.iter().map(|i| i.zakat_due));
        let zakat_already_paid = sum(items.iter().map(|i| i.zakat_already_paid));
        Self {
            category,
            label,
            total_value,
            zakat_due,
            zakat_already_paid,
            net_zakat_due: zakat_due.saturating_sub(zakat_already_paid).max(Decimal::ZERO),
            items,
        }
    }

    pub fn is_liability(&self) -> bool {
        self.category == AssetCategory::Liability.key()
    }
}

/// Portfolio-level obligation. All amounts are in the base currency unless
/// the field name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationResult {
    pub total_wealth: Decimal,
    pub total_liabilities: Decimal,
    /// `max(0, total_wealth - total_liabilities)`.
    pub net_zakatable_wealth: Decimal,
    pub nisab_value: Decimal,
    pub meets_nisab: bool,
    /// Zero when the nisab is not met.
    pub total_zakat_due: Decimal,
    pub total_zakat_already_paid: Decimal,
    /// Zero when the nisab is not met, never negative.
    pub net_zakat_owed: Decimal,
    pub categories: Vec<CategorySummary>,
    pub total_zakat_due_display: Decimal,
    pub net_zakat_owed_display: Decimal,
    pub nisab_value_display: Decimal,
    pub display_currency: Currency,
    pub hawl_status: HawlStatus,
}

impl ObligationResult {
    /// Looks up a category summary by key.
    pub fn category(&self, key: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == key)
    }

    /// Iterates over every per-asset valuation in report order.
    pub fn valuations(&self) -> impl Iterator<Item = &AssetValuation> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Items that were excluded, with their reasons.
    pub fn excluded(&self) -> impl Iterator<Item = &AssetValuation> {
        self.valuations().filter(|v| v.is_excluded)
    }
}

fn sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Computes the obligation for `portfolio` with the hawl evaluated on `today`.
///
/// Pure and total: never fails and never mutates its input.
pub fn calculate_obligation(portfolio: &Portfolio, today: NaiveDate) -> ObligationResult {
    let settings = &portfolio.settings;
    let rates = &settings.exchange_rates;
    let nisab_value = nisab_in_base(&settings.nisab);

    // Known categories first in fixed order, then unknown keys in first-seen order.
    let mut groups: Vec<(String, String, Vec<AssetValuation>)> = AssetCategory::iter()
        .map(|c| (c.key().to_string(), c.label().to_string(), Vec::new()))
        .collect();

    for asset in &portfolio.assets {
        let valuation = asset.valuate(rates);
        match groups.iter_mut().find(|(key, _, _)| *key == valuation.category) {
            Some((_, _, items)) => items.push(valuation),
            None => {
                let key = valuation.category.clone();
                groups.push((key.clone(), key, vec![valuation]));
            }
        }
    }

    let categories: Vec<CategorySummary> = groups
        .into_iter()
        .filter(|(_, _, items)| !items.is_empty())
        .map(|(key, label, items)| CategorySummary::new(key, label, items))
        .collect();

    let mut total_wealth = Decimal::ZERO;
    let mut total_liabilities = Decimal::ZERO;
    let mut total_due = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for summary in &categories {
        if summary.is_liability() {
            total_liabilities = total_liabilities.saturating_add(summary.total_value);
        } else {
            total_wealth = total_wealth.saturating_add(summary.total_value);
            total_due = total_due.saturating_add(summary.zakat_due);
            total_paid = total_paid.saturating_add(summary.zakat_already_paid);
        }
    }

    let net_zakatable_wealth = total_wealth.saturating_sub(total_liabilities).max(Decimal::ZERO);
    let meets_nisab = net_zakatable_wealth >= nisab_value;

    let (total_zakat_due, net_zakat_owed) = if meets_nisab {
        (total_due, total_due.saturating_sub(total_paid).max(Decimal::ZERO))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let hawl_status = HawlTracker::new(today).status(&settings.hawl);
    let display_currency = settings.display_currency;

    tracing::debug!(
        assets = portfolio.assets.len(),
        %net_zakatable_wealth,
        %nisab_value,
        meets_nisab,
        %net_zakat_owed,
        hawl = ?hawl_status.state,
        "obligation computed"
    );

    ObligationResult {
        total_wealth,
        total_liabilities,
        net_zakatable_wealth,
        nisab_value,
        meets_nisab,
        total_zakat_due,
        total_zakat_already_paid: total_paid,
        net_zakat_owed,
        categories,
        total_zakat_due_display: from_base(total_zakat_due, display_currency, rates),
        net_zakat_owed_display: from_base(net_zakat_owed, display_currency, rates),
        nisab_value_display: from_base(nisab_value, display_currency, rates),
        display_currency,
        hawl_status,
    }
}

/// Computes the obligation with the hawl evaluated on the local calendar date.
pub fn calculate_obligation_now(portfolio: &Portfolio) -> ObligationResult {
    calculate_obligation(portfolio, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hawl::HawlState;
    use crate::maal::cash::CashAccount;
    use crate::maal::debts::Liability;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_empty_portfolio() {
        let result = calculate_obligation(&Portfolio::new(), today());
        assert!(result.categories.is_empty());
        assert!(!result.meets_nisab);
        assert_eq!(result.net_zakat_owed, Decimal::ZERO);
        assert_eq!(result.nisab_value, dec!(80750));
        assert_eq!(result.hawl_status.state, HawlState::NotStarted);
    }

    #[test]
    fn test_liabilities_clamp_net_wealth() {
        let portfolio = Portfolio::new()
            .add(CashAccount::new("Bank").amount(1000))
            .add(Liability::new("Mortgage").amount(500_000));
        let result = calculate_obligation(&portfolio, today());

        assert_eq!(result.total_wealth, dec!(1000));
        assert_eq!(result.total_liabilities, dec!(500000));
        assert_eq!(result.net_zakatable_wealth, Decimal::ZERO);
        assert!(!result.meets_nisab);
    }

    #[test]
    fn test_category_order_is_fixed() {
        let portfolio = Portfolio::new()
            .add(Liability::new("Loan").amount(10))
            .add(CashAccount::new("Bank").amount(10));
        let result = calculate_obligation(&portfolio, today());

        let keys: Vec<_> = result.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(keys, vec!["cash", "liability"]);
        assert_eq!(result.category("cash").map(|c| c.label.as_str()), Some("Cash & Bank Accounts"));
    }

    #[test]
    fn test_display_mirror_with_zero_rate() {
        let mut portfolio = Portfolio::new().add(CashAccount::new("Bank").amount(200_000));
        portfolio.settings.display_currency = Currency::USD;
        portfolio.settings.exchange_rates.set_rate(Currency::USD, Decimal::ZERO).unwrap();

        let result = calculate_obligation(&portfolio, today());
        assert!(result.meets_nisab);
        assert_eq!(result.net_zakat_owed, dec!(5000));
        assert_eq!(result.net_zakat_owed_display, Decimal::ZERO);
    }
}
