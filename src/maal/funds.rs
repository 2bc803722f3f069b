//! Mutual and index funds.
//!
//! Two methods are supported:
//! - `full_nav`: the whole holding value is zakatable (conservative).
//! - `equity_ratio`: only `zakatablePercent` of it, for passive long-term holders.
//!
//! A source-deduction credit without an explicit amount is estimated at 2.5%
//! of the full NAV, regardless of method.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{convert, standard_valuation, Country};
use crate::currency::{to_base, Currency, ExchangeRateTable};
use crate::inputs::IntoAmount;
use crate::traits::ValuateAsset;
use crate::types::{AssetValuation, CalculationStep};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FundType {
    #[default]
    Equity,
    Mixed,
    MoneyMarket,
    Islamic,
    Index,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FundZakatMethod {
    #[default]
    FullNav,
    EquityRatio,
}

crate::zakat_asset! {
    category = Fund;
    /// Units in a mutual or index fund.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct FundHolding {
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub fund_type: FundType,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
        #[serde(deserialize_with = "crate::wire::text")]
        pub broker: String,
        #[serde(with = "crate::wire::amount")]
        pub units: Decimal,
        #[serde(with = "crate::wire::amount")]
        pub nav_per_unit: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub zakat_method: FundZakatMethod,
        /// Zakatable share of the fund (0 to 100) for the equity-ratio method.
        #[serde(with = "crate::wire::optional_amount", skip_serializing_if = "Option::is_none")]
        pub zakatable_percent: Option<Decimal>,
        #[serde(deserialize_with = "crate::wire::flag")]
        pub zakat_deducted_at_source: bool,
        /// Amount withheld, in `currency`.
        #[serde(with = "crate::wire::optional_amount", skip_serializing_if = "Option::is_none")]
        pub zakat_amount_deducted: Option<Decimal>,
    }
}

impl FundHolding {
    pub fn fund_type(mut self, fund_type: FundType) -> Self {
        self.fund_type = fund_type;
        self
    }

    pub fn broker(mut self, broker: impl Into<String>) -> Self {
        self.broker = broker.into();
        self
    }

    pub fn units(mut self, units: impl IntoAmount) -> Self {
        self.units = units.into_amount();
        self
    }

    pub fn nav(mut self, nav_per_unit: impl IntoAmount) -> Self {
        self.nav_per_unit = nav_per_unit.into_amount();
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn country(mut self, country: Country) -> Self {
        self.country = country;
        self
    }

    /// Switches to the equity-ratio method with the given zakatable percentage.
    pub fn equity_ratio(mut self, percent: impl IntoAmount) -> Self {
        self.zakat_method = FundZakatMethod::EquityRatio;
        self.zakatable_percent = Some(percent.into_amount());
        self
    }

    /// Marks zakat as withheld at source. `None` lets the credit be estimated.
    pub fn deducted_at_source(mut self, amount: Option<impl IntoAmount>) -> Self {
        self.zakat_deducted_at_source = true;
        self.zakat_amount_deducted = amount.map(IntoAmount::into_amount);
        self
    }

    /// Fraction of the NAV that is zakatable under the chosen method, within 0..=1.
    pub fn zakatable_fraction(&self) -> Decimal {
        match self.zakat_method {
            FundZakatMethod::FullNav => Decimal::ONE,
            FundZakatMethod::EquityRatio => {
                self.zakatable_percent.unwrap_or(dec!(100)).clamp(Decimal::ZERO, dec!(100)) / dec!(100)
            }
        }
    }
}

impl ValuateAsset for FundHolding {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let total_nav = self.units.saturating_mul(self.nav_per_unit);
        let fraction = self.zakatable_fraction();

        let mut trace = vec![
            CalculationStep::initial("Units held", self.units),
            CalculationStep::multiply(format!("NAV per unit ({})", self.currency), self.nav_per_unit),
        ];
        if self.zakat_method == FundZakatMethod::EquityRatio {
            trace.push(CalculationStep::multiply("Zakatable fraction", fraction));
        }
        let value = convert(total_nav.saturating_mul(fraction), self.currency, rates, &mut trace);

        let paid_raw = match (self.zakat_deducted_at_source, self.zakat_amount_deducted) {
            (false, _) => Decimal::ZERO,
            (true, Some(amount)) => amount,
            (true, None) => {
                trace.push(CalculationStep::info("Deducted amount not given; estimated at 2.5% of full NAV"));
                total_nav.saturating_mul(crate::ZAKAT_RATE)
            }
        };

        standard_valuation(self, value, to_base(paid_raw, self.currency, rates), trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_nav() {
        let fund = FundHolding::new("Global Index").units(100).nav(200);
        let v = fund.valuate(&ExchangeRateTable::default());
        assert_eq!(v.zakatable_value, dec!(20000));
        assert_eq!(v.zakat_due, dec!(500));
    }

    #[test]
    fn test_equity_ratio_with_full_nav_credit() {
        let fund = FundHolding::new("Meezan")
            .units(1000)
            .nav(100)
            .currency(Currency::PKR)
            .equity_ratio(30)
            .deducted_at_source(None::<Decimal>);
        let v = fund.valuate(&ExchangeRateTable::default());

        // 100000 PKR × 30% × 0.033
        assert_eq!(v.zakatable_value, dec!(990));
        // 2.5% of the full 100000 PKR NAV, not the 30% share.
        assert_eq!(v.zakat_already_paid, dec!(82.5));
        assert_eq!(v.net_due(), Decimal::ZERO);
    }

    #[test]
    fn test_missing_percent_means_everything() {
        let mut fund = FundHolding::new("Mixed").units(10).nav(10);
        fund.zakat_method = FundZakatMethod::EquityRatio;
        assert_eq!(fund.zakatable_fraction(), Decimal::ONE);
        assert_eq!(fund.valuate(&ExchangeRateTable::default()).zakatable_value, dec!(100));

        assert_eq!(fund.clone().equity_ratio(150).zakatable_fraction(), Decimal::ONE);
        assert_eq!(fund.equity_ratio(-20).zakatable_fraction(), Decimal::ZERO);
    }

    #[test]
    fn test_method_wire_names() {
        let fund: FundHolding =
            serde_json::from_str(r#"{"fundType":"money_market","zakatMethod":"equity_ratio","zakatablePercent":"40"}"#)
                .unwrap();
        assert_eq!(fund.fund_type, FundType::MoneyMarket);
        assert_eq!(fund.zakat_method, FundZakatMethod::EquityRatio);
        assert_eq!(fund.zakatable_percent, Some(dec!(40)));
    }
}
