use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{convert, standard_valuation, Country};
use crate::currency::{Currency, ExchangeRateTable};
use crate::inputs::IntoAmount;
use crate::traits::ValuateAsset;
use crate::types::{AssetValuation, CalculationStep};

crate::zakat_asset! {
    category = Business;
    /// Trade goods and inventory, valued at current market value.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct BusinessInventory {
        #[serde(deserialize_with = "crate::wire::text")]
        pub description: String,
        #[serde(with = "crate::wire::amount")]
        pub market_value: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
    }
}

impl BusinessInventory {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn market_value(mut self, value: impl IntoAmount) -> Self {
        self.market_value = value.into_amount();
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
}

impl ValuateAsset for BusinessInventory {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let mut trace = vec![CalculationStep::initial(
            format!("Market value ({})", self.currency),
            self.market_value,
        )];
        let value = convert(self.market_value, self.currency, rates, &mut trace);
        standard_valuation(self, value, Decimal::ZERO, trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inventory_in_gbp() {
        let stock = BusinessInventory::new("Shop stock").market_value(1000).currency(Currency::GBP);
        let v = stock.valuate(&ExchangeRateTable::default());
        assert_eq!(v.zakatable_value, dec!(13300));
        assert_eq!(v.zakat_due, dec!(332.5));
    }
}
