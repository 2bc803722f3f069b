use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{convert, standard_valuation, Country};
use crate::currency::{Currency, ExchangeRateTable};
use crate::inputs::IntoAmount;
use crate::traits::ValuateAsset;
use crate::types::{AssetValuation, CalculationStep};

crate::zakat_asset! {
    category = Cash;
    /// Cash and bank balances.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct CashAccount {
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
        #[serde(with = "crate::wire::amount")]
        pub amount: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
    }
}

impl CashAccount {
    pub fn amount(mut self, amount: impl IntoAmount) -> Self {
        self.amount = amount.into_amount();
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

impl ValuateAsset for CashAccount {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let mut trace = vec![CalculationStep::initial(format!("Balance ({})", self.currency), self.amount)];
        let value = convert(self.amount, self.currency, rates, &mut trace);
        standard_valuation(self, value, Decimal::ZERO, trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_in_base() {
        let cash = CashAccount::new("Savings").amount(10000);
        let v = cash.valuate(&ExchangeRateTable::default());
        assert_eq!(v.zakatable_value, dec!(10000));
        assert_eq!(v.zakat_due, dec!(250));
        assert_eq!(v.zakat_already_paid, Decimal::ZERO);
        assert_eq!(v.category, "cash");
    }

    #[test]
    fn test_cash_converted() {
        let cash = CashAccount::new("USD account").amount(100).currency(Currency::USD);
        let v = cash.valuate(&ExchangeRateTable::default());
        assert_eq!(v.zakatable_value, dec!(1050));
        assert!(v.explain().contains("USD to SEK rate"));
    }
}
