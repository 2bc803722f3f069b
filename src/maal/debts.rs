//! Money owed to the user (receivables) and by the user (liabilities).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{convert, standard_valuation, Country};
use crate::currency::{Currency, ExchangeRateTable};
use crate::inputs::IntoAmount;
use crate::traits::{AssetRecord, ValuateAsset};
use crate::types::{AssetValuation, CalculationStep};

pub const UNLIKELY_RECEIVABLE_REASON: &str = "Marked as unlikely to be received";

crate::zakat_asset! {
    category = Receivable;
    /// A debt owed to the user.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Receivable {
        #[serde(with = "crate::wire::amount")]
        pub amount: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
        /// Doubtful debts are not zakatable until actually received.
        #[serde(deserialize_with = "crate::wire::flag")]
        pub likely_to_be_received: bool,
    }
}

impl Receivable {
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

    pub fn likely(mut self, likely: bool) -> Self {
        self.likely_to_be_received = likely;
        self
    }
}

impl ValuateAsset for Receivable {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let mut trace = vec![CalculationStep::initial(format!("Amount owed ({})", self.currency), self.amount)];
        if !self.likely_to_be_received {
            return AssetValuation::new(self.id(), self.name(), self.category().key())
                .with_trace(trace)
                .excluded(UNLIKELY_RECEIVABLE_REASON);
        }
        let value = convert(self.amount, self.currency, rates, &mut trace);
        standard_valuation(self, value, Decimal::ZERO, trace)
    }
}

crate::zakat_asset! {
    category = Liability;
    /// A debt owed by the user. Reduces net wealth; never generates zakat.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Liability {
        #[serde(with = "crate::wire::amount")]
        pub amount: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
    }
}

impl Liability {
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

impl ValuateAsset for Liability {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let mut trace = vec![CalculationStep::initial(format!("Amount owed ({})", self.currency), self.amount)];
        let value = convert(self.amount, self.currency, rates, &mut trace);
        trace.push(CalculationStep::result("Deductible liability", value));

        let mut valuation = AssetValuation::new(self.id(), self.name(), self.category().key()).with_trace(trace);
        valuation.zakatable_value = value;
        valuation
    }
}
