//! Listed equities.
//!
//! Home-market shares are priced in the base currency and carry no
//! source deduction. Foreign (PSX) shares may have had zakat withheld by the
//! depository; when the exact amount is unknown the credit is estimated at
//! 2.5% of the raw market value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{convert, standard_valuation};
use crate::currency::{Currency, ExchangeRateTable};
use crate::inputs::IntoAmount;
use crate::traits::ValuateAsset;
use crate::types::{AssetValuation, CalculationStep};

crate::zakat_asset! {
    category = SwedenStock;
    /// Shares held with a home-market broker (Avanza, Nordnet, ISK).
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct SwedenStock {
        #[serde(deserialize_with = "crate::wire::text")]
        pub ticker: String,
        #[serde(with = "crate::wire::amount")]
        pub shares: Decimal,
        /// Price in the base currency.
        #[serde(with = "crate::wire::amount")]
        pub current_price_per_share: Decimal,
        #[serde(deserialize_with = "crate::wire::text")]
        pub broker: String,
    }
}

impl SwedenStock {
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = ticker.into();
        self
    }

    pub fn shares(mut self, shares: impl IntoAmount) -> Self {
        self.shares = shares.into_amount();
        self
    }

    pub fn price(mut self, price_per_share: impl IntoAmount) -> Self {
        self.current_price_per_share = price_per_share.into_amount();
        self
    }

    pub fn broker(mut self, broker: impl Into<String>) -> Self {
        self.broker = broker.into();
        self
    }
}

impl ValuateAsset for SwedenStock {
    fn valuate(&self, _rates: &ExchangeRateTable) -> AssetValuation {
        let value = self.shares.saturating_mul(self.current_price_per_share);
        let trace = vec![
            CalculationStep::initial("Shares held", self.shares),
            CalculationStep::multiply("Price per share", self.current_price_per_share),
        ];
        standard_valuation(self, value, Decimal::ZERO, trace)
    }
}

fn default_psx_currency() -> Currency {
    Currency::PKR
}

fn psx_currency<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Currency, D::Error> {
    crate::wire::decode_or(d, Currency::PKR)
}

crate::zakat_asset! {
    category = PakistanStock;
    /// Shares listed on the Pakistan Stock Exchange.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct PakistanStock {
        #[serde(deserialize_with = "crate::wire::text")]
        pub ticker: String,
        #[serde(with = "crate::wire::amount")]
        pub shares: Decimal,
        /// Price in `currency`.
        #[serde(with = "crate::wire::amount")]
        pub current_price_per_share: Decimal,
        /// Pricing currency, PKR unless stated otherwise.
        #[serde(default = "default_psx_currency", deserialize_with = "psx_currency")]
        pub currency: Currency,
        /// CDC deducts 2.5% automatically for resident holders.
        #[serde(deserialize_with = "crate::wire::flag")]
        pub zakat_deducted_at_source: bool,
        /// Amount withheld, in `currency`.
        #[serde(with = "crate::wire::optional_amount", skip_serializing_if = "Option::is_none")]
        pub zakat_amount_deducted: Option<Decimal>,
    }
}

impl Default for PakistanStock {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            notes: None,
            ticker: String::new(),
            shares: Decimal::ZERO,
            current_price_per_share: Decimal::ZERO,
            currency: default_psx_currency(),
            zakat_deducted_at_source: false,
            zakat_amount_deducted: None,
        }
    }
}

impl PakistanStock {
    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = ticker.into();
        self
    }

    pub fn shares(mut self, shares: impl IntoAmount) -> Self {
        self.shares = shares.into_amount();
        self
    }

    pub fn price(mut self, price_per_share: impl IntoAmount) -> Self {
        self.current_price_per_share = price_per_share.into_amount();
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Marks zakat as withheld at source. `None` lets the credit be estimated.
    pub fn deducted_at_source(mut self, amount: Option<impl IntoAmount>) -> Self {
        self.zakat_deducted_at_source = true;
        self.zakat_amount_deducted = amount.map(IntoAmount::into_amount);
        self
    }
}

impl ValuateAsset for PakistanStock {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let raw_value = self.shares.saturating_mul(self.current_price_per_share);
        let mut trace = vec![
            CalculationStep::initial("Shares held", self.shares),
            CalculationStep::multiply(format!("Price per share ({})", self.currency), self.current_price_per_share),
        ];
        let value = convert(raw_value, self.currency, rates, &mut trace);

        let paid_raw = match (self.zakat_deducted_at_source, self.zakat_amount_deducted) {
            (false, _) => Decimal::ZERO,
            (true, Some(amount)) => amount,
            (true, None) => {
                trace.push(CalculationStep::info("Deducted amount not given; estimated at 2.5% of market value"));
                raw_value.saturating_mul(crate::ZAKAT_RATE)
            }
        };
        let paid = crate::currency::to_base(paid_raw, self.currency, rates);

        standard_valuation(self, value, paid, trace)
    }
}
