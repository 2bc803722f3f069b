use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{convert, standard_valuation, Country};
use crate::currency::{Currency, ExchangeRateTable};
use crate::inputs::IntoAmount;
use crate::traits::ValuateAsset;
use crate::types::{AssetValuation, CalculationStep};

/// Gold purity in karats. Unknown purities read as the default 24k, i.e. a
/// multiplier of 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum GoldPurity {
    #[default]
    #[serde(rename = "24k")]
    #[strum(serialize = "24k")]
    K24,
    #[serde(rename = "22k")]
    #[strum(serialize = "22k")]
    K22,
    #[serde(rename = "21k")]
    #[strum(serialize = "21k")]
    K21,
    #[serde(rename = "18k")]
    #[strum(serialize = "18k")]
    K18,
}

impl GoldPurity {
    /// Fraction of pure (24k) gold.
    pub fn multiplier(&self) -> Decimal {
        match self {
            GoldPurity::K24 => Decimal::ONE,
            GoldPurity::K22 => dec!(22) / dec!(24),
            GoldPurity::K21 => dec!(21) / dec!(24),
            GoldPurity::K18 => dec!(18) / dec!(24),
        }
    }
}

crate::zakat_asset! {
    category = Gold;
    /// Gold held as bullion, coins or jewellery.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct GoldHolding {
        #[serde(with = "crate::wire::amount")]
        pub weight_grams: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub purity: GoldPurity,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
        /// Price of pure gold per gram, in `currency`.
        #[serde(with = "crate::wire::amount")]
        pub price_per_gram: Decimal,
    }
}

impl GoldHolding {
    pub fn weight(mut self, grams: impl IntoAmount) -> Self {
        self.weight_grams = grams.into_amount();
        self
    }

    pub fn purity(mut self, purity: GoldPurity) -> Self {
        self.purity = purity;
        self
    }

    pub fn price(mut self, price_per_gram: impl IntoAmount) -> Self {
        self.price_per_gram = price_per_gram.into_amount();
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

impl ValuateAsset for GoldHolding {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let multiplier = self.purity.multiplier();
        let pure_grams = self.weight_grams.saturating_mul(multiplier);
        let mut trace = vec![
            CalculationStep::initial("Weight (g)", self.weight_grams),
            CalculationStep::multiply(format!("Purity {}", self.purity), multiplier),
            CalculationStep::multiply(format!("Price per gram ({})", self.currency), self.price_per_gram),
        ];
        let value = convert(pure_grams.saturating_mul(self.price_per_gram), self.currency, rates, &mut trace);
        standard_valuation(self, value, Decimal::ZERO, trace)
    }
}

crate::zakat_asset! {
    category = Silver;
    /// Silver, assumed pure.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct SilverHolding {
        #[serde(with = "crate::wire::amount")]
        pub weight_grams: Decimal,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub country: Country,
        #[serde(deserialize_with = "crate::wire::or_default")]
        pub currency: Currency,
        #[serde(with = "crate::wire::amount")]
        pub price_per_gram: Decimal,
    }
}

impl SilverHolding {
    pub fn weight(mut self, grams: impl IntoAmount) -> Self {
        self.weight_grams = grams.into_amount();
        self
    }

    pub fn price(mut self, price_per_gram: impl IntoAmount) -> Self {
        self.price_per_gram = price_per_gram.into_amount();
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

impl ValuateAsset for SilverHolding {
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        let mut trace = vec![
            CalculationStep::initial("Weight (g)", self.weight_grams),
            CalculationStep::multiply(format!("Price per gram ({})", self.currency), self.price_per_gram),
        ];
        let value = convert(self.weight_grams.saturating_mul(self.price_per_gram), self.currency, rates, &mut trace);
        standard_valuation(self, value, Decimal::ZERO, trace)
    }
}
