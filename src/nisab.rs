use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 85 grams of gold.
pub const NISAB_GOLD_GRAMS: Decimal = dec!(85);
/// 595 grams of silver.
pub const NISAB_SILVER_GRAMS: Decimal = dec!(595);

/// Metal used to value the nisab threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NisabMethod {
    /// 85g × gold price
    #[default]
    #[serde(alias = "Gold", alias = "GOLD")]
    Gold,
    /// 595g × silver price
    #[serde(alias = "Silver", alias = "SILVER")]
    Silver,
}

fn default_gold_price() -> Decimal {
    dec!(950)
}

fn default_silver_price() -> Decimal {
    dec!(10.5)
}

/// Nisab method plus the metal prices (per gram, base currency) it is valued at.
///
/// The default prices are placeholders; users are expected to update them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NisabConfiguration {
    #[serde(default, deserialize_with = "crate::wire::or_default")]
    pub method: NisabMethod,
    #[serde(
        rename = "goldPricePerGramSEK",
        alias = "goldPricePerGram",
        with = "crate::wire::amount",
        default = "default_gold_price"
    )]
    pub gold_price_per_gram: Decimal,
    #[serde(
        rename = "silverPricePerGramSEK",
        alias = "silverPricePerGram",
        with = "crate::wire::amount",
        default = "default_silver_price"
    )]
    pub silver_price_per_gram: Decimal,
}

impl Default for NisabConfiguration {
    fn default() -> Self {
        Self {
            method: NisabMethod::Gold,
            gold_price_per_gram: default_gold_price(),
            silver_price_per_gram: default_silver_price(),
        }
    }
}

impl NisabConfiguration {
    pub fn new(method: NisabMethod, gold_price_per_gram: impl crate::inputs::IntoAmount, silver_price_per_gram: impl crate::inputs::IntoAmount) -> Self {
        Self {
            method,
            gold_price_per_gram: gold_price_per_gram.into_amount(),
            silver_price_per_gram: silver_price_per_gram.into_amount(),
        }
    }

    /// Nisab value in the base currency for the configured method.
    pub fn nisab_in_base(&self) -> Decimal {
        nisab_in_base(self)
    }
}

/// Returns `85 × gold` for the gold method or `595 × silver` for silver, never both.
pub fn nisab_in_base(config: &NisabConfiguration) -> Decimal {
    match config.method {
        NisabMethod::Gold => NISAB_GOLD_GRAMS.saturating_mul(config.gold_price_per_gram),
        NisabMethod::Silver => NISAB_SILVER_GRAMS.saturating_mul(config.silver_price_per_gram),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gold_nisab() {
        let config = NisabConfiguration::new(NisabMethod::Gold, 950, 10.5);
        assert_eq!(config.nisab_in_base(), dec!(80750));
    }

    #[test]
    fn test_silver_nisab_ignores_gold() {
        let config = NisabConfiguration::new(NisabMethod::Silver, 950, 10.5);
        assert_eq!(config.nisab_in_base(), dec!(6247.5));
    }

    #[test]
    fn test_negative_price_propagates() {
        let config = NisabConfiguration::new(NisabMethod::Gold, -1, 0);
        assert_eq!(config.nisab_in_base(), dec!(-85));
    }

    #[test]
    fn test_legacy_field_names() {
        let config: NisabConfiguration =
            serde_json::from_str(r#"{"method":"silver","silverPricePerGramSEK":11}"#).unwrap();
        assert_eq!(config.method, NisabMethod::Silver);
        assert_eq!(config.silver_price_per_gram, dec!(11));
        assert_eq!(config.gold_price_per_gram, dec!(950));

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("goldPricePerGramSEK"));
    }
}
