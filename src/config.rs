use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{Currency, ExchangeRateTable};
use crate::hawl::HawlConfiguration;
use crate::nisab::{NisabConfiguration, NisabMethod};
use crate::types::ZakatError;

pub const DEFAULT_ZAKAT_YEAR: &str = "2025-2026";

fn default_zakat_year() -> String {
    DEFAULT_ZAKAT_YEAR.to_string()
}

fn zakat_year<'de, D: serde::Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let label = crate::wire::text(d)?;
    Ok(if label.trim().is_empty() { default_zakat_year() } else { label })
}

/// User settings stored alongside the assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Currency the headline figures are mirrored into.
    #[serde(default, deserialize_with = "crate::wire::or_default")]
    pub display_currency: Currency,
    #[serde(default, deserialize_with = "crate::wire::or_default")]
    pub exchange_rates: ExchangeRateTable,
    #[serde(default, deserialize_with = "crate::wire::or_default")]
    pub nisab: NisabConfiguration,
    /// Free-text period label, e.g. "2025-2026".
    #[serde(default = "default_zakat_year", rename = "zakatYear", deserialize_with = "zakat_year")]
    pub period: String,
    /// Date the previous lunar year completed. Kept for older files; not used in calculations.
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "crate::wire::text")]
    pub hawl_date: String,
    #[serde(flatten)]
    pub hawl: HawlConfiguration,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            display_currency: Currency::default(),
            exchange_rates: ExchangeRateTable::default(),
            nisab: NisabConfiguration::default(),
            period: default_zakat_year(),
            hawl_date: String::new(),
            hawl: HawlConfiguration::default(),
        }
    }
}

// Ensure the caller can easily create settings
impl std::str::FromStr for UserSettings {
    type Err = ZakatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut settings: UserSettings = serde_json::from_str(s).map_err(ZakatError::Parse)?;
        settings.exchange_rates.normalize();
        Ok(settings)
    }
}

impl UserSettings {
    pub fn with_display_currency(mut self, currency: Currency) -> Self {
        self.display_currency = currency;
        self
    }

    pub fn with_nisab_method(mut self, method: NisabMethod) -> Self {
        self.nisab.method = method;
        self
    }

    pub fn with_gold_price(mut self, price: impl crate::inputs::IntoAmount) -> Self {
        self.nisab.gold_price_per_gram = price.into_amount();
        self
    }

    pub fn with_silver_price(mut self, price: impl crate::inputs::IntoAmount) -> Self {
        self.nisab.silver_price_per_gram = price.into_amount();
        self
    }

    pub fn with_hawl(mut self, hawl: HawlConfiguration) -> Self {
        self.hawl = hawl;
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    /// Validates settings edits made through the state owner.
    ///
    /// Stored files are never rejected; only interactive edits go through here.
    pub fn validate(&self) -> Result<(), ZakatError> {
        if self.nisab.gold_price_per_gram < Decimal::ZERO {
            return Err(ZakatError::invalid_input("goldPricePerGram", "Gold price must be non-negative"));
        }
        if self.nisab.silver_price_per_gram < Decimal::ZERO {
            return Err(ZakatError::invalid_input("silverPricePerGram", "Silver price must be non-negative"));
        }
        if self.period.trim().is_empty() {
            return Err(ZakatError::invalid_input("zakatYear", "Zakat year label must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_hawl_fields() {
        let settings: UserSettings = r#"{
            "displayCurrency": "PKR",
            "zakatYear": "2024-2025",
            "nisabMetDate": "2024-05-01",
            "hawlBroken": true
        }"#
        .parse()
        .unwrap();

        assert_eq!(settings.display_currency, Currency::PKR);
        assert_eq!(settings.period, "2024-2025");
        assert!(settings.hawl.broken);
        assert_eq!(settings.hawl.nisab_met_date, chrono::NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(settings.nisab.gold_price_per_gram, dec!(950));
    }

    #[test]
    fn test_empty_object_takes_defaults() {
        let settings: UserSettings = "{}".parse().unwrap();
        assert_eq!(settings, UserSettings {
            exchange_rates: settings.exchange_rates.clone(),
            ..UserSettings::default()
        });
        assert_eq!(settings.period, DEFAULT_ZAKAT_YEAR);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(json["nisabMetDate"], "");
        assert_eq!(json["hawlBroken"], false);
        assert_eq!(json["zakatYear"], "2025-2026");
        assert_eq!(json["exchangeRates"]["SEK"], 1);
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let settings = UserSettings::default().with_gold_price(-5);
        assert!(settings.validate().is_err());
        assert!(UserSettings::default().validate().is_ok());
    }
}
