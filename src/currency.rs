//! Currency conversion against the fixed base currency (SEK).
//!
//! Rates are "units of base currency per 1 unit of the currency" and are entered
//! by hand; there is no live feed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::types::ZakatError;

/// Supported currencies.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Currency {
    #[default]
    SEK,
    PKR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// The currency every value is normalized to.
    pub const BASE: Currency = Currency::SEK;

    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::SEK => "kr",
            Currency::PKR => "₨",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::SEK => "SEK – Swedish Krona",
            Currency::PKR => "PKR – Pakistani Rupee",
            Currency::USD => "USD – US Dollar",
            Currency::EUR => "EUR – Euro",
            Currency::GBP => "GBP – British Pound",
        }
    }
}

fn default_pkr() -> Decimal {
    dec!(0.033)
}

fn default_usd() -> Decimal {
    dec!(10.5)
}

fn default_eur() -> Decimal {
    dec!(11.4)
}

fn default_gbp() -> Decimal {
    dec!(13.3)
}

/// Manually maintained exchange rates, in base currency per unit.
///
/// Each missing entry falls back to its own approximate default, so a partial
/// table from an older file still yields a complete one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    #[serde(rename = "SEK", with = "crate::wire::amount", default = "one")]
    sek: Decimal,
    #[serde(rename = "PKR", with = "crate::wire::amount", default = "default_pkr")]
    pkr: Decimal,
    #[serde(rename = "USD", with = "crate::wire::amount", default = "default_usd")]
    usd: Decimal,
    #[serde(rename = "EUR", with = "crate::wire::amount", default = "default_eur")]
    eur: Decimal,
    #[serde(rename = "GBP", with = "crate::wire::amount", default = "default_gbp")]
    gbp: Decimal,
    #[serde(rename = "lastUpdated", default = "Utc::now", deserialize_with = "crate::wire::timestamp")]
    pub last_updated: DateTime<Utc>,
}

fn one() -> Decimal {
    Decimal::ONE
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        Self {
            sek: Decimal::ONE,
            pkr: default_pkr(),
            usd: default_usd(),
            eur: default_eur(),
            gbp: default_gbp(),
            last_updated: Utc::now(),
        }
    }
}

impl ExchangeRateTable {
    /// Returns the rate for `currency`. The base currency is always exactly 1.
    pub fn rate(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::SEK => Decimal::ONE,
            Currency::PKR => self.pkr,
            Currency::USD => self.usd,
            Currency::EUR => self.eur,
            Currency::GBP => self.gbp,
        }
    }

    /// Sets the rate for a non-base currency and stamps `last_updated`.
    ///
    /// Zero is accepted (conversions back out of that currency then report 0);
    /// negative rates and edits to the base rate are rejected.
    pub fn set_rate(&mut self, currency: Currency, rate: Decimal) -> Result<(), ZakatError> {
        if currency.is_base() {
            if rate == Decimal::ONE {
                return Ok(());
            }
            return Err(ZakatError::invalid_input(
                currency.to_string(),
                "the base currency rate is fixed at 1",
            ));
        }
        if rate < Decimal::ZERO {
            return Err(ZakatError::invalid_input(currency.to_string(), "exchange rate must be non-negative"));
        }

        let slot = match currency {
            Currency::SEK => &mut self.sek,
            Currency::PKR => &mut self.pkr,
            Currency::USD => &mut self.usd,
            Currency::EUR => &mut self.eur,
            Currency::GBP => &mut self.gbp,
        };
        *slot = rate;
        self.last_updated = Utc::now();
        tracing::debug!(%currency, %rate, "exchange rate updated");
        Ok(())
    }

    /// Restores the base-rate invariant after loading untrusted data.
    pub(crate) fn normalize(&mut self) {
        if self.sek != Decimal::ONE {
            tracing::warn!(stored = %self.sek, "stored base rate was not 1; resetting");
            self.sek = Decimal::ONE;
        }
    }
}

/// Converts `amount` in `currency` to the base currency.
pub fn to_base(amount: Decimal, currency: Currency, rates: &ExchangeRateTable) -> Decimal {
    amount.saturating_mul(rates.rate(currency))
}

/// Converts a base-currency amount into `currency`.
///
/// A zero rate means "value unavailable" and yields 0 rather than dividing by zero.
pub fn from_base(amount_base: Decimal, currency: Currency, rates: &ExchangeRateTable) -> Decimal {
    let rate = rates.rate(currency);
    if rate.is_zero() {
        return Decimal::ZERO;
    }
    amount_base.checked_div(rate).unwrap_or(Decimal::ZERO)
}

/// Formats a whole-unit money amount with thousands separators, e.g. `"kr 12,345"`.
pub fn format_money(amount: Decimal, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{} {}", sign, currency.symbol(), grouped)
}
