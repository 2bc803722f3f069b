//! Per-category valuation rules (zakat al-maal).
//!
//! Each submodule defines the record for one asset category and its
//! [`ValuateAsset`](crate::traits::ValuateAsset) rule.

pub mod business;
pub mod cash;
pub mod debts;
pub mod equities;
pub mod funds;
pub mod precious_metals;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::currency::{to_base, Currency, ExchangeRateTable};
use crate::traits::AssetRecord;
use crate::types::{AssetValuation, CalculationStep};

/// Where an asset is held. Informational only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Country {
    Sweden,
    Pakistan,
    #[default]
    Other,
}

/// Converts a value to the base currency, recording the conversion step.
pub(crate) fn convert(
    value: Decimal,
    currency: Currency,
    rates: &ExchangeRateTable,
    trace: &mut Vec<CalculationStep>,
) -> Decimal {
    if currency.is_base() {
        return value;
    }
    trace.push(CalculationStep::convert(
        format!("{} to {} rate", currency, Currency::BASE),
        rates.rate(currency),
    ));
    to_base(value, currency, rates)
}

/// Builds the standard valuation: `zakat_due = value × 2.5%`.
pub(crate) fn standard_valuation(
    record: &impl AssetRecord,
    value: Decimal,
    paid: Decimal,
    mut trace: Vec<CalculationStep>,
) -> AssetValuation {
    trace.push(CalculationStep::result("Zakatable value", value));
    trace.push(CalculationStep::rate("Zakat rate", crate::ZAKAT_RATE));
    trace.push(CalculationStep::result("Zakat due", value.saturating_mul(crate::ZAKAT_RATE)));
    if !paid.is_zero() {
        trace.push(CalculationStep::result("Already deducted at source", paid));
    }

    AssetValuation::new(record.id(), record.name(), record.category().key())
        .with_value(value)
        .with_paid(paid)
        .with_trace(trace)
}
