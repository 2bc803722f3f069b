use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::ExchangeRateTable;
use crate::maal::business::BusinessInventory;
use crate::maal::cash::CashAccount;
use crate::maal::debts::{Liability, Receivable};
use crate::maal::equities::{PakistanStock, SwedenStock};
use crate::maal::funds::FundHolding;
use crate::maal::precious_metals::{GoldHolding, SilverHolding};
use crate::traits::ValuateAsset;
use crate::types::{AssetCategory, AssetValuation};

/// Generates a fresh asset identifier (UUID v4).
pub fn new_asset_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A wrapper enum for every asset category a portfolio can hold.
///
/// Serialized as an object tagged by `"type"`. Tags this version does not
/// know are kept as [`Asset::Unrecognized`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Asset {
    Cash(CashAccount),
    SwedenStock(SwedenStock),
    PakistanStock(PakistanStock),
    Gold(GoldHolding),
    Silver(SilverHolding),
    Business(BusinessInventory),
    Receivable(Receivable),
    Liability(Liability),
    Fund(FundHolding),
    Unrecognized(UnrecognizedAsset),
}

/// An asset record whose category could not be interpreted.
///
/// Valued at zero and reported as excluded so the user can see it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedAsset {
    /// The raw `"type"` tag (empty if absent).
    pub kind: String,
    pub id: String,
    pub name: String,
    /// Why the record was not interpreted.
    pub reason: String,
    /// The record exactly as read.
    pub raw: Value,
}

impl UnrecognizedAsset {
    fn from_raw(raw: Value, reason: String) -> Self {
        let field = |key: &str| raw.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        Self {
            kind: field("type"),
            id: field("id"),
            name: field("name"),
            reason,
            raw,
        }
    }
}

/// Internally tagged mirror of the known variants, used for the wire format.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownAsset {
    Cash(CashAccount),
    SwedenStock(SwedenStock),
    PakistanStock(PakistanStock),
    Gold(GoldHolding),
    Silver(SilverHolding),
    Business(BusinessInventory),
    Receivable(Receivable),
    Liability(Liability),
    Fund(FundHolding),
}

impl TryFrom<Value> for Asset {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !value.is_object() {
            tracing::warn!(%value, "keeping asset record that is not an object");
            let reason = "Asset record is not an object".to_string();
            return Ok(Asset::Unrecognized(UnrecognizedAsset::from_raw(value, reason)));
        }

        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        if tag.parse::<AssetCategory>().is_err() {
            let reason = format!("Unrecognized asset category '{}'", tag);
            tracing::warn!(tag, "keeping asset with unrecognized category");
            return Ok(Asset::Unrecognized(UnrecognizedAsset::from_raw(value, reason)));
        }

        match serde_json::from_value::<KnownAsset>(value.clone()) {
            Ok(known) => Ok(known.into()),
            Err(e) => {
                tracing::warn!(tag, error = %e, "keeping malformed asset record");
                let reason = format!("Malformed '{}' asset record: {}", tag, e);
                Ok(Asset::Unrecognized(UnrecognizedAsset::from_raw(value, reason)))
            }
        }
    }
}

impl From<KnownAsset> for Asset {
    fn from(known: KnownAsset) -> Self {
        match known {
            KnownAsset::Cash(a) => Asset::Cash(a),
            KnownAsset::SwedenStock(a) => Asset::SwedenStock(a),
            KnownAsset::PakistanStock(a) => Asset::PakistanStock(a),
            KnownAsset::Gold(a) => Asset::Gold(a),
            KnownAsset::Silver(a) => Asset::Silver(a),
            KnownAsset::Business(a) => Asset::Business(a),
            KnownAsset::Receivable(a) => Asset::Receivable(a),
            KnownAsset::Liability(a) => Asset::Liability(a),
            KnownAsset::Fund(a) => Asset::Fund(a),
        }
    }
}

impl From<Asset> for Value {
    fn from(asset: Asset) -> Self {
        let known = match asset {
            Asset::Cash(a) => KnownAsset::Cash(a),
            Asset::SwedenStock(a) => KnownAsset::SwedenStock(a),
            Asset::PakistanStock(a) => KnownAsset::PakistanStock(a),
            Asset::Gold(a) => KnownAsset::Gold(a),
            Asset::Silver(a) => KnownAsset::Silver(a),
            Asset::Business(a) => KnownAsset::Business(a),
            Asset::Receivable(a) => KnownAsset::Receivable(a),
            Asset::Liability(a) => KnownAsset::Liability(a),
            Asset::Fund(a) => KnownAsset::Fund(a),
            Asset::Unrecognized(mut a) => {
                if let Some(obj) = a.raw.as_object_mut() {
                    obj.insert("id".to_string(), Value::String(a.id));
                }
                return a.raw;
            }
        };
        serde_json::to_value(known).unwrap_or(Value::Null)
    }
}

impl Asset {
    fn record(&self) -> Option<&dyn ValuateAsset> {
        match self {
            Asset::Cash(a) => Some(a),
            Asset::SwedenStock(a) => Some(a),
            Asset::PakistanStock(a) => Some(a),
            Asset::Gold(a) => Some(a),
            Asset::Silver(a) => Some(a),
            Asset::Business(a) => Some(a),
            Asset::Receivable(a) => Some(a),
            Asset::Liability(a) => Some(a),
            Asset::Fund(a) => Some(a),
            Asset::Unrecognized(_) => None,
        }
    }

    /// Values this asset in the base currency. Never fails.
    pub fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation {
        match (self, self.record()) {
            (_, Some(record)) => record.valuate(rates),
            (Asset::Unrecognized(a), None) => {
                AssetValuation::new(&a.id, &a.name, &a.kind).excluded(a.reason.clone())
            }
            (_, None) => AssetValuation::new(self.id(), self.name(), self.category_key()),
        }
    }

    pub fn id(&self) -> &str {
        match (self, self.record()) {
            (Asset::Unrecognized(a), _) => &a.id,
            (_, Some(record)) => record.id(),
            (_, None) => "",
        }
    }

    pub fn name(&self) -> &str {
        match (self, self.record()) {
            (Asset::Unrecognized(a), _) => &a.name,
            (_, Some(record)) => record.name(),
            (_, None) => "",
        }
    }

    /// The known category, or `None` for unrecognized records.
    pub fn category(&self) -> Option<AssetCategory> {
        self.record().map(|r| r.category())
    }

    /// The category key used for grouping (the raw tag for unrecognized records).
    pub fn category_key(&self) -> &str {
        match self {
            Asset::Unrecognized(a) => &a.kind,
            _ => self.category().map(|c| c.key()).unwrap_or_default(),
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            Asset::Cash(a) => a.notes.as_deref(),
            Asset::SwedenStock(a) => a.notes.as_deref(),
            Asset::PakistanStock(a) => a.notes.as_deref(),
            Asset::Gold(a) => a.notes.as_deref(),
            Asset::Silver(a) => a.notes.as_deref(),
            Asset::Business(a) => a.notes.as_deref(),
            Asset::Receivable(a) => a.notes.as_deref(),
            Asset::Liability(a) => a.notes.as_deref(),
            Asset::Fund(a) => a.notes.as_deref(),
            Asset::Unrecognized(a) => a.raw.get("notes").and_then(Value::as_str),
        }
    }

    pub(crate) fn set_id(&mut self, id: String) {
        match self {
            Asset::Cash(a) => a.id = id,
            Asset::SwedenStock(a) => a.id = id,
            Asset::PakistanStock(a) => a.id = id,
            Asset::Gold(a) => a.id = id,
            Asset::Silver(a) => a.id = id,
            Asset::Business(a) => a.id = id,
            Asset::Receivable(a) => a.id = id,
            Asset::Liability(a) => a.id = id,
            Asset::Fund(a) => a.id = id,
            Asset::Unrecognized(a) => a.id = id,
        }
    }
}

// Implement From<T> for each variant to simplify API usage

macro_rules! impl_from_record {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Asset {
                fn from(asset: $ty) -> Self {
                    Asset::$variant(asset)
                }
            }
        )*
    };
}

impl_from_record!(
    Cash(CashAccount),
    SwedenStock(SwedenStock),
    PakistanStock(PakistanStock),
    Gold(GoldHolding),
    Silver(SilverHolding),
    Business(BusinessInventory),
    Receivable(Receivable),
    Liability(Liability),
    Fund(FundHolding),
);
