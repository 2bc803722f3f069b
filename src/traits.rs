use crate::currency::ExchangeRateTable;
use crate::types::{AssetCategory, AssetValuation};

/// Identity shared by every asset record.
pub trait AssetRecord {
    /// Returns the stable unique identifier for this asset.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn category(&self) -> AssetCategory;
}

/// Trait to be implemented by every asset category rule.
///
/// Valuation is total: missing or degenerate inputs produce a zero valuation,
/// never an error.
pub trait ValuateAsset: AssetRecord {
    /// Value this asset in the base currency.
    fn valuate(&self, rates: &ExchangeRateTable) -> AssetValuation;
}
