//! The portfolio aggregate root: settings plus an ordered list of assets.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::{new_asset_id, Asset};
use crate::config::UserSettings;
use crate::types::ZakatError;

pub const DATA_VERSION: &str = "1.0.0";

fn default_version() -> String {
    DATA_VERSION.to_string()
}

/// Everything the user has entered, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default = "default_version", deserialize_with = "crate::wire::text")]
    pub version: String,
    #[serde(default = "Utc::now", deserialize_with = "crate::wire::timestamp")]
    pub last_modified: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::wire::or_default")]
    pub settings: UserSettings,
    #[serde(default, deserialize_with = "crate::wire::or_default")]
    pub assets: Vec<Asset>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            version: default_version(),
            last_modified: Utc::now(),
            settings: UserSettings::default(),
            assets: Vec::new(),
        }
    }
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: UserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Appends an asset (builder style). Duplicate ids are re-keyed by [`Portfolio::hydrate`].
    pub fn add(mut self, asset: impl Into<Asset>) -> Self {
        self.assets.push(asset.into());
        self
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends an asset, rejecting empty names and duplicate ids.
    ///
    /// An empty id is replaced with a fresh one.
    pub fn push_asset(&mut self, mut asset: Asset) -> Result<(), ZakatError> {
        if asset.name().trim().is_empty() {
            return Err(ZakatError::invalid_input("name", "Asset name must not be empty"));
        }
        if asset.id().is_empty() {
            asset.set_id(new_asset_id());
        }
        if self.contains(asset.id()) {
            return Err(ZakatError::DuplicateAsset(asset.id().to_string()));
        }
        self.assets.push(asset);
        Ok(())
    }

    /// Replaces the asset with the same id, keeping its position.
    pub fn replace_asset(&mut self, asset: Asset) -> Result<(), ZakatError> {
        if asset.name().trim().is_empty() {
            return Err(ZakatError::invalid_input("name", "Asset name must not be empty"));
        }
        let slot = self
            .assets
            .iter_mut()
            .find(|a| a.id() == asset.id())
            .ok_or_else(|| ZakatError::AssetNotFound(asset.id().to_string()))?;
        *slot = asset;
        Ok(())
    }

    /// Removes and returns the asset with the given id.
    pub fn remove_asset(&mut self, id: &str) -> Result<Asset, ZakatError> {
        let index = self
            .assets
            .iter()
            .position(|a| a.id() == id)
            .ok_or_else(|| ZakatError::AssetNotFound(id.to_string()))?;
        Ok(self.assets.remove(index))
    }

    /// Restores invariants after reading untrusted data: a version label,
    /// base rate 1, every asset id present and unique.
    pub fn hydrate(mut self) -> Self {
        if self.version.trim().is_empty() {
            self.version = default_version();
        }
        self.settings.exchange_rates.normalize();

        let mut seen = HashSet::with_capacity(self.assets.len());
        for asset in &mut self.assets {
            if asset.id().is_empty() || seen.contains(asset.id()) {
                let fresh = new_asset_id();
                tracing::warn!(old = asset.id(), new = %fresh, "re-keying asset with missing or duplicate id");
                asset.set_id(fresh);
            }
            seen.insert(asset.id().to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maal::cash::CashAccount;
    use crate::maal::debts::Liability;

    #[test]
    fn test_hydrate_rekeys_duplicates() {
        let portfolio = Portfolio::new()
            .add(CashAccount::new("A").with_id("same"))
            .add(CashAccount::new("B").with_id("same"))
            .add(CashAccount::new("C").with_id(""))
            .hydrate();

        assert_eq!(portfolio.assets[0].id(), "same");
        assert_ne!(portfolio.assets[1].id(), "same");
        assert!(!portfolio.assets[2].id().is_empty());
    }

    #[test]
    fn test_push_rejects_duplicates_and_empty_names() {
        let mut portfolio = Portfolio::new();
        portfolio.push_asset(CashAccount::new("A").with_id("a1").into()).unwrap();

        let dup = portfolio.push_asset(CashAccount::new("B").with_id("a1").into());
        assert!(matches!(dup, Err(ZakatError::DuplicateAsset(id)) if id == "a1"));

        let unnamed = portfolio.push_asset(Liability::new("  ").into());
        assert!(matches!(unnamed, Err(ZakatError::InvalidInput { .. })));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut portfolio = Portfolio::new()
            .add(CashAccount::new("A").with_id("a"))
            .add(CashAccount::new("B").with_id("b"));

        portfolio
            .replace_asset(CashAccount::new("A2").with_id("a").amount(5).into())
            .unwrap();
        assert_eq!(portfolio.assets[0].name(), "A2");

        assert!(portfolio.replace_asset(CashAccount::new("Z").with_id("zz").into()).is_err());
        assert!(portfolio.remove_asset("b").is_ok());
        assert!(matches!(portfolio.remove_asset("b"), Err(ZakatError::AssetNotFound(_))));
    }

    #[test]
    fn test_missing_sections_default() {
        let portfolio: Portfolio = serde_json::from_str("{}").unwrap();
        assert_eq!(portfolio.version, DATA_VERSION);
        assert!(portfolio.assets.is_empty());
        assert_eq!(portfolio.settings.period, "2025-2026");
    }
}
