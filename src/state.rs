//! Single owner of the portfolio and its computed obligation.
//!
//! Every mutation builds the next portfolio, recomputes the obligation,
//! persists, and only then swaps both in. If persisting fails the previous
//! portfolio and result stay in place.

use chrono::{Local, NaiveDate};

use crate::assets::Asset;
use crate::config::UserSettings;
use crate::obligation::{calculate_obligation, ObligationResult};
use crate::portfolio::Portfolio;
use crate::storage::PortfolioStore;
use crate::types::ZakatError;

pub struct ZakatState<S: PortfolioStore> {
    store: S,
    portfolio: Portfolio,
    result: ObligationResult,
    as_of: Option<NaiveDate>,
}

impl<S: PortfolioStore> ZakatState<S> {
    /// Loads the stored portfolio and computes its obligation.
    pub fn open(store: S) -> Result<Self, ZakatError> {
        let portfolio = store.load()?;
        let result = calculate_obligation(&portfolio, Local::now().date_naive());
        Ok(Self {
            store,
            portfolio,
            result,
            as_of: None,
        })
    }

    /// Pins the date the hawl is evaluated on. `None` follows the local clock.
    pub fn with_calculation_date(mut self, date: Option<NaiveDate>) -> Self {
        self.as_of = date;
        self.result = calculate_obligation(&self.portfolio, self.today());
        self
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn result(&self) -> &ObligationResult {
        &self.result
    }

    pub fn settings(&self) -> &UserSettings {
        &self.portfolio.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recomputes against the current date without mutating anything.
    pub fn refresh(&mut self) -> &ObligationResult {
        self.result = calculate_obligation(&self.portfolio, self.today());
        &self.result
    }

    /// Adds an asset and returns its id (a fresh one if the asset had none).
    pub fn add_asset(&mut self, asset: impl Into<Asset>) -> Result<String, ZakatError> {
        let mut next = self.portfolio.clone();
        next.push_asset(asset.into())?;
        let id = next.assets.last().map(|a| a.id().to_string()).unwrap_or_default();
        self.commit(next)?;
        tracing::info!(%id, "asset added");
        Ok(id)
    }

    /// Replaces the asset with the same id.
    pub fn update_asset(&mut self, asset: impl Into<Asset>) -> Result<(), ZakatError> {
        let asset = asset.into();
        let id = asset.id().to_string();
        let mut next = self.portfolio.clone();
        next.replace_asset(asset)?;
        self.commit(next)?;
        tracing::info!(%id, "asset updated");
        Ok(())
    }

    /// Deletes the asset with the given id and returns it.
    pub fn delete_asset(&mut self, id: &str) -> Result<Asset, ZakatError> {
        let mut next = self.portfolio.clone();
        let removed = next.remove_asset(id)?;
        self.commit(next)?;
        tracing::info!(id, "asset deleted");
        Ok(removed)
    }

    /// Edits a copy of the settings; the edit is applied only if it validates and persists.
    pub fn update_settings<F>(&mut self, edit: F) -> Result<(), ZakatError>
    where
        F: FnOnce(&mut UserSettings) -> Result<(), ZakatError>,
    {
        let mut next = self.portfolio.clone();
        edit(&mut next.settings)?;
        next.settings.validate()?;
        self.commit(next)?;
        tracing::info!("settings updated");
        Ok(())
    }

    /// Replaces the whole portfolio, e.g. after an import.
    pub fn replace(&mut self, portfolio: Portfolio) -> Result<(), ZakatError> {
        self.commit(portfolio.hydrate())
    }

    /// Clears storage and starts over from defaults.
    pub fn reset(&mut self) -> Result<(), ZakatError> {
        self.store.clear()?;
        self.portfolio = Portfolio::default();
        self.result = calculate_obligation(&self.portfolio, self.today());
        tracing::info!("portfolio reset");
        Ok(())
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    fn commit(&mut self, mut next: Portfolio) -> Result<(), ZakatError> {
        let result = calculate_obligation(&next, self.today());
        self.store.save(&mut next)?;
        self.portfolio = next;
        self.result = result;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maal::cash::CashAccount;
    use crate::storage::MemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// A store whose writes always fail.
    struct ReadOnlyStore;

    impl PortfolioStore for ReadOnlyStore {
        fn load(&self) -> Result<Portfolio, ZakatError> {
            Ok(Portfolio::default())
        }

        fn write(&self, _: &Portfolio) -> Result<(), ZakatError> {
            Err(ZakatError::Write(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }

        fn clear(&self) -> Result<(), ZakatError> {
            Ok(())
        }
    }

    #[test]
    fn test_mutations_recompute_and_persist() {
        let mut state = ZakatState::open(MemoryStore::new()).unwrap();
        let id = state.add_asset(CashAccount::new("Bank").amount(100_000)).unwrap();

        assert_eq!(state.result().net_zakat_owed, dec!(2500));
        assert!(state.store().content().unwrap().contains(&id));

        state.update_asset(CashAccount::new("Bank").with_id(&id).amount(1000)).unwrap();
        assert_eq!(state.result().net_zakat_owed, Decimal::ZERO);

        state.delete_asset(&id).unwrap();
        assert!(state.portfolio().assets.is_empty());
        assert!(matches!(state.delete_asset(&id), Err(ZakatError::AssetNotFound(_))));
    }

    #[test]
    fn test_failed_persist_keeps_previous_state() {
        let mut state = ZakatState::open(ReadOnlyStore).unwrap();
        assert!(state.add_asset(CashAccount::new("Bank").amount(100_000)).is_err());
        assert!(state.portfolio().assets.is_empty());
        assert_eq!(state.result().total_wealth, Decimal::ZERO);
    }

    #[test]
    fn test_settings_edit_is_validated() {
        let mut state = ZakatState::open(MemoryStore::new()).unwrap();
        let err = state.update_settings(|s| {
            s.nisab.gold_price_per_gram = dec!(-1);
            Ok(())
        });
        assert!(err.is_err());
        assert_eq!(state.settings().nisab.gold_price_per_gram, dec!(950));

        state
            .update_settings(|s| s.exchange_rates.set_rate(crate::currency::Currency::USD, dec!(11)))
            .unwrap();
        assert_eq!(state.settings().exchange_rates.rate(crate::currency::Currency::USD), dec!(11));
    }

    #[test]
    fn test_reset_clears_store() {
        let mut state = ZakatState::open(MemoryStore::new()).unwrap();
        state.add_asset(CashAccount::new("Bank").amount(5)).unwrap();
        state.reset().unwrap();
        assert!(state.portfolio().assets.is_empty());
        assert!(state.store().content().is_none());
    }
}
