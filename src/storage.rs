//! Local persistence for the portfolio record.
//!
//! Loading is forgiving: a missing or unreadable record yields a fresh
//! default portfolio so the user is never locked out by a corrupt file.
//! Writes go through a temporary file and a rename.
//!
//! # Example
//!
//! ```ignore
//! use easyzakat::storage::{JsonFileStore, PortfolioStore};
//!
//! let store = JsonFileStore::new("easyzakat_data.json");
//! let mut portfolio = store.load()?;
//! store.save(&mut portfolio)?;
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use crate::portfolio::Portfolio;
use crate::types::ZakatError;

/// File name used by the original app for its stored record.
pub const DEFAULT_FILE_NAME: &str = "easyzakat_data.json";

/// Parses a stored record, falling back to defaults instead of failing.
///
/// Unusable fields are replaced one by one; only content that is not a JSON
/// object at all yields a default portfolio.
pub fn parse_stored(content: &str) -> Portfolio {
    match serde_json::from_str::<Portfolio>(content) {
        Ok(portfolio) => portfolio.hydrate(),
        Err(e) => {
            tracing::warn!(error = %e, "stored portfolio could not be parsed; starting from defaults");
            Portfolio::default()
        }
    }
}

fn encode(portfolio: &Portfolio) -> Result<String, ZakatError> {
    serde_json::to_string_pretty(portfolio).map_err(|e| ZakatError::Encode(e.to_string()))
}

/// Synchronous storage backend for a single portfolio.
pub trait PortfolioStore {
    /// Loads the stored portfolio, or a default one if nothing usable is stored.
    fn load(&self) -> Result<Portfolio, ZakatError>;

    /// Writes `portfolio` exactly as given.
    fn write(&self, portfolio: &Portfolio) -> Result<(), ZakatError>;

    /// Removes the stored record. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), ZakatError>;

    /// Stamps `last_modified` and writes the portfolio.
    fn save(&self, portfolio: &mut Portfolio) -> Result<(), ZakatError> {
        portfolio.last_modified = Utc::now();
        self.write(portfolio)
    }
}

/// Stores the portfolio as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PortfolioStore for JsonFileStore {
    fn load(&self) -> Result<Portfolio, ZakatError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                tracing::debug!(path = %self.path.display(), "loaded portfolio");
                Ok(parse_stored(&content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no stored portfolio; starting fresh");
                Ok(Portfolio::default())
            }
            Err(e) => Err(ZakatError::Read(e)),
        }
    }

    fn write(&self, portfolio: &Portfolio) -> Result<(), ZakatError> {
        let json = encode(portfolio)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ZakatError::Write)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(ZakatError::Write)?;
        fs::rename(&tmp, &self.path).map_err(ZakatError::Write)?;
        tracing::info!(path = %self.path.display(), assets = portfolio.assets.len(), "portfolio saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), ZakatError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "stored portfolio cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ZakatError::Write(e)),
        }
    }
}

/// In-memory store holding the serialized record. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with raw record content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
        }
    }

    /// Returns the raw stored record, if any.
    pub fn content(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.content.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PortfolioStore for MemoryStore {
    fn load(&self) -> Result<Portfolio, ZakatError> {
        Ok(self.lock().as_deref().map(parse_stored).unwrap_or_default())
    }

    fn write(&self, portfolio: &Portfolio) -> Result<(), ZakatError> {
        let json = encode(portfolio)?;
        *self.lock() = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<(), ZakatError> {
        *self.lock() = None;
        Ok(())
    }
}

/// Async version of [`PortfolioStore`].
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AsyncPortfolioStore: Send + Sync {
    async fn load_async(&self) -> Result<Portfolio, ZakatError>;

    async fn save_async(&self, portfolio: &mut Portfolio) -> Result<(), ZakatError>;

    async fn clear_async(&self) -> Result<(), ZakatError>;
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl AsyncPortfolioStore for JsonFileStore {
    async fn load_async(&self) -> Result<Portfolio, ZakatError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(parse_stored(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Portfolio::default()),
            Err(e) => Err(ZakatError::Read(e)),
        }
    }

    async fn save_async(&self, portfolio: &mut Portfolio) -> Result<(), ZakatError> {
        portfolio.last_modified = Utc::now();
        let json = encode(portfolio)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(ZakatError::Write)?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await.map_err(ZakatError::Write)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(ZakatError::Write)?;
        tracing::info!(path = %self.path.display(), "portfolio saved");
        Ok(())
    }

    async fn clear_async(&self) -> Result<(), ZakatError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ZakatError::Write(e)),
        }
    }
}
