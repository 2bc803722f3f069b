//! Persistent CLI Configuration Loader
//!
//! Configuration is loaded from `~/.config/easyzakat/config.toml` on Linux,
//! `~/Library/Application Support/easyzakat/config.toml` on macOS, or
//! `%APPDATA%\easyzakat\config.toml` on Windows.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use easyzakat::storage::DEFAULT_FILE_NAME;

/// CLI Configuration structure loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Where the portfolio record is stored.
    pub data_file: Option<PathBuf>,
    /// Currency used for new assets when none is given (e.g. "SEK", "PKR").
    pub default_currency: Option<String>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
    /// Directory for daily log files.
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Returns the platform-specific configuration directory.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("easyzakat"))
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Attempts to load configuration from the default config file location.
    /// Returns `CliConfig::default()` if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<CliConfig>(&content) {
                Ok(config) => {
                    debug!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Resolves the portfolio file: explicit flag, then config, then the platform data dir.
    pub fn data_path(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        dirs::data_dir()
            .map(|p| p.join("easyzakat").join(DEFAULT_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
    }

    /// Directory for log files: config value, else `logs/` next to the data file.
    pub fn log_path(&self, data_path: &Path) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            data_path
                .parent()
                .map(|p| p.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)?;
        debug!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.data_file.is_none());
        assert!(config.default_currency.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfig {
            default_currency: Some("PKR".to_string()),
            enable_logging: Some(true),
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("default-currency"));
        assert!(toml_str.contains("PKR"));
    }

    #[test]
    fn test_round_trip_and_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = CliConfig {
            data_file: Some(dir.path().join("data.json")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(CliConfig::load_from(&path), config);

        std::fs::write(&path, "data-file = [").unwrap();
        assert_eq!(CliConfig::load_from(&path), CliConfig::default());
    }

    #[test]
    fn test_data_path_precedence() {
        let config = CliConfig {
            data_file: Some(PathBuf::from("/from/config.json")),
            ..Default::default()
        };
        assert_eq!(config.data_path(Some(Path::new("/flag.json"))), PathBuf::from("/flag.json"));
        assert_eq!(config.data_path(None), PathBuf::from("/from/config.json"));
        assert_eq!(
            config.log_path(Path::new("/from/config.json")),
            PathBuf::from("/from/logs")
        );
    }
}
