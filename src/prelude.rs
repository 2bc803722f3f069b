//! Prelude module for EasyZakat
//!
//! This module re-exports commonly used structs, traits, and types to allow
//! for easier usage of the library.
//!
//! # Usage
//!
//! ```rust
//! use easyzakat::prelude::*;
//! ```

// Core exports
pub use crate::assets::{Asset, UnrecognizedAsset};
pub use crate::config::UserSettings;
pub use crate::currency::{format_money, from_base, to_base, Currency, ExchangeRateTable};
pub use crate::hawl::{HawlConfiguration, HawlState, HawlStatus, HawlTracker, HIJRI_YEAR_DAYS};
pub use crate::inputs::IntoAmount;
pub use crate::nisab::{nisab_in_base, NisabConfiguration, NisabMethod};
pub use crate::obligation::{calculate_obligation, calculate_obligation_now, CategorySummary, ObligationResult};
pub use crate::portfolio::Portfolio;
pub use crate::state::ZakatState;
pub use crate::storage::{JsonFileStore, MemoryStore, PortfolioStore};
#[cfg(feature = "async")]
pub use crate::storage::AsyncPortfolioStore;
pub use crate::traits::{AssetRecord, ValuateAsset};
pub use crate::transfer::{export_csv, export_file_name, export_json, import_file, import_json};
pub use crate::types::{AssetCategory, AssetValuation, CalculationStep, Operation, ZakatError};
pub use crate::ZAKAT_RATE;

// Re-export asset records and their options
pub use crate::maal::business::BusinessInventory;
pub use crate::maal::cash::CashAccount;
pub use crate::maal::debts::{Liability, Receivable};
pub use crate::maal::equities::{PakistanStock, SwedenStock};
pub use crate::maal::funds::{FundHolding, FundType, FundZakatMethod};
pub use crate::maal::precious_metals::{GoldHolding, GoldPurity, SilverHolding};
pub use crate::maal::Country;
