//! # EasyZakat
//!
//! Personal zakat obligation engine: values a mixed portfolio in a single
//! base currency, applies per-category rules, gates the total against the
//! nisab, and tracks the lunar year (hawl).
//!
//! ```rust
//! use easyzakat::prelude::*;
//!
//! let portfolio = Portfolio::new()
//!     .add(CashAccount::new("Savings").amount(100_000))
//!     .add(GoldHolding::new("Jewellery").weight(100).purity(GoldPurity::K22).price(950));
//!
//! let result = calculate_obligation_now(&portfolio);
//! assert!(result.meets_nisab);
//! ```

#[macro_use]
pub mod macros;

pub mod assets;
pub mod config;
pub mod currency;
pub mod hawl;
pub mod inputs;
pub mod maal;
pub mod nisab;
pub mod obligation;
pub mod portfolio;
pub mod prelude;
pub mod state;
pub mod storage;
pub mod traits;
pub mod transfer;
pub mod types;
pub mod wire;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// The zakat rate: 2.5%.
pub const ZAKAT_RATE: Decimal = dec!(0.025);

pub use assets::Asset;
pub use config::UserSettings;
pub use currency::{Currency, ExchangeRateTable};
pub use obligation::{calculate_obligation, calculate_obligation_now, ObligationResult};
pub use portfolio::Portfolio;
pub use types::{AssetValuation, ZakatError};
