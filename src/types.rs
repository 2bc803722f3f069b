use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// The kind of operation a [`CalculationStep`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Multiply,
    Convert,
    Rate,
    Result,
    Info,
}

/// Represents a single step in an asset valuation.
///
/// Steps are kept on every [`AssetValuation`] so a detail view can show how
/// the zakatable value and the credit were derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationStep {
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    fn with(description: impl Into<String>, amount: Option<Decimal>, operation: Operation) -> Self {
        Self {
            description: description.into(),
            amount,
            operation,
        }
    }

    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(description, Some(amount), Operation::Initial)
    }

    pub fn multiply(description: impl Into<String>, factor: Decimal) -> Self {
        Self::with(description, Some(factor), Operation::Multiply)
    }

    pub fn convert(description: impl Into<String>, rate: Decimal) -> Self {
        Self::with(description, Some(rate), Operation::Convert)
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self::with(description, Some(rate), Operation::Rate)
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self::with(description, Some(amount), Operation::Result)
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::with(description, None, Operation::Info)
    }
}

/// The well-known asset categories, in the order they are reported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetCategory {
    Cash,
    SwedenStock,
    PakistanStock,
    Fund,
    Gold,
    Silver,
    Business,
    Receivable,
    Liability,
}

impl AssetCategory {
    /// The stable key used on the wire and in category summaries.
    pub fn key(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "cash",
            AssetCategory::SwedenStock => "sweden_stock",
            AssetCategory::PakistanStock => "pakistan_stock",
            AssetCategory::Fund => "fund",
            AssetCategory::Gold => "gold",
            AssetCategory::Silver => "silver",
            AssetCategory::Business => "business",
            AssetCategory::Receivable => "receivable",
            AssetCategory::Liability => "liability",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "Cash & Bank Accounts",
            AssetCategory::SwedenStock => "Sweden Stocks (Avanza / Nordnet)",
            AssetCategory::PakistanStock => "Pakistan Stocks (PSX)",
            AssetCategory::Fund => "Funds (Mutual / Index)",
            AssetCategory::Gold => "Gold",
            AssetCategory::Silver => "Silver",
            AssetCategory::Business => "Business Assets & Inventory",
            AssetCategory::Receivable => "Receivables (Money Owed to You)",
            AssetCategory::Liability => "Liabilities & Debts",
        }
    }

    /// Liabilities reduce net wealth and never generate zakat themselves.
    pub fn is_liability(&self) -> bool {
        matches!(self, AssetCategory::Liability)
    }
}

/// Valuation of a single asset, normalized to the base currency.
///
/// `zakat_due` is the ungated 2.5% figure for this item alone; the
/// portfolio-level nisab gate is applied only to the aggregate totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetValuation {
    pub asset_id: String,
    pub name: String,
    /// Category key, e.g. `"gold"`, or the raw tag of an unrecognized asset.
    pub category: String,
    pub zakatable_value: Decimal,
    pub zakat_due: Decimal,
    pub zakat_already_paid: Decimal,
    pub is_excluded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_reason: Option<String>,
    #[serde(default)]
    pub calculation_trace: Vec<CalculationStep>,
}

impl AssetValuation {
    pub fn new(asset_id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            name: name.into(),
            category: category.into(),
            zakatable_value: Decimal::ZERO,
            zakat_due: Decimal::ZERO,
            zakat_already_paid: Decimal::ZERO,
            is_excluded: false,
            exclusion_reason: None,
            calculation_trace: Vec::new(),
        }
    }

    /// Sets the zakatable value and derives `zakat_due` at the standard rate.
    pub fn with_value(mut self, value: Decimal) -> Self {
        self.zakatable_value = value;
        self.zakat_due = value.saturating_mul(crate::ZAKAT_RATE);
        self
    }

    pub fn with_paid(mut self, paid: Decimal) -> Self {
        self.zakat_already_paid = paid;
        self
    }

    pub fn excluded(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.zakatable_value = Decimal::ZERO;
        self.zakat_due = Decimal::ZERO;
        self.is_excluded = true;
        self.calculation_trace.push(CalculationStep::info(reason.clone()));
        self.exclusion_reason = Some(reason);
        self
    }

    pub fn with_trace(mut self, trace: Vec<CalculationStep>) -> Self {
        self.calculation_trace = trace;
        self
    }

    /// Returns the zakat due for this item net of what was already paid, never negative.
    pub fn net_due(&self) -> Decimal {
        self.zakat_due.saturating_sub(self.zakat_already_paid).max(Decimal::ZERO)
    }

    /// Generates a human-readable explanation of the valuation steps.
    pub fn explain(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        let _ = writeln!(output, "Valuation for '{}' ({}):", self.name, self.category);
        let _ = writeln!(output, "{:-<50}", "");

        let width = self
            .calculation_trace
            .iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        for step in &self.calculation_trace {
            let symbol = match step.operation {
                Operation::Initial => " ",
                Operation::Multiply => "x",
                Operation::Convert => "~",
                Operation::Rate => "%",
                Operation::Result => "=",
                Operation::Info => "",
            };
            match step.amount {
                Some(amount) if step.operation == Operation::Rate => {
                    let _ = writeln!(output, "  {:<width$} : {} {:>12.3}", step.description, symbol, amount);
                }
                Some(amount) => {
                    let _ = writeln!(output, "  {:<width$} : {} {:>12.2}", step.description, symbol, amount);
                }
                None => {
                    let _ = writeln!(output, "  INFO: {}", step.description);
                }
            }
        }

        let _ = writeln!(output, "{:-<50}", "");
        if let Some(reason) = &self.exclusion_reason {
            let _ = writeln!(output, "Excluded: {}", reason);
        } else {
            let _ = writeln!(output, "Zakat Due: {:.2} | Already Paid: {:.2}", self.zakat_due, self.zakat_already_paid);
        }
        output
    }
}

/// Errors raised by the collaborators around the engine (storage, import,
/// mutation). The valuation engine itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum ZakatError {
    #[error("Failed to read file")]
    Read(#[source] std::io::Error),
    #[error("Failed to write file: {0}")]
    Write(#[source] std::io::Error),
    #[error("Could not parse file. Please make sure it is a valid EasyZakat JSON file.")]
    Parse(#[source] serde_json::Error),
    #[error("Invalid EasyZakat file format")]
    InvalidFormat,
    #[error("Failed to encode data: {0}")]
    Encode(String),
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
    #[error("An asset with id '{0}' already exists")]
    DuplicateAsset(String),
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
}

impl ZakatError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ZakatError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for ZakatError {
    fn from(e: csv::Error) -> Self {
        ZakatError::Encode(e.to_string())
    }
}
