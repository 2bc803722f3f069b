//! Import and export of the portfolio record.
//!
//! JSON export is lossless and can be imported back. CSV export is a
//! flattened, read-only view with one row per asset.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::assets::Asset;
use crate::portfolio::Portfolio;
use crate::types::ZakatError;

pub const CSV_HEADERS: [&str; 17] = [
    "Name",
    "Type",
    "Country",
    "Currency",
    "Amount / Value",
    "Units",
    "NAV per Unit",
    "Shares",
    "Price per Share",
    "Weight (g)",
    "Purity",
    "Fund Type",
    "Zakat Method",
    "Zakatable %",
    "Zakat Deducted at Source",
    "Zakat Amount Deducted",
    "Notes",
];

/// Writes the portfolio as pretty-printed JSON and flushes the writer.
pub fn export_json<W: Write>(portfolio: &Portfolio, mut writer: W) -> Result<(), ZakatError> {
    serde_json::to_writer_pretty(&mut writer, portfolio).map_err(|e| ZakatError::Encode(e.to_string()))?;
    writer.flush().map_err(ZakatError::Write)
}

/// Reads an exported portfolio.
///
/// The document must parse as JSON and carry an `assets` array and a
/// `settings` object. Inside those, each missing or unusable field takes its
/// own default.
pub fn import_json<R: Read>(reader: R) -> Result<Portfolio, ZakatError> {
    let value: Value = serde_json::from_reader(reader).map_err(ZakatError::Parse)?;

    let has_assets = value.get("assets").is_some_and(Value::is_array);
    let has_settings = value.get("settings").is_some_and(Value::is_object);
    if !has_assets || !has_settings {
        return Err(ZakatError::InvalidFormat);
    }

    let portfolio: Portfolio = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "import rejected");
        ZakatError::InvalidFormat
    })?;
    let portfolio = portfolio.hydrate();
    tracing::info!(assets = portfolio.assets.len(), "portfolio imported");
    Ok(portfolio)
}

/// Reads an exported portfolio from a file.
pub fn import_file(path: impl AsRef<Path>) -> Result<Portfolio, ZakatError> {
    let content = fs::read(path.as_ref()).map_err(ZakatError::Read)?;
    import_json(content.as_slice())
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

fn optional(value: Option<Decimal>) -> String {
    value.map(amount).unwrap_or_default()
}

/// Flattens one asset into the 17 CSV columns.
fn csv_row(asset: &Asset) -> [String; 17] {
    let mut row: [String; 17] = Default::default();
    row[0] = asset.name().to_string();
    row[1] = asset.category_key().to_string();
    row[16] = asset.notes().unwrap_or_default().to_string();

    match asset {
        Asset::Cash(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[4] = amount(a.amount);
        }
        Asset::SwedenStock(a) => {
            row[2] = "sweden".to_string();
            row[3] = crate::currency::Currency::BASE.to_string();
            row[5] = amount(a.shares);
            row[7] = amount(a.shares);
            row[8] = amount(a.current_price_per_share);
        }
        Asset::PakistanStock(a) => {
            row[2] = "pakistan".to_string();
            row[3] = a.currency.to_string();
            row[5] = amount(a.shares);
            row[7] = amount(a.shares);
            row[8] = amount(a.current_price_per_share);
            row[14] = a.zakat_deducted_at_source.to_string();
            row[15] = optional(a.zakat_amount_deducted);
        }
        Asset::Gold(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[9] = amount(a.weight_grams);
            row[10] = a.purity.to_string();
        }
        Asset::Silver(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[9] = amount(a.weight_grams);
        }
        Asset::Business(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[4] = amount(a.market_value);
        }
        Asset::Receivable(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[4] = amount(a.amount);
        }
        Asset::Liability(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[4] = amount(a.amount);
        }
        Asset::Fund(a) => {
            row[2] = a.country.to_string();
            row[3] = a.currency.to_string();
            row[5] = amount(a.units);
            row[6] = amount(a.nav_per_unit);
            row[11] = a.fund_type.to_string();
            row[12] = a.zakat_method.to_string();
            row[13] = optional(a.zakatable_percent);
            row[14] = a.zakat_deducted_at_source.to_string();
            row[15] = optional(a.zakat_amount_deducted);
        }
        Asset::Unrecognized(_) => {}
    }
    row
}

/// Writes one CSV row per asset with CRLF line endings.
///
/// Fields are quoted only when they contain a comma, quote or line break.
pub fn export_csv<W: Write>(portfolio: &Portfolio, writer: W) -> Result<(), ZakatError> {
    let mut csv = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    csv.write_record(CSV_HEADERS)?;
    for asset in &portfolio.assets {
        csv.write_record(&csv_row(asset))?;
    }
    csv.flush().map_err(ZakatError::Write)?;
    Ok(())
}

/// Suggested download name, e.g. `easyzakat-2025-2026-2025-10-01.json`.
pub fn export_file_name(portfolio: &Portfolio, today: NaiveDate, extension: &str) -> String {
    format!(
        "easyzakat-{}-{}.{}",
        portfolio.settings.period,
        today.format("%Y-%m-%d"),
        extension.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maal::cash::CashAccount;
    use crate::maal::funds::FundHolding;

    #[test]
    fn test_import_requires_assets_and_settings() {
        let err = import_json(r#"{"assets": []}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ZakatError::InvalidFormat));
        assert_eq!(err.to_string(), "Invalid EasyZakat file format");

        let err = import_json(r#"{"assets": "none", "settings": {}}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ZakatError::InvalidFormat));

        let err = import_json("not json".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not parse file. Please make sure it is a valid EasyZakat JSON file."
        );
    }

    #[test]
    fn test_import_minimal_document() {
        let portfolio = import_json(r#"{"assets": [], "settings": {}}"#.as_bytes()).unwrap();
        assert_eq!(portfolio.version, "1.0.0");
        assert_eq!(portfolio.settings.period, "2025-2026");
    }

    struct FailingFlush(Vec<u8>);

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_export_reports_flush_failure() {
        let portfolio = Portfolio::new().add(CashAccount::new("Bank").amount(10));
        let err = export_json(&portfolio, FailingFlush(Vec::new())).unwrap_err();
        assert!(matches!(err, ZakatError::Write(_)));
        assert!(export_csv(&portfolio, FailingFlush(Vec::new())).is_err());
    }

    #[test]
    fn test_import_missing_file() {
        let err = import_file("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read file");
    }

    #[test]
    fn test_csv_quoting_and_line_endings() {
        let portfolio = Portfolio::new()
            .add(CashAccount::new("Bank, main").amount(100).notes("say \"hi\""))
            .add(FundHolding::new("Index").units(2.5).nav(100).equity_ratio(30));

        let mut out = Vec::new();
        export_csv(&portfolio, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert!(lines[0].starts_with("Name,Type,Country,Currency,Amount / Value"));
        assert_eq!(lines[1], r#""Bank, main",cash,other,SEK,100,,,,,,,,,,,,"say ""hi""""#);
        assert_eq!(lines[2], "Index,fund,other,SEK,,2.5,100,,,,,equity,equity_ratio,30,false,,");
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        assert_eq!(
            export_file_name(&Portfolio::new(), date, "csv"),
            "easyzakat-2025-2026-2025-10-01.csv"
        );
    }
}
