//! Subcommand definitions and their handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;

use easyzakat::prelude::*;

use crate::render;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the zakat summary (default)
    Summary {
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every asset with its own figures
    List,
    /// Add an asset
    Add {
        #[command(subcommand)]
        asset: AddAsset,
    },
    /// Remove an asset by id
    Remove { id: String },
    /// Print the calculation trace for one asset
    Explain { id: String },
    /// Show or change the hawl
    Hawl {
        /// Date nisab was first met (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear")]
        start: Option<NaiveDate>,
        /// Forget the start date
        #[arg(long)]
        clear: bool,
        /// Mark the hawl as broken
        #[arg(long, conflicts_with = "not_broken")]
        broken: bool,
        /// Clear the broken flag
        #[arg(long)]
        not_broken: bool,
    },
    /// Show or change settings
    Settings {
        #[arg(long)]
        display_currency: Option<Currency>,
        /// Exchange rate as CURRENCY=SEK_PER_UNIT, repeatable
        #[arg(long = "rate", value_parser = parse_rate)]
        rates: Vec<(Currency, Decimal)>,
        /// gold or silver
        #[arg(long)]
        nisab_method: Option<NisabMethod>,
        /// Gold price per gram in SEK
        #[arg(long)]
        gold_price: Option<Decimal>,
        /// Silver price per gram in SEK
        #[arg(long)]
        silver_price: Option<Decimal>,
        /// Zakat year label, e.g. 2025-2026
        #[arg(long)]
        period: Option<String>,
    },
    /// Export the portfolio
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file (default: easyzakat-<period>-<date>.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the portfolio with an exported file
    Import { file: PathBuf },
    /// Delete all stored data
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AddAsset {
    /// Bank account or cash
    Cash {
        name: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Stockholm-listed shares (price in SEK)
    SwedenStock {
        name: String,
        #[arg(long, default_value = "")]
        ticker: String,
        #[arg(long)]
        shares: Decimal,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value = "")]
        broker: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// PSX shares, optionally with zakat deducted by CDC
    PakistanStock {
        name: String,
        #[arg(long, default_value = "")]
        ticker: String,
        #[arg(long)]
        shares: Decimal,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = Currency::PKR)]
        currency: Currency,
        /// Zakat was deducted at source
        #[arg(long)]
        deducted: bool,
        /// Amount deducted (defaults to 2.5% of the holding)
        #[arg(long, requires = "deducted")]
        deducted_amount: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Gold by weight
    Gold {
        name: String,
        #[arg(long)]
        grams: Decimal,
        #[arg(long, default_value_t = GoldPurity::K24)]
        purity: GoldPurity,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Silver by weight
    Silver {
        name: String,
        #[arg(long)]
        grams: Decimal,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Trade goods at market value
    Business {
        name: String,
        #[arg(long)]
        value: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Money owed to you
    Receivable {
        name: String,
        #[arg(long)]
        amount: Decimal,
        /// The debtor is unlikely to repay
        #[arg(long)]
        unlikely: bool,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Debt you owe, deducted before the nisab check
    Liability {
        name: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mutual fund or ETF units
    Fund {
        name: String,
        #[arg(long)]
        units: Decimal,
        #[arg(long)]
        nav: Decimal,
        #[arg(long, default_value_t = FundType::Equity)]
        fund_type: FundType,
        /// Zakatable share of the NAV in percent; switches to the equity-ratio method
        #[arg(long)]
        equity_ratio: Option<Decimal>,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long, default_value_t = Country::Other)]
        country: Country,
        #[arg(long, default_value = "")]
        broker: String,
        #[arg(long)]
        deducted: bool,
        #[arg(long, requires = "deducted")]
        deducted_amount: Option<Decimal>,
        #[arg(long)]
        notes: Option<String>,
    },
}

impl AddAsset {
    /// Builds the asset, filling unspecified currencies with `default_currency`.
    pub fn into_asset(self, default_currency: Currency) -> Asset {
        let pick = |c: Option<Currency>| c.unwrap_or(default_currency);
        let (asset, notes): (Asset, Option<String>) = match self {
            AddAsset::Cash { name, amount, currency, country, notes } => (
                CashAccount::new(name).amount(amount).currency(pick(currency)).country(country).into(),
                notes,
            ),
            AddAsset::SwedenStock { name, ticker, shares, price, broker, notes } => (
                SwedenStock::new(name).ticker(ticker).shares(shares).price(price).broker(broker).into(),
                notes,
            ),
            AddAsset::PakistanStock { name, ticker, shares, price, currency, deducted, deducted_amount, notes } => {
                let mut stock = PakistanStock::new(name).ticker(ticker).shares(shares).price(price).currency(currency);
                if deducted {
                    stock = stock.deducted_at_source(deducted_amount);
                }
                (stock.into(), notes)
            }
            AddAsset::Gold { name, grams, purity, price, currency, country, notes } => (
                GoldHolding::new(name)
                    .weight(grams)
                    .purity(purity)
                    .price(price)
                    .currency(pick(currency))
                    .country(country)
                    .into(),
                notes,
            ),
            AddAsset::Silver { name, grams, price, currency, country, notes } => (
                SilverHolding::new(name)
                    .weight(grams)
                    .price(price)
                    .currency(pick(currency))
                    .country(country)
                    .into(),
                notes,
            ),
            AddAsset::Business { name, value, description, currency, country, notes } => (
                BusinessInventory::new(name)
                    .description(description)
                    .market_value(value)
                    .currency(pick(currency))
                    .country(country)
                    .into(),
                notes,
            ),
            AddAsset::Receivable { name, amount, unlikely, currency, country, notes } => (
                Receivable::new(name)
                    .amount(amount)
                    .likely(!unlikely)
                    .currency(pick(currency))
                    .country(country)
                    .into(),
                notes,
            ),
            AddAsset::Liability { name, amount, currency, country, notes } => (
                Liability::new(name).amount(amount).currency(pick(currency)).country(country).into(),
                notes,
            ),
            AddAsset::Fund {
                name,
                units,
                nav,
                fund_type,
                equity_ratio,
                currency,
                country,
                broker,
                deducted,
                deducted_amount,
                notes,
            } => {
                let mut fund = FundHolding::new(name)
                    .fund_type(fund_type)
                    .units(units)
                    .nav(nav)
                    .currency(pick(currency))
                    .country(country)
                    .broker(broker);
                if let Some(percent) = equity_ratio {
                    fund = fund.equity_ratio(percent);
                }
                if deducted {
                    fund = fund.deducted_at_source(deducted_amount);
                }
                (fund.into(), notes)
            }
        };
        match notes {
            Some(text) => with_notes(asset, text),
            None => asset,
        }
    }
}

fn with_notes(asset: Asset, text: String) -> Asset {
    match asset {
        Asset::Cash(a) => a.notes(text).into(),
        Asset::SwedenStock(a) => a.notes(text).into(),
        Asset::PakistanStock(a) => a.notes(text).into(),
        Asset::Gold(a) => a.notes(text).into(),
        Asset::Silver(a) => a.notes(text).into(),
        Asset::Business(a) => a.notes(text).into(),
        Asset::Receivable(a) => a.notes(text).into(),
        Asset::Liability(a) => a.notes(text).into(),
        Asset::Fund(a) => a.notes(text).into(),
        other => other,
    }
}

/// Parses `CUR=VALUE`, e.g. `USD=10.9`.
pub fn parse_rate(raw: &str) -> Result<(Currency, Decimal), String> {
    let (code, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CURRENCY=VALUE, got '{}'", raw))?;
    let currency = code
        .trim()
        .parse::<Currency>()
        .map_err(|_| format!("unknown currency '{}'", code.trim()))?;
    let rate = value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid rate '{}': {}", value.trim(), e))?;
    Ok((currency, rate))
}

pub fn summary(state: &ZakatState<JsonFileStore>, json: bool) -> CliResult {
    if json {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, state.result())?;
        writeln!(out)?;
    } else {
        print!("{}", render::summary(state.portfolio(), state.result()));
    }
    Ok(())
}

pub fn add(state: &mut ZakatState<JsonFileStore>, asset: AddAsset, default_currency: Currency) -> CliResult {
    let asset = asset.into_asset(default_currency);
    let name = asset.name().to_string();
    let id = state.add_asset(asset)?;
    println!("{} {} {}", "Added".green().bold(), name, format!("[{}]", id).dimmed());
    let owed = state.result().net_zakat_owed;
    println!("Zakat owed is now {}", format_money(owed, Currency::BASE).bold());
    Ok(())
}

pub fn remove(state: &mut ZakatState<JsonFileStore>, id: &str) -> CliResult {
    let removed = state.delete_asset(id)?;
    println!("{} {}", "Removed".yellow().bold(), removed.name());
    Ok(())
}

pub fn explain(state: &ZakatState<JsonFileStore>, id: &str) -> CliResult {
    let valuation = state
        .result()
        .valuations()
        .find(|v| v.asset_id == id)
        .ok_or_else(|| ZakatError::AssetNotFound(id.to_string()))?;
    print!("{}", valuation.explain());
    Ok(())
}

pub fn hawl(
    state: &mut ZakatState<JsonFileStore>,
    start: Option<NaiveDate>,
    clear: bool,
    broken: bool,
    not_broken: bool,
) -> CliResult {
    if start.is_some() || clear || broken || not_broken {
        state.update_settings(|settings| {
            if let Some(date) = start {
                settings.hawl.nisab_met_date = Some(date);
            }
            if clear {
                settings.hawl.nisab_met_date = None;
            }
            if broken {
                settings.hawl.broken = true;
            }
            if not_broken {
                settings.hawl.broken = false;
            }
            Ok(())
        })?;
    }
    print!("{}", render::hawl(&state.result().hawl_status));
    Ok(())
}

pub struct SettingsEdit {
    pub display_currency: Option<Currency>,
    pub rates: Vec<(Currency, Decimal)>,
    pub nisab_method: Option<NisabMethod>,
    pub gold_price: Option<Decimal>,
    pub silver_price: Option<Decimal>,
    pub period: Option<String>,
}

impl SettingsEdit {
    fn is_empty(&self) -> bool {
        self.display_currency.is_none()
            && self.rates.is_empty()
            && self.nisab_method.is_none()
            && self.gold_price.is_none()
            && self.silver_price.is_none()
            && self.period.is_none()
    }

    fn apply(self, settings: &mut UserSettings) -> Result<(), ZakatError> {
        if let Some(currency) = self.display_currency {
            settings.display_currency = currency;
        }
        for (currency, rate) in self.rates {
            settings.exchange_rates.set_rate(currency, rate)?;
            settings.exchange_rates.last_updated = chrono::Utc::now();
        }
        if let Some(method) = self.nisab_method {
            settings.nisab.method = method;
        }
        if let Some(price) = self.gold_price {
            settings.nisab.gold_price_per_gram = price;
        }
        if let Some(price) = self.silver_price {
            settings.nisab.silver_price_per_gram = price;
        }
        if let Some(period) = self.period {
            settings.period = period;
        }
        Ok(())
    }
}

pub fn settings(state: &mut ZakatState<JsonFileStore>, edit: SettingsEdit) -> CliResult {
    if !edit.is_empty() {
        state.update_settings(|settings| edit.apply(settings))?;
        println!("{}", "Settings saved".green());
    }
    print!("{}", render::settings(state.settings()));
    Ok(())
}

pub fn export(state: &ZakatState<JsonFileStore>, format: ExportFormat, out: Option<PathBuf>) -> CliResult {
    let path = out.unwrap_or_else(|| {
        PathBuf::from(export_file_name(
            state.portfolio(),
            Local::now().date_naive(),
            format.extension(),
        ))
    });
    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        ExportFormat::Json => export_json(state.portfolio(), &mut writer)?,
        ExportFormat::Csv => export_csv(state.portfolio(), &mut writer)?,
    }
    writer.flush()?;
    println!("{} {}", "Exported to".green(), path.display());
    Ok(())
}

pub fn import(state: &mut ZakatState<JsonFileStore>, file: &std::path::Path) -> CliResult {
    let portfolio = import_file(file)?;
    let count = portfolio.assets.len();
    state.replace(portfolio)?;
    println!("{} {} assets from {}", "Imported".green().bold(), count, file.display());
    Ok(())
}

pub fn clear(state: &mut ZakatState<JsonFileStore>, yes: bool) -> CliResult {
    let confirmed = yes
        || inquire::Confirm::new("Delete all assets and settings?")
            .with_default(false)
            .with_help_message("This cannot be undone. Export first if you need a backup.")
            .prompt()?;
    if !confirmed {
        println!("{}", "Nothing was deleted.".dimmed());
        return Ok(());
    }
    state.reset()?;
    println!("{}", "All data cleared.".yellow().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("usd=10.9"), Ok((Currency::USD, dec!(10.9))));
        assert!(parse_rate("USD").is_err());
        assert!(parse_rate("XYZ=1").is_err());
        assert!(parse_rate("EUR=abc").is_err());
    }

    #[test]
    fn test_add_uses_default_currency() {
        let cmd = AddAsset::Cash {
            name: "Wallet".to_string(),
            amount: dec!(100),
            currency: None,
            country: Country::Other,
            notes: Some("pocket".to_string()),
        };
        let asset = cmd.into_asset(Currency::EUR);
        let Asset::Cash(cash) = &asset else { panic!("expected cash") };
        assert_eq!(cash.currency, Currency::EUR);
        assert_eq!(asset.notes(), Some("pocket"));
    }

    #[test]
    fn test_pakistan_stock_deduction_flag() {
        let cmd = AddAsset::PakistanStock {
            name: "Engro".to_string(),
            ticker: "ENGRO".to_string(),
            shares: dec!(100),
            price: dec!(300),
            currency: Currency::PKR,
            deducted: true,
            deducted_amount: None,
            notes: None,
        };
        let Asset::PakistanStock(stock) = cmd.into_asset(Currency::SEK) else { panic!("expected stock") };
        assert!(stock.zakat_deducted_at_source);
        assert_eq!(stock.zakat_amount_deducted, None);
    }

    #[test]
    fn test_export_writes_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ZakatState::open(JsonFileStore::new(dir.path().join("data.json"))).unwrap();
        state.add_asset(CashAccount::new("Bank").amount(dec!(5000))).unwrap();

        let json_path = dir.path().join("out.json");
        export(&state, ExportFormat::Json, Some(json_path.clone())).unwrap();
        assert_eq!(import_file(&json_path).unwrap().assets, state.portfolio().assets);

        let csv_path = dir.path().join("out.csv");
        export(&state, ExportFormat::Csv, Some(csv_path.clone())).unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.ends_with("\r\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_settings_edit_rejects_base_rate() {
        let mut settings = UserSettings::default();
        let edit = SettingsEdit {
            display_currency: None,
            rates: vec![(Currency::SEK, dec!(2))],
            nisab_method: None,
            gold_price: None,
            silver_price: None,
            period: None,
        };
        assert!(edit.apply(&mut settings).is_err());
    }
}
