//! # EasyZakat CLI
//!
//! Keeps a personal zakat portfolio in a JSON file and reports what is owed.
//!
//! ## Usage
//! ```bash
//! # Summary of the stored portfolio
//! easyzakat
//!
//! # Add a bank account and some gold
//! easyzakat add cash "Swedbank" --amount 85000
//! easyzakat add gold "Bangles" --grams 40 --purity 22k --price 950
//!
//! # Start the hawl and export a CSV copy
//! easyzakat hawl --start 2025-03-01
//! easyzakat export --format csv
//! ```

use clap::Parser;
use std::path::PathBuf;

use chrono::NaiveDate;
use easyzakat::prelude::*;

mod commands;
mod config_loader;
mod render;

use commands::{CliResult, Commands, SettingsEdit};
use config_loader::CliConfig;

/// Personal zakat calculator
#[derive(Parser, Debug)]
#[command(name = "easyzakat")]
#[command(version)]
#[command(about = "Track zakatable assets and see what zakat is owed", long_about = None)]
struct Args {
    /// Portfolio file (overrides the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Also write debug logs to daily files
    #[arg(long, global = true, default_value = "false")]
    log: bool,

    /// Evaluate the hawl on this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(
    file_log_dir: Option<PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("easyzakat=warn"));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let Some(dir) = file_log_dir else {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(&dir)?;
    let file_appender = tracing_appender::rolling::daily(&dir, "easyzakat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(EnvFilter::new("easyzakat=debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("--- EasyZakat session started [{}] ---", chrono::Utc::now());
    Ok(Some(guard))
}

fn main() -> CliResult {
    let args = Args::parse();
    let config = CliConfig::load();
    let data_path = config.data_path(args.data.as_deref());

    let file_logging = args.log || config.enable_logging.unwrap_or(false);
    let _guard = init_tracing(file_logging.then(|| config.log_path(&data_path)))?;

    let default_currency = config
        .default_currency
        .as_deref()
        .and_then(|code| match code.parse::<Currency>() {
            Ok(currency) => Some(currency),
            Err(_) => {
                tracing::warn!("Ignoring unknown default-currency '{}' in config", code);
                None
            }
        })
        .unwrap_or(Currency::BASE);

    tracing::debug!(path = %data_path.display(), "opening portfolio");
    let mut state = ZakatState::open(JsonFileStore::new(&data_path))?.with_calculation_date(args.as_of);

    match args.command.unwrap_or(Commands::Summary { json: false }) {
        Commands::Summary { json } => commands::summary(&state, json),
        Commands::List => {
            print!("{}", render::asset_list(state.portfolio()));
            Ok(())
        }
        Commands::Add { asset } => commands::add(&mut state, asset, default_currency),
        Commands::Remove { id } => commands::remove(&mut state, &id),
        Commands::Explain { id } => commands::explain(&state, &id),
        Commands::Hawl { start, clear, broken, not_broken } => {
            commands::hawl(&mut state, start, clear, broken, not_broken)
        }
        Commands::Settings {
            display_currency,
            rates,
            nisab_method,
            gold_price,
            silver_price,
            period,
        } => commands::settings(
            &mut state,
            SettingsEdit {
                display_currency,
                rates,
                nisab_method,
                gold_price,
                silver_price,
                period,
            },
        ),
        Commands::Export { format, out } => commands::export(&state, format, out),
        Commands::Import { file } => commands::import(&mut state, &file),
        Commands::Clear { yes } => commands::clear(&mut state, yes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_add_gold() {
        let args = Args::try_parse_from([
            "easyzakat", "--as-of", "2025-10-01", "add", "gold", "Ring", "--grams", "10", "--purity", "22k",
            "--price", "950",
        ])
        .unwrap();
        assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2025, 10, 1));
        let Some(Commands::Add { asset }) = args.command else { panic!("expected add") };
        let Asset::Gold(gold) = asset.into_asset(Currency::SEK) else { panic!("expected gold") };
        assert_eq!(gold.purity, GoldPurity::K22);
        assert_eq!(gold.weight_grams, rust_decimal::Decimal::TEN);
    }

    #[test]
    fn test_parse_settings_rates() {
        let args = Args::try_parse_from(["easyzakat", "settings", "--rate", "USD=10.9", "--rate", "pkr=0.035"]).unwrap();
        let Some(Commands::Settings { rates, .. }) = args.command else { panic!("expected settings") };
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[1].0, Currency::PKR);
    }
}
