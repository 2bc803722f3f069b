use chrono::NaiveDate;
use easyzakat::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

fn sample_portfolio() -> Portfolio {
    let mut portfolio = Portfolio::new()
        .add(CashAccount::new("Bank").amount(12345.67).country(Country::Sweden))
        .add(CashAccount::new("HBL").amount(250_000).currency(Currency::PKR).country(Country::Pakistan))
        .add(SwedenStock::new("Investor B").ticker("INVE-B").shares(40).price(281.9).broker("Avanza"))
        .add(PakistanStock::new("Engro").ticker("ENGRO").shares(150).price(310.25).deducted_at_source(Some(1100)))
        .add(GoldHolding::new("Bangles").weight(45.5).purity(GoldPurity::K21).price(7300).currency(Currency::PKR))
        .add(SilverHolding::new("Coins").weight(300).price(10.5))
        .add(BusinessInventory::new("Etsy stock").description("Handmade lamps").market_value(800).currency(Currency::EUR))
        .add(Receivable::new("Loan to Ali").amount(5000).likely(true))
        .add(Receivable::new("Old debt").amount(9000).likely(false).notes("probably lost"))
        .add(Liability::new("CSN").amount(20000))
        .add(
            FundHolding::new("Meezan Islamic")
                .fund_type(FundType::Islamic)
                .units(1200)
                .nav(71.3)
                .currency(Currency::PKR)
                .equity_ratio(35)
                .deducted_at_source(None::<Decimal>),
        );
    portfolio.settings.display_currency = Currency::GBP;
    portfolio.settings.hawl = HawlConfiguration::started_on(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    portfolio
}

#[test]
fn test_json_round_trip_reproduces_result() {
    let original = sample_portfolio();
    let before = calculate_obligation(&original, today());

    let mut buffer = Vec::new();
    export_json(&original, &mut buffer).unwrap();
    let imported = import_json(buffer.as_slice()).unwrap();
    let after = calculate_obligation(&imported, today());

    assert_eq!(imported.assets, original.assets);
    assert_eq!(after, before);
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(export_file_name(&sample_portfolio(), today(), "json"));

    let file = std::fs::File::create(&path).unwrap();
    export_json(&sample_portfolio(), file).unwrap();

    let imported = import_file(&path).unwrap();
    assert_eq!(imported.assets.len(), 11);
    assert_eq!(imported.settings.display_currency, Currency::GBP);
}

#[test]
fn test_legacy_document_hydrates() {
    // Shape written by older versions: numbers as strings, rates partly missing,
    // empty hawl date, a stray base rate, a duplicate id.
    let json = r#"{
        "version": "1.0.0",
        "lastModified": "2025-06-01T12:00:00.000Z",
        "settings": {
            "displayCurrency": "SEK",
            "exchangeRates": { "SEK": 2, "USD": "10.9", "lastUpdated": "2025-06-01T12:00:00.000Z" },
            "nisab": { "method": "silver", "goldPricePerGramSEK": 1010, "silverPricePerGramSEK": "11" },
            "zakatYear": "2024-2025",
            "hawlDate": "2025-06-01",
            "nisabMetDate": "",
            "hawlBroken": false
        },
        "assets": [
            { "type": "cash", "id": "a", "name": "Wallet", "amount": "1500", "currency": "USD", "country": "other" },
            { "type": "cash", "id": "a", "name": "Jar", "amount": "oops", "currency": "SEK", "country": "sweden" },
            { "type": "fund", "id": "f", "name": "Fund", "units": 10, "navPerUnit": 100,
              "currency": "SEK", "zakatMethod": "equity_ratio", "fundType": "index", "country": "sweden",
              "broker": "Avanza", "zakatDeductedAtSource": false }
        ]
    }"#;

    let portfolio = import_json(json.as_bytes()).unwrap();

    let rates = &portfolio.settings.exchange_rates;
    assert_eq!(rates.rate(Currency::SEK), Decimal::ONE);
    assert_eq!(rates.rate(Currency::USD), dec!(10.9));
    assert_eq!(rates.rate(Currency::EUR), dec!(11.4));
    assert_eq!(portfolio.settings.nisab.method, NisabMethod::Silver);
    assert_eq!(portfolio.settings.nisab.silver_price_per_gram, dec!(11));
    assert_eq!(portfolio.settings.hawl.nisab_met_date, None);
    assert_eq!(portfolio.settings.period, "2024-2025");

    assert_eq!(portfolio.assets[0].id(), "a");
    assert_ne!(portfolio.assets[1].id(), "a");

    let result = calculate_obligation(&portfolio, today());
    assert_eq!(result.hawl_status.state, HawlState::NotStarted);
    // 1500 USD + 0 (unparsable) + 1000 (missing percent counts as 100%)
    assert_eq!(result.total_wealth, dec!(17350));
    assert_eq!(result.nisab_value, dec!(6545));
    assert!(result.meets_nisab);
}

#[test]
fn test_csv_has_one_row_per_asset() {
    let portfolio = sample_portfolio();
    let mut out = Vec::new();
    export_csv(&portfolio, &mut out).unwrap();

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 17);
    assert_eq!(&headers[16], "Notes");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), portfolio.assets.len());

    let psx = &rows[3];
    assert_eq!(&psx[1], "pakistan_stock");
    assert_eq!(&psx[2], "pakistan");
    assert_eq!(&psx[3], "PKR");
    assert_eq!(&psx[14], "true");
    assert_eq!(&psx[15], "1100");

    let gold = &rows[4];
    assert_eq!(&gold[9], "45.5");
    assert_eq!(&gold[10], "21k");

    assert_eq!(&rows[8][16], "probably lost");
}

#[test]
fn test_unusable_fields_do_not_drop_assets() {
    let json = r#"{
        "settings": { "displayCurrency": "JPY", "hawlBroken": "false", "nisab": { "method": "Gold" } },
        "assets": [
            { "type": "cash", "id": "c", "name": "Bank", "amount": 100000, "country": "germany" },
            { "type": "gold", "id": "g", "name": "Chain", "weightGrams": 100, "purity": "14k", "pricePerGram": 950 }
        ]
    }"#;

    let portfolio = import_json(json.as_bytes()).unwrap();
    assert_eq!(portfolio.settings.display_currency, Currency::SEK);
    assert!(!portfolio.settings.hawl.broken);
    assert_eq!(portfolio.settings.nisab.method, NisabMethod::Gold);

    let result = calculate_obligation(&portfolio, today());
    assert_eq!(result.excluded().count(), 0);
    assert_eq!(result.total_wealth, dec!(195000));
    assert_eq!(result.net_zakat_owed, dec!(4875));

    let stored = MemoryStore::with_content(json);
    assert_eq!(stored.load().unwrap().assets, portfolio.assets);
}
