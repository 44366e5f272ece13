use bsm_pricer::prelude::*;
use bsm_pricer::pricing::market_data_path;
use chrono::NaiveDate;
use std::fs;

const MARKET_DATA: &str = r#"{
    "20250102": {
        "AAPL": { "spot_price": 243.85 },
        "MSFT": 418.58,
        "risk_free_rate": 0.0425,
        "dividend_yield": 0.0044
    }
}"#;

const INSTRUMENT: &str = r#"{
    "type": "OPTION",
    "strike": 250.0,
    "expiry": "20250321",
    "market_price": 7.5,
    "underlying": { "symbol": "AAPL", "type": "EQUITY" },
    "option_type": "CALL",
    "style": "EUROPEAN"
}"#;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
}

#[test]
fn risk_mode_from_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(market_data_path(dir.path(), as_of()), MARKET_DATA).unwrap();
    let instrument_path = dir.path().join("instrument.json");
    fs::write(&instrument_path, INSTRUMENT).unwrap();

    let market_data = load_market_data(dir.path(), as_of()).unwrap();
    let instrument = InstrumentDescription::from_file(&instrument_path).unwrap();
    let report = run_risk_mode(
        &instrument,
        as_of(),
        &market_data,
        TracingSink::shared(DiagnosticLevel::Info),
    )
    .unwrap();

    assert_eq!(report.risk.price, 7.5);
    assert!(report.risk.implied_volatility > 0.1 && report.risk.implied_volatility < 0.5);
    assert!(report.risk.delta > 0.0 && report.risk.delta < 1.0);
    assert!(report.risk.gamma > 0.0);
    assert!(report.risk.vega > 0.0);
    assert!(report.risk.theta < 0.0);
    assert_eq!(report.instrument.expiry, "2025-03-21");
    assert_eq!(report.instrument.market_price, Some(7.5));

    // The implied volatility reprices the market quote
    let params = IVParams::new(
        243.85,
        250.0,
        78.0 / 365.0,
        0.0425,
        0.0044,
        OptionType::Call,
    );
    let repriced = BlackScholes::price(&params, report.risk.implied_volatility);
    assert!((repriced - 7.5).abs() < 1e-4);
}

#[test]
fn risk_report_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let market_data = MarketDataSet::from_json_str(MARKET_DATA).unwrap();
    let instrument = InstrumentDescription::from_json_str(INSTRUMENT).unwrap();
    let report = run_risk_mode(&instrument, as_of(), &market_data, NoopSink::shared()).unwrap();

    let csv_path = dir.path().join("reports").join("aapl.csv");
    report.write_csv(&csv_path).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    let values: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header.len(), values.len());
    assert_eq!(header.first(), Some(&"as_of_date"));
    assert_eq!(header.last(), Some(&"theta_per_day"));
    let theta_at = header.iter().position(|name| *name == "theta").unwrap();
    let theta: f64 = values[theta_at].parse().unwrap();
    let theta_per_day: f64 = values.last().unwrap().parse().unwrap();
    assert!((theta_per_day - theta / 365.0).abs() < 1e-12);
    let price_at = header.iter().position(|name| *name == "price").unwrap();
    assert_eq!(values[price_at], "7.5");

    let json = RiskReportPackage::new(report.clone()).unwrap().to_json().unwrap();
    let restored = RiskReportPackage::from_json(&json)
        .unwrap()
        .into_report()
        .unwrap();
    assert_eq!(restored, report);
}

#[test]
fn price_mode_without_market_price_uses_fair_value() {
    let market_data = MarketDataSet::from_json_str(MARKET_DATA).unwrap();
    let mut instrument = InstrumentDescription::from_json_str(INSTRUMENT).unwrap();
    instrument.market_price = None;
    instrument.volatility = Some(0.25);

    let price = run_price_mode(&instrument, as_of(), &market_data, NoopSink::shared()).unwrap();
    let params = IVParams::new(
        243.85,
        250.0,
        78.0 / 365.0,
        0.0425,
        0.0044,
        OptionType::Call,
    );
    assert_eq!(price, BlackScholes::price(&params, 0.25));
}

#[test]
fn risk_mode_errors() {
    let market_data = MarketDataSet::from_json_str(MARKET_DATA).unwrap();

    let mut instrument = InstrumentDescription::from_json_str(INSTRUMENT).unwrap();
    instrument.market_price = None;
    assert_eq!(
        run_risk_mode(&instrument, as_of(), &market_data, NoopSink::shared()).unwrap_err(),
        PricingError::InsufficientCalibrationInput
    );

    let mut instrument = InstrumentDescription::from_json_str(INSTRUMENT).unwrap();
    instrument.underlying.symbol = "GOOG".to_string();
    assert!(matches!(
        run_risk_mode(&instrument, as_of(), &market_data, NoopSink::shared()),
        Err(PricingError::MissingSpotPrice { .. })
    ));

    let instrument = InstrumentDescription::from_json_str(INSTRUMENT).unwrap();
    let mut stale = market_data.clone();
    stale.insert(
        NaiveDate::from_ymd_opt(2025, 3, 24).unwrap(),
        MarketDataSnapshot::new(0.04, 0.0).with_spot("AAPL", 240.0),
    );
    assert!(matches!(
        run_risk_mode(
            &instrument,
            NaiveDate::from_ymd_opt(2025, 3, 24).unwrap(),
            &stale,
            NoopSink::shared()
        ),
        Err(PricingError::ExpiredInstrument { .. })
    ));
}
