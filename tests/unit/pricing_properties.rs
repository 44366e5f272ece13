use bsm_pricer::prelude::*;
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn contract(strike: f64, right: OptionType) -> OptionContract {
    OptionContract::european(
        Underlying::new("SPY", "ETF"),
        strike,
        date(2025, 6, 20),
        right,
    )
}

fn market() -> MarketDataSnapshot {
    MarketDataSnapshot::new(0.045, 0.013).with_spot("SPY", 100.0)
}

fn as_of() -> NaiveDate {
    date(2024, 9, 16)
}

#[test]
fn put_call_parity_holds() {
    for strike in [70.0, 90.0, 100.0, 115.0, 140.0] {
        for vol in [0.05, 0.2, 0.6] {
            let call = BsmPricer::new(
                contract(strike, OptionType::Call).with_volatility(vol),
                as_of(),
                &market(),
                NoopSink::shared(),
            )
            .unwrap();
            let put = BsmPricer::new(
                contract(strike, OptionType::Put).with_volatility(vol),
                as_of(),
                &market(),
                NoopSink::shared(),
            )
            .unwrap();

            let t = call.time_to_maturity();
            let forward_value = 100.0 * (-0.013 * t).exp() - strike * (-0.045 * t).exp();
            let gap = call.price() - put.price() - forward_value;
            assert!(gap.abs() < 1e-8, "strike {strike} vol {vol}: gap {gap}");
        }
    }
}

#[test]
fn calibration_round_trips() {
    let vols = [0.03, 0.05, 0.1, 0.2, 0.35, 0.5, 0.75, 1.0, 1.25, 1.45];

    for right in [OptionType::Call, OptionType::Put] {
        for strike in [95.0, 100.0, 105.0] {
            for vol in vols {
                let quoted = BsmPricer::new(
                    contract(strike, right).with_volatility(vol),
                    as_of(),
                    &market(),
                    NoopSink::shared(),
                )
                .unwrap();

                let implied = BsmPricer::new(
                    contract(strike, right).with_market_price(quoted.price()),
                    as_of(),
                    &market(),
                    NoopSink::shared(),
                )
                .unwrap();

                let error = (implied.volatility() - vol).abs();
                assert!(error < 1e-6, "{right} {strike} vol {vol}: error {error}");
            }
        }
    }
}

#[test]
fn default_calibration_recovers_reference_volatility() {
    let as_of = date(2024, 1, 1);
    let contract = OptionContract::european(
        Underlying::new("XYZ", "EQUITY"),
        100.0,
        date(2025, 1, 1),
        OptionType::Call,
    )
    .with_day_count(DayCountConvention::Thirty360)
    .with_market_price(10.4506);
    let market = MarketDataSnapshot::new(0.05, 0.0).with_spot("XYZ", 100.0);

    let pricer = BsmPricer::new(contract, as_of, &market, NoopSink::shared()).unwrap();
    assert!((pricer.volatility() - 0.2).abs() < 1e-4);
    assert!(matches!(pricer.calibration(), Calibration::Implied(_)));
}

#[test]
fn price_increases_with_volatility() {
    for right in [OptionType::Call, OptionType::Put] {
        let pricer = BsmPricer::new(
            contract(105.0, right).with_volatility(0.2),
            as_of(),
            &market(),
            NoopSink::shared(),
        )
        .unwrap();

        let mut previous = pricer.evaluate(0.01).price;
        for step in 1..100 {
            let vol = 0.01 + 0.02 * step as f64;
            let price = pricer.evaluate(vol).price;
            assert!(price > previous, "{right} at vol {vol}");
            previous = price;
        }
    }
}

#[test]
fn expiry_date_pricing_is_intrinsic() {
    let expiry = date(2025, 6, 20);
    for (strike, right, intrinsic, delta) in [
        (90.0, OptionType::Call, 10.0, 1.0),
        (110.0, OptionType::Call, 0.0, 0.0),
        (110.0, OptionType::Put, 10.0, -1.0),
        (90.0, OptionType::Put, 0.0, 0.0),
    ] {
        let pricer = BsmPricer::new(
            contract(strike, right).with_volatility(0.3),
            expiry,
            &market(),
            NoopSink::shared(),
        )
        .unwrap();

        assert!((pricer.price() - intrinsic).abs() < 1e-12);
        let greeks = pricer.greeks();
        assert_eq!(greeks.delta, delta);
        assert_eq!(greeks.gamma, 0.0);
        assert_eq!(greeks.vega, 0.0);
        assert_eq!(greeks.theta, 0.0);
        assert_eq!(greeks.rho, 0.0);
    }
}

#[test]
fn expired_contract_has_no_greeks() {
    let result = BsmPricer::new(
        contract(100.0, OptionType::Call).with_volatility(0.3),
        date(2025, 6, 21),
        &market(),
        NoopSink::shared(),
    );
    assert!(matches!(
        result,
        Err(PricingError::ExpiredInstrument { .. })
    ));
}

#[test]
fn day_count_reference_fractions() {
    assert_eq!(
        DayCountConvention::Thirty360.year_fraction(date(2024, 1, 31), date(2024, 2, 28)),
        28.0 / 360.0
    );
    assert_eq!(
        DayCountConvention::Act365.year_fraction(date(2024, 1, 1), date(2025, 1, 1)),
        366.0 / 365.0
    );
    assert_eq!(
        DayCountConvention::Act360.year_fraction(date(2024, 1, 1), date(2024, 3, 1)),
        60.0 / 360.0
    );
}

#[test]
fn tracing_sink_matches_noop_sink() {
    let quiet = BsmPricer::new(
        contract(95.0, OptionType::Put).with_market_price(3.1),
        as_of(),
        &market(),
        NoopSink::shared(),
    )
    .unwrap();
    let traced = BsmPricer::new(
        contract(95.0, OptionType::Put).with_market_price(3.1),
        as_of(),
        &market(),
        TracingSink::shared(DiagnosticLevel::Debug),
    )
    .unwrap();

    assert_eq!(quiet.greeks(), traced.greeks());
    assert_eq!(quiet.price(), 3.1);
}
