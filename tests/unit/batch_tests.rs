use bsm_pricer::prelude::*;
use bsm_pricer::pricing::MemorySink;
use chrono::NaiveDate;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn market() -> MarketDataSnapshot {
    MarketDataSnapshot::new(0.0425, 0.0044)
        .with_spot("AAPL", 243.85)
        .with_spot("MSFT", 418.58)
}

fn chain(symbol: &str, spot: f64) -> Vec<PricingJob> {
    let as_of = date(2025, 1, 2);
    let mut jobs = Vec::new();
    for expiry in [date(2025, 2, 21), date(2025, 6, 20), date(2026, 1, 16)] {
        for moneyness in [0.9, 0.95, 1.0, 1.05, 1.1] {
            for right in [OptionType::Call, OptionType::Put] {
                let contract = OptionContract::european(
                    Underlying::new(symbol, "EQUITY"),
                    (spot * moneyness).round(),
                    expiry,
                    right,
                )
                .with_volatility(0.18 + 0.1 * (moneyness - 1.0f64).abs());
                jobs.push(PricingJob::new(contract, as_of));
            }
        }
    }
    jobs
}

#[test]
fn batch_matches_sequential_pricing() {
    let mut jobs = chain("AAPL", 243.85);
    jobs.extend(chain("MSFT", 418.58));

    let batch = BatchPricer::new(market(), NoopSink::shared()).with_workers(4);
    let outcomes = batch.price_all(&jobs);
    assert_eq!(outcomes.len(), jobs.len());

    for (job, outcome) in jobs.iter().zip(outcomes) {
        let pricer = BsmPricer::new(
            job.contract.clone(),
            job.as_of,
            &market(),
            NoopSink::shared(),
        )
        .unwrap();
        assert_eq!(outcome.unwrap(), pricer.greeks());
    }
}

#[test]
fn batch_shares_one_sink_across_workers() {
    let sink = Arc::new(MemorySink::new());
    let jobs = chain("AAPL", 243.85);

    let batch = BatchPricer::new(market(), sink.clone()).with_workers(3);
    let outcomes = batch.price_all(&jobs);
    assert!(outcomes.iter().all(Result::is_ok));

    let greeks_messages = sink
        .messages()
        .iter()
        .filter(|(_, message)| message.starts_with("Calculated Greeks"))
        .count();
    assert_eq!(greeks_messages, jobs.len());
}

#[test]
fn batch_reports_unknown_underlyings() {
    let jobs = chain("TSLA", 400.0);
    let batch = BatchPricer::new(market(), NoopSink::shared()).with_workers(2);

    for outcome in batch.price_all(&jobs) {
        assert_eq!(
            outcome.unwrap_err(),
            PricingError::MissingSpotPrice {
                symbol: "TSLA".to_string()
            }
        );
    }
}
