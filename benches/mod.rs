use bsm_pricer::prelude::*;
use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid benchmark date")
}

fn market() -> MarketDataSnapshot {
    MarketDataSnapshot::new(0.05, 0.01).with_spot("XYZ", 100.0)
}

fn contract(strike: f64) -> OptionContract {
    OptionContract::european(
        Underlying::new("XYZ", "EQUITY"),
        strike,
        date(2025, 1, 1),
        OptionType::Call,
    )
}

fn bench_closed_form(c: &mut Criterion) {
    let params = IVParams::new(100.0, 100.0, 1.0, 0.05, 0.01, OptionType::Call);

    c.bench_function("bsm_price", |b| {
        b.iter(|| black_box(BlackScholes::price(black_box(&params), black_box(0.2))))
    });

    c.bench_function("bsm_greeks", |b| {
        b.iter(|| {
            let evaluation = BlackScholes::evaluate(black_box(&params), 0.2);
            black_box(BlackScholes::greeks(&params, 0.2, &evaluation))
        })
    });
}

fn bench_pricer_construction(c: &mut Criterion) {
    let market = market();
    let as_of = date(2024, 1, 1);

    c.bench_function("pricer_from_volatility", |b| {
        b.iter(|| {
            let pricer = BsmPricer::new(
                contract(100.0).with_volatility(0.2),
                black_box(as_of),
                &market,
                NoopSink::shared(),
            )
            .expect("pricing should succeed");
            black_box(pricer.greeks())
        })
    });

    c.bench_function("pricer_from_market_price", |b| {
        b.iter(|| {
            let pricer = BsmPricer::new(
                contract(100.0).with_market_price(10.0),
                black_box(as_of),
                &market,
                NoopSink::shared(),
            )
            .expect("calibration should succeed");
            black_box(pricer.greeks())
        })
    });
}

fn bench_implied_volatility(c: &mut Criterion) {
    let mut group = c.benchmark_group("implied_volatility");

    for strike in [80.0, 100.0, 120.0] {
        let params = IVParams::new(100.0, strike, 1.0, 0.05, 0.01, OptionType::Call);
        let market_price = BlackScholes::price(&params, 0.3);

        for method in [SolverMethod::Brent, SolverMethod::Newton] {
            let config = SolverConfig::new().with_method(method);
            group.bench_with_input(
                BenchmarkId::new(format!("{method:?}"), strike),
                &market_price,
                |b, &price| {
                    b.iter(|| {
                        black_box(
                            solve_iv(black_box(&params), black_box(price), &config)
                                .expect("solver should converge"),
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let as_of = date(2024, 1, 1);
    let jobs: Vec<PricingJob> = (0..256)
        .map(|i| {
            let strike = 60.0 + 80.0 * i as f64 / 256.0;
            PricingJob::new(contract(strike).with_volatility(0.25), as_of)
        })
        .collect();

    let mut group = c.benchmark_group("batch_pricer");
    for workers in [1, 4] {
        let batch = BatchPricer::new(market(), NoopSink::shared()).with_workers(workers);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &jobs, |b, jobs| {
            b.iter(|| black_box(batch.price_all(jobs)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_closed_form,
    bench_pricer_construction,
    bench_implied_volatility,
    bench_batch
);
criterion_main!(benches);
