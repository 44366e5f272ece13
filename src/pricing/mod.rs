//! European option pricing under Black-Scholes-Merton, with implied volatility calibration.

/// Parallel evaluation of independent pricing jobs.
pub mod batch;
pub mod contract;
pub mod day_count;
pub mod diagnostics;
pub mod error;
pub mod greeks;
pub mod implied_volatility;
pub mod market_data;
pub mod pricer;
/// Risk reports, CSV output and checksum-sealed JSON packages.
pub mod report;
pub mod risk_mode;

pub use batch::{BatchOutcome, BatchPricer, PricingJob};
pub use contract::{ContractRecord, OptionContract, OptionStyle, Underlying};
pub use day_count::DayCountConvention;
pub use diagnostics::{
    DiagnosticLevel, DiagnosticSink, MemorySink, NoopSink, SharedSink, TracingSink,
};
pub use error::PricingError;
pub use greeks::Greeks;
pub use market_data::{
    MarketDataSet, MarketDataSnapshot, SpotQuote, load_market_data, market_data_path,
};
pub use pricer::{BsmPricer, Calibration};
pub use report::{REPORT_FORMAT_VERSION, RiskReport, RiskReportPackage};
pub use risk_mode::{InstrumentDescription, run_price_mode, run_risk_mode};
