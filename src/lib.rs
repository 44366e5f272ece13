//! # BSM Pricer
//!
//! Prices European vanilla options under the Black-Scholes-Merton model with a
//! continuous dividend yield, and reports their Greeks.
//!
//! ## Features
//!
//! - **Closed form with limits**: zero volatility and zero time to expiry are
//!   evaluated as limits, so options can be priced on their expiry date.
//! - **Calibration**: an observed market price takes priority over a quoted
//!   volatility; the implied volatility is found with Brent's method on
//!   `[1e-6, 2.0]` (damped Newton-Raphson is available as an alternative).
//! - **Day counts**: 30/360, ACT/360 and ACT/365.
//! - **Injected diagnostics**: the pricer reports through a
//!   [`pricing::DiagnosticSink`]; a no-op sink never changes a result.
//! - **Reports**: risk reports flatten to CSV and seal into checksummed JSON.
//! - **Batches**: independent contracts are priced on scoped worker threads.
//!
//! ## Example
//!
//! ```
//! use bsm_pricer::prelude::*;
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let contract = OptionContract::european(
//!     Underlying::new("XYZ", "EQUITY"),
//!     100.0,
//!     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     OptionType::Call,
//! )
//! .with_day_count(DayCountConvention::Thirty360)
//! .with_volatility(0.2);
//! let market_data = MarketDataSnapshot::new(0.05, 0.0).with_spot("XYZ", 100.0);
//!
//! let pricer = BsmPricer::new(contract, as_of, &market_data, NoopSink::shared()).unwrap();
//! assert!((pricer.price() - 10.4506).abs() < 1e-4);
//! assert!((pricer.greeks().delta - 0.6368).abs() < 1e-4);
//! ```

pub mod pricing;
pub mod utils;

/// Commonly used types.
pub mod prelude {
    pub use crate::pricing::implied_volatility::{
        BlackScholes, IVParams, IVResult, OptionType, SolverConfig, SolverError, SolverMethod,
        solve_iv,
    };
    pub use crate::pricing::{
        BatchPricer, BsmPricer, Calibration, DayCountConvention, DiagnosticLevel,
        DiagnosticSink, Greeks, InstrumentDescription, MarketDataSet, MarketDataSnapshot,
        NoopSink, OptionContract, OptionStyle, PricingError, PricingJob, RiskReport,
        RiskReportPackage, SharedSink, TracingSink, Underlying, load_market_data,
        run_price_mode, run_risk_mode,
    };
    pub use crate::utils::parse_date;
}
