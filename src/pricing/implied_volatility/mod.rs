//! Black-Scholes-Merton closed form and implied volatility inversion.
//!
//! This module provides the analytic pricer and the root-finders that
//! back implied volatility out of an observed option price.
//!
//! # Overview
//!
//! Implied Volatility (IV) is the option's "price" translated into different units.
//! The price of an option and the IV are the same information in different units:
//! the observed price is the ground truth and the volatility is derived from it.
//!
//! # Black-Scholes Inversion
//!
//! Since there's no analytical solution to invert Black-Scholes, a 1-D root
//! finder solves `BS(σ) - price = 0`. The objective is monotonic in σ, so
//! Brent's bracketing method on `[1e-6, 2.0]` is the default; a damped
//! Newton-Raphson on vega is available through [`SolverConfig::with_method`].
//!
//! # Example
//!
//! ```
//! use bsm_pricer::pricing::implied_volatility::{BlackScholes, IVParams, SolverConfig, solve_iv};
//!
//! let params = IVParams::call(100.0, 100.0, 1.0, 0.05);
//! let result = solve_iv(&params, 10.4506, &SolverConfig::default()).unwrap();
//! assert!((result.iv - 0.20).abs() < 1e-4);
//! ```

mod black_scholes;
mod error;
mod solver;
mod types;

pub use black_scholes::BlackScholes;
pub use error::SolverError;
pub use solver::{SolverConfig, solve_iv, solve_iv_brent, solve_iv_newton};
pub use types::{IVParams, IVResult, OptionType, PriceEvaluation, SolverMethod};
