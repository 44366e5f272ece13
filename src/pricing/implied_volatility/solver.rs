//! Root-finders for implied volatility calculation.
//!
//! This module provides numerical solvers to find the implied volatility
//! that makes the Black-Scholes-Merton price equal to the observed market
//! price. Brent's method is the default; Newton-Raphson is available when
//! speed matters more than robustness.

use super::black_scholes::BlackScholes;
use super::error::SolverError;
use super::types::{IVParams, IVResult, SolverMethod};
use tracing::trace;

/// Minimum time to expiry for numerical stability (about 1 hour).
const MIN_TIME: f64 = 1.0 / (365.0 * 24.0);

/// Configuration for the implied volatility solvers.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum iterations before giving up.
    pub max_iterations: u32,
    /// Convergence tolerance. Brent: width of the volatility bracket.
    /// Newton: absolute price difference.
    pub tolerance: f64,
    /// Slack, in price units, allowed below the discounted intrinsic value.
    pub price_tolerance: f64,
    /// Initial IV guess for Newton. `None` uses the Brenner-Subrahmanyam estimate.
    pub initial_guess: Option<f64>,
    /// Lower end of the volatility search interval.
    pub min_iv: f64,
    /// Upper end of the volatility search interval.
    pub max_iv: f64,
    /// Minimum vega threshold to avoid division by near-zero.
    pub min_vega: f64,
    /// Root-finding method.
    pub method: SolverMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            price_tolerance: 1e-10,
            initial_guess: None,
            min_iv: 1e-6,
            max_iv: 2.0,
            min_vega: 1e-10,
            method: SolverMethod::Brent,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the slack allowed below the discounted intrinsic value.
    #[must_use]
    pub fn with_price_tolerance(mut self, price_tolerance: f64) -> Self {
        self.price_tolerance = price_tolerance;
        self
    }

    /// Sets the initial IV guess used by Newton-Raphson.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = Some(initial_guess);
        self
    }

    /// Sets the IV bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_iv: f64, max_iv: f64) -> Self {
        self.min_iv = min_iv;
        self.max_iv = max_iv;
        self
    }

    /// Sets the root-finding method.
    #[must_use]
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = method;
        self
    }
}

/// Validates input parameters for IV calculation.
fn validate_params(params: &IVParams) -> Result<(), SolverError> {
    if params.spot <= 0.0 {
        return Err(SolverError::InvalidParams {
            message: format!("spot price must be positive, got {}", params.spot),
        });
    }

    if params.strike <= 0.0 {
        return Err(SolverError::InvalidParams {
            message: format!("strike price must be positive, got {}", params.strike),
        });
    }

    if params.time_to_expiry < 0.0 {
        return Err(SolverError::InvalidParams {
            message: format!(
                "time to expiry must be non-negative, got {}",
                params.time_to_expiry
            ),
        });
    }

    if params.time_to_expiry < MIN_TIME {
        return Err(SolverError::TimeToExpiryTooSmall {
            time_to_expiry: params.time_to_expiry,
            min_time: MIN_TIME,
        });
    }

    Ok(())
}

/// Validates the observed price against the no-arbitrage lower bound.
fn validate_market_price(
    params: &IVParams,
    market_price: f64,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    if market_price.is_nan() || market_price <= 0.0 {
        return Err(SolverError::InvalidParams {
            message: format!("market price must be positive, got {market_price}"),
        });
    }

    let intrinsic = params.discounted_intrinsic_value();
    if market_price < intrinsic - config.price_tolerance {
        return Err(SolverError::PriceBelowIntrinsic {
            price: market_price,
            intrinsic,
        });
    }

    Ok(())
}

/// Calculates a smart initial guess for IV.
///
/// Uses the Brenner-Subrahmanyam approximation σ ≈ price / (0.4 · S · √T).
fn smart_initial_guess(params: &IVParams, market_price: f64) -> f64 {
    let sqrt_time = params.time_to_expiry.sqrt();
    let bs_approx = market_price / (0.4 * params.spot * sqrt_time);
    bs_approx.clamp(0.05, 2.0)
}

/// Solves for implied volatility with the method selected in `config`.
///
/// # Returns
/// - `Ok(IVResult)`: Converged IV with iteration count and method
/// - `Err(SolverError)`: If inputs are invalid or no root is found
///
/// # Example
/// ```
/// use bsm_pricer::pricing::implied_volatility::{BlackScholes, IVParams, SolverConfig, solve_iv};
///
/// let params = IVParams::call(100.0, 100.0, 1.0, 0.05);
/// let market_price = BlackScholes::price(&params, 0.2);
///
/// let result = solve_iv(&params, market_price, &SolverConfig::default()).unwrap();
/// assert!((result.iv - 0.2).abs() < 1e-6);
/// ```
pub fn solve_iv(
    params: &IVParams,
    market_price: f64,
    config: &SolverConfig,
) -> Result<IVResult, SolverError> {
    let (iv, iterations) = match config.method {
        SolverMethod::Brent => solve_iv_brent(params, market_price, config)?,
        SolverMethod::Newton => solve_iv_newton(params, market_price, config)?,
    };
    Ok(IVResult::new(iv, market_price, iterations, config.method))
}

/// Solves for implied volatility using Brent's method.
///
/// Brackets the root on `[min_iv, max_iv]` and combines inverse quadratic
/// interpolation, secant steps and bisection. Since the price is monotonic in
/// volatility, convergence is guaranteed once the bracket holds a sign change.
///
/// # Returns
/// - `Ok((iv, iterations))`: Converged IV and iterations
/// - `Err(SolverError::NoBracket)`: If no volatility in the interval reproduces the price
pub fn solve_iv_brent(
    params: &IVParams,
    market_price: f64,
    config: &SolverConfig,
) -> Result<(f64, u32), SolverError> {
    validate_params(params)?;
    validate_market_price(params, market_price, config)?;

    let objective = |vol: f64| BlackScholes::price(params, vol) - market_price;

    let mut a = config.min_iv;
    let mut b = config.max_iv;
    let mut fa = objective(a);
    let mut fb = objective(b);

    if fa == 0.0 {
        return Ok((a, 0));
    }
    if fb == 0.0 {
        return Ok((b, 0));
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(SolverError::NoBracket {
            low: a,
            high: b,
            f_low: fa,
            f_high: fb,
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=config.max_iterations {
        // Keep the root between b and c
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        // b is the best estimate so far
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let half_width = 0.5 * (c - b);
        trace!(iteration, vol = b, error = fb, "brent step");

        if half_width.abs() <= tol || fb == 0.0 {
            return Ok((b, iteration));
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * half_width * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half_width * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * half_width * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = half_width;
                e = d;
            }
        } else {
            d = half_width;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else {
            tol.copysign(half_width)
        };
        fb = objective(b);
    }

    Err(SolverError::ConvergenceFailure {
        iterations: config.max_iterations,
        last_iv: b,
    })
}

/// Solves for implied volatility using Newton-Raphson method.
///
/// The Newton-Raphson method iteratively refines the IV estimate using:
/// σ_{n+1} = σ_n - (BS(σ_n) - market_price) / vega(σ_n)
///
/// Convergence is typically fast (3-5 iterations) because vega is always positive.
///
/// # Returns
/// - `Ok((iv, iterations))`: Converged IV and number of iterations
/// - `Err(SolverError)`: If solver fails to converge or inputs are invalid
pub fn solve_iv_newton(
    params: &IVParams,
    market_price: f64,
    config: &SolverConfig,
) -> Result<(f64, u32), SolverError> {
    validate_params(params)?;
    validate_market_price(params, market_price, config)?;

    let mut iv = config
        .initial_guess
        .unwrap_or_else(|| smart_initial_guess(params, market_price))
        .clamp(config.min_iv, config.max_iv);

    for iteration in 0..config.max_iterations {
        let price = BlackScholes::price(params, iv);
        let diff = price - market_price;
        trace!(iteration, vol = iv, error = diff, "newton step");

        if diff.abs() < config.tolerance {
            return Ok((iv, iteration + 1));
        }

        let vega = BlackScholes::vega(params, iv);

        // Near-zero vega happens deep ITM/OTM or near expiry
        if vega.abs() < config.min_vega {
            if diff > 0.0 {
                iv *= 0.9;
            } else {
                iv *= 1.1;
            }
        } else {
            let step = diff / vega;

            // Dampen large steps to improve stability
            let damped_step = if step.abs() > 0.5 {
                step.signum() * 0.5
            } else {
                step
            };

            iv -= damped_step;
        }

        iv = iv.clamp(config.min_iv, config.max_iv);
    }

    Err(SolverError::ConvergenceFailure {
        iterations: config.max_iterations,
        last_iv: iv,
    })
}
