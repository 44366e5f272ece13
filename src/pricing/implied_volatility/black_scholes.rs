//! Black-Scholes-Merton pricing model and Greeks calculation.
//!
//! Closed-form price of a European option on an underlying paying a
//! continuous dividend yield, together with the analytic sensitivities.
//! Degenerate inputs (zero volatility, zero time, zero spot) are evaluated
//! in their limits rather than rejected: at-expiry pricing is a valid input.

use super::types::{IVParams, PriceEvaluation};
use crate::pricing::greeks::Greeks;
use std::f64::consts::PI;

/// Square root of 2, precomputed for efficiency.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Black-Scholes pricing model implementation.
///
/// Provides methods for calculating option prices and Greeks
/// using the Black-Scholes-Merton formula.
pub struct BlackScholes;

impl BlackScholes {
    /// Approximation of the error function (erf).
    ///
    /// Uses Abramowitz and Stegun approximation (formula 7.1.26)
    /// with maximum error of 1.5×10⁻⁷. Odd by construction, so
    /// `norm_cdf(x) + norm_cdf(-x)` is exactly one up to rounding.
    ///
    /// # Arguments
    /// - `x`: Input value
    ///
    /// # Returns
    /// Approximation of erf(x)
    #[must_use]
    pub fn erf(x: f64) -> f64 {
        // Constants for the approximation
        const A1: f64 = 0.254829592;
        const A2: f64 = -0.284496736;
        const A3: f64 = 1.421413741;
        const A4: f64 = -1.453152027;
        const A5: f64 = 1.061405429;
        const P: f64 = 0.3275911;

        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();

        let t = 1.0 / (1.0 + P * x);
        let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

        sign * y
    }

    /// Standard normal cumulative distribution function (CDF).
    ///
    /// Calculates P(Z ≤ x) where Z is a standard normal random variable.
    /// Accepts infinite arguments: `norm_cdf(±∞)` is `1` / `0`.
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * (1.0 + Self::erf(x / SQRT_2))
    }

    /// Standard normal probability density function (PDF).
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Calculates the d1 parameter of the Black-Scholes-Merton formula.
    ///
    /// d1 = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
    ///
    /// When σ√T is zero the limit is returned: `+∞` or `-∞` by the sign of
    /// the forward log-moneyness ln(S/K) + (r - q)T, and `0` when it is zero.
    ///
    /// # Arguments
    /// - `spot`: Current underlying price (S)
    /// - `strike`: Option strike price (K)
    /// - `rate`: Risk-free interest rate (r)
    /// - `dividend_yield`: Continuous dividend yield (q)
    /// - `time`: Time to expiration in years (T)
    /// - `vol`: Volatility (σ)
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, dividend_yield: f64, time: f64, vol: f64) -> f64 {
        let time = time.max(0.0);
        let vol_sqrt_time = vol.max(0.0) * time.sqrt();
        let drift = (spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * time;

        if vol_sqrt_time > 0.0 {
            return drift / vol_sqrt_time;
        }

        // σ√T = 0 means σ = 0 or T = 0, so the σ² term above vanished too
        if drift > 0.0 {
            f64::INFINITY
        } else if drift < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(d1: f64, vol: f64, time: f64) -> f64 {
        d1 - vol.max(0.0) * time.max(0.0).sqrt()
    }

    /// Evaluates the closed form at `vol`, returning price, d1 and d2.
    ///
    /// price = cp·S·e^(-qT)·N(cp·d1) - cp·K·e^(-rT)·N(cp·d2)
    #[must_use]
    pub fn evaluate(params: &IVParams, vol: f64) -> PriceEvaluation {
        let time = params.time_to_expiry.max(0.0);
        let cp = params.option_type.cp_flag();

        let d1 = Self::d1(
            params.spot,
            params.strike,
            params.risk_free_rate,
            params.dividend_yield,
            time,
            vol,
        );
        let d2 = Self::d2(d1, vol, time);

        let dividend_discount = (-params.dividend_yield * time).exp();
        let rate_discount = (-params.risk_free_rate * time).exp();

        let price = cp * params.spot * dividend_discount * Self::norm_cdf(cp * d1)
            - cp * params.strike * rate_discount * Self::norm_cdf(cp * d2);

        PriceEvaluation { price, d1, d2 }
    }

    /// Calculates the theoretical option price.
    #[must_use]
    pub fn price(params: &IVParams, vol: f64) -> f64 {
        Self::evaluate(params, vol).price
    }

    /// Calculates vega (∂price/∂σ) - sensitivity to volatility.
    ///
    /// Vega = S · e^(-qT) · N'(d1) · √T
    ///
    /// Vega is always positive for both calls and puts.
    #[must_use]
    pub fn vega(params: &IVParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 || vol <= 0.0 || params.spot == 0.0 {
            return 0.0;
        }

        let d1 = Self::d1(
            params.spot,
            params.strike,
            params.risk_free_rate,
            params.dividend_yield,
            params.time_to_expiry,
            vol,
        );
        params.spot
            * (-params.dividend_yield * params.time_to_expiry).exp()
            * Self::norm_pdf(d1)
            * params.time_to_expiry.sqrt()
    }

    /// Calculates the five analytic Greeks from an evaluation at `vol`.
    ///
    /// `evaluation` must come from [`BlackScholes::evaluate`] with the same
    /// `params` and `vol`. Gamma and vega are zero when σ ≤ 0, T ≤ 0 or
    /// S = 0; theta and rho are zero when T ≤ 0. Theta is annual.
    #[must_use]
    pub fn greeks(params: &IVParams, vol: f64, evaluation: &PriceEvaluation) -> Greeks {
        let time = params.time_to_expiry;
        let cp = params.option_type.cp_flag();
        let spot = params.spot;
        let strike = params.strike;
        let rate = params.risk_free_rate;
        let dividend_yield = params.dividend_yield;

        let sqrt_time = if time > 0.0 { time.sqrt() } else { 0.0 };
        let dividend_discount = (-dividend_yield * time.max(0.0)).exp();
        let rate_discount = (-rate * time.max(0.0)).exp();

        let pdf_d1 = Self::norm_pdf(evaluation.d1);
        let cdf_cp_d1 = Self::norm_cdf(cp * evaluation.d1);
        let cdf_cp_d2 = Self::norm_cdf(cp * evaluation.d2);

        let delta = cp * dividend_discount * cdf_cp_d1;

        let (gamma, vega) = if vol <= 0.0 || time <= 0.0 || spot == 0.0 {
            (0.0, 0.0)
        } else {
            (
                dividend_discount * pdf_d1 / (spot * vol * sqrt_time),
                spot * dividend_discount * pdf_d1 * sqrt_time,
            )
        };

        let theta = if time > 0.0 {
            -(spot * vol * dividend_discount * pdf_d1) / (2.0 * sqrt_time)
                - cp * rate * strike * rate_discount * cdf_cp_d2
                + cp * dividend_yield * spot * dividend_discount * cdf_cp_d1
        } else {
            0.0
        };

        let rho = if time > 0.0 {
            cp * strike * time * rate_discount * cdf_cp_d2
        } else {
            0.0
        };

        Greeks {
            price: evaluation.price,
            implied_volatility: vol,
            delta,
            gamma,
            theta,
            rho,
            vega,
        }
    }
}
