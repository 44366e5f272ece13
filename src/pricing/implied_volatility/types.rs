//! Types for Black-Scholes evaluation and implied volatility calculation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option right: call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

impl OptionType {
    /// Payoff sign used throughout the closed form: `+1` for calls, `-1` for puts.
    #[must_use]
    pub fn cp_flag(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Upper-case wire name (`CALL` / `PUT`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CALL" | "C" => Ok(OptionType::Call),
            "PUT" | "P" => Ok(OptionType::Put),
            other => Err(format!("unknown option type: {other}")),
        }
    }
}

/// Root-finding method used to invert price into volatility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverMethod {
    /// Brent's bracketing method. Converges whenever the bracket holds a sign change.
    #[default]
    Brent,
    /// Damped Newton-Raphson on vega. Faster, less robust far from the money.
    Newton,
}

/// Parameters for pricing and IV calculation.
///
/// These parameters define the option contract and market conditions
/// needed to evaluate the closed form or invert it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IVParams {
    /// Underlying spot price in price units.
    pub spot: f64,
    /// Option strike price in price units.
    pub strike: f64,
    /// Time to expiration in years (e.g., 30 days = 30.0 / 365.0).
    pub time_to_expiry: f64,
    /// Risk-free interest rate (annualized, continuously compounded).
    pub risk_free_rate: f64,
    /// Continuous dividend yield of the underlying (annualized).
    pub dividend_yield: f64,
    /// Option type (Call or Put).
    pub option_type: OptionType,
}

impl IVParams {
    /// Creates new parameters.
    ///
    /// # Arguments
    /// - `spot`: Underlying spot price in price units
    /// - `strike`: Option strike price in price units
    /// - `time_to_expiry`: Time to expiration in years
    /// - `risk_free_rate`: Risk-free interest rate (annualized)
    /// - `dividend_yield`: Continuous dividend yield (annualized)
    /// - `option_type`: Call or Put
    #[must_use]
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            dividend_yield,
            option_type,
        }
    }

    /// Creates parameters for a call option on a non-dividend-paying underlying.
    #[must_use]
    pub fn call(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            0.0,
            OptionType::Call,
        )
    }

    /// Creates parameters for a put option on a non-dividend-paying underlying.
    #[must_use]
    pub fn put(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            0.0,
            OptionType::Put,
        )
    }

    /// Returns a copy with the given dividend yield.
    #[must_use]
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Discounted forward intrinsic value, the zero-volatility price.
    ///
    /// max(0, cp · (S·e^(-qT) - K·e^(-rT)))
    #[must_use]
    pub fn discounted_intrinsic_value(&self) -> f64 {
        let time = self.time_to_expiry.max(0.0);
        let forward_spot = self.spot * (-self.dividend_yield * time).exp();
        let discounted_strike = self.strike * (-self.risk_free_rate * time).exp();
        (self.option_type.cp_flag() * (forward_spot - discounted_strike)).max(0.0)
    }
}

/// One evaluation of the closed form: the price together with the
/// normalized distances it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEvaluation {
    /// Option price.
    pub price: f64,
    /// d1 of the evaluation.
    pub d1: f64,
    /// d2 of the evaluation.
    pub d2: f64,
}

/// Result of IV calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IVResult {
    /// Calculated implied volatility (e.g., 0.25 = 25%).
    pub iv: f64,
    /// Price the volatility was solved against.
    pub price_used: f64,
    /// Number of solver iterations to converge.
    pub iterations: u32,
    /// Method that produced the root.
    pub method: SolverMethod,
}

impl IVResult {
    /// Creates a new IV result.
    #[must_use]
    pub fn new(iv: f64, price_used: f64, iterations: u32, method: SolverMethod) -> Self {
        Self {
            iv,
            price_used,
            iterations,
            method,
        }
    }

    /// Returns the IV as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.iv * 100.0
    }
}
