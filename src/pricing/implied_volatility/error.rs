//! Error types for implied volatility calculation.

use std::fmt;

/// Errors raised by the implied volatility root-finders.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The solver did not converge within max iterations.
    ConvergenceFailure {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last IV estimate before giving up.
        last_iv: f64,
    },

    /// Invalid input parameters for IV calculation.
    InvalidParams {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Price is below the no-arbitrage lower bound of the option.
    PriceBelowIntrinsic {
        /// Market price observed.
        price: f64,
        /// Discounted intrinsic value (the lowest price any volatility can produce).
        intrinsic: f64,
    },

    /// Time to expiry is too small for reliable calculation.
    TimeToExpiryTooSmall {
        /// Time to expiry in years.
        time_to_expiry: f64,
        /// Minimum required time in years.
        min_time: f64,
    },

    /// The objective has the same sign at both ends of the volatility bracket,
    /// so no volatility in the bracket reproduces the observed price.
    NoBracket {
        /// Lower end of the bracket.
        low: f64,
        /// Upper end of the bracket.
        high: f64,
        /// Pricing error at the lower end.
        f_low: f64,
        /// Pricing error at the upper end.
        f_high: f64,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::ConvergenceFailure {
                iterations,
                last_iv,
            } => {
                write!(
                    f,
                    "solver did not converge after {iterations} iterations, last IV: {last_iv:.6}"
                )
            }
            SolverError::InvalidParams { message } => {
                write!(f, "invalid parameters: {message}")
            }
            SolverError::PriceBelowIntrinsic { price, intrinsic } => {
                write!(
                    f,
                    "price {price:.6} is below intrinsic value {intrinsic:.6}"
                )
            }
            SolverError::TimeToExpiryTooSmall {
                time_to_expiry,
                min_time,
            } => {
                write!(
                    f,
                    "time to expiry {time_to_expiry:.6} years is below minimum {min_time:.6} years"
                )
            }
            SolverError::NoBracket {
                low,
                high,
                f_low,
                f_high,
            } => {
                write!(
                    f,
                    "no root bracketed in volatility interval [{low:.6}, {high:.6}] \
                     (pricing errors {f_low:.6} and {f_high:.6} share a sign)"
                )
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SolverError::ConvergenceFailure {
            iterations: 100,
            last_iv: 0.25,
        };
        assert!(err.to_string().contains("100 iterations"));

        let err = SolverError::InvalidParams {
            message: "negative spot price".to_string(),
        };
        assert!(err.to_string().contains("negative spot price"));

        let err = SolverError::PriceBelowIntrinsic {
            price: 5.0,
            intrinsic: 10.0,
        };
        assert!(err.to_string().contains("below intrinsic"));

        let err = SolverError::TimeToExpiryTooSmall {
            time_to_expiry: 0.0001,
            min_time: 0.001,
        };
        assert!(err.to_string().contains("time to expiry"));

        let err = SolverError::NoBracket {
            low: 1e-6,
            high: 2.0,
            f_low: 3.0,
            f_high: 1.0,
        };
        assert!(err.to_string().contains("no root bracketed"));
        assert!(err.to_string().contains("2.000000"));
    }
}
