//! Error types for pricing, calibration and orchestration.

use super::implied_volatility::SolverError;
use chrono::NaiveDate;
use std::fmt;

/// Errors raised while building a pricer or running a pricing request.
///
/// Every variant is terminal for the request: the pricer validates eagerly
/// and fails at the first violated precondition, never returning partial results.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Unknown day-count convention name.
    UnsupportedConvention {
        /// Name as supplied.
        name: String,
    },

    /// No spot quote for the contract's underlying.
    MissingSpotPrice {
        /// Underlying symbol looked up in the snapshot.
        symbol: String,
    },

    /// A required rate field is absent from the market data.
    MissingRate {
        /// Name of the missing field.
        field: String,
    },

    /// Neither a positive volatility nor a market price was supplied.
    InsufficientCalibrationInput,

    /// The as-of date is past the contract's expiration.
    ExpiredInstrument {
        /// Contract expiration date.
        expiry: NaiveDate,
        /// Valuation date.
        as_of: NaiveDate,
    },

    /// The root-finder could not back a volatility out of the market price.
    ImpliedVolatilityNotFound {
        /// Underlying solver failure.
        source: SolverError,
    },

    /// Instrument type other than `OPTION`.
    UnsupportedInstrumentType {
        /// Type as supplied.
        kind: String,
    },

    /// Option style other than `EUROPEAN`.
    UnsupportedStyle {
        /// Style as supplied.
        style: String,
    },

    /// Malformed instrument description.
    InvalidInstrument {
        /// What is wrong with it.
        message: String,
    },

    /// No market data recorded for the valuation date.
    MarketDataUnavailable {
        /// Valuation date.
        date: NaiveDate,
    },

    /// Filesystem failure while reading inputs or writing reports.
    Io {
        /// Error message.
        message: String,
    },

    /// Error while serializing data.
    SerializationError {
        /// Error message.
        message: String,
    },

    /// Error while deserializing data.
    DeserializationError {
        /// Error message.
        message: String,
    },

    /// Report checksum does not match its contents.
    ChecksumMismatch {
        /// Checksum carried by the package.
        expected: String,
        /// Checksum recomputed from the report.
        actual: String,
    },

    /// Report package written by an incompatible format version.
    UnsupportedReportVersion {
        /// Version found in the package.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::UnsupportedConvention { name } => {
                write!(f, "unsupported day count convention: {name}")
            }
            PricingError::MissingSpotPrice { symbol } => {
                write!(f, "spot price is required for BSM pricing, none found for {symbol}")
            }
            PricingError::MissingRate { field } => {
                write!(f, "{field} is required for BSM pricing")
            }
            PricingError::InsufficientCalibrationInput => {
                write!(f, "either volatility or market price is required for BSM pricing")
            }
            PricingError::ExpiredInstrument { expiry, as_of } => {
                write!(f, "cannot price an expired option: expiry {expiry} is before {as_of}")
            }
            PricingError::ImpliedVolatilityNotFound { source } => {
                write!(f, "implied volatility not found: {source}")
            }
            PricingError::UnsupportedInstrumentType { kind } => {
                write!(f, "RISK mode not implemented for instrument type: {kind}")
            }
            PricingError::UnsupportedStyle { style } => {
                write!(f, "RISK mode not implemented for option style: {style}")
            }
            PricingError::InvalidInstrument { message } => {
                write!(f, "invalid instrument: {message}")
            }
            PricingError::MarketDataUnavailable { date } => {
                write!(f, "no market data for {}", date.format("%Y%m%d"))
            }
            PricingError::Io { message } => write!(f, "io error: {message}"),
            PricingError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            PricingError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
            PricingError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected}, got {actual}")
            }
            PricingError::UnsupportedReportVersion { found, expected } => {
                write!(f, "unsupported report version: {found} (expected {expected})")
            }
        }
    }
}

impl std::error::Error for PricingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PricingError::ImpliedVolatilityNotFound { source } => Some(source),
            _ => None,
        }
    }
}

impl From<SolverError> for PricingError {
    fn from(source: SolverError) -> Self {
        PricingError::ImpliedVolatilityNotFound { source }
    }
}

impl From<std::io::Error> for PricingError {
    fn from(error: std::io::Error) -> Self {
        PricingError::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = PricingError::UnsupportedConvention {
            name: "ACT/ACT".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported day count convention: ACT/ACT");

        let err = PricingError::MissingRate {
            field: "risk_free_rate".to_string(),
        };
        assert!(err.to_string().starts_with("risk_free_rate"));

        let err = PricingError::ExpiredInstrument {
            expiry: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        assert!(err.to_string().contains("2024-01-01"));

        let err = PricingError::MarketDataUnavailable {
            date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        };
        assert!(err.to_string().contains("20250307"));
    }

    #[test]
    fn test_solver_error_is_wrapped_with_source() {
        let err: PricingError = SolverError::ConvergenceFailure {
            iterations: 100,
            last_iv: 0.3,
        }
        .into();

        assert!(matches!(err, PricingError::ImpliedVolatilityNotFound { .. }));
        assert!(err.to_string().contains("100 iterations"));
        assert!(err.source().is_some());
    }
}
