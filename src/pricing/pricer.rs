//! Black-Scholes-Merton pricer bound to one contract, date and snapshot.
//!
//! Construction resolves every input from the contract and the market data,
//! validates eagerly, and calibrates: an observed market price is the ground
//! truth and volatility is backed out of it; without one, the quoted
//! volatility prices the contract and the result is kept as its fair value.
//! After construction the pricer is immutable.

use super::contract::{OptionContract, OptionStyle};
use super::diagnostics::{DiagnosticLevel, SharedSink};
use super::error::PricingError;
use super::greeks::Greeks;
use super::implied_volatility::{
    BlackScholes, IVParams, IVResult, PriceEvaluation, SolverConfig, solve_iv,
};
use super::market_data::MarketDataSnapshot;
use chrono::NaiveDate;
use std::fmt;

/// How the pricer arrived at its volatility.
#[derive(Debug, Clone, PartialEq)]
pub enum Calibration {
    /// Quoted volatility used as given; the price is the model fair value.
    Quoted,
    /// Volatility implied from the observed market price.
    Implied(IVResult),
}

/// BSM pricer for a single European option.
#[derive(Clone)]
pub struct BsmPricer {
    contract: OptionContract,
    as_of: NaiveDate,
    params: IVParams,
    volatility: f64,
    market_price: f64,
    evaluation: PriceEvaluation,
    calibration: Calibration,
    sink: SharedSink,
}

impl BsmPricer {
    /// Builds a pricer with the default solver configuration.
    ///
    /// # Errors
    /// Fails at the first violated precondition, in order:
    /// [`PricingError::UnsupportedStyle`], [`PricingError::InvalidInstrument`]
    /// for a non-positive strike, [`PricingError::MissingSpotPrice`],
    /// [`PricingError::InvalidInstrument`] for a negative spot,
    /// [`PricingError::InsufficientCalibrationInput`],
    /// [`PricingError::MissingRate`], [`PricingError::ExpiredInstrument`];
    /// then [`PricingError::ImpliedVolatilityNotFound`] if calibration fails.
    pub fn new(
        contract: OptionContract,
        as_of: NaiveDate,
        market_data: &MarketDataSnapshot,
        sink: SharedSink,
    ) -> Result<Self, PricingError> {
        Self::with_config(contract, as_of, market_data, sink, &SolverConfig::default())
    }

    /// Builds a pricer calibrating with `config`.
    pub fn with_config(
        contract: OptionContract,
        as_of: NaiveDate,
        market_data: &MarketDataSnapshot,
        sink: SharedSink,
        config: &SolverConfig,
    ) -> Result<Self, PricingError> {
        if contract.style != OptionStyle::European {
            return Err(PricingError::UnsupportedStyle {
                style: contract.style.as_str().to_string(),
            });
        }
        if !(contract.strike.is_finite() && contract.strike > 0.0) {
            return Err(PricingError::InvalidInstrument {
                message: format!("strike must be positive, got {}", contract.strike),
            });
        }

        let symbol = &contract.underlying.symbol;
        let spot = market_data.spot(symbol);
        let volatility = contract
            .quoted_volatility
            .or(market_data.volatility)
            .unwrap_or(0.0);
        let market_price = contract.market_price.filter(|price| *price > 0.0);

        let spot = spot.ok_or_else(|| PricingError::MissingSpotPrice {
            symbol: symbol.clone(),
        })?;
        if !(spot.is_finite() && spot >= 0.0) {
            return Err(PricingError::InvalidInstrument {
                message: format!("spot price for {symbol} must be non-negative, got {spot}"),
            });
        }
        if volatility <= 0.0 && market_price.is_none() {
            return Err(PricingError::InsufficientCalibrationInput);
        }
        let risk_free_rate = market_data
            .risk_free_rate
            .ok_or_else(|| PricingError::MissingRate {
                field: "risk_free_rate".to_string(),
            })?;
        let dividend_yield = market_data
            .dividend_yield
            .ok_or_else(|| PricingError::MissingRate {
                field: "dividend_yield".to_string(),
            })?;
        if contract.is_expired(as_of) {
            return Err(PricingError::ExpiredInstrument {
                expiry: contract.expiry,
                as_of,
            });
        }

        let time_to_maturity = contract.time_to_maturity(as_of);
        if time_to_maturity == 0.0 && sink.is_enabled(DiagnosticLevel::Debug) {
            sink.debug(&format!(
                "Contract expires on the valuation date, intrinsic value {}",
                contract.intrinsic_value(spot)
            ));
        }
        let params = IVParams::new(
            spot,
            contract.strike,
            time_to_maturity,
            risk_free_rate,
            dividend_yield,
            contract.right,
        );

        if sink.is_enabled(DiagnosticLevel::Info) {
            sink.info(&format!(
                "Initializing BSM pricer: contract={contract}, spot={spot}, volatility={volatility}, \
                 risk_free_rate={risk_free_rate}, dividend_yield={dividend_yield}, \
                 market_price={market_price:?}, time_to_maturity={time_to_maturity}, cp_flag={}",
                contract.right
            ));
        }

        let (volatility, calibration) = match market_price {
            Some(observed) => {
                sink.info("Calculating implied volatility from market price.");
                let result = solve_iv(&params, observed, config)?;
                if sink.is_enabled(DiagnosticLevel::Info) {
                    sink.info(&format!(
                        "Implied volatility calculated from market price: {} ({:.2}%, {:?}, {} iterations)",
                        result.iv,
                        result.iv_percent(),
                        result.method,
                        result.iterations
                    ));
                }
                (result.iv, Calibration::Implied(result))
            }
            None => {
                if sink.is_enabled(DiagnosticLevel::Info) {
                    sink.info(&format!("Using provided volatility: {volatility}"));
                }
                (volatility, Calibration::Quoted)
            }
        };

        let evaluation = BlackScholes::evaluate(&params, volatility);
        if sink.is_enabled(DiagnosticLevel::Debug) {
            sink.debug(&format!(
                "BSM price from vol: d1={}, d2={}, price={}",
                evaluation.d1, evaluation.d2, evaluation.price
            ));
        }

        Ok(Self {
            contract,
            as_of,
            params,
            volatility,
            market_price: market_price.unwrap_or(evaluation.price),
            evaluation,
            calibration,
            sink,
        })
    }

    /// The option price: the observed market price when one was supplied,
    /// the model fair value otherwise. Never recomputed.
    #[must_use]
    pub fn price(&self) -> f64 {
        if self.sink.is_enabled(DiagnosticLevel::Debug) {
            let message = match self.calibration {
                Calibration::Implied(_) => {
                    format!("Using market price for option pricing: {}", self.market_price)
                }
                Calibration::Quoted => format!("Using model fair value: {}", self.market_price),
            };
            self.sink.debug(&message);
        }
        self.market_price
    }

    /// Price, resolved volatility and the five Greeks at that volatility.
    #[must_use]
    pub fn greeks(&self) -> Greeks {
        let greeks = Greeks {
            price: self.market_price,
            ..BlackScholes::greeks(&self.params, self.volatility, &self.evaluation)
        };

        if self.sink.is_enabled(DiagnosticLevel::Info) {
            self.sink.info(&format!("Calculated Greeks: {greeks:?}"));
        }
        greeks
    }

    /// Evaluates the closed form at `volatility` with this pricer's inputs.
    #[must_use]
    pub fn evaluate(&self, volatility: f64) -> PriceEvaluation {
        BlackScholes::evaluate(&self.params, volatility)
    }

    /// Resolved volatility (implied when calibrated).
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// How the volatility was resolved.
    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Time to maturity in years.
    #[must_use]
    pub fn time_to_maturity(&self) -> f64 {
        self.params.time_to_expiry
    }

    /// `+1` for calls, `-1` for puts.
    #[must_use]
    pub fn cp_flag(&self) -> f64 {
        self.params.option_type.cp_flag()
    }

    /// Model inputs.
    #[must_use]
    pub fn params(&self) -> &IVParams {
        &self.params
    }

    /// The priced contract.
    #[must_use]
    pub fn contract(&self) -> &OptionContract {
        &self.contract
    }
}

impl fmt::Debug for BsmPricer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BsmPricer")
            .field("contract", &self.contract)
            .field("as_of", &self.as_of)
            .field("params", &self.params)
            .field("volatility", &self.volatility)
            .field("market_price", &self.market_price)
            .field("evaluation", &self.evaluation)
            .field("calibration", &self.calibration)
            .finish_non_exhaustive()
    }
}
