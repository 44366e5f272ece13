//! Risk and price modes: instrument description in, report or price out.
//!
//! An instrument description is the JSON document handed to the binary:
//!
//! ```json
//! {
//!   "type": "OPTION",
//!   "strike": 250.0,
//!   "expiry": "20250321",
//!   "market_price": 7.5,
//!   "underlying": { "symbol": "AAPL", "type": "EQUITY" },
//!   "option_type": "CALL",
//!   "style": "EUROPEAN"
//! }
//! ```

use super::contract::{OptionContract, OptionStyle, Underlying};
use super::day_count::DayCountConvention;
use super::diagnostics::{DiagnosticLevel, SharedSink};
use super::error::PricingError;
use super::implied_volatility::OptionType;
use super::market_data::MarketDataSet;
use super::pricer::BsmPricer;
use super::report::RiskReport;
use crate::utils::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Instrument kind priced by the risk and price modes.
pub const OPTION_INSTRUMENT: &str = "OPTION";

/// Instrument description as supplied on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDescription {
    /// Instrument kind; only `OPTION` is priced.
    #[serde(rename = "type")]
    pub kind: String,
    /// Strike price.
    pub strike: f64,
    /// Expiry, `YYYYMMDD`.
    pub expiry: String,
    /// Observed market price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_price: Option<f64>,
    /// Underlying reference.
    pub underlying: Underlying,
    /// `CALL` or `PUT`.
    pub option_type: String,
    /// Exercise style; only `EUROPEAN` is priced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Quoted volatility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Day-count convention name, ACT/365 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_count: Option<String>,
}

impl InstrumentDescription {
    /// Parses a description from JSON.
    pub fn from_json_str(data: &str) -> Result<Self, PricingError> {
        serde_json::from_str(data).map_err(|error| PricingError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Reads and parses a description from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PricingError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|error| PricingError::Io {
            message: format!("{}: {error}", path.display()),
        })?;
        Self::from_json_str(&data)
    }

    /// Builds the option contract this description names.
    ///
    /// # Errors
    /// [`PricingError::UnsupportedInstrumentType`] unless the kind is `OPTION`,
    /// [`PricingError::UnsupportedStyle`] unless the style is `EUROPEAN`,
    /// [`PricingError::InvalidInstrument`] for a non-positive strike or an
    /// unreadable expiry or option type,
    /// [`PricingError::UnsupportedConvention`] for an unknown day count.
    pub fn to_contract(&self) -> Result<OptionContract, PricingError> {
        if !self.kind.eq_ignore_ascii_case(OPTION_INSTRUMENT) {
            return Err(PricingError::UnsupportedInstrumentType {
                kind: self.kind.clone(),
            });
        }

        let style = self.style.as_deref().unwrap_or_default();
        if !style.eq_ignore_ascii_case(OptionStyle::European.as_str()) {
            return Err(PricingError::UnsupportedStyle {
                style: style.to_string(),
            });
        }

        if !(self.strike.is_finite() && self.strike > 0.0) {
            return Err(PricingError::InvalidInstrument {
                message: format!("strike must be positive, got {}", self.strike),
            });
        }

        let expiry = parse_date(&self.expiry).map_err(|error| PricingError::InvalidInstrument {
            message: format!("expiry '{}': {error}", self.expiry),
        })?;
        let right: OptionType = self
            .option_type
            .parse()
            .map_err(|message| PricingError::InvalidInstrument { message })?;
        let day_count = match &self.day_count {
            Some(name) => name.parse()?,
            None => DayCountConvention::default(),
        };

        let mut contract = OptionContract::european(self.underlying.clone(), self.strike, expiry, right)
            .with_day_count(day_count);
        if let Some(volatility) = self.volatility {
            contract = contract.with_volatility(volatility);
        }
        if let Some(market_price) = self.market_price {
            contract = contract.with_market_price(market_price);
        }
        Ok(contract)
    }
}

fn build_pricer(
    instrument: &InstrumentDescription,
    as_of: NaiveDate,
    market_data: &MarketDataSet,
    sink: SharedSink,
) -> Result<BsmPricer, PricingError> {
    if sink.is_enabled(DiagnosticLevel::Info) {
        sink.info(&format!("Instrument details: {instrument:?}"));
    }

    let contract = instrument.to_contract()?;
    let snapshot = market_data.snapshot(as_of)?;
    debug!("Pricing {} as of {}", contract, as_of);

    sink.info("Using BSM pricer for EUROPEAN option.");
    BsmPricer::new(contract, as_of, snapshot, sink)
}

/// Prices `instrument` as of `as_of` and reports its Greeks.
pub fn run_risk_mode(
    instrument: &InstrumentDescription,
    as_of: NaiveDate,
    market_data: &MarketDataSet,
    sink: SharedSink,
) -> Result<RiskReport, PricingError> {
    info!("Starting RISK mode as of {}", as_of);
    let pricer = build_pricer(instrument, as_of, market_data, sink)?;
    debug!("Model inputs: {:?}", pricer.params());
    let report = RiskReport::new(as_of, pricer.contract().record(), pricer.greeks());
    info!("RISK mode complete for {}", pricer.contract());
    Ok(report)
}

/// Prices `instrument` as of `as_of`.
pub fn run_price_mode(
    instrument: &InstrumentDescription,
    as_of: NaiveDate,
    market_data: &MarketDataSet,
    sink: SharedSink,
) -> Result<f64, PricingError> {
    info!("Starting PRICE mode as of {}", as_of);
    let pricer = build_pricer(instrument, as_of, market_data, sink)?;
    Ok(pricer.price())
}
