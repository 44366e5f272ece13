//! Market data snapshots for a valuation date.
//!
//! On disk, market data is a JSON object keyed by `YYYYMMDD` dates. Each
//! date holds spot quotes keyed by underlying symbol next to the global
//! `risk_free_rate`, `dividend_yield` and optional `volatility`. Any other
//! key whose value is not a spot quote is ignored:
//!
//! ```json
//! {
//!   "20250102": {
//!     "AAPL": { "spot_price": 243.85 },
//!     "MSFT": 418.58,
//!     "risk_free_rate": 0.0425,
//!     "dividend_yield": 0.0044
//!   }
//! }
//! ```

use super::error::PricingError;
use crate::utils::compact_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Spot quote for one underlying: a bare number or a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpotQuote {
    /// Bare spot price.
    Price(f64),
    /// Structured quote carrying at least a spot price.
    Record {
        /// Spot price.
        #[serde(alias = "spotPrice")]
        spot_price: f64,
    },
}

impl SpotQuote {
    /// The spot price, unwrapped from the record if needed.
    #[must_use]
    pub fn spot_price(&self) -> f64 {
        match self {
            SpotQuote::Price(price) => *price,
            SpotQuote::Record { spot_price } => *spot_price,
        }
    }
}

/// Market data for a single valuation date.
///
/// Rates are optional at the type level so that their absence surfaces as a
/// pricing error naming the field rather than as a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    /// Continuously compounded risk-free rate.
    #[serde(default, alias = "riskFreeRate", skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<f64>,
    /// Continuous dividend yield.
    #[serde(default, alias = "dividendYield", skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    /// Global volatility, used when a contract quotes none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Spot quotes by underlying symbol.
    #[serde(flatten, deserialize_with = "deserialize_spots")]
    pub spots: BTreeMap<String, SpotQuote>,
}

/// Keeps the remaining keys that read as spot quotes and drops the rest.
fn deserialize_spots<'de, D>(deserializer: D) -> Result<BTreeMap<String, SpotQuote>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<SpotQuote>(value) {
            Ok(quote) => Some((key, quote)),
            Err(_) => {
                debug!("Ignoring market data field '{}': not a spot quote", key);
                None
            }
        })
        .collect())
}

impl MarketDataSnapshot {
    /// Creates a snapshot with both rates and no spots.
    #[must_use]
    pub fn new(risk_free_rate: f64, dividend_yield: f64) -> Self {
        Self {
            risk_free_rate: Some(risk_free_rate),
            dividend_yield: Some(dividend_yield),
            volatility: None,
            spots: BTreeMap::new(),
        }
    }

    /// Adds a spot price for `symbol`.
    #[must_use]
    pub fn with_spot(mut self, symbol: impl Into<String>, spot_price: f64) -> Self {
        self.spots.insert(symbol.into(), SpotQuote::Price(spot_price));
        self
    }

    /// Sets the global volatility.
    #[must_use]
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Spot price of `symbol`, if quoted.
    #[must_use]
    pub fn spot(&self, symbol: &str) -> Option<f64> {
        self.spots.get(symbol).map(SpotQuote::spot_price)
    }
}

/// Market data snapshots keyed by `YYYYMMDD` date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketDataSet {
    snapshots: BTreeMap<String, MarketDataSnapshot>,
}

impl MarketDataSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the snapshot for `date`, replacing any previous one.
    pub fn insert(&mut self, date: NaiveDate, snapshot: MarketDataSnapshot) {
        self.snapshots.insert(compact_date(date), snapshot);
    }

    /// Scopes the set to one valuation date.
    pub fn snapshot(&self, date: NaiveDate) -> Result<&MarketDataSnapshot, PricingError> {
        self.snapshots
            .get(&compact_date(date))
            .ok_or(PricingError::MarketDataUnavailable { date })
    }

    /// Number of dates in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when the set holds no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Parses a set from JSON.
    pub fn from_json_str(data: &str) -> Result<Self, PricingError> {
        serde_json::from_str(data).map_err(|error| PricingError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Reads and parses a set from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PricingError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|error| PricingError::Io {
            message: format!("{}: {error}", path.display()),
        })?;
        Self::from_json_str(&data)
    }
}

/// Path of the market data file for `date` under `dir`: `<dir>/<YYYYMMDD>.json`.
#[must_use]
pub fn market_data_path(dir: impl AsRef<Path>, date: NaiveDate) -> PathBuf {
    dir.as_ref().join(format!("{}.json", compact_date(date)))
}

/// Loads the market data file for `date` from `dir`.
pub fn load_market_data(
    dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<MarketDataSet, PricingError> {
    let path = market_data_path(dir, date);
    info!("Loading market data from {}", path.display());

    let market_data = MarketDataSet::from_file(&path)?;
    info!("Market data successfully loaded: {} date(s)", market_data.len());
    debug!("Market data: {:?}", market_data);
    Ok(market_data)
}
