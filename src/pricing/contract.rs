//! Vanilla option contract definitions.

use super::day_count::DayCountConvention;
use super::implied_volatility::OptionType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exercise style.
///
/// Only European options are priced; the other styles are carried so that
/// descriptions naming them fail with a specific error rather than a parse error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionStyle {
    /// Exercise at expiry only.
    #[default]
    European,
    /// Exercise at any time up to expiry.
    American,
    /// Exercise on a set of dates.
    Bermudan,
}

impl OptionStyle {
    /// Upper-case wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionStyle::European => "EUROPEAN",
            OptionStyle::American => "AMERICAN",
            OptionStyle::Bermudan => "BERMUDAN",
        }
    }
}

impl fmt::Display for OptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying reference of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Underlying {
    /// Market data key (e.g., "AAPL").
    pub symbol: String,
    /// Asset class (e.g., "EQUITY").
    #[serde(rename = "type")]
    pub asset_class: String,
}

impl Underlying {
    /// Creates a new underlying reference.
    pub fn new(symbol: impl Into<String>, asset_class: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class: asset_class.into(),
        }
    }
}

/// Immutable vanilla option contract.
///
/// May carry a quoted volatility, an observed market price, both, or neither;
/// which of the two drives pricing is decided when a pricer is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Strike price.
    pub strike: f64,
    /// Expiration date.
    pub expiry: NaiveDate,
    /// Exercise style.
    pub style: OptionStyle,
    /// Call or put.
    pub right: OptionType,
    /// Underlying reference.
    pub underlying: Underlying,
    /// Analyst-supplied volatility.
    pub quoted_volatility: Option<f64>,
    /// Observed market price, the calibration target when present.
    pub market_price: Option<f64>,
    /// Day count used for time to maturity.
    pub day_count: DayCountConvention,
}

impl OptionContract {
    /// Creates a European contract with no quotes and an ACT/365 day count.
    pub fn european(
        underlying: Underlying,
        strike: f64,
        expiry: NaiveDate,
        right: OptionType,
    ) -> Self {
        Self {
            strike,
            expiry,
            style: OptionStyle::European,
            right,
            underlying,
            quoted_volatility: None,
            market_price: None,
            day_count: DayCountConvention::Act365,
        }
    }

    /// Sets the quoted volatility.
    #[must_use]
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.quoted_volatility = Some(volatility);
        self
    }

    /// Sets the observed market price. Zero or negative prices count as absent.
    #[must_use]
    pub fn with_market_price(mut self, market_price: f64) -> Self {
        self.market_price = (market_price > 0.0).then_some(market_price);
        self
    }

    /// Sets the exercise style.
    #[must_use]
    pub fn with_style(mut self, style: OptionStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the day-count convention.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// True iff `as_of` is strictly after expiry. An option is live on its expiry date.
    #[must_use]
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        as_of > self.expiry
    }

    /// Time to maturity in years under the contract's day count, `0.0` once expired.
    #[must_use]
    pub fn time_to_maturity(&self, as_of: NaiveDate) -> f64 {
        if self.is_expired(as_of) {
            return 0.0;
        }
        self.day_count.year_fraction(as_of, self.expiry)
    }

    /// Intrinsic value at `spot`.
    #[must_use]
    pub fn intrinsic_value(&self, spot: f64) -> f64 {
        (self.right.cp_flag() * (spot - self.strike)).max(0.0)
    }

    /// Flat projection of the contract for reporting.
    #[must_use]
    pub fn record(&self) -> ContractRecord {
        ContractRecord {
            strike: self.strike,
            expiry: self.expiry.format("%Y-%m-%d").to_string(),
            style: self.style.as_str().to_string(),
            option_type: self.right.as_str().to_string(),
            underlying_symbol: self.underlying.symbol.clone(),
            underlying_type: self.underlying.asset_class.clone(),
            volatility: self.quoted_volatility,
            market_price: self.market_price,
            day_count: self.day_count.name().to_string(),
        }
    }
}

impl fmt::Display for OptionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} @ {} exp {}",
            self.underlying.symbol,
            self.style,
            self.right,
            self.day_count,
            self.strike,
            self.expiry.format("%Y-%m-%d")
        )
    }
}

/// Contract fields as primitives: dates as strings, enums as upper-case names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Strike price.
    pub strike: f64,
    /// Expiration date, `YYYY-MM-DD`.
    pub expiry: String,
    /// Exercise style name.
    pub style: String,
    /// `CALL` or `PUT`.
    pub option_type: String,
    /// Underlying symbol.
    pub underlying_symbol: String,
    /// Underlying asset class.
    pub underlying_type: String,
    /// Quoted volatility, if any.
    pub volatility: Option<f64>,
    /// Observed market price, if any.
    pub market_price: Option<f64>,
    /// Day-count convention name.
    pub day_count: String,
}

impl ContractRecord {
    /// Named values in reporting order, absent optionals as empty strings.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        vec![
            ("underlying_symbol", self.underlying_symbol.clone()),
            ("underlying_type", self.underlying_type.clone()),
            ("option_type", self.option_type.clone()),
            ("style", self.style.clone()),
            ("strike", self.strike.to_string()),
            ("expiry", self.expiry.clone()),
            ("day_count", self.day_count.clone()),
            ("quoted_volatility", optional(self.volatility)),
            ("market_price", optional(self.market_price)),
        ]
    }
}
