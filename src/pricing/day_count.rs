//! Day-count conventions.
//!
//! Converts a pair of calendar dates into an elapsed year fraction.
//! Reversed dates are not special-cased: the fraction comes out negative.

use super::error::PricingError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported day-count conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// 30/360 US: day 31 rolls to 30.
    #[serde(rename = "30/360")]
    Thirty360,
    /// Actual days over a 360-day year.
    #[serde(rename = "ACT/360")]
    Act360,
    /// Actual days over a 365-day year.
    #[default]
    #[serde(rename = "ACT/365")]
    Act365,
}

impl DayCountConvention {
    /// Market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365 => "ACT/365",
        }
    }

    /// Year fraction from `start` to `end`.
    ///
    /// ```
    /// use bsm_pricer::pricing::DayCountConvention;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// assert_eq!(DayCountConvention::Act365.year_fraction(start, end), 366.0 / 365.0);
    /// ```
    #[must_use]
    pub fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        match self {
            DayCountConvention::Thirty360 => thirty_360(start, end),
            DayCountConvention::Act360 => (end - start).num_days() as f64 / 360.0,
            DayCountConvention::Act365 => (end - start).num_days() as f64 / 365.0,
        }
    }
}

fn thirty_360(start: NaiveDate, end: NaiveDate) -> f64 {
    let (y1, m1, mut d1) = (start.year(), start.month() as i32, start.day() as i32);
    let (y2, m2, mut d2) = (end.year(), end.month() as i32, end.day() as i32);

    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 && d1 == 30 {
        d2 = 30;
    }

    let days = 360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1);
    days as f64 / 360.0
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "30/360" => Ok(DayCountConvention::Thirty360),
            "ACT/360" => Ok(DayCountConvention::Act360),
            "ACT/365" => Ok(DayCountConvention::Act365),
            _ => Err(PricingError::UnsupportedConvention {
                name: s.to_string(),
            }),
        }
    }
}
