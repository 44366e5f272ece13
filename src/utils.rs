//! Shared helpers.

use chrono::{NaiveDate, ParseError};

/// Wire format of dates in instrument descriptions and market data keys.
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Parses a `YYYYMMDD` date, also accepting ISO `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, COMPACT_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
}

/// Formats a date as `YYYYMMDD`.
#[must_use]
pub fn compact_date(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        assert_eq!(parse_date("20250321").unwrap(), expected);
        assert_eq!(parse_date(" 2025-03-21 ").unwrap(), expected);
        assert!(parse_date("21/03/2025").is_err());
        assert!(parse_date("20250231").is_err());
    }

    #[test]
    fn test_compact_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(compact_date(date), "20240105");
    }
}
