//! Parsers for raw filter parameters.
//!
//! - `parse_ids`: comma-separated integer ids (`genres=1,2`)
//! - `parse_date`: calendar dates (`date=2024-05-01`)

use crate::error::{FilterError, Result};
use chrono::NaiveDate;

/// Parse a comma-separated list of ids.
///
/// Tokens are trimmed before parsing. The whole list fails if any token,
/// including an empty one (`"1,"`), is not an integer.
pub fn parse_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<i64>().map_err(|_| FilterError::InvalidId {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterError::InvalidDate {
        value: value.to_string(),
    })
}
