//! Field parsers for ride-history exports.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Layout of the timestamp prefix; a trailing zone name (`UTC`, `PST`, ...) follows it.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parses a timestamp such as `2019-11-23 21:13:06 +0000 UTC`.
///
/// The numeric offset is authoritative; the zone name is dropped. A value
/// without a zone name is accepted as well.
///
/// # Errors
///
/// Returns an error if the date, time or offset do not match [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let value = value.trim();
    let without_zone = match value.split_whitespace().count() {
        4 => value
            .rsplit_once(char::is_whitespace)
            .map_or(value, |(head, _)| head.trim_end()),
        _ => value,
    };

    DateTime::parse_from_str(without_zone, TIMESTAMP_FORMAT)
}

/// Cell values that mark a missing number in exported spreadsheets.
const MISSING_MARKERS: &[&str] = &["", "nan", "na", "n/a", "null", "none", "-"];

#[derive(Error, Debug)]
pub enum AmountError {
    #[error(transparent)]
    Invalid(#[from] std::num::ParseFloatError),

    #[error("value is not finite")]
    NotFinite,
}

/// Parses a fare or distance cell. Empty and missing-value cells count as zero.
///
/// # Errors
///
/// Returns an error for non-numeric text and for infinite values.
pub fn parse_amount(value: &str) -> Result<f64, AmountError> {
    let value = value.trim();
    if MISSING_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m)) {
        return Ok(0.0);
    }

    let amount: f64 = value.parse()?;
    if amount.is_nan() {
        return Ok(0.0);
    }
    if amount.is_infinite() {
        return Err(AmountError::NotFinite);
    }
    Ok(amount)
}

/// Seconds between begin and drop-off, forced to zero for inverted ranges.
pub fn ride_duration(begin: &DateTime<FixedOffset>, dropoff: &DateTime<FixedOffset>) -> i64 {
    if begin > dropoff {
        0
    } else {
        (*dropoff - *begin).num_seconds()
    }
}
