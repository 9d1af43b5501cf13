//! Parsing of human time spans like "3 days" or "10 hours".
//!
//! Used for the `--start` flag: how much history to examine. A bare number
//! is taken as seconds; otherwise the amount is followed by a unit, with or
//! without a separating space, in long or short spelling.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimespanError {
    #[error("empty time span")]
    Empty,
    #[error("invalid amount {0:?}")]
    BadAmount(String),
    #[error("unknown time unit {0:?}")]
    BadUnit(String),
    #[error("time span must not be negative")]
    Negative,
}

/// Convert a span like "3 days", "10 hours", "90m" or "45" into seconds.
/// Fractional amounts are allowed and rounded to the nearest second.
pub fn parse_timespan(text: &str) -> Result<u64, TimespanError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TimespanError::Empty);
    }

    let unit_start = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(text.len());
    let amount_text = text[..unit_start].trim();
    let unit_text = text[unit_start..].trim();

    let amount: f64 = amount_text
        .parse()
        .map_err(|_| TimespanError::BadAmount(amount_text.to_string()))?;
    if amount < 0.0 {
        return Err(TimespanError::Negative);
    }

    let unit_seconds = unit_seconds(unit_text)?;
    Ok((amount * unit_seconds as f64).round() as u64)
}

fn unit_seconds(unit: &str) -> Result<u64, TimespanError> {
    match unit.to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(1),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(60),
        "h" | "hr" | "hrs" | "hour" | "hours" => Ok(3600),
        "d" | "day" | "days" => Ok(86400),
        "w" | "wk" | "wks" | "week" | "weeks" => Ok(604800),
        other => Err(TimespanError::BadUnit(other.to_string())),
    }
}
