use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

/// Canonical wire format for pattern and candle timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn decimal_to_f64(value: Decimal, field: &'static str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| ChartError::Parse {
        field,
        reason: "value cannot be represented as f64".to_owned(),
    })
}

/// Parses a decimal encoded as text (`"12.30"`, `"1e-3"`) into `f64`.
pub fn parse_decimal_text(text: &str, field: &'static str) -> ChartResult<f64> {
    let trimmed = text.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|err| ChartError::Parse {
            field,
            reason: format!("`{trimmed}` is not a decimal: {err}"),
        })?;
    decimal_to_f64(value, field)
}

/// Parses a wire timestamp into unix seconds.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, its ISO `T`-separated variant, and bare
/// dates (midnight) used by daily ticks.
pub fn parse_timestamp_text(text: &str, field: &'static str) -> ChartResult<f64> {
    let trimmed = text.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_TIMESTAMP_FORMAT))
        .or_else(|err| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .ok_or(err)
        })
        .map_err(|err| ChartError::Parse {
            field,
            reason: format!("`{trimmed}` is not a timestamp: {err}"),
        })?;
    Ok(naive_to_unix_seconds(parsed))
}

#[must_use]
pub fn naive_to_unix_seconds(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp() as f64
}

/// Formats unix seconds back into the wire format, used for hover text.
#[must_use]
pub fn format_unix_seconds(seconds: f64) -> String {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|time| time.naive_utc().format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| format!("{seconds}"))
}
