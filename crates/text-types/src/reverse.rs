//! Reverse conversion: raw string → UniversalValue.
//!
//! One parse function per built-in type tag. Every function receives a
//! non-null string; null handling lives in [`FieldConverter`].
//!
//! [`FieldConverter`]: crate::FieldConverter

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use sync_core::{UniversalType, UniversalValue};

/// Error type for string parsing failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Failed to parse '{value}' as {expected_type}: {message}")]
pub struct ConversionError {
    pub message: String,
    pub value: String,
    pub expected_type: UniversalType,
}

impl ConversionError {
    pub fn new(message: impl Into<String>, value: &str, expected_type: UniversalType) -> Self {
        Self {
            message: message.into(),
            value: value.to_string(),
            expected_type,
        }
    }
}

/// Parse a boolean leniently.
pub fn parse_bool(value: &str) -> Result<UniversalValue, ConversionError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "t" | "y" => Ok(UniversalValue::Bool(true)),
        "false" | "0" | "no" | "f" | "n" => Ok(UniversalValue::Bool(false)),
        _ => Err(ConversionError::new(
            "Invalid boolean value",
            value,
            UniversalType::Bool,
        )),
    }
}

pub fn parse_small_int(value: &str) -> Result<UniversalValue, ConversionError> {
    value
        .parse::<i16>()
        .map(UniversalValue::Int16)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::SmallInt))
}

pub fn parse_int(value: &str) -> Result<UniversalValue, ConversionError> {
    value
        .parse::<i32>()
        .map(UniversalValue::Int32)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::Int))
}

pub fn parse_big_int(value: &str) -> Result<UniversalValue, ConversionError> {
    value
        .parse::<i64>()
        .map(UniversalValue::Int64)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::BigInt))
}

pub fn parse_float(value: &str) -> Result<UniversalValue, ConversionError> {
    value
        .parse::<f32>()
        .map(UniversalValue::Float32)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::Float))
}

pub fn parse_double(value: &str) -> Result<UniversalValue, ConversionError> {
    value
        .parse::<f64>()
        .map(UniversalValue::Float64)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::Double))
}

/// Parse an exact decimal, accepting scientific notation as a fallback.
pub fn parse_decimal(value: &str) -> Result<UniversalValue, ConversionError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(UniversalValue::Decimal)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::Decimal))
}

pub fn parse_text(value: &str) -> Result<UniversalValue, ConversionError> {
    Ok(UniversalValue::String(value.to_string()))
}

pub fn parse_uuid(value: &str) -> Result<UniversalValue, ConversionError> {
    uuid::Uuid::parse_str(value)
        .map(UniversalValue::Uuid)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::Uuid))
}

/// Parse an ISO-8601 calendar date (YYYY-MM-DD).
pub fn parse_date(value: &str) -> Result<UniversalValue, ConversionError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(UniversalValue::Date)
        .map_err(|_| {
            ConversionError::new(
                "Invalid date format (expected YYYY-MM-DD)",
                value,
                UniversalType::Date,
            )
        })
}

/// Stored time values keep microseconds; finer fractions would never compare
/// equal after a round trip.
fn microsecond_precision<T: Timelike>(
    parsed: T,
    value: &str,
    expected_type: UniversalType,
) -> Result<T, ConversionError> {
    if parsed.nanosecond() % 1_000 != 0 {
        return Err(ConversionError::new(
            "Fractional seconds beyond microsecond precision",
            value,
            expected_type,
        ));
    }
    Ok(parsed)
}

/// Parse a time of day (HH:MM:SS with optional fraction, or HH:MM).
pub fn parse_time(value: &str) -> Result<UniversalValue, ConversionError> {
    let time = ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            ConversionError::new(
                "Invalid time format (expected HH:MM:SS)",
                value,
                UniversalType::Time,
            )
        })?;
    microsecond_precision(time, value, UniversalType::Time).map(UniversalValue::Time)
}

const LOCAL_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 local date-time (`T` or space separated).
pub fn parse_date_time(value: &str) -> Result<UniversalValue, ConversionError> {
    let date_time = LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| {
            ConversionError::new(
                "Invalid datetime format (expected YYYY-MM-DDTHH:MM:SS)",
                value,
                UniversalType::DateTime,
            )
        })?;
    microsecond_precision(date_time, value, UniversalType::DateTime).map(UniversalValue::DateTime)
}

/// Parse a zoned date-time and normalize it to UTC.
pub fn parse_timestamp_tz(value: &str) -> Result<UniversalValue, ConversionError> {
    // Second form is PostgreSQL text output, e.g. "2024-06-15 10:30:00+02"
    let dt = DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .map_err(|_| {
            ConversionError::new(
                "Invalid timestamp format (expected RFC 3339)",
                value,
                UniversalType::TimestampTz,
            )
        })?;
    microsecond_precision(dt.with_timezone(&Utc), value, UniversalType::TimestampTz)
        .map(UniversalValue::TimestampTz)
}

pub fn parse_json(value: &str) -> Result<UniversalValue, ConversionError> {
    serde_json::from_str::<serde_json::Value>(value)
        .map(UniversalValue::Json)
        .map_err(|e| ConversionError::new(e.to_string(), value, UniversalType::Json))
}
