//! Typed value coercion.
//!
//! Pure functions converting a resolved [`ConfigValue`] into a concrete type.
//! Every function returns [`CoercionError::NilValue`] for a stored null, so
//! callers can tell "value missing" from "value malformed".

use chrono::{DateTime, Utc};

use super::ConfigValue;
use crate::error_handling::CoercionError;

/// 2^63, the first float above the `i64` range.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn unsupported(value: &ConfigValue, target: &'static str) -> CoercionError {
    CoercionError::UnsupportedType {
        found: value.type_name(),
        target,
    }
}

fn out_of_range(value: impl ToString, target: &'static str) -> CoercionError {
    CoercionError::ValueOutOfRange {
        value: value.to_string(),
        target,
    }
}

fn utf8_text<'a>(bytes: &'a [u8], target: &'static str) -> Result<&'a str, CoercionError> {
    std::str::from_utf8(bytes).map_err(|_| CoercionError::ParseError {
        input: String::from_utf8_lossy(bytes).into_owned(),
        target,
    })
}

/// Converts a value to text.
///
/// Strings pass through; numbers and booleans render as text (floats with six
/// decimals); byte buffers decode as UTF-8; timestamps render as RFC 3339.
pub fn coerce_string(value: &ConfigValue) -> Result<String, CoercionError> {
    match value {
        ConfigValue::Null => Err(CoercionError::NilValue),
        ConfigValue::String(s) => Ok(s.clone()),
        ConfigValue::Int(i) => Ok(i.to_string()),
        ConfigValue::UInt(u) => Ok(u.to_string()),
        ConfigValue::Float(f) => Ok(format!("{f:.6}")),
        ConfigValue::Bool(b) => Ok(b.to_string()),
        ConfigValue::Bytes(bytes) => utf8_text(bytes, "string").map(str::to_string),
        ConfigValue::Timestamp(ts) => Ok(ts.to_rfc3339()),
        ConfigValue::List(_) | ConfigValue::Map(_) => Err(unsupported(value, "string")),
    }
}

/// Converts a value to a boolean.
///
/// Only a native boolean is meaningful; any other non-null value yields
/// `false` rather than an error.
pub fn coerce_bool(value: &ConfigValue) -> Result<bool, CoercionError> {
    match value {
        ConfigValue::Null => Err(CoercionError::NilValue),
        ConfigValue::Bool(b) => Ok(*b),
        _ => Ok(false),
    }
}

/// Converts a value to a signed 64-bit integer.
///
/// - Integers pass through; unsigned values above `i64::MAX` are out of range.
/// - Floats truncate toward zero; negative or too-large floats are out of range.
/// - Strings (and UTF-8 byte buffers) are parsed as base-10.
/// - Booleans map to `1` / `0`.
pub fn coerce_int64(value: &ConfigValue) -> Result<i64, CoercionError> {
    match value {
        ConfigValue::Null => Err(CoercionError::NilValue),
        ConfigValue::Int(i) => Ok(*i),
        ConfigValue::UInt(u) => i64::try_from(*u).map_err(|_| out_of_range(u, "int64")),
        ConfigValue::Float(f) => {
            if f.is_nan() || *f < 0.0 || *f >= I64_UPPER_BOUND {
                return Err(out_of_range(f, "int64"));
            }
            Ok(f.trunc() as i64)
        }
        ConfigValue::String(s) => parse_int64(s),
        ConfigValue::Bytes(bytes) => parse_int64(utf8_text(bytes, "int64")?),
        ConfigValue::Bool(b) => Ok(i64::from(*b)),
        ConfigValue::Timestamp(_) | ConfigValue::List(_) | ConfigValue::Map(_) => {
            Err(unsupported(value, "int64"))
        }
    }
}

fn parse_int64(text: &str) -> Result<i64, CoercionError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| CoercionError::ParseError {
            input: text.to_string(),
            target: "int64",
        })
}

/// Converts a value to a UTC timestamp.
///
/// Accepts a native timestamp, epoch seconds (integer or float, fraction
/// dropped) or RFC 3339 text.
pub fn coerce_timestamp(value: &ConfigValue) -> Result<DateTime<Utc>, CoercionError> {
    match value {
        ConfigValue::Null => Err(CoercionError::NilValue),
        ConfigValue::Timestamp(ts) => Ok(*ts),
        ConfigValue::Int(secs) => from_epoch_seconds(*secs),
        ConfigValue::UInt(u) => {
            let secs = i64::try_from(*u).map_err(|_| out_of_range(u, "timestamp"))?;
            from_epoch_seconds(secs)
        }
        ConfigValue::Float(f) => {
            if !f.is_finite() || f.abs() >= I64_UPPER_BOUND {
                return Err(out_of_range(f, "timestamp"));
            }
            from_epoch_seconds(f.trunc() as i64)
        }
        ConfigValue::String(s) => parse_rfc3339(s),
        ConfigValue::Bytes(bytes) => parse_rfc3339(utf8_text(bytes, "timestamp")?),
        ConfigValue::Bool(_) | ConfigValue::List(_) | ConfigValue::Map(_) => {
            Err(unsupported(value, "timestamp"))
        }
    }
}

fn from_epoch_seconds(secs: i64) -> Result<DateTime<Utc>, CoercionError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| out_of_range(secs, "timestamp"))
}

fn parse_rfc3339(text: &str) -> Result<DateTime<Utc>, CoercionError> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| CoercionError::ParseError {
            input: text.to_string(),
            target: "timestamp",
        })
}
