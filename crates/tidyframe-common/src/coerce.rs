//! Strict value coercion used by typed casts.
//!
//! Each function returns `Ok(None)` for a missing value (null, blank text or a
//! NaN sentinel), `Ok(Some(_))` for a value that converts losslessly, and
//! `Err(InvalidValue)` when the value cannot represent the target type.

use std::fmt;

use polars::prelude::AnyValue;

use crate::polars::{cell_text, format_float, parse_bool, parse_number};

/// Marker error: the value cannot be converted to the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidValue;

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value cannot be converted")
    }
}

impl std::error::Error for InvalidValue {}

type Coerced<T> = Result<Option<T>, InvalidValue>;

/// Coerce to `i64`. Floats must be integral and in range.
pub fn coerce_i64(value: AnyValue<'_>) -> Coerced<i64> {
    match value {
        AnyValue::Null => Ok(None),
        AnyValue::Boolean(b) => Ok(Some(i64::from(b))),
        AnyValue::Float32(v) => float_to_i64(f64::from(v)),
        AnyValue::Float64(v) => float_to_i64(v),
        AnyValue::String(s) => text_to_i64(s),
        AnyValue::StringOwned(s) => text_to_i64(&s),
        other if other.dtype().is_integer() => {
            other.extract::<i64>().map(Some).ok_or(InvalidValue)
        }
        _ => Err(InvalidValue),
    }
}

/// Coerce to `f64`. NaN becomes a missing value.
pub fn coerce_f64(value: AnyValue<'_>) -> Coerced<f64> {
    match value {
        AnyValue::Null => Ok(None),
        AnyValue::Boolean(b) => Ok(Some(f64::from(u8::from(b)))),
        AnyValue::String(s) => text_to_f64(s),
        AnyValue::StringOwned(s) => text_to_f64(&s),
        other if other.dtype().is_integer() || other.dtype().is_float() => {
            let parsed = other.extract::<f64>().ok_or(InvalidValue)?;
            Ok(Some(parsed).filter(|v| !v.is_nan()))
        }
        _ => Err(InvalidValue),
    }
}

/// Coerce to `bool`. Numbers must be exactly 0 or 1.
pub fn coerce_bool(value: AnyValue<'_>) -> Coerced<bool> {
    match value {
        AnyValue::Null => Ok(None),
        AnyValue::Boolean(b) => Ok(Some(b)),
        AnyValue::String(s) => text_to_bool(s),
        AnyValue::StringOwned(s) => text_to_bool(&s),
        other => match coerce_f64(other)? {
            None => Ok(None),
            Some(v) if v == 0.0 => Ok(Some(false)),
            Some(v) if v == 1.0 => Ok(Some(true)),
            Some(_) => Err(InvalidValue),
        },
    }
}

/// Coerce to trimmed text. Never fails; NaN floats become missing.
pub fn coerce_string(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) if v.is_nan() => None,
        AnyValue::Float64(v) if v.is_nan() => None,
        AnyValue::Float64(v) => Some(format_float(v)),
        AnyValue::String(s) => Some(s.trim().to_string()),
        AnyValue::StringOwned(s) => Some(s.trim().to_string()),
        other => Some(cell_text(other)),
    }
}

fn float_to_i64(value: f64) -> Coerced<i64> {
    if value.is_nan() {
        return Ok(None);
    }
    // 2^63 is the first float above i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let out_of_range = !(-LIMIT..LIMIT).contains(&value);
    if value.fract() != 0.0 || out_of_range {
        return Err(InvalidValue);
    }
    Ok(Some(value as i64))
}

fn text_to_i64(value: &str) -> Coerced<i64> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    if let Some(parsed) = parse_number::<i64>(value) {
        return Ok(Some(parsed));
    }
    match parse_number::<f64>(value) {
        Some(parsed) => float_to_i64(parsed),
        None => Err(InvalidValue),
    }
}

fn text_to_f64(value: &str) -> Coerced<f64> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    match parse_number::<f64>(value) {
        Some(parsed) if parsed.is_nan() => Ok(None),
        Some(parsed) => Ok(Some(parsed)),
        None => Err(InvalidValue),
    }
}

fn text_to_bool(value: &str) -> Coerced<bool> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_bool(value).map(Some).ok_or(InvalidValue)
}
