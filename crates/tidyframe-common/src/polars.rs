//! Reading single Polars cells as text or numbers.

use std::str::FromStr;

use polars::prelude::AnyValue;

/// Text of one cell as it is written to CSV.
///
/// Null is the empty string. Floats never carry a trailing `.0`, so a value
/// that went through `Float64` prints the way a person would type it.
///
/// ```
/// use polars::prelude::AnyValue;
/// use tidyframe_common::cell_text;
///
/// assert_eq!(cell_text(AnyValue::Null), "");
/// assert_eq!(cell_text(AnyValue::Float64(92.0)), "92");
/// assert_eq!(cell_text(AnyValue::String("a, b")), "a, b");
/// ```
pub fn cell_text(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_owned(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Float32(v) => format_float(f64::from(v)),
        AnyValue::Float64(v) => format_float(v),
        other => match other.extract::<i64>() {
            Some(v) if other.dtype().is_integer() => v.to_string(),
            _ => other.to_string(),
        },
    }
}

/// Shortest decimal spelling of `v`; zero of either sign prints as `0`.
///
/// ```
/// use tidyframe_common::format_float;
///
/// assert_eq!(format_float(1.0), "1");
/// assert_eq!(format_float(91.97), "91.97");
/// assert_eq!(format_float(-0.0), "0");
/// ```
pub fn format_float(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

/// Numeric value of one cell. Text is parsed; booleans count as 0 or 1.
pub fn cell_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Boolean(b) => Some(f64::from(u8::from(b))),
        AnyValue::String(s) => parse_number(s),
        AnyValue::StringOwned(s) => parse_number(&s),
        other => other.extract::<f64>(),
    }
}

/// Parses `value` after trimming surrounding whitespace.
pub fn parse_number<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

/// Parses common boolean spellings (case-insensitive).
///
/// Accepts `true/false`, `t/f`, `yes/no`, `y/n` and `1/0`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
