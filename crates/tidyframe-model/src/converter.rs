//! Per-column value converters applied by the Convert stage before casting.

use std::fmt;
use std::sync::Arc;

use polars::prelude::{
    AnyValue, DataType, Float64Chunked, IntoSeries, NewChunkedArray, PolarsError, PolarsResult,
    Series, StringChunked,
};
use serde::{Deserialize, Serialize};
use tidyframe_common::{cell_text, coerce_f64};

/// Signature shared by every converter.
pub type ConvertFn = dyn Fn(&Series) -> PolarsResult<Series> + Send + Sync;

/// A named, shareable column transformation.
///
/// The output must have the same length as the input; the Convert stage
/// rejects anything else.
#[derive(Clone)]
pub struct Converter {
    name: String,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Series) -> PolarsResult<Series> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The no-op converter used for columns without a configured one.
    pub fn identity() -> Self {
        BuiltinConverter::Identity.into()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, series: &Series) -> PolarsResult<Series> {
        (self.func)(series)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::identity()
    }
}

/// Converters that can be named from a spec file.
///
/// ```toml
/// converter = "strip"
/// converter = { scale = 0.01 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinConverter {
    Identity,
    Strip,
    Lowercase,
    Uppercase,
    Scale(f64),
    Offset(f64),
}

impl BuiltinConverter {
    pub fn label(self) -> String {
        match self {
            BuiltinConverter::Identity => "identity".to_string(),
            BuiltinConverter::Strip => "strip".to_string(),
            BuiltinConverter::Lowercase => "lowercase".to_string(),
            BuiltinConverter::Uppercase => "uppercase".to_string(),
            BuiltinConverter::Scale(factor) => format!("scale({factor})"),
            BuiltinConverter::Offset(amount) => format!("offset({amount})"),
        }
    }

    fn apply(self, series: &Series) -> PolarsResult<Series> {
        match self {
            BuiltinConverter::Identity => Ok(series.clone()),
            BuiltinConverter::Strip => map_text(series, |s| s.trim().to_string()),
            BuiltinConverter::Lowercase => map_text(series, str::to_lowercase),
            BuiltinConverter::Uppercase => map_text(series, str::to_uppercase),
            BuiltinConverter::Scale(factor) => map_number(series, |v| v * factor),
            BuiltinConverter::Offset(amount) => map_number(series, |v| v + amount),
        }
    }
}

impl From<BuiltinConverter> for Converter {
    fn from(builtin: BuiltinConverter) -> Self {
        Converter::new(builtin.label(), move |series| builtin.apply(series))
    }
}

/// Applies `f` to the text of each non-null cell. Non-text columns pass through.
fn map_text(series: &Series, f: impl Fn(&str) -> String) -> PolarsResult<Series> {
    if series.dtype() != &DataType::String {
        return Ok(series.clone());
    }
    let values = series.str()?;
    let mapped: StringChunked = values.into_iter().map(|value| value.map(&f)).collect();
    Ok(mapped.with_name(series.name().clone()).into_series())
}

/// Applies `f` to each non-null cell read as a float; text cells are parsed.
fn map_number(series: &Series, f: impl Fn(f64) -> f64) -> PolarsResult<Series> {
    let mut values = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        let parsed = coerce_f64(value.clone()).map_err(|_| {
            PolarsError::ComputeError(
                format!(
                    "value '{}' in column '{}' is not numeric",
                    cell_text(value),
                    series.name()
                )
                .into(),
            )
        })?;
        values.push(parsed.map(&f));
    }
    Ok(Float64Chunked::from_iter_options(series.name().clone(), values.into_iter()).into_series())
}
