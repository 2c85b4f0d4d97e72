use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use polars::prelude::{DataType, NamedFrom, PlSmallStr, Series};
use serde::{Deserialize, Serialize};

/// Canonical logical column identifier, independent of raw input naming.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnKey(String);

impl ColumnKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ColumnKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ColumnKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&ColumnKey> for ColumnKey {
    fn from(value: &ColumnKey) -> Self {
        value.clone()
    }
}

/// Declared target type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[serde(alias = "string", alias = "str", alias = "text")]
    Utf8,
    #[serde(alias = "int", alias = "integer", alias = "i64")]
    Int64,
    #[serde(alias = "float", alias = "double", alias = "f64")]
    Float64,
    #[serde(alias = "bool")]
    Boolean,
}

impl ColumnType {
    /// The single polars dtype a column of this type holds after conversion.
    pub fn dtype(self) -> DataType {
        match self {
            ColumnType::Utf8 => DataType::String,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Boolean => DataType::Boolean,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, ColumnType::Float64)
    }

    /// Exact dtype match, no implicit widening.
    pub fn matches(self, dtype: &DataType) -> bool {
        &self.dtype() == dtype
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Utf8 => "utf8",
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "string" | "str" | "text" => Ok(ColumnType::Utf8),
            "int64" | "int" | "integer" | "i64" => Ok(ColumnType::Int64),
            "float64" | "float" | "double" | "f64" => Ok(ColumnType::Float64),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            _ => Err(format!("unknown column type: {s}")),
        }
    }
}

/// Default written into null cells by the Fill-Null stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FillValue {
    /// The dtype a column filled only with this value would have.
    pub fn dtype(&self) -> DataType {
        match self {
            FillValue::Bool(_) => DataType::Boolean,
            FillValue::Int(_) => DataType::Int64,
            FillValue::Float(_) => DataType::Float64,
            FillValue::Str(_) => DataType::String,
        }
    }

    /// Text form, as it would appear in a raw input cell.
    pub fn text(&self) -> String {
        match self {
            FillValue::Bool(v) => v.to_string(),
            FillValue::Int(v) => v.to_string(),
            FillValue::Float(v) => tidyframe_common::format_float(*v),
            FillValue::Str(v) => v.clone(),
        }
    }

    /// A series of `len` copies of this value in its own dtype.
    pub fn broadcast(&self, name: PlSmallStr, len: usize) -> Series {
        match self {
            FillValue::Bool(v) => Series::new(name, vec![*v; len]),
            FillValue::Int(v) => Series::new(name, vec![*v; len]),
            FillValue::Float(v) => Series::new(name, vec![*v; len]),
            FillValue::Str(v) => Series::new(name, vec![v.as_str(); len]),
        }
    }
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<bool> for FillValue {
    fn from(value: bool) -> Self {
        FillValue::Bool(value)
    }
}

impl From<i64> for FillValue {
    fn from(value: i64) -> Self {
        FillValue::Int(value)
    }
}

impl From<f64> for FillValue {
    fn from(value: f64) -> Self {
        FillValue::Float(value)
    }
}

impl From<&str> for FillValue {
    fn from(value: &str) -> Self {
        FillValue::Str(value.to_string())
    }
}

impl From<String> for FillValue {
    fn from(value: String) -> Self {
        FillValue::Str(value)
    }
}

/// One entry of the sort-key tuple, primary key first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortKey {
    pub key: ColumnKey,
    #[serde(default)]
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(key: impl Into<ColumnKey>) -> Self {
        Self {
            key: key.into(),
            descending: false,
        }
    }

    pub fn descending(key: impl Into<ColumnKey>) -> Self {
        Self {
            key: key.into(),
            descending: true,
        }
    }
}
