//! Error taxonomy of the cleaning pipeline.
//!
//! Every data-quality variant names the offending column and either the
//! offending value or an affected-row count. None of them are transient.

use thiserror::Error;
use tidyframe_model::{ColumnKey, ColumnType};

use crate::report::ViolationReport;

/// Failure of one cleaning run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CleanError {
    /// The cleaning spec references a column that is not in the schema, or a
    /// declared column has no input and no fill default.
    #[error("unknown column '{column}' referenced by {origin}")]
    UnknownColumn {
        /// The unresolved column key.
        column: ColumnKey,
        /// Where the reference came from.
        origin: String,
    },

    /// A raw or converted value cannot satisfy its declared type.
    #[error("type conversion failed for column '{column}'{}: {reason}", at_row(.row))]
    TypeConversion {
        column: ColumnKey,
        /// Input row of the offending value, when a single value is at fault.
        row: Option<usize>,
        reason: String,
    },

    /// A non-numeric column is configured for summation on duplicates.
    #[error("column '{column}' of type {declared} cannot be summed on duplicates")]
    DuplicateAggregationConflict {
        column: ColumnKey,
        declared: ColumnType,
    },

    /// Every rule violation found by the Validate stage.
    #[error("validation failed: {0}")]
    Validation(ViolationReport),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, CleanError>;

/// Coarse classification used in summaries and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownColumn,
    TypeConversion,
    DuplicateAggregationConflict,
    Validation,
    Engine,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnknownColumn => "UnknownColumn",
            Self::TypeConversion => "TypeConversionError",
            Self::DuplicateAggregationConflict => "DuplicateAggregationConflict",
            Self::Validation => "ValidationError",
            Self::Engine => "EngineError",
        }
    }
}

impl CleanError {
    pub(crate) fn unknown(column: &ColumnKey, origin: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.clone(),
            origin: origin.into(),
        }
    }

    pub(crate) fn conversion(
        column: &ColumnKey,
        row: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TypeConversion {
            column: column.clone(),
            row,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            Self::TypeConversion { .. } => ErrorKind::TypeConversion,
            Self::DuplicateAggregationConflict { .. } => ErrorKind::DuplicateAggregationConflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Polars(_) => ErrorKind::Engine,
        }
    }

    /// True for failures caused by the data or the cleaning spec rather than the
    /// frame engine.
    pub fn is_data_quality(&self) -> bool {
        !matches!(self, Self::Polars(_))
    }

    /// The column at fault, if the error concerns a single column.
    pub fn column(&self) -> Option<&ColumnKey> {
        match self {
            Self::UnknownColumn { column, .. }
            | Self::TypeConversion { column, .. }
            | Self::DuplicateAggregationConflict { column, .. } => Some(column),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ViolationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }
}

fn at_row(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" at row {row}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_message_names_row() {
        let err = CleanError::conversion(
            &"age".into(),
            Some(3),
            "value 'abc' is not a valid int64",
        );
        insta::assert_snapshot!(
            err.to_string(),
            @"type conversion failed for column 'age' at row 3: value 'abc' is not a valid int64"
        );
        assert_eq!(err.kind(), ErrorKind::TypeConversion);
        assert!(err.is_data_quality());
    }

    #[test]
    fn engine_errors_are_not_data_quality() {
        let err = CleanError::from(polars::error::PolarsError::ComputeError("boom".into()));
        assert_eq!(err.kind().label(), "EngineError");
        assert!(!err.is_data_quality());
        assert!(err.column().is_none());
    }
}
