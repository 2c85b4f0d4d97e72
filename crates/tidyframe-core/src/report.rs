//! Violation report produced by the Validate stage.
//!
//! Each [`Violation`] variant carries only the data it needs, the same way
//! the report is rendered by the CLI and serialized for machine consumers.

use std::fmt;

use serde::{Deserialize, Serialize};
use tidyframe_model::{ColumnKey, ColumnType};

/// Number of offending row indices kept per violation.
pub const SAMPLE_ROWS: usize = 5;

/// Rule class of a violation, in the order Validate checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingColumn,
    TypeMismatch,
    NullValues,
    NanValues,
    PrecisionOnNonFloat,
}

impl ViolationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingColumn => "missing column",
            Self::TypeMismatch => "type mismatch",
            Self::NullValues => "null values",
            Self::NanValues => "NaN values",
            Self::PrecisionOnNonFloat => "precision on non-float",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A declared column is absent from the dataset.
    MissingColumn { column: ColumnKey },
    /// Runtime dtype differs from the declared type.
    TypeMismatch {
        column: ColumnKey,
        expected: ColumnType,
        actual: String,
    },
    /// A required-non-null column holds nulls.
    NullValues {
        column: ColumnKey,
        count: usize,
        rows: Vec<usize>,
    },
    /// A float column holds NaN.
    NanValues {
        column: ColumnKey,
        count: usize,
        rows: Vec<usize>,
    },
    /// A precision is configured for a column that is not a float.
    PrecisionOnNonFloat {
        column: ColumnKey,
        declared: ColumnType,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::MissingColumn { .. } => ViolationKind::MissingColumn,
            Violation::TypeMismatch { .. } => ViolationKind::TypeMismatch,
            Violation::NullValues { .. } => ViolationKind::NullValues,
            Violation::NanValues { .. } => ViolationKind::NanValues,
            Violation::PrecisionOnNonFloat { .. } => ViolationKind::PrecisionOnNonFloat,
        }
    }

    pub fn column(&self) -> &ColumnKey {
        match self {
            Violation::MissingColumn { column }
            | Violation::TypeMismatch { column, .. }
            | Violation::NullValues { column, .. }
            | Violation::NanValues { column, .. }
            | Violation::PrecisionOnNonFloat { column, .. } => column,
        }
    }

    /// Affected row count, where the rule counts rows.
    pub fn count(&self) -> Option<usize> {
        match self {
            Violation::NullValues { count, .. } | Violation::NanValues { count, .. } => {
                Some(*count)
            }
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Violation::MissingColumn { column } => {
                format!("column '{column}' is missing")
            }
            Violation::TypeMismatch {
                column,
                expected,
                actual,
            } => {
                format!("column '{column}' has type {actual}, expected {expected}")
            }
            Violation::NullValues {
                column,
                count,
                rows,
            } => {
                format!(
                    "required column '{column}' has {count} null values{}",
                    rows_suffix(rows, *count)
                )
            }
            Violation::NanValues {
                column,
                count,
                rows,
            } => {
                format!(
                    "float column '{column}' has {count} NaN values{}",
                    rows_suffix(rows, *count)
                )
            }
            Violation::PrecisionOnNonFloat { column, declared } => {
                format!("precision configured for column '{column}' of type {declared}")
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

fn rows_suffix(rows: &[usize], count: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let listed = rows
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if rows.len() < count {
        format!(" (rows {listed}, ...)")
    } else {
        format!(" (rows {listed})")
    }
}

/// Every violation found by one Validate pass, in check order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub dataset: String,
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind() == kind).count()
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} violation(s) in {}",
            self.violations.len(),
            self.dataset
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}
