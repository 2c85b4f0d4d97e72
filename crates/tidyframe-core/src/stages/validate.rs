//! Stage 8: check every rule, then round.

use polars::prelude::{Column, DataFrame, DataType};
use tidyframe_model::{CleaningSpec, ColumnType};

use crate::error::{CleanError, Result};
use crate::report::{SAMPLE_ROWS, Violation, ViolationReport};
use crate::rounding::round_series;

/// Checks types, required columns, NaN and precision targets, collecting
/// every violation before failing. When nothing is violated each column in
/// the precision map is rounded with a fresh compensated rounder.
pub fn validate<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let report = check(df, spec);
    if !report.is_empty() {
        return Err(CleanError::Validation(report));
    }

    let mut out = df.clone();
    for (key, places) in spec.precision_map() {
        let series = df.column(key.as_str())?.as_materialized_series();
        out.with_column(round_series(series, places)?)?;
    }
    Ok(out)
}

/// Runs the rules without rounding.
pub fn check<S>(df: &DataFrame, spec: &S) -> ViolationReport
where
    S: CleaningSpec + ?Sized,
{
    let schema = spec.dtype_map();
    let mut report = ViolationReport::new(spec.name());

    for (key, expected) in schema.iter() {
        match df.column(key.as_str()) {
            Err(_) => report.push(Violation::MissingColumn {
                column: key.clone(),
            }),
            Ok(column) if !expected.matches(column.dtype()) => {
                report.push(Violation::TypeMismatch {
                    column: key.clone(),
                    expected,
                    actual: column.dtype().to_string(),
                });
            }
            Ok(_) => {}
        }
    }

    for key in spec.no_null_cols() {
        let Ok(column) = df.column(key.as_str()) else {
            continue;
        };
        let count = column.null_count();
        if count > 0 {
            report.push(Violation::NullValues {
                column: key,
                count,
                rows: sample_rows(column, |column, idx| {
                    column.get(idx).map(|v| v.is_null()).unwrap_or(false)
                }),
            });
        }
    }

    for (key, declared) in schema.iter() {
        let Ok(column) = df.column(key.as_str()) else {
            continue;
        };
        if !declared.is_float() || column.dtype() != &DataType::Float64 {
            continue;
        }
        let Ok(values) = column.f64() else {
            continue;
        };
        let count = values.into_iter().flatten().filter(|v| v.is_nan()).count();
        if count > 0 {
            report.push(Violation::NanValues {
                column: key.clone(),
                count,
                rows: sample_rows(column, |column, idx| {
                    column
                        .f64()
                        .ok()
                        .and_then(|values| values.get(idx))
                        .is_some_and(f64::is_nan)
                }),
            });
        }
    }

    for key in spec.precision_map().into_keys() {
        let declared = schema.get(key.as_str());
        if let Some(declared) = declared.filter(|declared| *declared != ColumnType::Float64) {
            report.push(Violation::PrecisionOnNonFloat {
                column: key,
                declared,
            });
        }
    }

    report
}

fn sample_rows(column: &Column, matches: impl Fn(&Column, usize) -> bool) -> Vec<usize> {
    (0..column.len())
        .filter(|&idx| matches(column, idx))
        .take(SAMPLE_ROWS)
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use tidyframe_model::ColumnSpecSet;

    use super::*;
    use crate::report::ViolationKind;

    #[test]
    fn collects_every_violation() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![Some(1i64), None, None]).into_column(),
            Series::new("score".into(), vec![1.0, f64::NAN, 2.0]).into_column(),
            Series::new("count".into(), vec!["1", "2", "3"]).into_column(),
        ])
        .unwrap();
        let spec = ColumnSpecSet::builder("t")
            .column("id", ColumnType::Int64)
            .column("score", ColumnType::Float64)
            .column("count", ColumnType::Int64)
            .column("absent", ColumnType::Utf8)
            .required("id")
            .precision("id", 2)
            .build();

        let err = validate(&df, &spec).unwrap_err();
        let report = err.report().expect("validation report");
        let kinds: Vec<ViolationKind> = report.iter().map(Violation::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::TypeMismatch,
                ViolationKind::MissingColumn,
                ViolationKind::NullValues,
                ViolationKind::NanValues,
                ViolationKind::PrecisionOnNonFloat,
            ]
        );
        assert_eq!(
            report.violations[2],
            Violation::NullValues {
                column: "id".into(),
                count: 2,
                rows: vec![1, 2],
            }
        );
    }

    #[test]
    fn rounds_valid_frames() {
        let df = DataFrame::new(vec![
            Series::new("score".into(), vec![Some(91.9999), None, Some(0.125)]).into_column(),
        ])
        .unwrap();
        let spec = ColumnSpecSet::builder("t")
            .column("score", ColumnType::Float64)
            .precision("score", 2)
            .build();
        let out = validate(&df, &spec).unwrap();
        let score = out.column("score").unwrap().f64().unwrap();
        assert_eq!(score.get(0), Some(92.0));
        assert_eq!(score.get(1), None);
        assert!(check(&out, &spec).is_empty());
    }
}
