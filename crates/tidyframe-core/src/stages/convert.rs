//! Stage 4: per-column converter, then a strict cast to the declared type.

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, PlSmallStr, Series};
use tidyframe_common::{
    InvalidValue, cell_text, coerce_bool, coerce_f64, coerce_i64, coerce_string,
};
use tidyframe_model::{CleaningSpec, ColumnKey, ColumnType, Converter};

use crate::error::{CleanError, Result};

/// Converts every declared column to its declared type.
///
/// NaN produced by the input or the converter becomes null. The first value
/// that cannot be cast fails the stage with its row index.
pub fn convert<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let converters = spec.converter_map();
    let identity = Converter::identity();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for (key, column_type) in spec.dtype_map().iter() {
        let Ok(column) = df.column(key.as_str()) else {
            continue;
        };
        let series = column.as_materialized_series();
        let converter = converters.get(key).unwrap_or(&identity);
        let converted = converter.apply(series).map_err(|err| {
            CleanError::conversion(
                key,
                None,
                format!("converter '{}' failed: {err}", converter.name()),
            )
        })?;
        if converted.len() != series.len() {
            return Err(CleanError::conversion(
                key,
                None,
                format!(
                    "converter '{}' returned {} values for {} rows",
                    converter.name(),
                    converted.len(),
                    series.len()
                ),
            ));
        }
        let cast = cast_series(&converted, key, column_type)?;
        columns.push(cast.into_column());
    }

    Ok(DataFrame::new(columns)?)
}

/// Strict value-by-value cast. The result is named after `key`.
pub fn cast_series(series: &Series, key: &ColumnKey, target: ColumnType) -> Result<Series> {
    let name: PlSmallStr = key.as_str().into();
    let len = series.len();
    let value_at = |idx: usize| series.get(idx).unwrap_or(AnyValue::Null);
    let fail = |idx: usize| {
        CleanError::conversion(
            key,
            Some(idx),
            format!(
                "value '{}' is not a valid {target}",
                cell_text(value_at(idx))
            ),
        )
    };

    let cast = match target {
        ColumnType::Utf8 => {
            let values: Vec<Option<String>> =
                (0..len).map(|idx| coerce_string(value_at(idx))).collect();
            Series::new(name, values)
        }
        ColumnType::Int64 => {
            Series::new(name, collect_strict(len, value_at, coerce_i64).map_err(fail)?)
        }
        ColumnType::Float64 => {
            Series::new(name, collect_strict(len, value_at, coerce_f64).map_err(fail)?)
        }
        ColumnType::Boolean => {
            Series::new(name, collect_strict(len, value_at, coerce_bool).map_err(fail)?)
        }
    };
    Ok(cast)
}

/// Coerces every value, returning the first failing row on error.
fn collect_strict<'a, T>(
    len: usize,
    value_at: impl Fn(usize) -> AnyValue<'a>,
    coerce: fn(AnyValue<'a>) -> std::result::Result<Option<T>, InvalidValue>,
) -> std::result::Result<Vec<Option<T>>, usize> {
    (0..len)
        .map(|idx| coerce(value_at(idx)).map_err(|_| idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;
    use tidyframe_model::{BuiltinConverter, ColumnSpecSet};

    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("id".into(), vec![Some("1"), Some(" 2 "), None]).into_column(),
            Series::new("score".into(), vec![Some("1.5"), Some("NaN"), Some("3")]).into_column(),
            Series::new("name".into(), vec![Some("  Ada "), Some("BOB"), None]).into_column(),
            Series::new("ok".into(), vec![Some("yes"), Some("0"), Some("False")]).into_column(),
        ])
        .unwrap()
    }

    fn spec() -> ColumnSpecSet {
        ColumnSpecSet::builder("t")
            .column("id", ColumnType::Int64)
            .column("score", ColumnType::Float64)
            .column("name", ColumnType::Utf8)
            .column("ok", ColumnType::Boolean)
            .converter("name", BuiltinConverter::Lowercase)
            .build()
    }

    #[test]
    fn casts_every_declared_column() {
        let out = convert(&frame(), &spec()).unwrap();
        assert_eq!(out.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("id").unwrap().i64().unwrap().get(1), Some(2));
        let score = out.column("score").unwrap().f64().unwrap();
        assert_eq!(score.get(0), Some(1.5));
        assert_eq!(score.get(1), None);
        let name = out.column("name").unwrap().str().unwrap();
        assert_eq!(name.get(0), Some("ada"));
        assert_eq!(name.get(1), Some("bob"));
        let ok = out.column("ok").unwrap().bool().unwrap();
        assert_eq!(ok.get(0), Some(true));
        assert_eq!(ok.get(2), Some(false));
    }

    #[test]
    fn reports_offending_row_and_value() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec!["1", "2", "two"]).into_column(),
        ])
        .unwrap();
        let spec = ColumnSpecSet::builder("t")
            .column("id", ColumnType::Int64)
            .build();
        let err = convert(&df, &spec).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type conversion failed for column 'id' at row 2: value 'two' is not a valid int64"
        );
    }

    #[test]
    fn fractional_values_do_not_become_integers() {
        let series = Series::new("n".into(), vec![1.0f64, 2.5]);
        let err = cast_series(&series, &"n".into(), ColumnType::Int64).unwrap_err();
        assert!(matches!(err, CleanError::TypeConversion { row: Some(1), .. }));
    }

    #[test]
    fn converter_must_preserve_length() {
        let df =
            DataFrame::new(vec![Series::new("x".into(), vec!["a", "b"]).into_column()]).unwrap();
        let spec = ColumnSpecSet::builder("t")
            .column("x", ColumnType::Utf8)
            .converter(
                "x",
                Converter::new("head", |s: &Series| Ok(s.head(Some(1)))),
            )
            .build();
        let err = convert(&df, &spec).unwrap_err();
        assert!(err.to_string().ends_with("converter 'head' returned 1 values for 2 rows"));
    }
}
