//! Stage 1: raw column names to column keys.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, Series};
use tidyframe_model::{CleaningSpec, ColumnKey};

use crate::error::{CleanError, Result};

/// Renames raw columns to their column keys.
///
/// Raw columns without a rename entry are kept for Prune to drop. A renamed
/// column replaces a raw column that already carries the key's name, even
/// when its own source is missing. A declared key with neither a source
/// column nor a fill default is an
/// [`CleanError::UnknownColumn`]; with a fill default it starts out all null.
pub fn rename<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let rename_map = spec.rename_map();
    let schema = spec.dtype_map();
    let fill = spec.fill_null_map();
    let present: BTreeSet<&str> = df.get_column_names_str().into_iter().collect();

    // raw name -> keys taking their values from it
    let mut targets: BTreeMap<&str, Vec<&ColumnKey>> = BTreeMap::new();
    for (key, raw) in &rename_map {
        if present.contains(raw.as_str()) {
            targets.entry(raw.as_str()).or_default().push(key);
        }
    }
    // a key with a rename entry never falls back to a same-named raw column
    let shadowed: BTreeSet<&str> = rename_map.keys().map(ColumnKey::as_str).collect();

    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    let mut emitted: BTreeSet<String> = BTreeSet::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if let Some(keys) = targets.get(name) {
            for key in keys {
                if emitted.insert(key.to_string()) {
                    let mut renamed = column.clone();
                    renamed.rename(key.as_str().into());
                    columns.push(renamed);
                }
            }
            // also the identity source of a declared key without a rename entry
            let identity = schema.contains(name) && !rename_map.contains_key(name);
            if identity && !shadowed.contains(name) && emitted.insert(name.to_string()) {
                columns.push(column.clone());
            }
        } else if !shadowed.contains(name) && emitted.insert(name.to_string()) {
            columns.push(column.clone());
        }
    }

    for key in schema.keys() {
        if emitted.contains(key.as_str()) {
            continue;
        }
        if fill.contains_key(key) {
            let empty = Series::full_null(key.as_str().into(), df.height(), &DataType::Null);
            columns.push(empty.into_column());
            emitted.insert(key.to_string());
            continue;
        }
        let origin = match rename_map.get(key) {
            Some(raw) => format!("rename_map (raw column '{raw}' not found)"),
            None => "dtype_map (no raw column and no fill default)".to_string(),
        };
        return Err(CleanError::unknown(key, origin));
    }

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::NamedFrom;
    use tidyframe_model::{ColumnSpecSet, ColumnType};

    use super::*;

    fn raw() -> DataFrame {
        DataFrame::new(vec![
            Series::new("User ID".into(), vec!["1", "2"]).into_column(),
            Series::new("score".into(), vec!["stale", "stale"]).into_column(),
            Series::new("Score".into(), vec!["5.5", "6.5"]).into_column(),
            Series::new("extra".into(), vec!["x", "y"]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn renamed_column_wins_over_same_named_raw() {
        let spec = ColumnSpecSet::builder("t")
            .column("user_id", ColumnType::Int64)
            .column("score", ColumnType::Float64)
            .rename("user_id", "User ID")
            .rename("score", "Score")
            .build();
        let out = rename(&raw(), &spec).unwrap();
        assert_eq!(out.get_column_names_str(), vec!["user_id", "score", "extra"]);
        let score = out.column("score").unwrap().str().unwrap();
        assert_eq!(score.get(0), Some("5.5"));
    }

    #[test]
    fn identically_named_raw_column_is_used() {
        let spec = ColumnSpecSet::builder("t")
            .column("extra", ColumnType::Utf8)
            .build();
        let out = rename(&raw(), &spec).unwrap();
        assert!(out.column("extra").is_ok());
    }

    #[test]
    fn raw_column_can_feed_two_keys() {
        let spec = ColumnSpecSet::builder("t")
            .column("extra", ColumnType::Utf8)
            .column("copy", ColumnType::Utf8)
            .rename("copy", "extra")
            .build();
        let out = rename(&raw(), &spec).unwrap();
        assert!(out.column("extra").is_ok());
        assert!(out.column("copy").is_ok());
    }

    #[test]
    fn missing_column_with_fill_default_starts_null() {
        let spec = ColumnSpecSet::builder("t")
            .column("flag", ColumnType::Boolean)
            .fill_null("flag", false)
            .build();
        let out = rename(&raw(), &spec).unwrap();
        assert_eq!(out.column("flag").unwrap().null_count(), 2);
    }

    #[test]
    fn missing_source_ignores_same_named_raw_column() {
        let df = DataFrame::new(vec![
            Series::new("age".into(), vec!["41"]).into_column(),
        ])
        .unwrap();
        let spec = ColumnSpecSet::builder("t")
            .column("age", ColumnType::Int64)
            .rename("age", "Age")
            .build();
        let err = rename(&df, &spec).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown column 'age' referenced by rename_map (raw column 'Age' not found)"
        );

        let spec = ColumnSpecSet::builder("t")
            .column("age", ColumnType::Int64)
            .rename("age", "Age")
            .fill_null("age", 0i64)
            .build();
        let out = rename(&df, &spec).unwrap();
        assert_eq!(out.column("age").unwrap().null_count(), 1);
    }

    #[test]
    fn missing_column_without_default_fails() {
        let spec = ColumnSpecSet::builder("t")
            .column("age", ColumnType::Int64)
            .rename("age", "Age")
            .build();
        let err = rename(&raw(), &spec).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown column 'age' referenced by rename_map (raw column 'Age' not found)"
        );
    }
}
