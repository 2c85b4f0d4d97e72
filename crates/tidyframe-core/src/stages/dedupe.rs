//! Stage 6: merge duplicate rows, summing the aggregation columns.

use std::collections::HashMap;

use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, IdxCa, IdxSize, NamedFrom, NewChunkedArray, Series,
};
use tidyframe_common::{CellKey, cell_f64};
use tidyframe_model::{CleaningSpec, ColumnKey, ColumnType};

use crate::error::{CleanError, Result};
use crate::rounding::CompensatedSum;

/// Applies each uniqueness group in turn.
///
/// Rows with equal values across the group merge into the first of them.
/// Aggregation columns outside the group are summed with compensated
/// summation; every other column keeps the first row's value.
pub fn deduplicate<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let schema = spec.dtype_map();
    let aggregate = spec.add_on_duplicate_cols();
    for key in &aggregate {
        if let Some(declared) = schema.get(key.as_str())
            && !declared.is_numeric()
        {
            return Err(CleanError::DuplicateAggregationConflict {
                column: key.clone(),
                declared,
            });
        }
    }

    let mut out = df.clone();
    for group in spec.unique_subsets() {
        if group.is_empty() {
            continue;
        }
        let sums: Vec<&ColumnKey> = aggregate
            .iter()
            .filter(|key| !group.contains(key))
            .collect();
        out = merge_group(&out, &group, &sums)?;
    }
    Ok(out)
}

fn merge_group(df: &DataFrame, group: &[ColumnKey], sums: &[&ColumnKey]) -> Result<DataFrame> {
    let key_columns = group
        .iter()
        .map(|key| df.column(key.as_str()))
        .collect::<std::result::Result<Vec<&Column>, _>>()?;

    let mut index: HashMap<Vec<CellKey>, usize> = HashMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for idx in 0..df.height() {
        let row_key: Vec<CellKey> = key_columns
            .iter()
            .map(|column| CellKey::from(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        match index.get(&row_key) {
            Some(&pos) => members[pos].push(idx),
            None => {
                index.insert(row_key, members.len());
                members.push(vec![idx]);
            }
        }
    }
    if members.len() == df.height() {
        return Ok(df.clone());
    }

    let firsts: Vec<IdxSize> = members.iter().map(|rows| rows[0] as IdxSize).collect();
    let mut merged = df.take(&IdxCa::from_vec("first".into(), firsts))?;
    for key in sums {
        let Ok(column) = df.column(key.as_str()) else {
            continue;
        };
        let summed = sum_members(column, key, &members)?;
        merged.with_column(summed)?;
    }
    Ok(merged)
}

/// One summed value per group; all-null groups stay null.
fn sum_members(column: &Column, key: &ColumnKey, members: &[Vec<usize>]) -> Result<Series> {
    let name = column.name().clone();
    let value_at = |idx: usize| column.get(idx).unwrap_or(AnyValue::Null);
    match column.dtype() {
        DataType::Int64 => {
            let mut totals: Vec<Option<i64>> = Vec::with_capacity(members.len());
            for rows in members {
                let mut total: Option<i64> = None;
                for &idx in rows {
                    let AnyValue::Int64(value) = value_at(idx) else {
                        continue;
                    };
                    let next = total.unwrap_or(0).checked_add(value).ok_or_else(|| {
                        CleanError::conversion(
                            key,
                            Some(rows[0]),
                            format!(
                                "{} sum overflowed while merging {} duplicate rows",
                                ColumnType::Int64,
                                rows.len()
                            ),
                        )
                    })?;
                    total = Some(next);
                }
                totals.push(total);
            }
            Ok(Series::new(name, totals))
        }
        _ => {
            let totals: Vec<Option<f64>> = members
                .iter()
                .map(|rows| {
                    rows.iter()
                        .filter_map(|&idx| cell_f64(value_at(idx)))
                        .collect::<CompensatedSum>()
                        .value()
                })
                .collect();
            Ok(Series::new(name, totals))
        }
    }
}
