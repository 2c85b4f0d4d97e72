//! Stage 7: stable multi-key sort.

use std::cmp::Ordering;

use polars::prelude::{AnyValue, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tidyframe_common::CellKey;
use tidyframe_model::CleaningSpec;

use crate::error::Result;

/// Sorts by the configured keys, primary first. Rows equal on every key keep
/// their input order. Nulls come first in either direction.
pub fn sort<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let sort_keys = spec.sort_keys();
    if sort_keys.is_empty() || df.height() < 2 {
        return Ok(df.clone());
    }

    let mut keyed: Vec<(Vec<CellKey>, bool)> = Vec::with_capacity(sort_keys.len());
    for sort_key in &sort_keys {
        let column = df.column(sort_key.key.as_str())?;
        let cells = (0..df.height())
            .map(|idx| CellKey::from(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        keyed.push((cells, sort_key.descending));
    }

    let mut order: Vec<usize> = (0..df.height()).collect();
    order.sort_by(|&a, &b| {
        keyed
            .iter()
            .map(|(cells, descending)| compare(&cells[a], &cells[b], *descending))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    let indices: Vec<IdxSize> = order.into_iter().map(|idx| idx as IdxSize).collect();
    Ok(df.take(&IdxCa::from_vec("order".into(), indices))?)
}

fn compare(a: &CellKey, b: &CellKey, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) if descending => b.cmp(a),
        (false, false) => a.cmp(b),
    }
}
