//! Stage 5: drop rows where every column of some group is null.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tidyframe_model::CleaningSpec;

use crate::error::Result;

/// Removes every row that is entirely null across at least one configured
/// group. Groups are independent, so their order does not matter. Empty
/// groups never match.
pub fn drop_null_subsets<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let groups = spec.drop_null_subsets();
    let height = df.height();
    let mut drop = vec![false; height];

    for group in groups.iter().filter(|group| !group.is_empty()) {
        let nulls = group
            .iter()
            .map(|key| Ok(df.column(key.as_str())?.is_null()))
            .collect::<Result<Vec<BooleanChunked>>>()?;
        for (idx, dropped) in drop.iter_mut().enumerate() {
            if !*dropped && nulls.iter().all(|mask| is_set(mask, idx)) {
                *dropped = true;
            }
        }
    }

    if !drop.contains(&true) {
        return Ok(df.clone());
    }
    let keep: Vec<bool> = drop.iter().map(|dropped| !dropped).collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}

fn is_set(mask: &BooleanChunked, idx: usize) -> bool {
    mask.get(idx).unwrap_or(false)
}
