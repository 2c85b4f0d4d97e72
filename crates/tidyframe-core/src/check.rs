//! Spec integrity: every referenced key must be declared in the schema.

use tidyframe_model::{CleaningSpec, ColumnKey};

use crate::error::{CleanError, Result};

/// Fails with [`CleanError::UnknownColumn`] on the first key an accessor
/// mentions that the schema does not declare.
pub fn check_spec<S>(spec: &S) -> Result<()>
where
    S: CleaningSpec + ?Sized,
{
    let schema = spec.dtype_map();
    let references: [(&str, Vec<ColumnKey>); 9] = [
        ("rename_map", spec.rename_map().into_keys().collect()),
        ("fill_null_map", spec.fill_null_map().into_keys().collect()),
        ("converter_map", spec.converter_map().into_keys().collect()),
        (
            "drop_null_subsets",
            spec.drop_null_subsets().into_iter().flatten().collect(),
        ),
        (
            "unique_subsets",
            spec.unique_subsets().into_iter().flatten().collect(),
        ),
        (
            "add_on_duplicate_cols",
            spec.add_on_duplicate_cols().into_iter().collect(),
        ),
        (
            "sort_keys",
            spec.sort_keys().into_iter().map(|sort| sort.key).collect(),
        ),
        ("no_null_cols", spec.no_null_cols().into_iter().collect()),
        ("precision_map", spec.precision_map().into_keys().collect()),
    ];

    for (accessor, keys) in &references {
        if let Some(key) = keys.iter().find(|key| !schema.contains(key.as_str())) {
            return Err(CleanError::unknown(key, *accessor));
        }
    }
    Ok(())
}
