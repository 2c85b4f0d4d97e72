//! Stage 3: replace nulls with configured defaults.

use polars::prelude::{DataFrame, DataType, NamedFrom, Series};
use tidyframe_model::{CleaningSpec, FillValue};

use crate::error::Result;

/// Fills nulls in every column that has a default.
///
/// The default is never coerced here. A column whose dtype already matches
/// the default takes it as is, and a column of untyped nulls takes the
/// default's own type. Any other column is brought to text and receives the
/// default's text, so Convert's strict cast judges filled and original cells
/// alike.
pub fn fill_null<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let mut out = df.clone();
    for (key, value) in spec.fill_null_map() {
        let Ok(column) = df.column(key.as_str()) else {
            continue;
        };
        if column.null_count() == 0 {
            continue;
        }
        let filled = fill_series(column.as_materialized_series(), &value)?;
        out.with_column(filled)?;
    }
    Ok(out)
}

fn fill_series(series: &Series, value: &FillValue) -> Result<Series> {
    let name = series.name().clone();
    let len = series.len();
    let filled = match series.dtype() {
        DataType::Null => value.broadcast(name, len),
        dtype if *dtype == value.dtype() => {
            series.zip_with(&series.is_not_null(), &value.broadcast(name, len))?
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            let fill = Series::new(name, vec![value.text(); len]);
            text.zip_with(&text.is_not_null(), &fill)?
        }
    };
    Ok(filled)
}
