//! Stage 2: keep only declared columns, in schema order.

use polars::prelude::DataFrame;
use tidyframe_model::{CleaningSpec, ColumnKey};

use crate::error::Result;

pub fn prune<S>(df: &DataFrame, spec: &S) -> Result<DataFrame>
where
    S: CleaningSpec + ?Sized,
{
    let schema = spec.dtype_map();
    let keep: Vec<&str> = schema
        .keys()
        .map(ColumnKey::as_str)
        .filter(|name| df.column(name).is_ok())
        .collect();
    Ok(df.select(keep)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use tidyframe_model::{ColumnSpecSet, ColumnType};

    use super::*;

    #[test]
    fn drops_undeclared_and_orders_by_schema() {
        let df = DataFrame::new(vec![
            Series::new("b".into(), vec![1i64]).into_column(),
            Series::new("junk".into(), vec![0i64]).into_column(),
            Series::new("a".into(), vec![2i64]).into_column(),
        ])
        .unwrap();
        let spec = ColumnSpecSet::builder("t")
            .column("a", ColumnType::Int64)
            .column("b", ColumnType::Int64)
            .column("absent", ColumnType::Int64)
            .build();
        let out = prune(&df, &spec).unwrap();
        assert_eq!(out.get_column_names_str(), vec!["a", "b"]);
    }
}
