//! Property tests for the stage invariants.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;
use tidyframe_core::stages::{deduplicate, drop_null_subsets, sort, validate};
use tidyframe_core::{CompensatedRounder, CompensatedSum, run};
use tidyframe_model::{ColumnSpecSet, ColumnType};

fn ints(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name).unwrap().i64().unwrap().into_iter().collect()
}

fn cells() -> impl Strategy<Value = Vec<(Option<i64>, Option<i64>, Option<i64>)>> {
    prop::collection::vec(
        (
            prop::option::of(0i64..4),
            prop::option::of(0i64..4),
            prop::option::of(-50i64..50),
        ),
        0..40,
    )
}

fn frame(rows: &[(Option<i64>, Option<i64>, Option<i64>)]) -> DataFrame {
    let a: Vec<Option<i64>> = rows.iter().map(|r| r.0).collect();
    let b: Vec<Option<i64>> = rows.iter().map(|r| r.1).collect();
    let n: Vec<Option<i64>> = rows.iter().map(|r| r.2).collect();
    let pos: Vec<i64> = (0..rows.len() as i64).collect();
    DataFrame::new(vec![
        Series::new("a".into(), a).into_column(),
        Series::new("b".into(), b).into_column(),
        Series::new("n".into(), n).into_column(),
        Series::new("pos".into(), pos).into_column(),
    ])
    .unwrap()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

/// Per-key sums of the present values, keys in first-seen order.
fn group_sums(rows: &[(i64, Option<f64>)]) -> Vec<(i64, Option<f64>)> {
    let mut sums: Vec<(i64, Option<f64>)> = Vec::new();
    for &(key, value) in rows {
        let pos = match sums.iter().position(|(k, _)| *k == key) {
            Some(pos) => pos,
            None => {
                sums.push((key, None));
                sums.len() - 1
            }
        };
        if let Some(value) = value {
            sums[pos].1 = Some(sums[pos].1.unwrap_or(0.0) + value);
        }
    }
    sums
}

fn base() -> tidyframe_model::ColumnSpecSetBuilder {
    ColumnSpecSet::builder("prop")
        .column("a", ColumnType::Int64)
        .column("b", ColumnType::Int64)
        .column("n", ColumnType::Int64)
        .column("pos", ColumnType::Int64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn long_rounded_column_tracks_true_sum(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 10_000..10_001),
        precision in 0u32..4,
    ) {
        let mut rounder = CompensatedRounder::new(precision);
        let rounded: CompensatedSum = values.iter().map(|v| rounder.round(*v)).collect();
        let exact: CompensatedSum = values.iter().copied().collect();
        let diff = (rounded.total() - exact.total()).abs();
        prop_assert!(diff < 10f64.powi(-(precision as i32)), "diff {diff}");
    }
}

proptest! {
    #[test]
    fn rounded_sum_tracks_true_sum(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 1..300),
        precision in 0u32..5,
    ) {
        let mut rounder = CompensatedRounder::new(precision);
        let rounded: CompensatedSum = values.iter().map(|v| rounder.round(*v)).collect();
        let exact: CompensatedSum = values.iter().copied().collect();
        let diff = (rounded.total() - exact.total()).abs();
        prop_assert!(diff < 10f64.powi(-(precision as i32)), "diff {diff}");
    }

    #[test]
    fn drop_null_group_order_is_irrelevant(rows in cells()) {
        let df = frame(&rows);
        let forward = base()
            .drop_null_subset(["a", "b"])
            .drop_null_subset(["n"])
            .build();
        let backward = base()
            .drop_null_subset(["n"])
            .drop_null_subset(["b", "a"])
            .build();
        let x = drop_null_subsets(&df, &forward).unwrap();
        let y = drop_null_subsets(&df, &backward).unwrap();
        prop_assert!(x.equals_missing(&y));
        let (a, b, n) = (ints(&x, "a"), ints(&x, "b"), ints(&x, "n"));
        for idx in 0..x.height() {
            prop_assert!(a[idx].is_some() || b[idx].is_some());
            prop_assert!(n[idx].is_some());
        }
    }

    #[test]
    fn sort_is_ordered_and_stable(rows in cells(), descending in any::<bool>()) {
        let df = frame(&rows);
        let spec = base().sort_by("a", descending).build();
        let out = sort(&df, &spec).unwrap();
        let keys = ints(&out, "a");
        let pos = ints(&out, "pos");
        for idx in 1..keys.len() {
            let (prev, next) = (keys[idx - 1], keys[idx]);
            match (prev, next) {
                (Some(_), None) => prop_assert!(false, "null after value at {idx}"),
                (Some(p), Some(n)) if descending => prop_assert!(p >= n),
                (Some(p), Some(n)) => prop_assert!(p <= n),
                _ => {}
            }
            if prev == next {
                prop_assert!(pos[idx - 1] < pos[idx]);
            }
        }
    }

    #[test]
    fn merging_preserves_aggregate_totals(rows in cells()) {
        let df = frame(&rows);
        let spec = base().unique_subset(["a", "b"]).aggregate("n").build();
        let out = deduplicate(&df, &spec).unwrap();

        let before: i64 = ints(&df, "n").into_iter().flatten().sum();
        let after: i64 = ints(&out, "n").into_iter().flatten().sum();
        prop_assert_eq!(before, after);

        let mut seen = std::collections::HashSet::new();
        for key in ints(&out, "a").into_iter().zip(ints(&out, "b")) {
            prop_assert!(seen.insert(key));
        }
        let firsts = ints(&out, "pos");
        prop_assert!(firsts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn merged_float_totals_survive_rounding(
        rows in prop::collection::vec(
            (0i64..6, prop::option::of(-1_000.0f64..1_000.0)),
            0..120,
        ),
        precision in 0u32..5,
    ) {
        let keys: Vec<i64> = rows.iter().map(|r| r.0).collect();
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.1).collect();
        let df = DataFrame::new(vec![
            Series::new("k".into(), keys).into_column(),
            Series::new("x".into(), values).into_column(),
        ])
        .unwrap();
        let spec = ColumnSpecSet::builder("prop")
            .column("k", ColumnType::Int64)
            .column("x", ColumnType::Float64)
            .unique_subset(["k"])
            .aggregate("x")
            .precision("x", precision)
            .build();

        let merged = deduplicate(&df, &spec).unwrap();
        let out = validate(&merged, &spec).unwrap();
        let expected = group_sums(&rows);
        prop_assert_eq!(ints(&out, "k"), expected.iter().map(|e| Some(e.0)).collect::<Vec<_>>());

        // each rounded value moves by at most the carried error on both sides
        let tolerance = 10f64.powi(-(precision as i32)) + 1e-6;
        for (got, (_, want)) in floats(&out, "x").into_iter().zip(&expected) {
            match (got, want) {
                (Some(got), Some(want)) => {
                    prop_assert!((got - want).abs() <= tolerance, "{got} vs {want}");
                }
                (got, want) => prop_assert_eq!(got, *want),
            }
        }
    }

    #[test]
    fn cleaning_is_deterministic(rows in cells()) {
        let df = frame(&rows);
        let spec = base()
            .drop_null_subset(["a"])
            .unique_subset(["a"])
            .aggregate("n")
            .sort_by("b", true)
            .build();
        let first = run(&df, &spec).unwrap();
        let second = run(&df, &spec).unwrap();
        prop_assert!(first.equals_missing(&second));
    }

    #[test]
    fn validate_is_idempotent(
        values in prop::collection::vec(prop::option::of(-500.0f64..500.0), 0..50),
        precision in 0u32..4,
    ) {
        let df = DataFrame::new(vec![Series::new("x".into(), values).into_column()]).unwrap();
        let spec = ColumnSpecSet::builder("prop")
            .column("x", ColumnType::Float64)
            .precision("x", precision)
            .build();
        let once = validate(&df, &spec).unwrap();
        let twice = validate(&once, &spec).unwrap();
        let a = once.column("x").unwrap().f64().unwrap();
        let b = twice.column("x").unwrap().f64().unwrap();
        for (x, y) in a.into_iter().zip(b) {
            match (x, y) {
                (Some(x), Some(y)) => prop_assert!((x - y).abs() < 1e-9),
                (x, y) => prop_assert_eq!(x, y),
            }
        }
    }
}
