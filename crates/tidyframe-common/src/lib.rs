//! Shared utilities for tidyframe crates.
//!
//! This crate provides common helpers used across the tidyframe workspace:
//! Polars `AnyValue` extraction, strict value coercion for typed casts, and
//! hashable/orderable cell keys used for deduplication and sorting.

pub mod cell;
pub mod coerce;
pub mod polars;

// flat re-exports for downstream crates
pub use cell::CellKey;
pub use coerce::{InvalidValue, coerce_bool, coerce_f64, coerce_i64, coerce_string};
pub use polars::{cell_f64, cell_text, format_float, parse_bool, parse_number};
