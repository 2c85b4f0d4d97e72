//! Column specification model for tidyframe.
//!
//! A cleaning run is configured by one [`CleaningSpec`] implementer per
//! dataset type. [`ColumnSpecSet`] is the owned implementation, built in code
//! with [`ColumnSpecSet::builder`] or loaded from TOML with
//! [`load_spec_file`].

pub mod converter;
pub mod error;
pub mod file;
pub mod spec;
pub mod types;

pub use converter::{BuiltinConverter, ConvertFn, Converter};
pub use error::SpecFileError;
pub use file::{CleaningSection, ColumnEntry, SpecFile, load_spec_file, read_spec_file};
pub use spec::{CleaningSpec, ColumnSpecSet, ColumnSpecSetBuilder, Schema};
pub use types::{ColumnKey, ColumnType, FillValue, SortKey};
