//! The configuration accessor interface and its owned implementation.

use std::collections::{BTreeMap, BTreeSet};

use crate::converter::Converter;
use crate::types::{ColumnKey, ColumnType, FillValue, SortKey};

/// Ordered canonical schema: every declared column and its target type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(ColumnKey, ColumnType)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a column. Redeclaring a key replaces its type in place.
    pub fn insert(&mut self, key: impl Into<ColumnKey>, column_type: ColumnType) {
        let key = key.into();
        match self.columns.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = column_type,
            None => self.columns.push((key, column_type)),
        }
    }

    pub fn get(&self, key: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, t)| *t)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, ColumnType)> {
        self.columns.iter().map(|(k, t)| (k, *t))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<ColumnKey>> FromIterator<(K, ColumnType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, ColumnType)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (key, column_type) in iter {
            schema.insert(key, column_type);
        }
        schema
    }
}

/// Read-only configuration consumed by the cleaning pipeline.
///
/// Any implementer is interchangeable. Only the rename map and the schema are
/// required; every other accessor defaults to "nothing configured".
///
/// All maps are keyed by [`ColumnKey`], never by raw input name. Every key an
/// accessor mentions must also appear in [`CleaningSpec::dtype_map`].
pub trait CleaningSpec {
    /// Dataset label used in logs and reports.
    fn name(&self) -> &str {
        "dataset"
    }

    /// Column key to raw input column name.
    fn rename_map(&self) -> BTreeMap<ColumnKey, String>;

    /// The canonical schema, in output column order.
    fn dtype_map(&self) -> Schema;

    fn fill_null_map(&self) -> BTreeMap<ColumnKey, FillValue> {
        BTreeMap::new()
    }

    /// Columns missing here use [`Converter::identity`].
    fn converter_map(&self) -> BTreeMap<ColumnKey, Converter> {
        BTreeMap::new()
    }

    /// A row is dropped when every column of any one group is null.
    fn drop_null_subsets(&self) -> Vec<Vec<ColumnKey>> {
        Vec::new()
    }

    /// Row identity groups, applied one after another.
    fn unique_subsets(&self) -> Vec<Vec<ColumnKey>> {
        Vec::new()
    }

    /// Numeric columns summed when duplicate rows merge.
    fn add_on_duplicate_cols(&self) -> BTreeSet<ColumnKey> {
        BTreeSet::new()
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        Vec::new()
    }

    fn no_null_cols(&self) -> BTreeSet<ColumnKey> {
        BTreeSet::new()
    }

    /// Decimal places per float column, applied by compensated rounding.
    fn precision_map(&self) -> BTreeMap<ColumnKey, u32> {
        BTreeMap::new()
    }

    /// Output column names in schema order.
    fn col_names(&self) -> Vec<ColumnKey> {
        self.dtype_map().keys().cloned().collect()
    }
}

/// Owned, shareable [`CleaningSpec`].
#[derive(Debug, Clone, Default)]
pub struct ColumnSpecSet {
    pub name: String,
    pub rename: BTreeMap<ColumnKey, String>,
    pub schema: Schema,
    pub fill_null: BTreeMap<ColumnKey, FillValue>,
    pub converters: BTreeMap<ColumnKey, Converter>,
    pub drop_null_subsets: Vec<Vec<ColumnKey>>,
    pub unique_subsets: Vec<Vec<ColumnKey>>,
    pub aggregate: BTreeSet<ColumnKey>,
    pub sort: Vec<SortKey>,
    pub required: BTreeSet<ColumnKey>,
    pub precision: BTreeMap<ColumnKey, u32>,
}

impl ColumnSpecSet {
    pub fn builder(name: impl Into<String>) -> ColumnSpecSetBuilder {
        ColumnSpecSetBuilder {
            spec: ColumnSpecSet {
                name: name.into(),
                ..ColumnSpecSet::default()
            },
        }
    }
}

impl CleaningSpec for ColumnSpecSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename_map(&self) -> BTreeMap<ColumnKey, String> {
        self.rename.clone()
    }

    fn dtype_map(&self) -> Schema {
        self.schema.clone()
    }

    fn fill_null_map(&self) -> BTreeMap<ColumnKey, FillValue> {
        self.fill_null.clone()
    }

    fn converter_map(&self) -> BTreeMap<ColumnKey, Converter> {
        self.converters.clone()
    }

    fn drop_null_subsets(&self) -> Vec<Vec<ColumnKey>> {
        self.drop_null_subsets.clone()
    }

    fn unique_subsets(&self) -> Vec<Vec<ColumnKey>> {
        self.unique_subsets.clone()
    }

    fn add_on_duplicate_cols(&self) -> BTreeSet<ColumnKey> {
        self.aggregate.clone()
    }

    fn sort_keys(&self) -> Vec<SortKey> {
        self.sort.clone()
    }

    fn no_null_cols(&self) -> BTreeSet<ColumnKey> {
        self.required.clone()
    }

    fn precision_map(&self) -> BTreeMap<ColumnKey, u32> {
        self.precision.clone()
    }
}

/// Fluent construction of a [`ColumnSpecSet`].
///
/// ```
/// use tidyframe_model::{CleaningSpec, ColumnSpecSet, ColumnType};
///
/// let spec = ColumnSpecSet::builder("scores")
///     .column("user_id", ColumnType::Int64)
///     .rename("user_id", "User ID")
///     .column("score", ColumnType::Float64)
///     .aggregate("score")
///     .precision("score", 2)
///     .unique_subset(["user_id"])
///     .required("user_id")
///     .build();
///
/// assert_eq!(spec.col_names().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnSpecSetBuilder {
    spec: ColumnSpecSet,
}

impl ColumnSpecSetBuilder {
    pub fn column(mut self, key: impl Into<ColumnKey>, column_type: ColumnType) -> Self {
        self.spec.schema.insert(key, column_type);
        self
    }

    pub fn rename(mut self, key: impl Into<ColumnKey>, raw_name: impl Into<String>) -> Self {
        self.spec.rename.insert(key.into(), raw_name.into());
        self
    }

    pub fn fill_null(mut self, key: impl Into<ColumnKey>, value: impl Into<FillValue>) -> Self {
        self.spec.fill_null.insert(key.into(), value.into());
        self
    }

    pub fn converter(mut self, key: impl Into<ColumnKey>, converter: impl Into<Converter>) -> Self {
        self.spec.converters.insert(key.into(), converter.into());
        self
    }

    pub fn drop_null_subset<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ColumnKey>,
    {
        self.spec
            .drop_null_subsets
            .push(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn unique_subset<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ColumnKey>,
    {
        self.spec
            .unique_subsets
            .push(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn aggregate(mut self, key: impl Into<ColumnKey>) -> Self {
        self.spec.aggregate.insert(key.into());
        self
    }

    pub fn sort_by(mut self, key: impl Into<ColumnKey>, descending: bool) -> Self {
        self.spec.sort.push(SortKey {
            key: key.into(),
            descending,
        });
        self
    }

    pub fn required(mut self, key: impl Into<ColumnKey>) -> Self {
        self.spec.required.insert(key.into());
        self
    }

    pub fn precision(mut self, key: impl Into<ColumnKey>, places: u32) -> Self {
        self.spec.precision.insert(key.into(), places);
        self
    }

    pub fn build(self) -> ColumnSpecSet {
        self.spec
    }
}
