//! TOML spec files.
//!
//! ```toml
//! name = "scores"
//!
//! [[columns]]
//! key = "user_id"
//! source = "User ID"
//! type = "int64"
//! required = true
//!
//! [[columns]]
//! key = "score"
//! type = "float64"
//! fill_null = 0.0
//! precision = 2
//! aggregate = true
//!
//! [cleaning]
//! drop_null_subsets = [["user_id"]]
//! unique_subsets = [["user_id"]]
//! sort = [{ key = "user_id" }]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::converter::BuiltinConverter;
use crate::error::{Result, SpecFileError};
use crate::spec::ColumnSpecSet;
use crate::types::{ColumnKey, ColumnType, FillValue, SortKey};

fn default_name() -> String {
    "dataset".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
    #[serde(default)]
    pub cleaning: CleaningSection,
}

/// One `[[columns]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnEntry {
    pub key: ColumnKey,
    /// Raw input column name. Defaults to the key itself.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub fill_null: Option<FillValue>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub converter: Option<BuiltinConverter>,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleaningSection {
    #[serde(default)]
    pub drop_null_subsets: Vec<Vec<ColumnKey>>,
    #[serde(default)]
    pub unique_subsets: Vec<Vec<ColumnKey>>,
    #[serde(default)]
    pub sort: Vec<SortKey>,
}

impl SpecFile {
    /// Parses TOML text. `origin` names the text in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| SpecFileError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Converts to a [`ColumnSpecSet`], rejecting blank and repeated keys.
    ///
    /// References to undeclared keys in `[cleaning]` are left for the
    /// pipeline's integrity check, which names the offending accessor.
    pub fn into_spec(self) -> Result<ColumnSpecSet> {
        let mut seen = BTreeSet::new();
        let mut builder = ColumnSpecSet::builder(self.name);
        for column in self.columns {
            if column.key.is_blank() {
                return Err(SpecFileError::BlankColumnKey);
            }
            if !seen.insert(column.key.clone()) {
                return Err(SpecFileError::DuplicateColumn(column.key));
            }
            let key = column.key;
            builder = builder.column(&key, column.column_type);
            if let Some(source) = column.source {
                builder = builder.rename(&key, source);
            }
            if let Some(value) = column.fill_null {
                builder = builder.fill_null(&key, value);
            }
            if let Some(places) = column.precision {
                builder = builder.precision(&key, places);
            }
            if let Some(converter) = column.converter {
                builder = builder.converter(&key, converter);
            }
            if column.aggregate {
                builder = builder.aggregate(&key);
            }
            if column.required {
                builder = builder.required(&key);
            }
        }
        for group in self.cleaning.drop_null_subsets {
            builder = builder.drop_null_subset(group);
        }
        for group in self.cleaning.unique_subsets {
            builder = builder.unique_subset(group);
        }
        for sort in self.cleaning.sort {
            builder = builder.sort_by(sort.key, sort.descending);
        }
        Ok(builder.build())
    }
}

/// Reads and parses a spec file without converting it.
pub fn read_spec_file(path: &Path) -> Result<SpecFile> {
    let text = std::fs::read_to_string(path).map_err(|source| SpecFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SpecFile::parse(&text, &path.display().to_string())
}

/// Reads a spec file and converts it to a [`ColumnSpecSet`].
pub fn load_spec_file(path: &Path) -> Result<ColumnSpecSet> {
    read_spec_file(path)?.into_spec()
}
