use std::path::PathBuf;

use thiserror::Error;

use crate::types::ColumnKey;

/// Errors raised while loading a spec file.
#[derive(Debug, Error)]
pub enum SpecFileError {
    #[error("failed to read spec file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid spec {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(ColumnKey),

    #[error("column key must not be blank")]
    BlankColumnKey,
}

pub type Result<T> = std::result::Result<T, SpecFileError>;
