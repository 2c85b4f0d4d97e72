//! Dataset export as CSV.

use std::path::Path;

use csv::WriterBuilder;
use polars::prelude::{AnyValue, DataFrame};
use tidyframe_common::cell_text;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Encodes a frame as CSV bytes: a header row, then one record per row.
///
/// Nulls are written as empty cells and floats without trailing zeros.
pub fn encode_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let encode_err = |e: csv::Error| IngestError::CsvEncode {
        message: e.to_string(),
    };

    writer
        .write_record(df.get_column_names_str())
        .map_err(encode_err)?;
    let columns = df.get_columns();
    let mut record: Vec<String> = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        record.extend(
            columns
                .iter()
                .map(|column| cell_text(column.get(idx).unwrap_or(AnyValue::Null))),
        );
        writer.write_record(&record).map_err(encode_err)?;
    }

    writer.into_inner().map_err(|e| IngestError::CsvEncode {
        message: e.to_string(),
    })
}

/// Writes a frame to `path` as CSV, replacing any existing file.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let bytes = encode_csv(df)?;
    std::fs::write(path, &bytes).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        bytes = bytes.len(),
        "wrote csv"
    );
    Ok(())
}
