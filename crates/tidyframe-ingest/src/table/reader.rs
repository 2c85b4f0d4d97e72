//! CSV file reading into raw, all-text datasets.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use crate::error::{IngestError, Result};

use super::header::{normalize_cell, normalize_headers};

/// A parsed CSV file before it becomes a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// One entry per data row, each exactly `headers.len()` cells long.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Builds a frame of string columns in header order.
    pub fn into_frame(self) -> Result<DataFrame> {
        let mut columns: Vec<Vec<Option<String>>> = self
            .headers
            .iter()
            .map(|_| Vec::with_capacity(self.rows.len()))
            .collect();
        for row in self.rows {
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        let columns: Vec<Column> = self
            .headers
            .iter()
            .zip(columns)
            .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

/// Builds a raw frame from in-memory records, with the same normalization
/// as [`read_raw_csv`]. Short records are padded with nulls.
pub fn raw_frame_from_records<H, R, C>(headers: H, records: R) -> Result<DataFrame>
where
    H: IntoIterator,
    H::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    let raw_headers: Vec<String> = headers
        .into_iter()
        .map(|header| header.as_ref().to_string())
        .collect();
    let origin = Path::new("<records>");
    let headers = normalize_headers(raw_headers.iter().map(String::as_str), origin)?;
    let rows = records
        .into_iter()
        .map(|record| {
            let cells = record.into_iter().map(|cell| normalize_cell(cell.as_ref()));
            fit_row(cells, headers.len())
        })
        .collect();
    RawTable { headers, rows }.into_frame()
}

/// Reads a CSV file into a frame whose cells are all strings or null.
///
/// The first non-blank record is the header. Blank records are skipped,
/// short records are padded with nulls and extra trailing cells dropped.
pub fn read_raw_csv(path: &Path) -> Result<DataFrame> {
    let table = read_raw_table(path)?;
    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.headers.len(),
        "read raw csv"
    );
    table.into_frame()
}

/// Reads a CSV file into a [`RawTable`].
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    parse_raw_table(file, path)
}

/// Parses CSV text from any reader. `path` is only used in errors.
pub fn parse_raw_table<R: Read>(input: R, path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if record.iter().all(|value| normalize_cell(value).is_none()) {
            continue;
        }
        if let Some(names) = headers.as_ref() {
            if record.len() != names.len() {
                ragged += 1;
            }
            rows.push(fit_row(record.iter().map(normalize_cell), names.len()));
        } else {
            headers = Some(normalize_headers(record.iter(), path)?);
        }
    }

    let Some(headers) = headers else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    if ragged > 0 {
        debug!(
            path = %path.display(),
            ragged,
            "records with a different cell count than the header"
        );
    }
    Ok(RawTable { headers, rows })
}

fn fit_row(cells: impl Iterator<Item = Option<String>>, width: usize) -> Vec<Option<String>> {
    let mut row: Vec<Option<String>> = cells.take(width).collect();
    row.resize(width, None);
    row
}
