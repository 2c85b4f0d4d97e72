//! Header and cell normalization.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Trims a header and collapses inner whitespace runs to one space.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims a cell. Blank cells are null.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches('\u{feff}').trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalizes a header row, rejecting blank and repeated names.
pub fn normalize_headers<'a>(
    raw: impl IntoIterator<Item = &'a str>,
    path: &Path,
) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::new();
    for (index, value) in raw.into_iter().enumerate() {
        let header = normalize_header(value);
        if header.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(header.clone()) {
            return Err(IngestError::DuplicateColumnName {
                path: path.to_path_buf(),
                column: header,
            });
        }
        headers.push(header);
    }
    Ok(headers)
}
