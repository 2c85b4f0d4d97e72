//! Content digests of datasets.

use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};

use crate::table::encode_csv;
use crate::error::Result;

/// SHA-256 of the frame's CSV encoding, as lowercase hex.
///
/// Two frames with the same column names, values and row order have the
/// same digest, so repeated cleaning runs can be compared cheaply.
pub fn frame_digest(df: &DataFrame) -> Result<String> {
    let bytes = encode_csv(df)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
