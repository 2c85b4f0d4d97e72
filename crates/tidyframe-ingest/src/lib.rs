//! Dataset ingestion and export for tidyframe.
//!
//! Raw datasets enter the pipeline as frames whose cells are all strings or
//! null, so every typing decision is left to the cleaning spec. Cleaned
//! frames leave as CSV.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tidyframe_ingest::{read_raw_csv, write_csv};
//!
//! let raw = read_raw_csv(Path::new("scores.csv"))?;
//! write_csv(&raw, Path::new("scores.copy.csv"))?;
//! ```

mod table;
mod digest;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Tables ===
pub use table::{
    RawTable, encode_csv, normalize_cell, normalize_header, parse_raw_table,
    raw_frame_from_records, read_raw_csv, read_raw_table, write_csv,
};

// === Digest ===
pub use digest::frame_digest;
