//! CSV tables: reading raw datasets and writing cleaned ones.

mod header;
mod reader;
mod writer;

pub use header::{normalize_cell, normalize_header};
pub use reader::{
    RawTable, parse_raw_table, raw_frame_from_records, read_raw_csv, read_raw_table,
};
pub use writer::{encode_csv, write_csv};
