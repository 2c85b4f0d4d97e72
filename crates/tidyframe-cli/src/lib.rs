//! Library side of the `tidyframe` command: logging setup, the ordered
//! worker pool and per-file clean jobs.

pub mod batch;
pub mod job;
pub mod logging;
