//! Eight-stage cleaning pipeline for tabular datasets.
//!
//! A raw [`DataFrame`](polars::prelude::DataFrame) and a
//! [`CleaningSpec`](tidyframe_model::CleaningSpec) go in; a typed,
//! deduplicated, sorted and validated frame comes out, or a classified
//! [`CleanError`].
//!
//! ```text
//! rename -> prune -> fill_null -> convert -> drop_null_subset
//!        -> deduplicate -> sort -> validate (+ compensated rounding)
//! ```

pub mod check;
pub mod error;
pub mod hook;
pub mod instrument;
pub mod pipeline;
pub mod report;
pub mod rounding;
pub mod stages;

pub use check::check_spec;
pub use error::{CleanError, ErrorKind, Result};
pub use hook::{NoopHook, StageCall, StageHook};
pub use instrument::TracingHook;
pub use pipeline::{CleaningResult, Stage, run, run_with_hook};
pub use report::{Violation, ViolationKind, ViolationReport};
pub use rounding::{CompensatedRounder, CompensatedSum, round_series, round_to};
