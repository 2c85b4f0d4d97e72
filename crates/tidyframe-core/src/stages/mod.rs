//! The eight stage functions, in pipeline order.
//!
//! Each stage reads the parts of the cleaning spec it needs and returns a new frame;
//! none of them mutate their input.

mod convert;
mod dedupe;
mod drop_null;
mod fill_null;
mod prune;
mod rename;
mod sort;
mod validate;

pub use convert::{cast_series, convert};
pub use dedupe::deduplicate;
pub use drop_null::drop_null_subsets;
pub use fill_null::fill_null;
pub use prune::prune;
pub use rename::rename;
pub use sort::sort;
pub use validate::{check, validate};
