//! The orchestrator: eight stages in fixed order over one dataset.

use std::fmt;

use polars::prelude::DataFrame;
use tidyframe_model::CleaningSpec;

use crate::check::check_spec;
use crate::error::Result;
use crate::hook::{NoopHook, StageHook};
use crate::stages;

/// Outcome of one run: the cleaned frame, or the classified failure.
pub type CleaningResult = Result<DataFrame>;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Rename,
    Prune,
    FillNull,
    Convert,
    DropNullSubset,
    Deduplicate,
    Sort,
    Validate,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Rename,
        Stage::Prune,
        Stage::FillNull,
        Stage::Convert,
        Stage::DropNullSubset,
        Stage::Deduplicate,
        Stage::Sort,
        Stage::Validate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Rename => "rename",
            Stage::Prune => "prune",
            Stage::FillNull => "fill_null",
            Stage::Convert => "convert",
            Stage::DropNullSubset => "drop_null_subset",
            Stage::Deduplicate => "deduplicate",
            Stage::Sort => "sort",
            Stage::Validate => "validate",
        }
    }

    /// Runs this stage alone.
    pub fn apply<S>(self, df: &DataFrame, spec: &S) -> Result<DataFrame>
    where
        S: CleaningSpec + ?Sized,
    {
        match self {
            Stage::Rename => stages::rename(df, spec),
            Stage::Prune => stages::prune(df, spec),
            Stage::FillNull => stages::fill_null(df, spec),
            Stage::Convert => stages::convert(df, spec),
            Stage::DropNullSubset => stages::drop_null_subsets(df, spec),
            Stage::Deduplicate => stages::deduplicate(df, spec),
            Stage::Sort => stages::sort(df, spec),
            Stage::Validate => stages::validate(df, spec),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cleans `raw` with `spec`. No partial result is returned on failure.
pub fn run<S>(raw: &DataFrame, spec: &S) -> CleaningResult
where
    S: CleaningSpec + ?Sized,
{
    run_with_hook(raw, spec, &NoopHook)
}

/// Like [`run`], with every stage call wrapped by `hook`.
///
/// The cleaning spec's integrity is checked before the first stage.
pub fn run_with_hook<S, H>(raw: &DataFrame, spec: &S, hook: &H) -> CleaningResult
where
    S: CleaningSpec + ?Sized,
    H: StageHook + ?Sized,
{
    check_spec(spec)?;
    let mut current = raw.clone();
    for stage in Stage::ALL {
        current = hook.wrap(stage, &current, &|input| stage.apply(input, spec))?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        let mut sorted = Stage::ALL;
        sorted.sort();
        assert_eq!(sorted, Stage::ALL);
        assert_eq!(Stage::ALL[0].to_string(), "rename");
        assert_eq!(Stage::ALL[7].name(), "validate");
    }
}
