//! Stage-call seam for cross-cutting wrappers such as logging and timing.

use polars::prelude::DataFrame;

use crate::error::{CleanError, Result};
use crate::pipeline::Stage;

/// The call a hook wraps: one stage applied to its input.
pub type StageCall<'a> = &'a dyn Fn(&DataFrame) -> Result<DataFrame>;

/// Observes or wraps each stage call of a run.
///
/// Implement the three callbacks to observe, or override [`StageHook::wrap`]
/// to surround the call itself. A hook must not alter the stage's result.
pub trait StageHook {
    fn before_stage(&self, _stage: Stage, _input: &DataFrame) {}

    fn after_stage(&self, _stage: Stage, _input: &DataFrame, _output: &DataFrame) {}

    fn on_failure(&self, _stage: Stage, _error: &CleanError) {}

    fn wrap(&self, stage: Stage, input: &DataFrame, call: StageCall<'_>) -> Result<DataFrame> {
        self.before_stage(stage, input);
        match call(input) {
            Ok(output) => {
                self.after_stage(stage, input, &output);
                Ok(output)
            }
            Err(error) => {
                self.on_failure(stage, &error);
                Err(error)
            }
        }
    }
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl StageHook for NoopHook {}

impl<H: StageHook + ?Sized> StageHook for &H {
    fn before_stage(&self, stage: Stage, input: &DataFrame) {
        (**self).before_stage(stage, input);
    }

    fn after_stage(&self, stage: Stage, input: &DataFrame, output: &DataFrame) {
        (**self).after_stage(stage, input, output);
    }

    fn on_failure(&self, stage: Stage, error: &CleanError) {
        (**self).on_failure(stage, error);
    }

    fn wrap(&self, stage: Stage, input: &DataFrame, call: StageCall<'_>) -> Result<DataFrame> {
        (**self).wrap(stage, input, call)
    }
}
