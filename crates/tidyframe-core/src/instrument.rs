//! Tracing instrumentation for pipeline stages.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, debug_span, warn};

use crate::error::Result;
use crate::hook::{StageCall, StageHook};
use crate::pipeline::Stage;

/// Emits one `stage` span per stage call with row counts and duration.
#[derive(Debug, Clone)]
pub struct TracingHook {
    dataset: String,
}

impl TracingHook {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }
}

impl StageHook for TracingHook {
    fn wrap(&self, stage: Stage, input: &DataFrame, call: StageCall<'_>) -> Result<DataFrame> {
        let span = debug_span!("stage", dataset = %self.dataset, stage = stage.name());
        let _guard = span.enter();
        let start = Instant::now();
        match call(input) {
            Ok(output) => {
                debug!(
                    dataset = %self.dataset,
                    stage = stage.name(),
                    input_rows = input.height(),
                    output_rows = output.height(),
                    output_columns = output.width(),
                    duration_ms = start.elapsed().as_millis(),
                    "stage complete"
                );
                Ok(output)
            }
            Err(error) => {
                warn!(
                    dataset = %self.dataset,
                    stage = stage.name(),
                    kind = error.kind().label(),
                    input_rows = input.height(),
                    duration_ms = start.elapsed().as_millis(),
                    error = %error,
                    "stage failed"
                );
                Err(error)
            }
        }
    }
}
