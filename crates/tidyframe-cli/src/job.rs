//! One input file through the pipeline: read, clean, write.

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tidyframe_core::{CleanError, TracingHook, ViolationReport, run_with_hook};
use tidyframe_ingest::{IngestError, frame_digest, read_raw_csv, write_csv};
use tidyframe_model::CleaningSpec;
use tracing::{info, info_span, warn};

/// Suffix of cleaned output files: `scores.csv` becomes `scores.clean.csv`.
pub const OUTPUT_SUFFIX: &str = "clean.csv";

/// An input file and where its cleaned copy goes (`None` for dry runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanJob {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

impl CleanJob {
    /// Job writing `<stem>.clean.csv` into `output_dir`, or next to the input
    /// when no directory is given.
    pub fn new(input: impl Into<PathBuf>, output_dir: Option<&Path>, dry_run: bool) -> Self {
        let input = input.into();
        let output = (!dry_run).then(|| {
            let dir = output_dir
                .map(Path::to_path_buf)
                .or_else(|| input.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            dir.join(format!("{}.{OUTPUT_SUFFIX}", dataset_name(&input)))
        });
        Self { input, output }
    }

    pub fn dataset(&self) -> String {
        dataset_name(&self.input)
    }
}

/// File stem of `path`, used as the dataset name in logs and summaries.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// Why a job failed.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Clean(#[from] CleanError),
}

impl JobError {
    /// Stable label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ingest(_) => "IngestError",
            Self::Clean(error) => error.kind().label(),
        }
    }

    pub fn report(&self) -> Option<&ViolationReport> {
        match self {
            Self::Clean(error) => error.report(),
            Self::Ingest(_) => None,
        }
    }
}

/// Outcome of one job.
#[derive(Debug)]
pub struct DatasetSummary {
    pub dataset: String,
    pub input: PathBuf,
    /// Written file, when the job succeeded and was not a dry run.
    pub output: Option<PathBuf>,
    pub rows_in: Option<usize>,
    pub rows_out: Option<usize>,
    /// SHA-256 of the cleaned CSV.
    pub digest: Option<String>,
    pub duration_ms: u128,
    pub error: Option<JobError>,
}

impl DatasetSummary {
    fn new(job: &CleanJob) -> Self {
        Self {
            dataset: job.dataset(),
            input: job.input.clone(),
            output: None,
            rows_in: None,
            rows_out: None,
            digest: None,
            duration_ms: 0,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs one job to completion. Failures are recorded in the summary, never
/// propagated, so one bad file cannot stop a batch.
pub fn clean_file<S>(job: &CleanJob, spec: &S) -> DatasetSummary
where
    S: CleaningSpec + ?Sized,
{
    let mut summary = DatasetSummary::new(job);
    let span = info_span!("dataset", dataset = %summary.dataset);
    let _guard = span.enter();
    let start = Instant::now();

    let result = execute(job, spec, &mut summary);
    summary.duration_ms = start.elapsed().as_millis();
    match result {
        Ok(()) => info!(
            dataset = %summary.dataset,
            input_rows = summary.rows_in.unwrap_or_default(),
            output_rows = summary.rows_out.unwrap_or_default(),
            duration_ms = summary.duration_ms,
            "dataset cleaned"
        ),
        Err(error) => {
            warn!(
                dataset = %summary.dataset,
                kind = error.label(),
                duration_ms = summary.duration_ms,
                error = %error,
                "dataset failed"
            );
            summary.error = Some(error);
        }
    }
    summary
}

fn execute<S>(job: &CleanJob, spec: &S, summary: &mut DatasetSummary) -> Result<(), JobError>
where
    S: CleaningSpec + ?Sized,
{
    let raw = read_raw_csv(&job.input)?;
    summary.rows_in = Some(raw.height());

    let hook = TracingHook::new(summary.dataset.clone());
    let cleaned = run_with_hook(&raw, spec, &hook)?;
    summary.rows_out = Some(cleaned.height());
    summary.digest = Some(frame_digest(&cleaned)?);

    if let Some(output) = &job.output {
        write_csv(&cleaned, output)?;
        summary.output = Some(output.clone());
    }
    Ok(())
}

/// Every dataset of one `clean` invocation.
#[derive(Debug)]
pub struct CleanRun {
    pub spec_name: String,
    pub datasets: Vec<DatasetSummary>,
}

impl CleanRun {
    pub fn failures(&self) -> usize {
        self.datasets.iter().filter(|d| !d.is_success()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.failures() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let job = CleanJob::new("/data/in/scores.csv", None, false);
        assert_eq!(job.output, Some(PathBuf::from("/data/in/scores.clean.csv")));

        let job = CleanJob::new("/data/in/scores.csv", Some(Path::new("/out")), false);
        assert_eq!(job.output, Some(PathBuf::from("/out/scores.clean.csv")));

        let job = CleanJob::new("scores.csv", Some(Path::new("/out")), true);
        assert_eq!(job.output, None);
        assert_eq!(job.dataset(), "scores");
    }

    #[test]
    fn test_missing_input_is_recorded() {
        let spec = tidyframe_model::ColumnSpecSet::builder("t").build();
        let job = CleanJob::new("/nonexistent/scores.csv", None, true);
        let summary = clean_file(&job, &spec);
        assert!(!summary.is_success());
        assert_eq!(summary.error.as_ref().map(JobError::label), Some("IngestError"));
        assert_eq!(summary.rows_in, None);
    }
}
