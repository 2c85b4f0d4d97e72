use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tidyframe_cli::batch::{effective_workers, map_ordered};
use tidyframe_cli::job::{CleanJob, CleanRun, clean_file};
use tidyframe_core::check_spec;
use tidyframe_model::{CleaningSpec, ColumnSpecSet, load_spec_file};
use tracing::{info, info_span};

use crate::cli::{CheckSpecArgs, CleanArgs};

pub fn run_clean(args: &CleanArgs) -> Result<CleanRun> {
    let spec = load_checked_spec(&args.spec)?;
    let run_span = info_span!("clean", spec = %spec.name());
    let _run_guard = run_span.enter();

    if let Some(dir) = &args.output_dir
        && !args.dry_run
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory {}", dir.display()))?;
    }

    let jobs: Vec<CleanJob> = args
        .inputs
        .iter()
        .map(|input| CleanJob::new(input, args.output_dir.as_deref(), args.dry_run))
        .collect();
    let workers = effective_workers(args.jobs, jobs.len());
    let start = Instant::now();
    let datasets = map_ordered(&jobs, workers, |job| clean_file(job, &spec));

    let run = CleanRun {
        spec_name: spec.name().to_string(),
        datasets,
    };
    info!(
        spec = %run.spec_name,
        dataset_count = run.datasets.len(),
        failed = run.failures(),
        workers,
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok(run)
}

pub fn run_check_spec(args: &CheckSpecArgs) -> Result<ColumnSpecSet> {
    load_checked_spec(&args.spec)
}

fn load_checked_spec(path: &Path) -> Result<ColumnSpecSet> {
    let spec = load_spec_file(path).context("load spec")?;
    check_spec(&spec).with_context(|| format!("check spec {}", path.display()))?;
    Ok(spec)
}
