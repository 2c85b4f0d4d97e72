//! Bounded worker pool for cleaning many datasets with one spec.
//!
//! Each dataset is cleaned by exactly one worker; a dataset is never split
//! across threads. Results come back in input order regardless of which
//! worker finished first.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use polars::prelude::DataFrame;
use tidyframe_core::{CleaningResult, TracingHook, run_with_hook};
use tidyframe_model::CleaningSpec;

/// Worker count for `jobs` items when `requested` workers were asked for.
///
/// Zero means "one per available core". Never more workers than jobs, and
/// never fewer than one.
pub fn effective_workers(requested: usize, jobs: usize) -> usize {
    let requested = if requested == 0 {
        thread::available_parallelism().map_or(1, NonZeroUsize::get)
    } else {
        requested
    };
    requested.min(jobs).max(1)
}

/// Applies `f` to every item on up to `workers` scoped threads and returns
/// the outputs in item order.
pub fn map_ordered<T, R, F>(items: &[T], workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = effective_workers(workers, items.len());
    if workers == 1 {
        return items.iter().map(&f).collect();
    }

    let next = AtomicUsize::new(0);
    let mut slots: Vec<Option<R>> = items.iter().map(|_| None).collect();
    let (sender, receiver) = mpsc::channel::<(usize, R)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let (next, f) = (&next, &f);
            scope.spawn(move || {
                loop {
                    let idx = next.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = items.get(idx) else {
                        break;
                    };
                    if sender.send((idx, f(item))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(sender);
        for (idx, output) in receiver {
            slots[idx] = Some(output);
        }
    });

    slots.into_iter().flatten().collect()
}

/// Cleans in-memory datasets with `spec`, `workers` at a time.
///
/// This is the library entry point for callers that already hold frames. The
/// `clean` command works on files and drives [`map_ordered`] with
/// [`clean_file`](crate::job::clean_file) instead. The cleaning spec is shared
/// read-only by all workers, and entry `i` of the result is the outcome for
/// `datasets[i]`.
pub fn run_batch<S>(datasets: &[DataFrame], workers: usize, spec: &S) -> Vec<CleaningResult>
where
    S: CleaningSpec + Sync + ?Sized,
{
    let hook = TracingHook::new(spec.name());
    map_ordered(datasets, workers, |raw| run_with_hook(raw, spec, &hook))
}
