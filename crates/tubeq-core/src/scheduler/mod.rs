//! Job scheduling: the admission loop, the worker pool, and the jobs they run.
//!
//! One control thread drains the work queue, dispatching the head record only
//! while CPU load is below the threshold and backing off otherwise. Each
//! dispatched record becomes one job per mode, executed on a fixed pool of
//! worker threads. Workers never look at load themselves. [`watch`] repeats
//! the whole ingest and drain on a fixed interval.

mod admission;
mod backoff;
mod job;
mod pool;
mod sampler;
mod watch;

pub use admission::{AdmissionScheduler, Tick};
pub use backoff::Backoff;
pub use job::{Job, JobError, JobReport};
pub use pool::{JobSink, WorkerPool};
pub use sampler::{LoadSampler, SampleError, SysinfoSampler};
pub use watch::{run_pending, watch, WatchSchedule};

use anyhow::Result;
use std::sync::Arc;

use crate::layout::RunContext;
use crate::queue::WorkQueue;
use crate::url_model::UrlRecord;

/// Schedules every record, waits for all jobs, and returns their reports.
pub fn run_records<S: LoadSampler>(
    ctx: Arc<RunContext>,
    records: Vec<UrlRecord>,
    sampler: S,
) -> Result<Vec<JobReport>> {
    let mut pool = WorkerPool::new(ctx.config.workers, ctx.config.intake_capacity)?;
    let queue = WorkQueue::new(records);
    let mut scheduler = AdmissionScheduler::new(queue, sampler, Arc::clone(&ctx));
    let submitted = scheduler.run(&mut pool);
    let reports = pool.join();
    let submitted = submitted?;

    let moved = reports.iter().filter(|r| r.outcome.is_ok()).count();
    tracing::info!(
        submitted,
        moved,
        failed = reports.len() - moved,
        "all jobs finished"
    );
    Ok(reports)
}
