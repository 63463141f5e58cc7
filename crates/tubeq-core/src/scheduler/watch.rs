//! Periodic runs: re-ingest `pending/` and drain it, then sleep and repeat.
//!
//! Pending lists are not consumed, so every cycle queues the same records
//! again. The downloader's "already downloaded" output keeps repeat cycles
//! cheap.

use anyhow::Result;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::job::JobReport;
use super::run_records;
use super::sampler::LoadSampler;
use crate::ingest;
use crate::layout::RunContext;

/// Ingests everything in `pending/` and runs it to completion. An empty
/// pending dir yields no reports and starts no workers.
pub fn run_pending<S: LoadSampler>(ctx: &Arc<RunContext>, sampler: S) -> Result<Vec<JobReport>> {
    ctx.layout.ensure()?;
    let records = ingest::ingest_pending(ctx)?;
    if records.is_empty() {
        tracing::info!("nothing pending in {}", ctx.layout.pending().display());
        return Ok(Vec::new());
    }
    run_records(Arc::clone(ctx), records, sampler)
}

/// When to stop a [`watch`] loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSchedule {
    pub interval: Duration,
    /// None = run until the process is killed.
    pub max_cycles: Option<usize>,
}

/// Runs [`run_pending`] once per cycle, sleeping `interval` between cycles.
/// A failed cycle is logged and the loop carries on. `on_cycle` sees the
/// 1-based cycle number and that cycle's reports. Returns the cycles run.
pub fn watch<S, F, R>(
    ctx: Arc<RunContext>,
    schedule: WatchSchedule,
    mut new_sampler: F,
    mut on_cycle: R,
) -> usize
where
    S: LoadSampler,
    F: FnMut() -> S,
    R: FnMut(usize, &[JobReport]),
{
    let mut cycle = 0;
    loop {
        cycle += 1;
        tracing::info!(cycle, "watch cycle starting");
        let reports = run_pending(&ctx, new_sampler()).unwrap_or_else(|e| {
            tracing::warn!(cycle, "watch cycle failed: {:#}", e);
            Vec::new()
        });
        on_cycle(cycle, &reports);

        if schedule.max_cycles.is_some_and(|max| cycle >= max) {
            return cycle;
        }
        tracing::info!(
            cycle,
            next_in_secs = schedule.interval.as_secs(),
            "sleeping until next cycle"
        );
        thread::sleep(schedule.interval);
    }
}
