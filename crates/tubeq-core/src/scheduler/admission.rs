//! Load-gated admission: the single control loop that owns the work queue.

use anyhow::Result;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::backoff::Backoff;
use super::job::Job;
use super::pool::JobSink;
use super::sampler::LoadSampler;
use crate::downloader::DownloadOptions;
use crate::layout::RunContext;
use crate::queue::WorkQueue;
use crate::url_model::Mode;

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Queue is empty; nothing more will be submitted.
    Drained,
    /// One record was dequeued and this many jobs were submitted.
    Dispatched { jobs: usize },
    /// Load was too high (or unknown); wait this long before the next tick.
    Throttled { delay: Duration },
}

pub struct AdmissionScheduler<S> {
    queue: WorkQueue,
    sampler: S,
    backoff: Backoff,
    /// Configured modes with repeats removed, in first-seen order.
    modes: Vec<Mode>,
    ctx: Arc<RunContext>,
}

impl<S: LoadSampler> AdmissionScheduler<S> {
    pub fn new(queue: WorkQueue, sampler: S, ctx: Arc<RunContext>) -> Self {
        let backoff = Backoff::new(
            Duration::from_millis(ctx.config.backoff_unit_ms),
            ctx.config.max_backoff_units,
        );
        let mut modes = Vec::with_capacity(ctx.config.modes.len());
        for &mode in &ctx.config.modes {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        Self {
            queue,
            sampler,
            backoff,
            modes,
            ctx,
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Samples load once and either dispatches the head record (one job per
    /// configured mode) or grows the backoff. Never sleeps.
    pub fn tick(&mut self, sink: &mut impl JobSink) -> Result<Tick> {
        if self.queue.is_empty() {
            return Ok(Tick::Drained);
        }

        let threshold = self.ctx.config.cpu_threshold;
        let cpu = match self.sampler.sample() {
            Ok(cpu) => Some(cpu),
            Err(e) => {
                tracing::warn!("cpu sample failed, treating as busy: {}", e);
                None
            }
        };

        let admitted = cpu.is_some_and(|cpu| cpu < threshold);
        if !admitted {
            let delay = self.backoff.grow();
            tracing::debug!(
                cpu = cpu.unwrap_or(f32::NAN),
                threshold,
                delay_ms = delay.as_millis() as u64,
                "throttled"
            );
            return Ok(Tick::Throttled { delay });
        }
        let Some(record) = self.queue.pop_front() else {
            return Ok(Tick::Drained);
        };

        let config = &self.ctx.config;
        let mut jobs = 0;
        for &mode in &self.modes {
            let options = DownloadOptions::build(
                &record,
                mode,
                self.ctx.layout.downloading(),
                &config.downloader,
                &config.extra_args,
            );
            sink.submit(Job::new(record.clone(), options, Arc::clone(&self.ctx)))?;
            jobs += 1;
        }
        self.backoff.reset();
        tracing::debug!(
            url = %record.url(),
            cpu = cpu.unwrap_or_default(),
            jobs,
            remaining = self.queue.len(),
            "dispatched"
        );
        Ok(Tick::Dispatched { jobs })
    }

    /// Ticks until the queue is drained, sleeping through throttled ticks.
    /// Returns the number of jobs submitted.
    pub fn run(&mut self, sink: &mut impl JobSink) -> Result<usize> {
        let mut submitted = 0;
        loop {
            match self.tick(sink)? {
                Tick::Drained => break,
                Tick::Dispatched { jobs } => submitted += jobs,
                Tick::Throttled { delay } => thread::sleep(delay),
            }
        }
        Ok(submitted)
    }
}
