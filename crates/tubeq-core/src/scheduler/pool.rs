//! Fixed-size pool of OS threads fed through a bounded intake channel.

use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::job::{Job, JobReport};

/// Destination for dispatched jobs.
pub trait JobSink {
    fn submit(&mut self, job: Job) -> Result<()>;
}

/// `workers` threads pull jobs from an intake of `capacity` slots; submission
/// blocks while the intake is full. Reports are collected by [`WorkerPool::join`].
pub struct WorkerPool {
    intake: SyncSender<Job>,
    reports: Receiver<JobReport>,
    handles: Vec<JoinHandle<()>>,
    submitted: usize,
}

impl WorkerPool {
    pub fn new(workers: usize, capacity: usize) -> Result<Self> {
        let (intake, jobs) = mpsc::sync_channel::<Job>(capacity);
        let jobs = Arc::new(Mutex::new(jobs));
        let (report_tx, reports) = mpsc::channel();

        let workers = workers.max(1);
        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let jobs = Arc::clone(&jobs);
            let report_tx = report_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("tubeq-worker-{}", i))
                .spawn(move || loop {
                    let next = match jobs.lock() {
                        Ok(rx) => rx.recv(),
                        Err(_) => break,
                    };
                    let Ok(job) = next else {
                        break;
                    };
                    if report_tx.send(job.run()).is_err() {
                        break;
                    }
                })
                .with_context(|| format!("spawn worker {}", i))?;
            handles.push(handle);
        }
        tracing::debug!(workers, capacity, "worker pool started");

        Ok(Self {
            intake,
            reports,
            handles,
            submitted: 0,
        })
    }

    /// Closes the intake, waits for every worker and returns the reports in
    /// completion order.
    pub fn join(self) -> Vec<JobReport> {
        drop(self.intake);
        for handle in self.handles {
            if let Err(e) = handle.join() {
                tracing::error!("worker panicked: {:?}", e);
            }
        }
        let reports: Vec<JobReport> = self.reports.try_iter().collect();
        if reports.len() < self.submitted {
            tracing::warn!(
                submitted = self.submitted,
                reported = reports.len(),
                "some jobs produced no report"
            );
        }
        reports
    }
}

impl JobSink for WorkerPool {
    fn submit(&mut self, job: Job) -> Result<()> {
        self.intake
            .send(job)
            .map_err(|_| anyhow::anyhow!("worker pool intake closed (all workers exited)"))?;
        self.submitted += 1;
        Ok(())
    }
}
