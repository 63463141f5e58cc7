//! One unit of pool work: download, detect, finalize for a single record and mode.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::artifact::{ArtifactFile, ArtifactState};
use crate::detect;
use crate::downloader::{self, DownloadOptions, WorkerError};
use crate::finalize::{FinalizeError, Finalizer};
use crate::layout::RunContext;
use crate::url_model::{Mode, UrlRecord};

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("no output line named a file in the downloading directory")]
    Unresolved,
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

#[derive(Debug)]
pub struct Job {
    pub record: UrlRecord,
    pub options: DownloadOptions,
    ctx: Arc<RunContext>,
}

/// What happened to one job. `outcome` holds the finished path on success.
/// `record` carries the resolved filename once detection succeeded.
#[derive(Debug)]
pub struct JobReport {
    pub url: String,
    pub mode: Mode,
    pub record: UrlRecord,
    pub artifact: ArtifactFile,
    pub outcome: Result<PathBuf, JobError>,
    pub elapsed: Duration,
}

impl JobReport {
    pub fn state(&self) -> ArtifactState {
        self.artifact.state()
    }
}

impl Job {
    pub fn new(record: UrlRecord, options: DownloadOptions, ctx: Arc<RunContext>) -> Self {
        Self {
            record,
            options,
            ctx,
        }
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// Runs the job to completion on the current thread and logs its outcome.
    pub fn run(mut self) -> JobReport {
        let started = Instant::now();
        let mut artifact = ArtifactFile::new(&self.record, self.options.mode);
        let outcome = self.execute(&mut artifact);
        let elapsed = started.elapsed();

        match &outcome {
            Ok(path) => tracing::info!(
                url = %self.record.url(),
                mode = %self.options.mode,
                file = %path.display(),
                elapsed_ms = elapsed.as_millis() as u64,
                "job finished in {:.1}s",
                elapsed.as_secs_f64()
            ),
            Err(e) => tracing::warn!(
                url = %self.record.url(),
                mode = %self.options.mode,
                state = %artifact.state(),
                elapsed_ms = elapsed.as_millis() as u64,
                "job failed: {}",
                e
            ),
        }

        JobReport {
            url: self.record.url().to_string(),
            mode: self.options.mode,
            record: self.record,
            artifact,
            outcome,
            elapsed,
        }
    }

    fn execute(&mut self, artifact: &mut ArtifactFile) -> Result<PathBuf, JobError> {
        let output = downloader::run_downloader(&self.options)?;
        if !detect::detect(artifact, output, self.ctx.layout.downloading()) {
            return Err(JobError::Unresolved);
        }
        if let Some(filename) = artifact.resolved_filename.clone() {
            self.record.set_resolved_filename(filename);
        }
        Ok(Finalizer::from_context(&self.ctx).finalize(artifact)?)
    }
}
