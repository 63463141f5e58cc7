//! Download worker: runs the external downloader for one record and mode.
//!
//! The child runs synchronously with stdout and stderr captured. A non-zero
//! exit or anything on stderr is logged but does not fail the job; completion
//! detection still runs against whatever was captured. There is no timeout:
//! a hung child holds its worker thread until it exits.

mod capture;
mod options;

pub use capture::CapturedOutput;
pub use options::{DownloadOptions, AUDIO_ARGS, TITLE_TEMPLATE};

use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs the invocation to completion and returns its captured output.
/// Only a failure to start the child is an error.
pub fn run_downloader(options: &DownloadOptions) -> Result<CapturedOutput, WorkerError> {
    tracing::info!(mode = %options.mode, "running {}", options.command_line());

    let output = Command::new(&options.program)
        .args(&options.args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| WorkerError::Spawn {
            program: options.program.clone(),
            source,
        })?;
    let captured = CapturedOutput::from_output(&output);

    if !captured.success() {
        tracing::warn!(
            mode = %options.mode,
            exit_code = ?captured.exit_code(),
            "downloader exited unsuccessfully"
        );
    }
    for line in captured.errors() {
        tracing::debug!(mode = %options.mode, "stderr: {}", line);
    }

    Ok(captured)
}
