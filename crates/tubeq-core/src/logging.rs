//! Logging setup: append to a file under the XDG state dir, or fall back to stderr.
//!
//! Events from worker threads carry the thread name (`tubeq-worker-N`) so
//! interleaved jobs can be told apart in the log.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,tubeq=debug";

/// One writer per event: a handle on the shared log file, or stderr if the
/// handle could not be duplicated.
enum LogSink {
    File(File),
    Stderr,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install(writer: BoxMakeWriter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_thread_names(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))
}

/// `$XDG_STATE_HOME/tubeq/tubeq.log` (usually `~/.local/state/tubeq/tubeq.log`).
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tubeq")?;
    Ok(xdg_dirs.get_state_home().join("tubeq").join("tubeq.log"))
}

/// Logs to the state-dir file and returns its path. On failure (e.g. an
/// unwritable home) nothing is installed and the caller can use
/// [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;

    install(BoxMakeWriter::new(LogFile(file)))?;
    tracing::info!("tubeq logging initialized at {}", path.display());
    Ok(path)
}

/// Logs to stderr only. Never fails: if a subscriber is already installed it
/// stays in place and this is a no-op. Returns whether this call installed one.
pub fn init_logging_stderr() -> bool {
    install(BoxMakeWriter::new(io::stderr)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_is_namespaced() {
        if let Ok(path) = log_path() {
            assert!(path.ends_with("tubeq/tubeq.log"));
        }
    }

    #[test]
    fn second_stderr_install_is_a_no_op() {
        init_logging_stderr();
        assert!(!init_logging_stderr());
        tracing::debug!("still logging");
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
