//! Finalizer: move resolved artifacts from the downloading dir into finished storage.
//!
//! The "move" is a copy that keeps content, permission bits, timestamps and
//! (on Unix) ownership. The source is only deleted when `remove_source` is set.
//! Failures leave the artifact in `MoveFailed`; nothing is retried or rolled back.

mod copy;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::artifact::{ArtifactFile, ArtifactState};
use crate::checksum;
use crate::layout::RunContext;

#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("artifact for {url} is {state}, not resolved")]
    NotResolved { url: String, state: ArtifactState },
    #[error("downloaded file {} is missing", .path.display())]
    MissingSource { path: PathBuf },
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("checksum mismatch for {}: source {expected}, copy {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

fn io_err(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> FinalizeError {
    let path = path.to_path_buf();
    move |source| FinalizeError::Io { op, path, source }
}

#[derive(Debug, Clone)]
pub struct Finalizer {
    finished: PathBuf,
    downloading: PathBuf,
    remove_source: bool,
    verify_checksum: bool,
}

impl Finalizer {
    /// Copies from `downloading` into `finished`, retaining sources and skipping checksums.
    pub fn new(finished: impl Into<PathBuf>, downloading: impl Into<PathBuf>) -> Self {
        Self {
            finished: finished.into(),
            downloading: downloading.into(),
            remove_source: false,
            verify_checksum: false,
        }
    }

    pub fn from_context(ctx: &RunContext) -> Self {
        Self::new(ctx.layout.finished(), ctx.layout.downloading())
            .remove_source(ctx.config.remove_source)
            .verify_checksum(ctx.config.verify_checksum)
    }

    pub fn remove_source(mut self, yes: bool) -> Self {
        self.remove_source = yes;
        self
    }

    pub fn verify_checksum(mut self, yes: bool) -> Self {
        self.verify_checksum = yes;
        self
    }

    /// `<finished>/<folder>/<filename>`, or `<finished>/<filename>` without a folder.
    /// None until the artifact has a resolved filename.
    pub fn destination_for(&self, artifact: &ArtifactFile) -> Option<PathBuf> {
        let filename = artifact.resolved_filename.as_deref()?;
        Some(self.destination(artifact.folder.as_deref(), filename))
    }

    fn destination(&self, folder: Option<&str>, filename: &str) -> PathBuf {
        match folder {
            Some(folder) => self.finished.join(folder).join(filename),
            None => self.finished.join(filename),
        }
    }

    /// Moves a `Resolved` artifact into finished storage and returns its new path.
    ///
    /// An artifact in any other state is rejected without changing it. Every
    /// other failure marks the artifact `MoveFailed`.
    pub fn finalize(&self, artifact: &mut ArtifactFile) -> Result<PathBuf, FinalizeError> {
        let filename = match (artifact.state(), artifact.resolved_filename.as_deref()) {
            (ArtifactState::Resolved, Some(name)) => name.to_string(),
            (state, _) => {
                return Err(FinalizeError::NotResolved {
                    url: artifact.source_url.clone(),
                    state,
                })
            }
        };
        let source = self.downloading.join(&filename);
        let destination = self.destination(artifact.folder.as_deref(), &filename);

        match self.transfer(&source, &destination) {
            Ok(bytes) => {
                artifact.mark_moved();
                tracing::debug!(file = %destination.display(), bytes, "copied into finished");
                Ok(destination)
            }
            Err(e) => {
                artifact.mark_move_failed();
                Err(e)
            }
        }
    }

    fn transfer(&self, source: &Path, destination: &Path) -> Result<u64, FinalizeError> {
        if !source.is_file() {
            return Err(FinalizeError::MissingSource {
                path: source.to_path_buf(),
            });
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(io_err("create", parent))?;
        }

        let bytes =
            copy::copy_with_times(source, destination).map_err(io_err("copy", destination))?;
        copy::copy_ownership(source, destination).map_err(io_err("chown", destination))?;

        if self.verify_checksum {
            verify_copy(source, destination)?;
        }

        if self.remove_source {
            fs::remove_file(source).map_err(io_err("remove", source))?;
        }
        Ok(bytes)
    }
}

/// Compares SHA-256 digests of the source and its copy.
fn verify_copy(source: &Path, destination: &Path) -> Result<(), FinalizeError> {
    let expected = checksum::sha256_path(source).map_err(io_err("hash", source))?;
    let actual = checksum::sha256_path(destination).map_err(io_err("hash", destination))?;
    if expected != actual {
        return Err(FinalizeError::ChecksumMismatch {
            path: destination.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}
