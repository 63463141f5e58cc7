//! Completion detection: match downloader output to a file on disk.
//!
//! Output lines are consumed oldest first (stdout, then stderr). Each line is
//! classified by [`classify`]; a match only counts if the named file exists in
//! the downloading directory and, when the artifact already expects an
//! extension, carries that extension. The first accepted line resolves the
//! artifact and scanning stops. If nothing is accepted the artifact stays
//! pending.

mod patterns;

pub use patterns::{classify, LogMatch, PatternKind};

use std::fs;
use std::path::Path;

use crate::artifact::{ArtifactFile, ArtifactState};
use crate::downloader::CapturedOutput;

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
}

/// Scans `output` and resolves `artifact` against `downloading`. Returns true
/// if the artifact moved to `Resolved`.
pub fn detect(artifact: &mut ArtifactFile, mut output: CapturedOutput, downloading: &Path) -> bool {
    if artifact.state() != ArtifactState::Pending {
        return false;
    }
    while let Some(line) = output.pop_line() {
        let Some(m) = classify(&line) else {
            continue;
        };
        let candidate = m.text.trim().trim_matches('"');
        let Some(filename) = Path::new(candidate)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };

        let size = match fs::metadata(downloading.join(&filename)) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                tracing::debug!(kind = ?m.kind, file = %filename, "matched line names no file");
                continue;
            }
        };
        let extension = extension_of(&filename);
        if let Some(expected) = &artifact.extension {
            let ok = extension
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(expected));
            if !ok {
                tracing::debug!(file = %filename, expected = %expected, "extension mismatch");
                continue;
            }
        }

        tracing::debug!(
            url = %artifact.source_url,
            mode = %artifact.mode,
            kind = ?m.kind,
            file = %filename,
            size,
            "artifact resolved"
        );
        return artifact.resolve(filename, extension, size);
    }

    tracing::debug!(url = %artifact.source_url, mode = %artifact.mode, "output exhausted");
    false
}
