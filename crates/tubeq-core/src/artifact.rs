//! Per (url, mode) tracking of the file a download produced.

use std::fmt;

use crate::url_model::{Mode, UrlRecord};

/// Lifecycle of one artifact: `Pending -> Resolved -> Moved | MoveFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactState {
    /// Worker started; no output line has been matched to an existing file yet.
    Pending,
    /// The downloader's output named a file that exists in the downloading dir.
    Resolved,
    Moved,
    MoveFailed,
}

impl ArtifactState {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactState::Pending => "pending",
            ArtifactState::Resolved => "resolved",
            ArtifactState::Moved => "moved",
            ArtifactState::MoveFailed => "move_failed",
        }
    }
}

impl fmt::Display for ArtifactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work-tracking record correlating one URL and mode with the file it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub source_url: String,
    pub mode: Mode,
    pub requested_name: Option<String>,
    pub folder: Option<String>,
    /// Expected extension without the dot. Preset to `mp3` in audio mode.
    pub extension: Option<String>,
    pub resolved_filename: Option<String>,
    pub size: Option<u64>,
    state: ArtifactState,
}

impl ArtifactFile {
    pub fn new(record: &UrlRecord, mode: Mode) -> Self {
        Self {
            source_url: record.url().to_string(),
            mode,
            requested_name: record.custom_name().map(str::to_string),
            folder: record.custom_folder().map(str::to_string),
            extension: (mode == Mode::Audio).then(|| "mp3".to_string()),
            resolved_filename: None,
            size: None,
            state: ArtifactState::Pending,
        }
    }

    pub fn state(&self) -> ArtifactState {
        self.state
    }

    /// Pending -> Resolved. Ignored in any other state.
    pub fn resolve(&mut self, filename: String, extension: Option<String>, size: u64) -> bool {
        if self.state != ArtifactState::Pending {
            return false;
        }
        if self.extension.is_none() {
            self.extension = extension;
        }
        self.resolved_filename = Some(filename);
        self.size = Some(size);
        self.state = ArtifactState::Resolved;
        true
    }

    pub(crate) fn mark_moved(&mut self) {
        self.state = ArtifactState::Moved;
    }

    pub(crate) fn mark_move_failed(&mut self) {
        self.state = ArtifactState::MoveFailed;
    }
}
