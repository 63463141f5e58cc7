//! URL records and download modes.
//!
//! A `UrlRecord` is one accepted input line (or anchor): the URL plus the optional
//! custom name and folder the user asked for. Records are plain values with
//! structural equality so ingestion can deduplicate them.

mod line;
mod sanitize;

pub use line::{parse_line, ParsedLine};
pub use sanitize::{sanitize_component, sanitize_url};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which variant of a URL the downloader is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Video,
    Audio,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Video => "video",
            Mode::Audio => "audio",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Mode::Video),
            "audio" => Ok(Mode::Audio),
            other => Err(format!("unknown mode '{}' (expected video or audio)", other)),
        }
    }
}

/// One URL to download, with optional naming overrides.
///
/// Identity is the full field tuple `(url, custom_name, resolved_filename, custom_folder)`.
/// Everything is fixed at construction except `resolved_filename`, which can be
/// written once after completion detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlRecord {
    url: String,
    custom_name: Option<String>,
    resolved_filename: Option<String>,
    custom_folder: Option<String>,
}

impl UrlRecord {
    /// Record with no naming overrides (e.g. from an HTML anchor).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            custom_name: None,
            resolved_filename: None,
            custom_folder: None,
        }
    }

    /// Record with optional name and folder; empty strings mean "not set".
    pub fn with_overrides(url: impl Into<String>, name: &str, folder: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            url: url.into(),
            custom_name: non_empty(name),
            resolved_filename: None,
            custom_folder: non_empty(folder),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    pub fn custom_folder(&self) -> Option<&str> {
        self.custom_folder.as_deref()
    }

    pub fn resolved_filename(&self) -> Option<&str> {
        self.resolved_filename.as_deref()
    }

    /// Record the filename the downloader produced. Returns false (and changes
    /// nothing) if a filename was already recorded.
    pub fn set_resolved_filename(&mut self, filename: impl Into<String>) -> bool {
        if self.resolved_filename.is_some() {
            return false;
        }
        self.resolved_filename = Some(filename.into());
        true
    }
}

impl From<ParsedLine> for UrlRecord {
    fn from(line: ParsedLine) -> Self {
        UrlRecord::with_overrides(line.url, &line.name, &line.folder)
    }
}

impl fmt::Display for UrlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)?;
        if let Some(name) = &self.custom_name {
            write!(f, " name={}", name)?;
        }
        if let Some(folder) = &self.custom_folder {
            write!(f, " folder={}", folder)?;
        }
        Ok(())
    }
}
