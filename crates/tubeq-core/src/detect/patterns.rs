//! Ordered line patterns for the downloader's log output.

use regex::Regex;
use std::sync::LazyLock;

/// What a matched line says about the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Separate streams were merged into the final container.
    Merged,
    /// The file was already in place from an earlier run.
    AlreadyDownloaded,
    /// Audio extraction target.
    AudioDestination,
    /// Any destination line.
    Destination,
}

/// A matched line: which pattern fired and the path text it captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMatch {
    pub kind: PatternKind,
    pub text: String,
}

/// Most specific first; the first hit wins.
static PATTERNS: LazyLock<[(Regex, PatternKind); 4]> = LazyLock::new(|| {
    [
        (
            Regex::new(r#"Merging formats into "(.*)""#).unwrap(),
            PatternKind::Merged,
        ),
        (
            Regex::new(r"^\[download\] (.*?) has already been downloaded").unwrap(),
            PatternKind::AlreadyDownloaded,
        ),
        (
            Regex::new(r"Destination: (.*mp3)").unwrap(),
            PatternKind::AudioDestination,
        ),
        (
            Regex::new(r"Destination: (.*)").unwrap(),
            PatternKind::Destination,
        ),
    ]
});

/// Classifies one output line against the ordered pattern list.
pub fn classify(line: &str) -> Option<LogMatch> {
    PATTERNS.iter().find_map(|(re, kind)| {
        re.captures(line).and_then(|c| c.get(1)).map(|m| LogMatch {
            kind: *kind,
            text: m.as_str().to_string(),
        })
    })
}
