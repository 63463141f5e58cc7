//! Text captured from one downloader invocation.

use std::collections::VecDeque;
use std::process::Output;

/// Stdout and stderr lines of one child process, plus how it exited.
///
/// Lines are consumed front to back: stdout first, then stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    lines: VecDeque<String>,
    errors: VecDeque<String>,
    exit_code: Option<i32>,
    success: bool,
}

fn split_lines(bytes: &[u8]) -> VecDeque<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

impl CapturedOutput {
    /// Captured text with a clean exit; used when replaying saved logs.
    pub fn from_lines<I, S>(lines: I, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            errors: errors.into_iter().map(Into::into).collect(),
            exit_code: Some(0),
            success: true,
        }
    }

    pub fn from_output(output: &Output) -> Self {
        Self {
            lines: split_lines(&output.stdout),
            errors: split_lines(&output.stderr),
            exit_code: output.status.code(),
            success: output.status.success(),
        }
    }

    /// Removes and returns the oldest remaining line.
    pub fn pop_line(&mut self) -> Option<String> {
        self.lines.pop_front().or_else(|| self.errors.pop_front())
    }

    pub fn len(&self) -> usize {
        self.lines.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.errors.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(String::as_str)
    }

    /// Exit code, or None if the child was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn success(&self) -> bool {
        self.success
    }
}
