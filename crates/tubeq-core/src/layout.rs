//! Directory layout and the per-run context handed to every component.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::TubeqConfig;

/// Default root when neither the CLI nor the config names one.
pub const DEFAULT_ROOT: &str = "files";

/// Fixed directory roles under one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    pending: PathBuf,
    downloading: PathBuf,
    finished: PathBuf,
    cookies: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            pending: root.join("pending"),
            downloading: root.join("downloading"),
            finished: root.join("finished"),
            cookies: root.join("cookies"),
            root,
        }
    }

    /// Create every directory that does not exist yet. Existing content is left alone.
    pub fn ensure(&self) -> Result<()> {
        for dir in self.dirs() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn dirs(&self) -> [&Path; 4] {
        [
            &self.pending,
            &self.downloading,
            &self.finished,
            &self.cookies,
        ]
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Input URL lists.
    pub fn pending(&self) -> &Path {
        &self.pending
    }

    /// Scratch area the downloader writes into.
    pub fn downloading(&self) -> &Path {
        &self.downloading
    }

    /// Terminal storage, optionally nested by folder.
    pub fn finished(&self) -> &Path {
        &self.finished
    }

    /// Cookie bundles, one JSON array per file.
    pub fn cookies(&self) -> &Path {
        &self.cookies
    }
}

/// Everything a run needs, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub layout: Layout,
    pub config: Arc<TubeqConfig>,
}

impl RunContext {
    pub fn new(layout: Layout, config: TubeqConfig) -> Self {
        Self {
            layout,
            config: Arc::new(config),
        }
    }

    /// Build from config alone: `root_dir` if set, else `./files`.
    pub fn from_config(config: TubeqConfig) -> Self {
        let root = config
            .root_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        Self::new(Layout::new(root), config)
    }
}
