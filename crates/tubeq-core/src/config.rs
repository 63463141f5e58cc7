use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::url_model::Mode;

/// Ingestion options (optional `[ingest]` section in config.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Hosts whose pages are fetched and expanded into the links they contain,
    /// instead of being handed to the downloader directly. Empty = never fetch.
    #[serde(default)]
    pub expand_hosts: Vec<String>,
}

/// Global configuration loaded from `~/.config/tubeq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TubeqConfig {
    /// Dispatch only while CPU utilization (percent) is strictly below this.
    pub cpu_threshold: f32,
    /// Length of one backoff unit in milliseconds.
    pub backoff_unit_ms: u64,
    /// Optional cap on the backoff delay, in units. None = unbounded growth.
    #[serde(default)]
    pub max_backoff_units: Option<u64>,
    /// Number of worker threads running downloader jobs.
    pub workers: usize,
    /// Jobs that may wait in the intake queue before submission blocks.
    pub intake_capacity: usize,
    /// Downloader executable (looked up in PATH unless absolute).
    pub downloader: String,
    /// Extra arguments passed to every downloader invocation, before the URL.
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Modes dispatched per record.
    pub modes: Vec<Mode>,
    /// Delete the source from `downloading/` after a successful copy.
    #[serde(default)]
    pub remove_source: bool,
    /// Compare SHA-256 of source and destination after the copy.
    #[serde(default)]
    pub verify_checksum: bool,
    /// Root of the pending/downloading/finished/cookies layout. None = `./files`.
    #[serde(default)]
    pub root_dir: Option<PathBuf>,
    /// Seconds between `run --watch` cycles when the flag has no value.
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
    #[serde(default)]
    pub ingest: IngestConfig,
}

fn default_watch_interval_secs() -> u64 {
    3600
}

impl Default for TubeqConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: 80.0,
            backoff_unit_ms: 1000,
            max_backoff_units: None,
            workers: 4,
            intake_capacity: 8,
            downloader: "yt-dlp".to_string(),
            extra_args: Vec::new(),
            modes: vec![Mode::Video, Mode::Audio],
            remove_source: false,
            verify_checksum: false,
            root_dir: None,
            watch_interval_secs: default_watch_interval_secs(),
            ingest: IngestConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tubeq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TubeqConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path. Missing keys take their defaults
/// only where marked `#[serde(default)]`.
pub fn load_or_init_at(path: &Path) -> Result<TubeqConfig> {
    if !path.exists() {
        let default_cfg = TubeqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TubeqConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
