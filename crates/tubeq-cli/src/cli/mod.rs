//! CLI for tubeq.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;
use tubeq_core::config::{self, TubeqConfig};
use tubeq_core::layout::{Layout, RunContext};
use tubeq_core::scheduler::WatchSchedule;
use tubeq_core::url_model::Mode;

use commands::{run_completions, run_init, run_list, run_man, run_queue};

/// Top-level CLI for tubeq.
#[derive(Debug, Parser)]
#[command(name = "tubeq", version)]
#[command(
    about = "tubeq: load-aware download queue for yt-dlp style downloaders",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create the pending/downloading/finished/cookies directories.
    Init {
        /// Root of the directory layout (default: config `root_dir`, else ./files).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Show the records that `run` would queue, without downloading.
    List {
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Also print the downloader command line for each mode.
        #[arg(long)]
        commands: bool,
    },

    /// Ingest pending lists and download everything, gated on CPU load.
    Run {
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Worker threads running the downloader.
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Dispatch only while CPU usage (percent) is below this.
        #[arg(long, value_name = "PCT")]
        threshold: Option<f32>,
        /// Mode to download; repeat for several (default: config `modes`).
        #[arg(long = "mode", value_name = "MODE")]
        modes: Vec<Mode>,
        /// Keep running: re-ingest and drain every SECS seconds
        /// (default: config `watch_interval_secs`).
        #[arg(long, value_name = "SECS", num_args = 0..=1)]
        watch: Option<Option<u64>>,
        /// With --watch, stop after this many cycles.
        #[arg(long, value_name = "N", requires = "watch")]
        cycles: Option<usize>,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

fn context(cfg: TubeqConfig, root: Option<PathBuf>) -> RunContext {
    match root {
        Some(root) => RunContext::new(Layout::new(root), cfg),
        None => RunContext::from_config(cfg),
    }
}

fn load_config() -> Result<TubeqConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().command.run()
    }

    pub fn run(self) -> Result<()> {
        match self {
            CliCommand::Init { root } => run_init(&context(load_config()?, root))?,
            CliCommand::List { root, commands } => {
                run_list(&context(load_config()?, root), commands)?
            }
            CliCommand::Run {
                root,
                workers,
                threshold,
                modes,
                watch,
                cycles,
            } => {
                let mut cfg = load_config()?;
                if let Some(n) = workers {
                    cfg.workers = n;
                }
                if let Some(pct) = threshold {
                    cfg.cpu_threshold = pct;
                }
                if !modes.is_empty() {
                    cfg.modes = modes;
                }
                let schedule = watch.map(|secs| WatchSchedule {
                    interval: Duration::from_secs(secs.unwrap_or(cfg.watch_interval_secs)),
                    max_cycles: cycles,
                });
                run_queue(context(cfg, root), schedule)?;
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
