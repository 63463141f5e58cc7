//! `tubeq list` – show what would be queued.

use anyhow::Result;
use tubeq_core::downloader::DownloadOptions;
use tubeq_core::ingest;
use tubeq_core::layout::RunContext;

pub fn run_list(ctx: &RunContext, show_commands: bool) -> Result<()> {
    ctx.layout.ensure()?;
    let records = ingest::ingest_pending(ctx)?;
    if records.is_empty() {
        println!("Nothing pending in {}.", ctx.layout.pending().display());
        return Ok(());
    }

    println!("{:<16} {:<16} {}", "NAME", "FOLDER", "URL");
    for record in &records {
        println!(
            "{:<16} {:<16} {}",
            record.custom_name().unwrap_or("-"),
            record.custom_folder().unwrap_or("-"),
            record.url()
        );
        if show_commands {
            for &mode in &ctx.config.modes {
                let options = DownloadOptions::build(
                    record,
                    mode,
                    ctx.layout.downloading(),
                    &ctx.config.downloader,
                    &ctx.config.extra_args,
                );
                println!("  {:<5} {}", mode.as_str(), options);
            }
        }
    }
    Ok(())
}
