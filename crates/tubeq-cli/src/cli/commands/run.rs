//! `tubeq run` – ingest, schedule and download everything pending.

use anyhow::Result;
use std::sync::Arc;
use tubeq_core::layout::RunContext;
use tubeq_core::scheduler::{self, JobReport, SysinfoSampler, WatchSchedule};

/// One pass over `pending/`, or a watch loop when `schedule` is set.
pub fn run_queue(ctx: RunContext, schedule: Option<WatchSchedule>) -> Result<()> {
    let ctx = Arc::new(ctx);
    let Some(schedule) = schedule else {
        let reports = scheduler::run_pending(&ctx, SysinfoSampler::new())?;
        if reports.is_empty() {
            println!("Nothing pending in {}.", ctx.layout.pending().display());
        }
        print_reports(&reports);
        return Ok(());
    };

    println!(
        "Watching {} every {}s.",
        ctx.layout.pending().display(),
        schedule.interval.as_secs()
    );
    let cycles = scheduler::watch(ctx, schedule, SysinfoSampler::new, |cycle, reports| {
        println!("-- cycle {}: {} job(s)", cycle, reports.len());
        print_reports(reports);
    });
    tracing::info!(cycles, "watch finished");
    Ok(())
}

fn print_reports(reports: &[JobReport]) {
    for report in reports {
        let detail = match &report.outcome {
            Ok(path) => path.display().to_string(),
            Err(e) => e.to_string(),
        };
        println!(
            "{:<11} {:<5} {:>6.1}s {} {}",
            report.state().as_str(),
            report.mode.as_str(),
            report.elapsed.as_secs_f64(),
            report.url,
            detail
        );
    }
}
