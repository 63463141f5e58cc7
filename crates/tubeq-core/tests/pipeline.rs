//! End-to-end: pending list -> scheduler -> fake downloader -> detector -> finished/.
#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tubeq_core::artifact::ArtifactState;
use tubeq_core::config::TubeqConfig;
use tubeq_core::ingest;
use tubeq_core::layout::{Layout, RunContext};
use tubeq_core::scheduler::{self, LoadSampler, SampleError};
use tubeq_core::url_model::{Mode, UrlRecord};

struct Idle;

impl LoadSampler for Idle {
    fn sample(&mut self) -> Result<f32, SampleError> {
        Ok(0.0)
    }
}

fn context(root: &Path, downloader: &Path) -> Arc<RunContext> {
    let config = TubeqConfig {
        downloader: downloader.display().to_string(),
        backoff_unit_ms: 1,
        workers: 2,
        ..TubeqConfig::default()
    };
    let ctx = RunContext::new(Layout::new(root), config);
    ctx.layout.ensure().unwrap();
    Arc::new(ctx)
}

#[test]
fn named_record_lands_in_its_folder_as_video_and_audio() {
    let tools = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let script = common::fake_downloader::install(tools.path());
    let ctx = context(root.path(), &script);

    fs::write(
        ctx.layout.pending().join("list.txt"),
        "https://example.com/v,myvideo,clips\n",
    )
    .unwrap();
    let records = ingest::ingest_pending(&ctx).unwrap();
    assert_eq!(
        records,
        vec![UrlRecord::with_overrides("https://example.com/v", "myvideo", "clips")]
    );

    let reports = scheduler::run_records(Arc::clone(&ctx), records, Idle).unwrap();
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.state(), ArtifactState::Moved, "{:?}", report.outcome);
        let expected = match report.mode {
            Mode::Video => "myvideo.mp4",
            Mode::Audio => "myvideo.mp3",
        };
        assert_eq!(report.artifact.resolved_filename.as_deref(), Some(expected));
        assert_eq!(report.artifact.size, Some(10));
        assert_eq!(report.record.resolved_filename(), Some(expected));
        assert_eq!(report.record.custom_name(), Some("myvideo"));
    }

    let clips = ctx.layout.finished().join("clips");
    assert_eq!(fs::read(clips.join("myvideo.mp4")).unwrap(), b"fake media");
    assert_eq!(fs::read(clips.join("myvideo.mp3")).unwrap(), b"fake media");
    assert!(ctx.layout.downloading().join("myvideo.mp4").exists());
}

#[test]
fn unnamed_record_uses_title_and_finished_root() {
    let tools = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let script = common::fake_downloader::install(tools.path());
    let ctx = context(root.path(), &script);

    let records = vec![UrlRecord::new("https://example.com/w")];
    let reports = scheduler::run_records(Arc::clone(&ctx), records, Idle).unwrap();
    assert!(reports.iter().all(|r| r.outcome.is_ok()));
    assert!(ctx.layout.finished().join("title.mp4").is_file());
    assert!(ctx.layout.finished().join("title.mp3").is_file());
}

#[test]
fn downloader_that_prints_nothing_leaves_artifacts_pending() {
    let root = tempfile::tempdir().unwrap();
    let ctx = context(root.path(), Path::new("true"));

    let reports = scheduler::run_records(
        Arc::clone(&ctx),
        vec![UrlRecord::new("https://example.com/x")],
        Idle,
    )
    .unwrap();
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.state(), ArtifactState::Pending);
        assert_eq!(report.record.resolved_filename(), None);
        assert!(matches!(
            report.outcome,
            Err(scheduler::JobError::Unresolved)
        ));
    }
    assert_eq!(fs::read_dir(ctx.layout.finished()).unwrap().count(), 0);
}
