use std::path::PathBuf;
use std::sync::Arc;

use wcs_index::RecordingObserver;
use wcs_sdk::{
    CommitFlow, ConfigSource, GroupEvent, InMemoryStatusSource, RawStatusRecord, ScmConfig, SdkError,
    StaticConfig, Status, WorkingCopy,
};
use wcs_types::PropStatus;

fn scenario() -> Vec<RawStatusRecord> {
    vec![
        RawStatusRecord::new("x.txt", Status::Modified),
        RawStatusRecord::new("y.txt", Status::Added).in_changelist("feat"),
        RawStatusRecord::new("z.txt", Status::Unversioned),
    ]
}

fn setup(records: Vec<RawStatusRecord>) -> (Arc<InMemoryStatusSource>, Arc<StaticConfig>, WorkingCopy) {
    let source = Arc::new(InMemoryStatusSource::new(records));
    let config = Arc::new(StaticConfig::new(ScmConfig {
        case_insensitive_paths: false,
        ..ScmConfig::default()
    }));
    let wc = WorkingCopy::new("/wc", source.clone(), config.clone());
    (source, config, wc)
}

// ---------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------

#[tokio::test]
async fn refresh_runs_a_full_pass() {
    let (source, _config, wc) = setup(scenario());
    let summary = wc.refresh().await.unwrap();

    assert_eq!(summary.pass, 1);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.changelists, 1);
    assert_eq!(source.fetch_count(), 1);

    let status = wc
        .with_index(|index| index.get_resource_from_file("/wc/y.txt").map(|r| r.status))
        .await;
    assert_eq!(status, Some(Status::Added));
}

#[tokio::test]
async fn config_is_reread_every_pass() {
    let (source, config, wc) = setup(scenario());
    assert_eq!(wc.refresh().await.unwrap().count, 2);

    config.set(ScmConfig {
        count_unversioned: true,
        check_remote_changes: false,
        case_insensitive_paths: false,
        ..ScmConfig::default()
    });
    assert_eq!(wc.refresh().await.unwrap().count, 3);
    assert_eq!(source.last_options().map(|o| o.check_remote_changes), Some(false));
    assert!(wc.with_index(|index| index.remote_changes().is_none()).await);
}

#[tokio::test]
async fn failed_fetch_leaves_index_untouched() {
    let (source, _config, wc) = setup(scenario());
    wc.refresh().await.unwrap();

    source.set_records(Vec::new());
    source.set_failure(Some("working copy locked".into()));
    let err = wc.refresh().await.unwrap_err();
    assert!(matches!(err, SdkError::Source(_)));

    let (count, indexed) = wc
        .with_index(|index| (index.count(), index.resource_map().len()))
        .await;
    assert_eq!(count, 2);
    assert_eq!(indexed, 3);

    source.set_failure(None);
    let summary = wc.refresh().await.unwrap();
    assert_eq!(summary.pass, 2);
    assert_eq!(summary.count, 0);
}

#[tokio::test]
async fn invalid_glob_fails_the_pass() {
    let (source, config, wc) = setup(scenario());
    config.set(ScmConfig {
        ignore: vec!["a[".into()],
        case_insensitive_paths: false,
        ..ScmConfig::default()
    });
    assert!(matches!(wc.refresh().await, Err(SdkError::Config(_))));
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test]
async fn overlapping_refreshes_are_serialized() {
    let (source, _config, wc) = setup(scenario());
    let wc = Arc::new(wc);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let wc = wc.clone();
            tokio::spawn(async move { wc.refresh().await.map(|s| s.pass) })
        })
        .collect();

    let mut passes = Vec::new();
    for handle in handles {
        passes.push(handle.await.unwrap().unwrap());
    }
    passes.sort_unstable();
    assert_eq!(passes, (1..=8).collect::<Vec<u64>>());
    assert_eq!(source.fetch_count(), 8);
}

// ---------------------------------------------------------------
// Externals
// ---------------------------------------------------------------

#[tokio::test]
async fn externals_from_same_upstream_are_combined() {
    let records = vec![
        RawStatusRecord::new("lib", Status::Normal).external_from("svn://host/repo"),
        RawStatusRecord::new("lib/a.rs", Status::Modified),
        RawStatusRecord::new("vendor", Status::Normal).external_from("svn://other/repo"),
        RawStatusRecord::new("vendor/b.rs", Status::Modified),
    ];
    let (source, config, wc) = setup(records);
    source.set_upstream(Some("svn://host/repo".into()));
    config.set(ScmConfig {
        combine_external_if_same_server: true,
        case_insensitive_paths: false,
        ..ScmConfig::default()
    });

    let summary = wc.refresh().await.unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.filtered_out, 3);
    assert!(wc
        .with_index(|index| index.get_resource_from_file("/wc/lib/a.rs").is_some())
        .await);

    // Without an upstream identity nothing is combined.
    source.set_upstream(None);
    assert_eq!(wc.refresh().await.unwrap().count, 0);
}

// ---------------------------------------------------------------
// Commit planning and teardown
// ---------------------------------------------------------------

#[tokio::test]
async fn plan_commit_through_working_copy() {
    let records = vec![
        RawStatusRecord::new("new.rs", Status::Added).renamed_from("old.rs"),
        RawStatusRecord::new("old.rs", Status::Deleted),
        RawStatusRecord::new("w.txt", Status::Normal).with_props(PropStatus::Normal),
    ];
    let (_source, config, wc) = setup(records);
    wc.refresh().await.unwrap();

    let flow = CommitFlow::new(&config_value(&config));
    let plan = wc.plan_commit(&flow, &["/wc/new.rs"]).await.unwrap();
    assert_eq!(
        plan.submitted_paths(),
        vec![PathBuf::from("/wc/new.rs"), PathBuf::from("/wc/old.rs")]
    );

    let err = wc.plan_commit(&flow, &["/wc/w.txt"]).await.unwrap_err();
    assert!(matches!(err, SdkError::Commit(_)));

    let all = wc.plan_commit_all(&flow).await.unwrap();
    assert_eq!(all.display_paths().len(), 2);
}

#[tokio::test]
async fn dispose_reports_every_group_once() {
    let observer = Arc::new(RecordingObserver::new());
    let (_source, _config, wc) = setup(scenario());
    let wc = wc.with_observer(observer.clone());
    wc.refresh().await.unwrap();
    observer.take();

    wc.dispose().await;
    let disposed = observer
        .take()
        .into_iter()
        .filter(|e| matches!(e, GroupEvent::Disposed { .. }))
        .count();
    assert_eq!(disposed, 5);

    wc.dispose().await;
    assert!(observer.take().is_empty());
}

fn config_value(config: &StaticConfig) -> ScmConfig {
    config.current().unwrap()
}
