//! End-to-end runs of the update pipeline against a temp directory.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use solvestreak_core::sink::STDOUT_MARKER;
use solvestreak_core::{
    Config, HistoryRecord, HistoryStore, OutputMode, OutputSink, Platform, PlatformCounts,
    SolvedCountSource, StoragePaths, TransitionKind, UpdatePipeline,
};
use tempfile::TempDir;

struct Fixed(Platform, Option<u64>);

#[async_trait]
impl SolvedCountSource for Fixed {
    fn platform(&self) -> Platform {
        self.0
    }
    async fn fetch_solved_count(&self) -> Option<u64> {
        self.1
    }
}

struct Exploding;

#[async_trait]
impl SolvedCountSource for Exploding {
    fn platform(&self) -> Platform {
        Platform::Gfg
    }
    async fn fetch_solved_count(&self) -> Option<u64> {
        panic!("adapter blew up")
    }
}

/// Stdout that has gone away.
struct ClosedPipe;

impl std::io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap()
}

fn setup(mode: OutputMode) -> (TempDir, Config, StoragePaths) {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.base_dir = Some(dir.path().to_path_buf());
    config.output_mode = mode;
    let paths = config.paths();
    (dir, config, paths)
}

fn seed(paths: &StoragePaths, record: &HistoryRecord) {
    HistoryStore::new(&paths.history).save(record).unwrap();
}

fn sources(lc: Option<u64>, gfg: Option<u64>) -> Vec<Box<dyn SolvedCountSource>> {
    vec![
        Box::new(Fixed(Platform::LeetCode, lc)),
        Box::new(Fixed(Platform::Gfg, gfg)),
    ]
}

#[tokio::test]
async fn increase_extends_streak_and_persists() {
    let (_dir, config, paths) = setup(OutputMode::SnapshotFile);
    let mut start = HistoryRecord::with_counts(PlatformCounts::new(10, 5));
    start.streak = 2;
    start.last_activity_timestamp = Some(now() - TimeDelta::hours(1));
    start.last_streak_timestamp = Some(now() - TimeDelta::hours(16));
    seed(&paths, &start);

    let pipeline = UpdatePipeline::new(config, &paths).with_sources(sources(Some(11), None));
    let mut sink = OutputSink::new(paths.clone(), OutputMode::SnapshotFile, Vec::new());
    let report = pipeline.run(&mut sink, now).await.unwrap();

    assert_eq!(report.transition.kind, TransitionKind::Extended);
    assert!(report.saved);

    let stored = HistoryStore::new(&paths.history).load();
    assert_eq!(stored.count(Platform::LeetCode), 11);
    assert_eq!(stored.count(Platform::Gfg), 5);
    assert_eq!(stored.last_total(), 16);
    assert_eq!(stored.streak, 3);
    assert_eq!(stored.last_streak_timestamp, Some(now()));

    let vars = std::fs::read_to_string(&paths.variables).unwrap();
    assert!(vars.contains("Streak=3\n"));
    assert!(vars.contains("TotalSolved=16\n"));
    assert!(vars.contains("FireImg=fireon.png\n"));

    // Last-known line first, refreshed line second.
    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("RAINMETER:Streak=2|TotalSolved=15|"));
    assert!(lines[1].starts_with("RAINMETER:Streak=3|TotalSolved=16|"));
}

#[tokio::test]
async fn long_gap_without_activity_breaks_streak() {
    let (_dir, config, paths) = setup(OutputMode::SnapshotFile);
    let mut start = HistoryRecord::with_counts(PlatformCounts::new(10, 5));
    start.streak = 2;
    start.last_activity_timestamp = Some(now() - TimeDelta::hours(30));
    start.last_streak_timestamp = Some(now() - TimeDelta::hours(30));
    seed(&paths, &start);

    let pipeline = UpdatePipeline::new(config, &paths).with_sources(sources(Some(10), Some(5)));
    let mut sink = OutputSink::new(paths.clone(), OutputMode::SnapshotFile, Vec::new());
    let report = pipeline.run(&mut sink, now).await.unwrap();

    assert_eq!(report.transition.kind, TransitionKind::Broken);
    let stored = HistoryStore::new(&paths.history).load();
    assert_eq!(stored.streak, 0);
    assert_eq!(stored.counts(), PlatformCounts::new(10, 5));
    assert!(!report.snapshot.fire.is_active());
}

#[tokio::test]
async fn all_sources_down_keeps_last_known_values() {
    let (_dir, config, paths) = setup(OutputMode::StructuredFile);
    let mut start = HistoryRecord::with_counts(PlatformCounts::new(40, 2));
    start.streak = 6;
    start.last_activity_timestamp = Some(now() - TimeDelta::hours(3));
    start.last_streak_timestamp = Some(now() - TimeDelta::hours(3));
    seed(&paths, &start);

    let pipeline = UpdatePipeline::new(config, &paths).with_sources(sources(None, None));
    let mut sink = OutputSink::new(paths.clone(), OutputMode::StructuredFile, Vec::new());
    let report = pipeline.run(&mut sink, now).await.unwrap();

    assert!(report.observation.is_empty());
    assert_eq!(report.record.streak, 6);
    assert_eq!(report.record.last_total(), 42);

    let stats: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.stats_json).unwrap()).unwrap();
    assert_eq!(stats["streak"], 6);
    assert_eq!(stats["lc_count"], 40);
    assert_eq!(stats["fire_on"], true);
}

#[tokio::test]
async fn first_run_with_corrupt_history_starts_fresh() {
    let (_dir, config, paths) = setup(OutputMode::SnapshotFile);
    std::fs::write(&paths.history, "not json at all").unwrap();

    let pipeline = UpdatePipeline::new(config, &paths).with_sources(sources(Some(3), Some(4)));
    let mut sink = OutputSink::new(paths.clone(), OutputMode::SnapshotFile, Vec::new());
    let report = pipeline.run(&mut sink, now).await.unwrap();

    assert_eq!(report.transition.kind, TransitionKind::Started);
    let stored = HistoryStore::new(&paths.history).load();
    assert_eq!(stored.streak, 1);
    assert_eq!(stored.last_total(), 7);
    assert!(stored.is_active_on(now().date_naive()));
}

#[tokio::test]
async fn closed_stdout_still_advances_and_saves_history() {
    let (_dir, config, paths) = setup(OutputMode::SnapshotFile);
    let pipeline = UpdatePipeline::new(config, &paths).with_sources(sources(Some(5), Some(2)));
    let mut sink = OutputSink::new(paths.clone(), OutputMode::SnapshotFile, ClosedPipe);

    let result = pipeline.run(&mut sink, now).await;

    // Only the final line's failure surfaces.
    assert!(result.is_err());
    let stored = HistoryStore::new(&paths.history).load();
    assert_eq!(stored.streak, 1);
    assert_eq!(stored.last_total(), 7);
    let vars = std::fs::read_to_string(&paths.variables).unwrap();
    assert!(vars.contains("TotalSolved=7\n"));
}

#[tokio::test]
async fn panicking_source_falls_back_to_last_known_snapshot() {
    let (_dir, config, paths) = setup(OutputMode::SnapshotFile);
    let mut start = HistoryRecord::with_counts(PlatformCounts::new(20, 1));
    start.streak = 4;
    start.last_activity_timestamp = Some(now() - TimeDelta::hours(2));
    start.last_streak_timestamp = Some(now() - TimeDelta::hours(2));
    seed(&paths, &start);

    let pipeline = UpdatePipeline::new(config, &paths).with_sources(vec![
        Box::new(Fixed(Platform::LeetCode, Some(25))),
        Box::new(Exploding),
    ]);
    let mut sink = OutputSink::new(paths.clone(), OutputMode::SnapshotFile, Vec::new());
    let report = pipeline.run_or_fallback(&mut sink, now).await;

    assert!(report.is_none());
    // History is untouched by the failed run.
    let stored = HistoryStore::new(&paths.history).load();
    assert_eq!(stored.count(Platform::LeetCode), 20);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let last = out.lines().last().unwrap();
    assert!(last.starts_with(&format!("{STDOUT_MARKER}Streak=4|TotalSolved=21|")));
    let vars = std::fs::read_to_string(&paths.variables).unwrap();
    assert!(vars.contains("Streak=4\n"));
}

#[tokio::test]
async fn repeated_runs_are_idempotent() {
    let (_dir, config, paths) = setup(OutputMode::SnapshotFile);
    let pipeline = UpdatePipeline::new(config, &paths).with_sources(sources(Some(9), Some(9)));

    let mut sink = OutputSink::new(paths.clone(), OutputMode::SnapshotFile, Vec::new());
    let first = pipeline.run(&mut sink, now).await.unwrap();
    let second = pipeline
        .run(&mut sink, || now() + TimeDelta::minutes(10))
        .await
        .unwrap();

    assert_eq!(first.record.streak, 1);
    assert_eq!(second.record.streak, 1);
    assert_eq!(second.transition.kind, TransitionKind::Idle);
    assert_eq!(second.record.last_activity_timestamp, first.record.last_activity_timestamp);
}
