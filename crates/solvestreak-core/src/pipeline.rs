//! One update run: load, show last-known, fetch, advance the streak, persist, show again.

use chrono::{DateTime, TimeZone};
use futures::FutureExt;
use std::io::Write;
use std::panic::AssertUnwindSafe;

use crate::error::Result;
use crate::history::HistoryRecord;
use crate::platform::Observation;
use crate::sink::OutputSink;
use crate::snapshot::Snapshot;
use crate::sources::{fetch_all, sources_from_config, SolvedCountSource};
use crate::storage::{Config, HistoryStore, StoragePaths};
use crate::streak::{StreakEngine, Transition};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub observation: Observation,
    pub transition: Transition,
    pub record: HistoryRecord,
    pub snapshot: Snapshot,
    /// Whether the history write succeeded.
    pub saved: bool,
}

pub struct UpdatePipeline {
    config: Config,
    store: HistoryStore,
    engine: StreakEngine,
    sources: Vec<Box<dyn SolvedCountSource>>,
}

impl UpdatePipeline {
    /// Pipeline with the adapters described by `config`.
    pub fn new(config: Config, paths: &StoragePaths) -> Self {
        let sources = sources_from_config(&config);
        Self {
            store: HistoryStore::new(&paths.history),
            config,
            engine: StreakEngine::new(),
            sources,
        }
    }

    /// Replace the platform adapters.
    pub fn with_sources(mut self, sources: Vec<Box<dyn SolvedCountSource>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Execute one run. `clock` is read once before fetching and once after.
    ///
    /// Source and storage failures are absorbed, as is a failed write of the
    /// early last-known line. An error here means the final line could not be
    /// written; history has already been saved by then.
    pub async fn run<W, Tz, F>(&self, sink: &mut OutputSink<W>, clock: F) -> Result<RunReport>
    where
        W: Write,
        Tz: TimeZone,
        F: Fn() -> DateTime<Tz>,
    {
        tracing::info!("--- starting update ---");
        let previous = self.store.load();

        // Last-known values first so the widget has data even if fetching hangs.
        let stale = Snapshot::build(&previous, &clock(), &self.config.display);
        if let Err(err) = sink.emit(&stale) {
            tracing::error!(error = %err, "could not emit last-known snapshot, continuing");
        }

        let observation = fetch_all(&self.sources).await;

        let now = clock();
        let (record, transition) = self.engine.apply(&previous, &observation, &now);
        tracing::info!(
            kind = ?transition.kind,
            streak_before = transition.streak_before,
            streak_after = transition.streak_after,
            increased = ?transition.increased,
            "streak evaluated"
        );

        let saved = match self.store.save(&record) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "could not save history");
                false
            }
        };

        let snapshot = Snapshot::build(&record, &now, &self.config.display);
        sink.emit(&snapshot)?;
        tracing::info!(
            streak = snapshot.streak,
            total = snapshot.total_solved,
            fire = snapshot.fire.is_active(),
            "stats updated"
        );

        Ok(RunReport {
            observation,
            transition,
            record,
            snapshot,
            saved,
        })
    }

    /// [`Self::run`], but any error or panic falls back to re-emitting the
    /// snapshot of whatever history is on disk.
    pub async fn run_or_fallback<W, Tz, F>(&self, sink: &mut OutputSink<W>, clock: F) -> Option<RunReport>
    where
        W: Write,
        Tz: TimeZone,
        F: Fn() -> DateTime<Tz>,
    {
        let outcome = AssertUnwindSafe(self.run(&mut *sink, &clock)).catch_unwind().await;
        let reason = match outcome {
            Ok(Ok(report)) => return Some(report),
            Ok(Err(err)) => err.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        tracing::error!(%reason, "update failed, re-emitting last-known snapshot");
        if let Err(err) = emit_last_known(&self.store, sink, &clock(), &self.config) {
            tracing::error!(error = %err, "fallback emission failed");
        }
        None
    }
}

/// Load history and emit its snapshot without touching the network.
pub fn emit_last_known<W: Write, Tz: TimeZone>(
    store: &HistoryStore,
    sink: &mut OutputSink<W>,
    now: &DateTime<Tz>,
    config: &Config,
) -> Result<Snapshot> {
    let record = store.load();
    let snapshot = Snapshot::build(&record, now, &config.display);
    sink.emit(&snapshot)?;
    Ok(snapshot)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
