//! # solvestreak Core Library
//!
//! Tracks a daily solving streak across LeetCode and GeeksforGeeks and keeps
//! a desktop widget fed with display-ready numbers.
//!
//! ## Architecture
//!
//! - **Sources**: one adapter per platform, each returning `Option<u64>`;
//!   failures never propagate past the adapter
//! - **Storage**: JSON history record with field-default migration and
//!   atomic writes, plus TOML configuration
//! - **Streak Engine**: a pure transition from (record, observation, now) to
//!   the next record, using fixed 24h break and 15h cooldown windows
//! - **Snapshot / Sink**: display projection written as a `[Variables]`
//!   include file, a single stdout line, and optionally `stats.json`
//!
//! ## Key Components
//!
//! - [`StreakEngine`]: streak state machine
//! - [`HistoryStore`]: durable history record
//! - [`Snapshot`]: widget payload
//! - [`UpdatePipeline`]: one end-to-end run with last-known fallback

pub mod error;
pub mod history;
pub mod pipeline;
pub mod platform;
pub mod sink;
pub mod snapshot;
pub mod sources;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, StorageError};
pub use history::HistoryRecord;
pub use pipeline::{emit_last_known, RunReport, UpdatePipeline};
pub use platform::{Observation, Platform, PlatformCounts};
pub use sink::OutputSink;
pub use snapshot::{FireState, Snapshot};
pub use sources::{GfgSource, LeetCodeSource, SolvedCountSource};
pub use storage::{Config, HistoryStore, OutputMode, StoragePaths};
pub use streak::{StreakEngine, Transition, TransitionKind};
