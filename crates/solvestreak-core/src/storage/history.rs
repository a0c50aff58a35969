//! JSON-file history store.
//!
//! Loading never fails: a missing file yields the default record and a
//! corrupt one is logged and replaced by the default. Saving goes through
//! [`super::write_atomic`] so a killed process leaves either the previous
//! record or the new one on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};
use crate::history::HistoryRecord;

/// Durable store for a single [`HistoryRecord`].
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record, substituting the default on any problem.
    pub fn load(&self) -> HistoryRecord {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no history file yet, starting fresh");
                return HistoryRecord::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "history unreadable, using defaults");
                return HistoryRecord::default();
            }
        };

        match parse_record(&content) {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(path = %self.path.display(), %reason, "history file corrupt, using defaults");
                HistoryRecord::default()
            }
        }
    }

    /// Persist the full record.
    pub fn save(&self, record: &HistoryRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record).map_err(|e| StorageError::SerializeFailed {
            what: "history",
            message: e.to_string(),
        })?;
        super::write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), streak = record.streak, "history saved");
        Ok(())
    }
}

fn parse_record(content: &str) -> std::result::Result<HistoryRecord, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("not a JSON object".to_string());
    }
    let mut record: HistoryRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;
    record.normalize();
    Ok(record)
}
