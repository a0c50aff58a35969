//! Consumer-facing output: `variables.inc`, the stdout line and `stats.json`.

use std::io::Write;

use crate::error::{Result, StorageError};
use crate::snapshot::Snapshot;
use crate::storage::{write_atomic, OutputMode, StoragePaths};

/// Prefix a polling consumer looks for on stdout.
pub const STDOUT_MARKER: &str = "RAINMETER:";

/// Render the `[Variables]` include file.
pub fn render_variables(snapshot: &Snapshot) -> String {
    let mut out = String::from("[Variables]\n");
    for (key, value) in snapshot.fields() {
        out.push_str(&key);
        out.push('=');
        out.push_str(&value);
        out.push('\n');
    }
    out
}

/// Render the single stdout line, without a trailing newline.
pub fn render_line(snapshot: &Snapshot) -> String {
    let pairs: Vec<String> = snapshot
        .fields()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    format!("{STDOUT_MARKER}{}", pairs.join("|"))
}

/// Writes snapshots to the configured files and an output stream.
pub struct OutputSink<W: Write> {
    paths: StoragePaths,
    mode: OutputMode,
    out: W,
}

impl OutputSink<std::io::Stdout> {
    pub fn stdout(paths: StoragePaths, mode: OutputMode) -> Self {
        Self::new(paths, mode, std::io::stdout())
    }
}

impl<W: Write> OutputSink<W> {
    pub fn new(paths: StoragePaths, mode: OutputMode, out: W) -> Self {
        Self { paths, mode, out }
    }

    /// Write every configured file, then the stdout line.
    ///
    /// File failures are logged and do not prevent the line from being
    /// written; only a failure on the output stream itself is returned.
    pub fn emit(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Err(err) = self.write_variables(snapshot) {
            tracing::error!(error = %err, "could not write snapshot file");
        }
        if self.mode == OutputMode::StructuredFile {
            if let Err(err) = self.write_structured(snapshot) {
                tracing::error!(error = %err, "could not write structured snapshot");
            }
        }

        writeln!(self.out, "{}", render_line(snapshot))?;
        self.out.flush()?;
        Ok(())
    }

    pub fn write_variables(&self, snapshot: &Snapshot) -> Result<()> {
        write_atomic(&self.paths.variables, render_variables(snapshot).as_bytes())?;
        Ok(())
    }

    pub fn write_structured(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(&snapshot.structured()).map_err(|e| {
            StorageError::SerializeFailed {
                what: "stats snapshot",
                message: e.to_string(),
            }
        })?;
        write_atomic(&self.paths.stats_json, json.as_bytes())?;
        Ok(())
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Consume the sink and return the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
