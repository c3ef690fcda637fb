//! Append-only deletion history.
//!
//! Every deletion attempt, including dry runs, appends one JSON object
//! per line to a history file. Recording is best effort: a run never
//! fails because the history could not be written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One recorded deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionEvent {
    /// RFC 3339 timestamp taken when the attempt finished.
    pub ts: String,
    /// Absolute device path that was targeted.
    pub path: String,
    /// Size in bytes as known at selection time.
    pub size: u64,
    /// True when the run only previewed the deletion.
    pub dry_run: bool,
    /// Whether the removal command reported success.
    pub ok: bool,
    /// Trailing output from the removal command, if any.
    pub message: String,
}

impl DeletionEvent {
    /// Builds an event stamped with the current UTC time.
    #[must_use]
    pub fn now(
        path: impl Into<String>,
        size: u64,
        dry_run: bool,
        ok: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            path: path.into(),
            size,
            dry_run,
            ok,
            message: message.into(),
        }
    }
}

/// Appends [`DeletionEvent`]s to a JSONL file.
#[derive(Debug, Clone)]
pub struct DeletionHistory {
    path: PathBuf,
}

impl DeletionHistory {
    /// Builds a history sink writing to `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the history file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event. Failures are logged and otherwise ignored.
    pub fn record(&self, event: &DeletionEvent) {
        if let Err(err) = self.append(event) {
            warn!(path = %self.path.display(), %err, "could not record deletion history");
        }
    }

    fn append(&self, event: &DeletionEvent) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")
    }
}
