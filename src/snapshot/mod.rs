//! Scan snapshot persistence.
//!
//! Device scans write their candidate list to a JSON snapshot so a later
//! deletion run can select files by index without re-scanning. The file
//! holds a flat array of `{index, size, path}` objects with 1-based
//! indices matching the numbers printed alongside scan results.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::errors::{Result, SweepError};
use crate::core::types::FileRecord;

/// One line of a persisted scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// 1-based position in the scan listing.
    pub index: usize,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Absolute device path.
    pub path: String,
}

/// Reads and writes the snapshot file at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Builds a store over the given snapshot file location.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when a snapshot file is present.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replaces the snapshot with `records`, numbering them from 1 in the
    /// order given. The write goes through a sibling temp file and a
    /// rename so a crash cannot leave a half-written snapshot behind.
    pub fn save(&self, records: &[FileRecord]) -> Result<()> {
        let entries: Vec<SnapshotEntry> = records
            .iter()
            .enumerate()
            .map(|(at, record)| SnapshotEntry {
                index: at + 1,
                size: record.size,
                path: record.path.clone(),
            })
            .collect();
        let mut body = serde_json::to_string_pretty(&entries)?;
        body.push('\n');
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| SweepError::io(parent, err))?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).map_err(|err| SweepError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| SweepError::io(&self.path, err))?;
        Ok(())
    }

    /// Loads the snapshot. A missing or unreadable file and a file that
    /// does not parse as a snapshot all come back as an empty list; the
    /// caller treats "no previous scan" and "nothing recorded" alike.
    #[must_use]
    pub fn load(&self) -> Vec<SnapshotEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "snapshot unreadable, treating as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> SnapshotStore {
        SnapshotStore::new(dir.join("last_scan.json"))
    }

    #[test]
    fn save_then_load_round_trips_with_one_based_indices() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let records = vec![
            FileRecord::new(300, "/sdcard/a.mp4"),
            FileRecord::new(200, "/sdcard/b.zip"),
            FileRecord::new(100, "/sdcard/c.iso"),
        ];
        store.save(&records).unwrap();
        let entries = store.load();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            SnapshotEntry {
                index: 1,
                size: 300,
                path: "/sdcard/a.mp4".to_owned(),
            }
        );
        assert_eq!(entries[2].index, 3);
        assert_eq!(entries[2].path, "/sdcard/c.iso");
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(!store.exists());
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "{ not json ]").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn saving_replaces_the_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .save(&[FileRecord::new(1, "/sdcard/old.bin")])
            .unwrap();
        store
            .save(&[FileRecord::new(2, "/sdcard/new.bin")])
            .unwrap();
        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "/sdcard/new.bin");
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("state/deep/last_scan.json"));
        store.save(&[FileRecord::new(9, "/sdcard/x.bin")]).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().len(), 1);
    }
}
