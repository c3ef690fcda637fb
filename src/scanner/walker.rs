//! Local large-file collection.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::types::FileRecord;
use crate::scanner::candidates::matches_extensions;

/// Filters applied while walking.
#[derive(Debug, Clone, Default)]
pub struct WalkFilter {
    /// Minimum size in bytes for a file to be collected.
    pub min_size: u64,
    /// Extension suffixes to accept; empty accepts everything.
    pub extensions: Vec<String>,
    /// Directory basenames pruned from the walk, matched exactly.
    pub exclude_dirs: Vec<String>,
}

/// Walks `root` with an explicit directory stack and collects matching
/// files. Symbolic links are never followed or counted; unreadable
/// directories and entries that vanish mid-walk are skipped.
#[must_use]
pub fn collect_large_files(root: &Path, filter: &WalkFilter) -> Vec<FileRecord> {
    let mut records = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(path = %dir.display(), %err, "skipping unreadable directory");
                continue;
            }
        };
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if filter.exclude_dirs.iter().any(|skip| skip == name.as_ref()) {
                    continue;
                }
                stack.push(entry.path());
            } else if file_type.is_file() {
                let Ok(meta) = entry.metadata() else { continue };
                if meta.len() < filter.min_size {
                    continue;
                }
                let name = entry.file_name();
                if matches_extensions(&name.to_string_lossy(), &filter.extensions) {
                    records.push(FileRecord::new(
                        meta.len(),
                        entry.path().to_string_lossy().into_owned(),
                    ));
                }
            }
        }
    }
    records
}
