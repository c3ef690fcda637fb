//! Turns raw inventories into ranked, bounded candidate lists.

use std::collections::HashMap;

use crate::core::types::FileRecord;

/// Case-insensitive suffix match against any of `extensions`. An empty
/// filter accepts everything. The match is a plain suffix comparison, not
/// segment-aware: `"x.tar.mp4"` and `"weirdmp4"` both match `"mp4"`.
pub(crate) fn matches_extensions(subject: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let lowered = subject.to_lowercase();
    extensions
        .iter()
        .any(|ext| lowered.ends_with(&ext.to_lowercase()))
}

/// Builds the ranked candidate list from a raw inventory.
///
/// Records below `min_size` or failing the extension filter are dropped.
/// Duplicate paths collapse to one entry (last seen wins on size, first-seen
/// position is kept so the pre-sort order stays deterministic). Survivors are
/// stably sorted by size descending and truncated to `max_count`.
#[must_use]
pub fn build_candidates(
    inventory: &[FileRecord],
    min_size: u64,
    extensions: &[String],
    max_count: usize,
) -> Vec<FileRecord> {
    let mut deduped: Vec<FileRecord> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for record in inventory {
        if record.size < min_size {
            continue;
        }
        if !matches_extensions(&record.path, extensions) {
            continue;
        }
        match positions.get(record.path.as_str()) {
            Some(&at) => deduped[at] = record.clone(),
            None => {
                positions.insert(record.path.as_str(), deduped.len());
                deduped.push(record.clone());
            }
        }
    }
    deduped.sort_by(|a, b| b.size.cmp(&a.size));
    deduped.truncate(max_count);
    deduped
}
