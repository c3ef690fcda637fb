//! Shared data model for discovered files.

use serde::{Deserialize, Serialize};

/// One discovered file: byte size plus absolute path.
///
/// Records produced by the listing parsers always carry absolute paths;
/// relative names are resolved against their directory before a record is
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Size in bytes.
    pub size: u64,
    /// Absolute path, using `/` separators on the device side.
    pub path: String,
}

impl FileRecord {
    /// Builds a record from a size and any path-like string.
    #[must_use]
    pub fn new(size: u64, path: impl Into<String>) -> Self {
        Self {
            size,
            path: path.into(),
        }
    }
}
