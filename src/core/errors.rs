//! SSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for Storage Sweeper.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[SSW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SSW-2001] device command channel unavailable: {details}")]
    DeviceChannelMissing { details: String },

    #[error("[SSW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SSW-3003] malformed snapshot at {path}: {details}")]
    SnapshotCorrupt { path: PathBuf, details: String },

    #[error("[SSW-4001] empty selection: {details}")]
    EmptySelection { details: String },

    #[error("[SSW-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl SweepError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SSW-1001",
            Self::MissingConfig { .. } => "SSW-1002",
            Self::ConfigParse { .. } => "SSW-1003",
            Self::DeviceChannelMissing { .. } => "SSW-2001",
            Self::Serialization { .. } => "SSW-2101",
            Self::Io { .. } => "SSW-3002",
            Self::SnapshotCorrupt { .. } => "SSW-3003",
            Self::EmptySelection { .. } => "SSW-4001",
            Self::Runtime { .. } => "SSW-3900",
        }
    }

    /// True when a retry has a chance of succeeding.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Runtime { .. })
    }

    /// Builds an IO error tagged with the path it happened at.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
