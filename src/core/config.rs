//! Configuration loading and path resolution.
//!
//! Settings live in a TOML file, by default at
//! `<config-dir>/storage_sweeper/config.toml`. Every field has a
//! built-in default, so a missing default file is not an error; an
//! explicitly requested file that cannot be read is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::{Result, SweepError};

/// Default size floor for local scans, 100 MB.
pub const DEFAULT_LOCAL_MIN_SIZE: u64 = 100_000_000;
/// Default size floor for device scans, 50 MB.
pub const DEFAULT_DEVICE_MIN_SIZE: u64 = 50_000_000;
/// Default size floor for device cleaning runs, 100 MB.
pub const DEFAULT_CLEAN_MIN_SIZE: u64 = 100_000_000;

const APP_DIR: &str = "storage_sweeper";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Local scan settings.
    pub scan: ScanSection,
    /// Device scan settings.
    pub remote: RemoteSection,
    /// State file locations.
    pub paths: PathsSection,
}

/// Local scan defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    /// Minimum file size in bytes.
    pub min_size_bytes: u64,
    /// How many results to keep.
    pub top: usize,
    /// Directory basenames skipped during the walk.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            min_size_bytes: DEFAULT_LOCAL_MIN_SIZE,
            top: 20,
            exclude_dirs: Vec::new(),
        }
    }
}

/// Device scan defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSection {
    /// Shell channel binary, resolved via `PATH` unless given as a path.
    pub channel_binary: String,
    /// Preferred device root for scans.
    pub root: String,
    /// Minimum file size in bytes.
    pub min_size_bytes: u64,
    /// How many results to keep.
    pub top: usize,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            channel_binary: "adb".to_owned(),
            root: "/sdcard".to_owned(),
            min_size_bytes: DEFAULT_DEVICE_MIN_SIZE,
            top: 50,
        }
    }
}

/// Override locations for state files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    /// Snapshot file; defaults to `<data-dir>/storage_sweeper/last_scan.json`.
    pub snapshot: Option<PathBuf>,
    /// Deletion history; defaults to `<data-dir>/storage_sweeper/history.jsonl`.
    pub history: Option<PathBuf>,
}

impl Config {
    /// Loads configuration. With an explicit path the file must exist and
    /// parse; with none, a missing default file yields the built-in
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) if required => return Err(SweepError::MissingConfig { path }),
            Err(_) => return Ok(Self::default()),
        };
        let config: Self = toml::from_str(&raw).map_err(|err| SweepError::ConfigParse {
            context: "config.toml",
            details: format!("{}: {err}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The default config file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Where device scans persist their snapshot.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.paths
            .snapshot
            .clone()
            .unwrap_or_else(|| data_dir().join("last_scan.json"))
    }

    /// Where deletion attempts are recorded.
    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.paths
            .history
            .clone()
            .unwrap_or_else(|| data_dir().join("history.jsonl"))
    }

    fn validate(&self) -> Result<()> {
        if self.remote.channel_binary.trim().is_empty() {
            return Err(SweepError::InvalidConfig {
                details: "remote.channel_binary must not be empty".to_owned(),
            });
        }
        if !self.remote.root.starts_with('/') {
            return Err(SweepError::InvalidConfig {
                details: format!("remote.root must be absolute, got {:?}", self.remote.root),
            });
        }
        Ok(())
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn built_in_defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.scan.min_size_bytes, DEFAULT_LOCAL_MIN_SIZE);
        assert_eq!(config.scan.top, 20);
        assert_eq!(config.remote.channel_binary, "adb");
        assert_eq!(config.remote.root, "/sdcard");
        assert_eq!(config.remote.min_size_bytes, DEFAULT_DEVICE_MIN_SIZE);
        assert_eq!(config.remote.top, 50);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[scan]
min_size_bytes = 1000
exclude_dirs = ["node_modules", ".git"]

[remote]
channel_binary = "/opt/adb/adb"
top = 5
"#,
        );
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.scan.min_size_bytes, 1000);
        assert_eq!(config.scan.top, 20);
        assert_eq!(config.scan.exclude_dirs, ["node_modules", ".git"]);
        assert_eq!(config.remote.channel_binary, "/opt/adb/adb");
        assert_eq!(config.remote.top, 5);
        assert_eq!(config.remote.min_size_bytes, DEFAULT_DEVICE_MIN_SIZE);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/no/such/config.toml"))).unwrap_err();
        assert_eq!(err.code(), "SSW-1002");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[scan]\nminimum = 5\n");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code(), "SSW-1003");
    }

    #[test]
    fn relative_remote_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[remote]\nroot = \"sdcard\"\n");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(err.code(), "SSW-1001");
    }

    #[test]
    fn state_paths_honor_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let snap = dir.path().join("snap.json");
        let path = write_config(
            dir.path(),
            &format!("[paths]\nsnapshot = {:?}\n", snap.display().to_string()),
        );
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.snapshot_path(), snap);
        assert!(config.history_path().ends_with("history.jsonl"));
    }
}
