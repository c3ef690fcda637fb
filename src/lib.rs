//! Storage Sweeper: finds and removes the largest files, locally and on an
//! attached Android device.
//!
//! The local side walks directory trees and ranks files by size. The device
//! side talks to a connected phone through an `adb shell` command channel,
//! resolving a file inventory with a ladder of listing strategies (device
//! shells disagree about which listing commands exist), ranking candidates,
//! persisting scan snapshots for index-based deletion, and dispatching
//! removals with an append-only history trail.

pub mod core;
pub mod history;
pub mod remote;
pub mod scanner;
pub mod snapshot;

#[cfg(feature = "cli")]
pub mod cli_app;


pub use crate::core::errors::{Result, SweepError};
pub use crate::core::types::FileRecord;
