//! Shared foundation: configuration, errors, record types.

pub mod config;
pub mod errors;
pub mod types;
