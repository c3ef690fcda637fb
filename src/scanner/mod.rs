//! Local filesystem scanning and candidate selection.

pub mod candidates;
pub mod walker;
