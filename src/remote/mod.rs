//! Everything that talks to an attached device over the command channel:
//! the gateway itself, the listing parsers, the inventory resolver, and the
//! single-path stat/remove operations.

pub mod actions;
pub mod listing;
pub mod resolver;
pub mod shell;
