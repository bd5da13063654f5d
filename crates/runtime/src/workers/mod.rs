//! Worker tasks that back the runtime orchestration.
//!
//! The plugin worker serializes all state changes; the refresh pass runs on
//! it either from its own interval or from an explicit tick.

mod plugin;
mod refresh;

pub use plugin::{Command, PluginWorker};
