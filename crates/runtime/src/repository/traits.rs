//! Repository contract for per-player target records.

use compass_core::{PlayerId, Target};

use super::error::Result;

/// Stores one target record per player across sessions.
///
/// Only the plugin worker calls into a repository. Failures are reported to
/// the caller, which logs them and keeps the in-memory target authoritative.
pub trait TargetRepository: Send + Sync {
    /// Writes the player's record, replacing any previous one.
    fn save(&self, player: PlayerId, target: &Target) -> Result<()>;

    /// Reads the player's record. `Ok(None)` when none was ever saved.
    fn load(&self, player: PlayerId) -> Result<Option<Target>>;

    fn exists(&self, player: PlayerId) -> bool;
}
