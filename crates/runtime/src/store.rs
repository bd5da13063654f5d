//! Per-player target map owned by the plugin worker.

use std::collections::HashMap;

use compass_core::{PlayerId, Target};

/// At most one [`Target`] per player.
///
/// Only the plugin worker touches this map, so it needs no locking. Callers
/// are responsible for persisting targets.
#[derive(Debug, Default)]
pub struct TargetStore {
    targets: HashMap<PlayerId, Target>,
}

impl TargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever target the player had.
    pub fn set(&mut self, player: PlayerId, target: Target) {
        self.targets.insert(player, target);
    }

    pub fn get(&self, player: PlayerId) -> Option<&Target> {
        self.targets.get(&player)
    }

    pub fn remove(&mut self, player: PlayerId) -> Option<Target> {
        self.targets.remove(&player)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
