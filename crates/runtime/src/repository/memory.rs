//! In-memory TargetRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use compass_core::{PlayerId, Target};

use super::error::{RepositoryError, Result};
use super::traits::TargetRepository;

/// In-memory implementation of TargetRepository.
pub struct InMemoryTargetRepository {
    targets: RwLock<HashMap<PlayerId, Target>>,
}

impl InMemoryTargetRepository {
    pub fn new() -> Self {
        Self {
            targets: RwLock::new(HashMap::new()),
        }
    }

    /// Create with records already present, as if saved by an earlier session.
    pub fn with_targets(targets: impl IntoIterator<Item = (PlayerId, Target)>) -> Self {
        Self {
            targets: RwLock::new(targets.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.read().map(|targets| targets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTargetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetRepository for InMemoryTargetRepository {
    fn save(&self, player: PlayerId, target: &Target) -> Result<()> {
        let mut targets = self
            .targets
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        targets.insert(player, target.clone());
        Ok(())
    }

    fn load(&self, player: PlayerId) -> Result<Option<Target>> {
        let targets = self
            .targets
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(targets.get(&player).cloned())
    }

    fn exists(&self, player: PlayerId) -> bool {
        self.targets
            .read()
            .map(|targets| targets.contains_key(&player))
            .unwrap_or(false)
    }
}
