//! Locator routing and single-category searches.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use compass_core::{CategoryKind, CategoryLocator, LocateQuery, Location, PlayerId};
use tracing::warn;

/// The structure and biome locators, addressed by [`CategoryKind`].
#[derive(Clone)]
pub struct Locators {
    structures: Arc<dyn CategoryLocator>,
    biomes: Arc<dyn CategoryLocator>,
}

impl Locators {
    pub fn new(structures: Arc<dyn CategoryLocator>, biomes: Arc<dyn CategoryLocator>) -> Self {
        Self { structures, biomes }
    }

    pub fn for_kind(&self, kind: CategoryKind) -> &Arc<dyn CategoryLocator> {
        match kind {
            CategoryKind::Structure => &self.structures,
            CategoryKind::Biome => &self.biomes,
        }
    }
}

/// Calls `locator` on the current thread. A panicking locator counts as a
/// miss so the worker that owns player state keeps running.
pub(crate) fn locate_caught(locator: &dyn CategoryLocator, query: &LocateQuery) -> Option<Location> {
    match panic::catch_unwind(AssertUnwindSafe(|| locator.locate(query))) {
        Ok(found) => found,
        Err(_) => {
            warn!(
                target: "compass::search",
                kind = %locator.kind(),
                category = %query.category,
                "locator panicked, treating as not found"
            );
            None
        }
    }
}

/// One named category to locate for one player.
///
/// Carries only owned data, so running it never touches player state. Which
/// thread runs it follows [`CategoryKind::lane`].
#[derive(Clone, Debug)]
pub(crate) struct SingleSearch {
    pub player: PlayerId,
    pub kind: CategoryKind,
    pub query: LocateQuery,
}

impl SingleSearch {
    pub fn run(self, locator: &dyn CategoryLocator) -> SearchCompletion {
        let found = locate_caught(locator, &self.query);
        SearchCompletion {
            player: self.player,
            kind: self.kind,
            query: self.query,
            found,
        }
    }
}

/// Result of a [`SingleSearch`], handed back to the worker.
#[derive(Clone, Debug)]
pub(crate) struct SearchCompletion {
    pub player: PlayerId,
    pub kind: CategoryKind,
    pub query: LocateQuery,
    pub found: Option<Location>,
}
