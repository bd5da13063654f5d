use std::collections::{BTreeMap, BTreeSet};

use crate::category::{CategoryId, CategoryKind};
use crate::search::SearchRadius;
use crate::traits::Settings;
use crate::types::DimensionBucket;

/// Plugin configuration snapshot.
///
/// A snapshot is immutable once built; reloading produces a new snapshot
/// that replaces the old one as a whole.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case", default))]
pub struct CompassConfig {
    /// Search radius in chunks.
    pub search_radius: u32,
    /// World names where every search command is refused.
    pub blacklisted_worlds: BTreeSet<String>,
    pub enabled_structures: DimensionTable,
    pub enabled_biomes: DimensionTable,
}

impl CompassConfig {
    pub fn new() -> Self {
        Self {
            search_radius: SearchRadius::DEFAULT_CHUNKS,
            blacklisted_worlds: BTreeSet::new(),
            enabled_structures: DimensionTable::default(),
            enabled_biomes: DimensionTable::default(),
        }
    }

    pub fn with_search_radius(mut self, chunks: u32) -> Self {
        self.search_radius = chunks;
        self
    }

    pub fn with_blacklisted_world(mut self, world: impl Into<String>) -> Self {
        self.blacklisted_worlds.insert(world.into());
        self
    }

    /// Marks `category` enabled for one bucket of the table matching `kind`.
    pub fn with_enabled(
        mut self,
        kind: CategoryKind,
        dimension: DimensionBucket,
        category: CategoryId,
    ) -> Self {
        self.table_mut(kind)
            .bucket_mut(dimension)
            .set(category, true);
        self
    }

    pub fn table(&self, kind: CategoryKind) -> &DimensionTable {
        match kind {
            CategoryKind::Structure => &self.enabled_structures,
            CategoryKind::Biome => &self.enabled_biomes,
        }
    }

    pub fn table_mut(&mut self, kind: CategoryKind) -> &mut DimensionTable {
        match kind {
            CategoryKind::Structure => &mut self.enabled_structures,
            CategoryKind::Biome => &mut self.enabled_biomes,
        }
    }
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings for CompassConfig {
    fn is_enabled(
        &self,
        dimension: DimensionBucket,
        kind: CategoryKind,
        category: &CategoryId,
    ) -> bool {
        self.table(kind).bucket(dimension).is_enabled(category)
    }

    fn search_radius(&self) -> SearchRadius {
        SearchRadius::chunks(self.search_radius)
    }

    fn is_world_blacklisted(&self, world: &str) -> bool {
        self.blacklisted_worlds.contains(world)
    }

    fn enabled_categories(
        &self,
        dimension: DimensionBucket,
        kind: CategoryKind,
    ) -> Vec<CategoryId> {
        self.table(kind).bucket(dimension).enabled()
    }
}

/// Enablement tables for the three dimension buckets.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DimensionTable {
    pub normal: CategoryTable,
    pub nether: CategoryTable,
    pub the_end: CategoryTable,
}

impl DimensionTable {
    pub fn bucket(&self, dimension: DimensionBucket) -> &CategoryTable {
        match dimension {
            DimensionBucket::Normal => &self.normal,
            DimensionBucket::Nether => &self.nether,
            DimensionBucket::TheEnd => &self.the_end,
        }
    }

    pub fn bucket_mut(&mut self, dimension: DimensionBucket) -> &mut CategoryTable {
        match dimension {
            DimensionBucket::Normal => &mut self.normal,
            DimensionBucket::Nether => &mut self.nether,
            DimensionBucket::TheEnd => &mut self.the_end,
        }
    }
}

/// Per-category on/off switches. Absent categories are disabled.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CategoryTable(BTreeMap<CategoryId, bool>);

impl CategoryTable {
    pub fn set(&mut self, category: CategoryId, enabled: bool) {
        self.0.insert(category, enabled);
    }

    pub fn is_enabled(&self, category: &CategoryId) -> bool {
        self.0.get(category).copied().unwrap_or(false)
    }

    /// Enabled categories in sorted key order.
    pub fn enabled(&self) -> Vec<CategoryId> {
        self.0
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(category, _)| category.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CategoryId, bool)> for CategoryTable {
    fn from_iter<T: IntoIterator<Item = (CategoryId, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
