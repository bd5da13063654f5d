//! Search parameters and the closest-of-N selection.

use crate::category::CategoryId;
use crate::types::{DimensionBucket, Location};

/// Village variants tried by the "any village" search, in iteration order.
pub const VILLAGE_CATEGORIES: [&str; 5] = [
    "VILLAGE_PLAINS",
    "VILLAGE_DESERT",
    "VILLAGE_SAVANNA",
    "VILLAGE_SNOWY",
    "VILLAGE_TAIGA",
];

/// Search radius, expressed in chunks as configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchRadius(u32);

impl SearchRadius {
    pub const BLOCKS_PER_CHUNK: u32 = 16;
    pub const DEFAULT_CHUNKS: u32 = 100;

    pub const fn chunks(chunks: u32) -> Self {
        Self(chunks)
    }

    pub const fn in_chunks(self) -> u32 {
        self.0
    }

    pub const fn blocks(self) -> u64 {
        self.0 as u64 * Self::BLOCKS_PER_CHUNK as u64
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self(Self::DEFAULT_CHUNKS)
    }
}

/// Owned input for one locator call.
///
/// Owned so it can be moved onto a blocking pool without borrowing any
/// player state.
#[derive(Clone, Debug, PartialEq)]
pub struct LocateQuery {
    pub origin: Location,
    pub dimension: DimensionBucket,
    pub category: CategoryId,
    pub radius: SearchRadius,
}

/// Winner of a closest-of-N search.
#[derive(Clone, Debug, PartialEq)]
pub struct Nearest {
    pub category: CategoryId,
    pub location: Location,
    pub distance: f64,
}

/// Runs `locate` for every candidate and keeps the closest hit.
///
/// The comparison is strict, so on an exact tie the candidate seen first
/// wins. Hits reported in a different world than `origin` have no distance
/// and are ignored.
pub fn nearest_of<I, F>(origin: &Location, candidates: I, mut locate: F) -> Option<Nearest>
where
    I: IntoIterator<Item = CategoryId>,
    F: FnMut(&CategoryId) -> Option<Location>,
{
    let mut best: Option<Nearest> = None;

    for category in candidates {
        let Some(location) = locate(&category) else {
            continue;
        };
        let Some(distance) = origin.distance_to(&location) else {
            continue;
        };

        if best.as_ref().is_none_or(|current| distance < current.distance) {
            best = Some(Nearest {
                category,
                location,
                distance,
            });
        }
    }

    best
}
