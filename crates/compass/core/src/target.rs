use crate::category::{CategoryId, CategoryKind};
use crate::types::Location;

/// The single resolved feature a player is tracking.
///
/// Targets are never edited in place. A new search builds a new value that
/// replaces the old one wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    kind: CategoryKind,
    category: CategoryId,
    location: Location,
}

impl Target {
    pub fn new(kind: CategoryKind, category: CategoryId, location: Location) -> Self {
        Self {
            kind,
            category,
            location,
        }
    }

    pub fn structure(category: CategoryId, location: Location) -> Self {
        Self::new(CategoryKind::Structure, category, location)
    }

    pub fn biome(category: CategoryId, location: Location) -> Self {
        Self::new(CategoryKind::Biome, category, location)
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Bare display name, e.g. `Ancient City`.
    pub fn display_name(&self) -> String {
        self.category.display_name()
    }

    /// Display name with the kind spelled out where it reads better
    /// (`Dark Forest biome`).
    pub fn labelled_name(&self) -> String {
        self.kind.labelled(&self.category)
    }

    /// Live distance from `from`, or `None` when `from` is in another world.
    pub fn distance_from(&self, from: &Location) -> Option<f64> {
        from.distance_to(&self.location)
    }
}
