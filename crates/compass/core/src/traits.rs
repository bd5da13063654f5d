//! Capabilities the tracking core consumes but does not implement.

use crate::category::{CategoryId, CategoryKind};
use crate::search::{LocateQuery, SearchRadius};
use crate::types::{DimensionBucket, Location};

/// Resolves "nearest instance of category C within radius R of point P".
///
/// One locator exists per [`CategoryKind`]. Implementations may be slow; the
/// runtime decides which lane calls them based on [`CategoryKind::lane`].
pub trait CategoryLocator: Send + Sync {
    /// Which kind of category this locator resolves.
    fn kind(&self) -> CategoryKind;

    /// Whether the underlying registry knows `category` at all.
    fn recognizes(&self, category: &CategoryId) -> bool;

    /// Every category the registry knows, used for console completion.
    fn known_categories(&self) -> Vec<CategoryId>;

    /// Nearest match, or `None` when nothing lies within the radius.
    fn locate(&self, query: &LocateQuery) -> Option<Location>;
}

/// Read-only view of the plugin configuration.
pub trait Settings: Send + Sync {
    fn is_enabled(&self, dimension: DimensionBucket, kind: CategoryKind, category: &CategoryId)
    -> bool;

    fn search_radius(&self) -> SearchRadius;

    fn is_world_blacklisted(&self, world: &str) -> bool;

    /// Enabled categories for one dimension bucket, in table order.
    fn enabled_categories(&self, dimension: DimensionBucket, kind: CategoryKind)
    -> Vec<CategoryId>;
}
