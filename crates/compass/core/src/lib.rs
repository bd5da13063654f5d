//! Pure tracking domain for the enhanced compass.
//!
//! This crate knows nothing about schedulers, files, or the game server. It
//! defines the values the runtime moves around ([`Target`], [`Location`],
//! [`CategoryId`]), the read-only configuration snapshot ([`CompassConfig`]),
//! the collaborator seams the host fills in ([`CategoryLocator`],
//! [`Settings`]), and the closest-of-N selection used by the generic searches
//! ([`nearest_of`]).
//!
//! Modules are organized by responsibility:
//! - [`types`] world coordinates, player identity, dimension buckets
//! - [`category`] category kinds and canonical identifiers
//! - [`target`] the single tracked target per player
//! - [`search`] search radius, locate queries, nearest selection
//! - [`traits`] locator and settings capabilities
//! - [`config`] the configuration snapshot and its enablement tables
pub mod category;
pub mod config;
pub mod error;
pub mod search;
pub mod target;
pub mod traits;
pub mod types;

pub use category::{CategoryId, CategoryKind, SearchLane};
pub use config::{CategoryTable, CompassConfig, DimensionTable};
pub use error::CategoryError;
pub use search::{LocateQuery, Nearest, SearchRadius, VILLAGE_CATEGORIES, nearest_of};
pub use target::Target;
pub use traits::{CategoryLocator, Settings};
pub use types::{DimensionBucket, Location, PlayerId, Position};
