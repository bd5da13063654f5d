//! On-disk shape of a player's target record.

use compass_core::{CategoryId, CategoryKind, Location, Position, Target};
use serde::{Deserialize, Serialize};

use super::error::{RepositoryError, Result};

/// Serialized target record.
///
/// Older records carry no `target-kind` and name the category under
/// `structure-type`. Both load as structure targets without migration. When a
/// hand-edited record has both name keys, `target-name` wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlayerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_kind: Option<CategoryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_type: Option<String>,
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlayerRecord {
    pub fn from_target(target: &Target) -> Self {
        let location = target.location();
        Self {
            target_kind: Some(target.kind()),
            target_name: Some(target.category().as_str().to_owned()),
            structure_type: None,
            world: location.world.clone(),
            x: location.position.x,
            y: location.position.y,
            z: location.position.z,
        }
    }

    /// Upgrades the record to a [`Target`].
    pub fn into_target(self) -> Result<Target> {
        let name = self
            .target_name
            .or(self.structure_type)
            .ok_or_else(|| RepositoryError::CorruptedData("record names no target".into()))?;
        let category = CategoryId::new(&name).map_err(|error| {
            RepositoryError::CorruptedData(format!("invalid target name {:?}: {}", name, error))
        })?;
        let location = Location::new(self.world, Position::new(self.x, self.y, self.z));

        Ok(Target::new(
            self.target_kind.unwrap_or_default(),
            category,
            location,
        ))
    }
}
