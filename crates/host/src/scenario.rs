//! Scenario files: the worlds, players and features a scripted session uses.
//!
//! ```toml
//! [[worlds]]
//! name = "world"
//! dimension = "normal"
//!
//! [[players]]
//! name = "Steve"
//! world = "world"
//! position = { x = 0.0, y = 64.0, z = 0.0 }
//! op = true
//!
//! [[structures]]
//! category = "village_plains"
//! world = "world"
//! position = { x = 220.0, y = 70.0, z = -40.0 }
//! ```
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use compass_core::{CategoryId, DimensionBucket, PlayerId, Position};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub worlds: Vec<WorldSpec>,
    #[serde(default)]
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub structures: Vec<FeatureSpec>,
    #[serde(default)]
    pub biomes: Vec<FeatureSpec>,
    /// Extra registry entries with no placed instance.
    #[serde(default)]
    pub registry: RegistrySpec,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldSpec {
    pub name: String,
    pub dimension: DimensionBucket,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSpec {
    pub name: String,
    /// Fixed identity so records survive across runs. Random when omitted.
    #[serde(default)]
    pub id: Option<PlayerId>,
    pub world: String,
    pub position: Position,
    /// Grants the reload permission.
    #[serde(default)]
    pub op: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpec {
    pub category: CategoryId,
    pub world: String,
    pub position: Position,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySpec {
    #[serde(default)]
    pub structures: Vec<CategoryId>,
    #[serde(default)]
    pub biomes: Vec<CategoryId>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid scenario: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(raw)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        let mut worlds = HashSet::new();
        for world in &self.worlds {
            if !worlds.insert(world.name.as_str()) {
                bail!("world '{}' is declared twice", world.name);
            }
        }

        let mut names = HashSet::new();
        for player in &self.players {
            if !names.insert(player.name.to_lowercase()) {
                bail!("player '{}' is declared twice", player.name);
            }
            if !worlds.contains(player.world.as_str()) {
                bail!("player '{}' starts in unknown world '{}'", player.name, player.world);
            }
        }

        for feature in self.structures.iter().chain(&self.biomes) {
            if !worlds.contains(feature.world.as_str()) {
                bail!("{} is placed in unknown world '{}'", feature.category, feature.world);
            }
        }

        Ok(())
    }

    pub fn dimension_of(&self, world: &str) -> Option<DimensionBucket> {
        self.worlds
            .iter()
            .find(|spec| spec.name == world)
            .map(|spec| spec.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[worlds]]
        name = "world"
        dimension = "normal"

        [[worlds]]
        name = "world_nether"
        dimension = "nether"

        [[players]]
        name = "Steve"
        id = "6f1c0b52-8a4e-4d3a-9b61-0c2f7e5d9a10"
        world = "world"
        position = { x = 0.0, y = 64.0, z = 0.0 }

        [[structures]]
        category = "igloo"
        world = "world"
        position = { x = 40.0, y = 64.0, z = 0.0 }

        [registry]
        biomes = ["plains"]
    "#;

    #[test]
    fn parses_sample() {
        let scenario = Scenario::parse(SAMPLE).unwrap();

        assert_eq!(scenario.worlds.len(), 2);
        assert_eq!(scenario.dimension_of("world_nether"), Some(DimensionBucket::Nether));
        assert_eq!(scenario.structures[0].category.as_str(), "IGLOO");
        assert!(scenario.players[0].id.is_some());
        assert!(!scenario.players[0].op);
        assert_eq!(scenario.registry.biomes[0].as_str(), "PLAINS");
    }

    #[test]
    fn bundled_demo_is_valid() {
        let scenario = Scenario::parse(include_str!("../scenarios/demo.toml")).unwrap();

        assert_eq!(scenario.dimension_of("world_the_end"), Some(DimensionBucket::TheEnd));
        assert!(scenario.players.iter().all(|player| player.id.is_some()));
    }

    #[test]
    fn load_error_names_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "worlds = 3").unwrap();

        let error = Scenario::load(&path).unwrap_err();
        assert!(format!("{error:#}").contains("broken.toml"));
    }

    #[test]
    fn rejects_unknown_world() {
        let raw = r#"
            [[worlds]]
            name = "world"
            dimension = "normal"

            [[players]]
            name = "Alex"
            world = "lobby"
            position = { x = 0.0, y = 64.0, z = 0.0 }
        "#;

        let error = Scenario::parse(raw).unwrap_err();
        assert!(error.to_string().contains("unknown world 'lobby'"));
    }

    #[test]
    fn rejects_invalid_category() {
        let raw = r#"
            [[worlds]]
            name = "world"
            dimension = "normal"

            [[structures]]
            category = "not a category"
            world = "world"
            position = { x = 0.0, y = 64.0, z = 0.0 }
        "#;

        assert!(Scenario::parse(raw).is_err());
    }
}
