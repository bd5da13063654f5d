//! File-based TargetRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use compass_core::{PlayerId, Target};

use super::error::{RepositoryError, Result};
use super::record::PlayerRecord;
use super::traits::TargetRepository;

/// Stores each player's target as `<uuid>.json` under one directory.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-write never leaves a truncated record behind.
pub struct FileTargetRepository {
    base_dir: PathBuf,
}

impl FileTargetRepository {
    /// Create a repository rooted at `base_dir`, creating it if missing.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn record_path(&self, player: PlayerId) -> PathBuf {
        self.base_dir.join(format!("{}.json", player))
    }
}

impl TargetRepository for FileTargetRepository {
    fn save(&self, player: PlayerId, target: &Target) -> Result<()> {
        let path = self.record_path(player);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(&PlayerRecord::from_target(target))
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            target: "compass::repository",
            %player,
            category = %target.category(),
            "saved target to {}",
            path.display()
        );

        Ok(())
    }

    fn load(&self, player: PlayerId) -> Result<Option<Target>> {
        let path = self.record_path(player);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let record: PlayerRecord =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;
        let target = record.into_target()?;

        tracing::debug!(
            target: "compass::repository",
            %player,
            "loaded target from {}",
            path.display()
        );

        Ok(Some(target))
    }

    fn exists(&self, player: PlayerId) -> bool {
        self.record_path(player).exists()
    }
}

#[cfg(test)]
mod tests {
    use compass_core::{CategoryId, CategoryKind, Location};
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, FileTargetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileTargetRepository::new(temp_dir.path()).unwrap();
        (temp_dir, repo)
    }

    fn ancient_city() -> Target {
        Target::structure(
            CategoryId::new("ANCIENT_CITY").unwrap(),
            Location::at("world", -1204.5, -51.0, 388.125),
        )
    }

    #[test]
    fn test_save_and_load() {
        let (_temp, repo) = setup();
        let player = PlayerId::random();
        let target = ancient_city();

        repo.save(player, &target).unwrap();
        let loaded = repo.load(player).unwrap().unwrap();

        assert_eq!(loaded.kind(), target.kind());
        assert_eq!(loaded.category(), target.category());
        assert_eq!(loaded.location().world, "world");
        assert!(loaded.location().position.distance(&target.location().position) < 1e-9);
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let (_temp, repo) = setup();
        let player = PlayerId::random();

        repo.save(player, &ancient_city()).unwrap();
        let biome = Target::biome(
            CategoryId::new("CHERRY_GROVE").unwrap(),
            Location::at("world", 5.0, 70.0, 5.0),
        );
        repo.save(player, &biome).unwrap();

        assert_eq!(repo.load(player).unwrap(), Some(biome));
    }

    #[test]
    fn test_load_nonexistent() {
        let (_temp, repo) = setup();
        assert!(repo.load(PlayerId::random()).unwrap().is_none());
    }

    #[test]
    fn test_load_legacy_record() {
        let (temp, repo) = setup();
        let player = PlayerId::random();
        let legacy = r#"{
  "structure-type": "TRIAL_CHAMBERS",
  "world": "world",
  "x": 10.0,
  "y": -20.0,
  "z": 30.0
}"#;
        fs::write(temp.path().join(format!("{}.json", player)), legacy).unwrap();

        let loaded = repo.load(player).unwrap().unwrap();

        assert_eq!(loaded.kind(), CategoryKind::Structure);
        assert_eq!(loaded.category().as_str(), "TRIAL_CHAMBERS");
    }

    #[test]
    fn test_load_corrupted_record() {
        let (temp, repo) = setup();
        let player = PlayerId::random();
        fs::write(temp.path().join(format!("{}.json", player)), "{ not json").unwrap();

        assert!(matches!(repo.load(player), Err(RepositoryError::Json(_))));
    }

    #[test]
    fn test_exists_after_atomic_save() {
        let (temp, repo) = setup();
        let player = PlayerId::random();

        assert!(!repo.exists(player));
        repo.save(player, &ancient_city()).unwrap();
        assert!(repo.exists(player));
        assert!(!temp.path().join(format!("{}.json.tmp", player)).exists());
    }
}
