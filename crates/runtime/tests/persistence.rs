//! Player records across sessions: save on search and quit, restore on join.

mod common;

use std::fs;
use std::sync::Arc;

use compass_core::{CategoryKind, DimensionBucket, Location, PlayerId, Target};
use compass_runtime::{FileTargetRepository, RepositoryError, TargetRepository};
use tempfile::TempDir;

use common::{eventually, id, overworld_config, setup, setup_with};

/// Repository whose every call fails.
struct BrokenRepository;

impl TargetRepository for BrokenRepository {
    fn save(&self, _: PlayerId, _: &Target) -> compass_runtime::repository::Result<()> {
        Err(RepositoryError::Io(std::io::Error::other("disk full")))
    }

    fn load(&self, _: PlayerId) -> compass_runtime::repository::Result<Option<Target>> {
        Err(RepositoryError::CorruptedData("unreadable".into()))
    }

    fn exists(&self, _: PlayerId) -> bool {
        false
    }
}

#[tokio::test]
async fn test_target_survives_reconnect() {
    let temp = TempDir::new().unwrap();
    let repository = Arc::new(FileTargetRepository::new(temp.path()).unwrap());
    let h = setup_with(overworld_config(&[], &["CHERRY_GROVE"]), repository.clone());
    let player = h.server.join("Steve", Location::at("W", 0.0, 64.0, 0.0), DimensionBucket::Normal);
    h.biomes.place("CHERRY_GROVE", Location::at("W", -320.25, 90.5, 64.0));

    h.run(player, &["biome", "cherry_grove"]).await;
    h.settle().await;
    let searched = h.handle.current_target(player).await.unwrap().unwrap();

    h.handle.player_quit(player).await.unwrap();
    h.server.disconnect(player);
    assert!(h.handle.current_target(player).await.unwrap().is_none());
    h.runtime.shutdown().await.unwrap();

    // A fresh plugin instance reading the same directory.
    let reopened = Arc::new(FileTargetRepository::new(temp.path()).unwrap());
    let h = setup_with(overworld_config(&[], &["CHERRY_GROVE"]), reopened);
    h.server.rejoin(player, "Steve", Location::at("W", 0.0, 64.0, 0.0), DimensionBucket::Normal);
    h.handle.player_joined(player).await.unwrap();

    let restored = h.handle.current_target(player).await.unwrap().unwrap();
    assert_eq!(restored.kind(), CategoryKind::Biome);
    assert_eq!(restored.category(), searched.category());
    assert_eq!(restored.location().world, "W");
    assert!(
        restored
            .location()
            .position
            .distance(&searched.location().position)
            < 1e-9
    );
    assert_eq!(h.server.compass(player), Some(restored.location().clone()));

    let server = h.server.clone();
    assert!(
        eventually(|| server
            .player_messages(player)
            .contains(&"Your compass target has been restored: Cherry Grove".to_string()))
        .await
    );
}

#[tokio::test]
async fn test_legacy_record_restores_as_structure() {
    let temp = TempDir::new().unwrap();
    let player = PlayerId::random();
    fs::write(
        temp.path().join(format!("{}.json", player)),
        r#"{"structure-type":"STRONGHOLD","world":"W","x":12.0,"y":30.0,"z":-4.5}"#,
    )
    .unwrap();

    let repository = Arc::new(FileTargetRepository::new(temp.path()).unwrap());
    let h = setup_with(overworld_config(&["STRONGHOLD"], &[]), repository);
    h.server.rejoin(player, "Steve", Location::at("W", 0.0, 64.0, 0.0), DimensionBucket::Normal);
    h.handle.player_joined(player).await.unwrap();

    let target = h.handle.current_target(player).await.unwrap().unwrap();
    assert_eq!(target.kind(), CategoryKind::Structure);
    assert_eq!(target.category(), &id("STRONGHOLD"));
    assert_eq!(target.location(), &Location::at("W", 12.0, 30.0, -4.5));
}

#[tokio::test]
async fn test_record_for_missing_world_is_ignored() {
    let player = PlayerId::random();
    let stale = Target::structure(id("END_CITY"), Location::at("deleted_end", 0.0, 60.0, 0.0));
    let repository = Arc::new(compass_runtime::InMemoryTargetRepository::with_targets([(
        player, stale,
    )]));
    let h = setup_with(overworld_config(&[], &[]), repository);
    h.server.rejoin(player, "Steve", Location::at("W", 0.0, 64.0, 0.0), DimensionBucket::Normal);

    h.handle.player_joined(player).await.unwrap();

    assert!(h.handle.current_target(player).await.unwrap().is_none());
    assert!(h.server.compass(player).is_none());
    // The record is kept for when the world comes back.
    assert!(h.repository.exists(player));
}

#[tokio::test]
async fn test_join_without_record_is_silent() {
    let h = setup(overworld_config(&[], &[]));
    let player = h.server.join("Steve", Location::at("W", 0.0, 64.0, 0.0), DimensionBucket::Normal);

    h.handle.player_joined(player).await.unwrap();

    assert!(h.handle.current_target(player).await.unwrap().is_none());
    assert!(h.server.player_messages(player).is_empty());
}

#[tokio::test]
async fn test_storage_failures_never_reach_the_player() {
    let h = setup_with(overworld_config(&["IGLOO"], &[]), Arc::new(BrokenRepository));
    let player = h.server.join("Steve", Location::at("W", 0.0, 64.0, 0.0), DimensionBucket::Normal);
    h.structures.place("IGLOO", Location::at("W", 40.0, 64.0, 0.0));

    h.handle.player_joined(player).await.unwrap();
    h.run(player, &["igloo"]).await;

    let target = h.handle.current_target(player).await.unwrap().unwrap();
    assert_eq!(target.category(), &id("IGLOO"));
    assert_eq!(
        h.server.player_messages(player),
        vec![
            "Searching for nearest Igloo...",
            "Compass now pointing to Igloo!",
            "Distance: 40 blocks",
        ]
    );

    h.handle.player_quit(player).await.unwrap();
    assert!(h.handle.current_target(player).await.unwrap().is_none());
}
