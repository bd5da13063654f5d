//! State owned by the plugin worker and the operations shared by every
//! command path.

use std::sync::Arc;

use compass_core::{CompassConfig, PlayerId, Target};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ConfigLoader, SettingsHandle};
use crate::host::{CommandSender, OverlayClient, Server};
use crate::message::{Message, TextColor};
use crate::overlay::OverlayManager;
use crate::repository::TargetRepository;
use crate::search::{Locators, SearchCompletion};
use crate::store::TargetStore;

/// How a finalized search announces itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Announce {
    /// One named category was searched.
    Direct,
    /// The winner of a closest-of-N search; the category is named first.
    Found,
}

pub(crate) struct PluginContext {
    pub server: Arc<dyn Server>,
    pub locators: Locators,
    pub repository: Arc<dyn TargetRepository>,
    pub settings: SettingsHandle,
    pub loader: Option<ConfigLoader>,
    pub targets: TargetStore,
    pub overlays: OverlayManager,
}

impl PluginContext {
    pub fn new(
        server: Arc<dyn Server>,
        overlay_client: Arc<dyn OverlayClient>,
        locators: Locators,
        repository: Arc<dyn TargetRepository>,
        settings: SettingsHandle,
        loader: Option<ConfigLoader>,
    ) -> Self {
        Self {
            server,
            locators,
            repository,
            settings,
            loader,
            targets: TargetStore::new(),
            overlays: OverlayManager::new(overlay_client),
        }
    }

    pub fn settings(&self) -> Arc<CompassConfig> {
        self.settings.snapshot()
    }

    pub fn send(&self, to: &CommandSender, message: Message) {
        self.server.send_message(to, message);
    }

    pub fn send_player(&self, player: PlayerId, message: Message) {
        self.server.send_message(&CommandSender::Player(player), message);
    }

    /// Points the compass, replaces the stored target, persists it and
    /// reports the result. The distance line is left out when no distance
    /// could be measured.
    pub fn finalize(
        &mut self,
        player: PlayerId,
        target: Target,
        distance: Option<f64>,
        announce: Announce,
    ) {
        self.server.point_compass(player, target.location());

        info!(
            target: "compass::search",
            %player,
            kind = %target.kind(),
            category = %target.category(),
            location = %target.location(),
            "target set"
        );

        let display = target.display_name();
        let labelled = target.labelled_name();
        self.persist(player, &target);
        self.targets.set(player, target);

        if announce == Announce::Found {
            self.send_player(player, Message::success(format!("Found {display}!")));
        }
        self.send_player(
            player,
            Message::success(format!("Compass now pointing to {labelled}!")),
        );
        if let Some(distance) = distance {
            self.send_player(player, Message::distance(distance));
        }
    }

    /// Saves the player's target, logging failures without surfacing them.
    pub fn persist(&self, player: PlayerId, target: &Target) {
        if let Err(error) = self.repository.save(player, target) {
            warn!(
                target: "compass::repository",
                %player,
                %error,
                "failed to save compass target"
            );
        }
    }

    /// Reports a finished single-category search on the worker.
    pub fn complete_search(&mut self, completion: SearchCompletion) {
        let SearchCompletion {
            player,
            kind,
            query,
            found,
        } = completion;

        let Some(view) = self.server.player(player) else {
            debug!(
                target: "compass::search",
                %player,
                category = %query.category,
                "player left before search finished"
            );
            return;
        };

        let Some(location) = found else {
            self.send_player(
                player,
                Message::error(format!(
                    "No {} found within {} blocks.",
                    kind.labelled(&query.category),
                    query.radius.blocks()
                )),
            );
            return;
        };

        // The player may have changed worlds while the search ran.
        let distance = view
            .location
            .distance_to(&location)
            .or_else(|| query.origin.distance_to(&location));
        if distance.is_none() {
            debug!(
                target: "compass::search",
                %player,
                location = %location,
                "found location is in neither the player's nor the search's world"
            );
        }

        let target = Target::new(kind, query.category, location);
        self.finalize(player, target, distance, Announce::Direct);
    }

    /// Loads the player's saved target. Returns the name to announce.
    pub fn restore(&mut self, player: PlayerId) -> Option<String> {
        let target = match self.repository.load(player) {
            Ok(Some(target)) => target,
            Ok(None) => return None,
            Err(error) => {
                warn!(
                    target: "compass::repository",
                    %player,
                    %error,
                    "failed to load compass target"
                );
                return None;
            }
        };

        let world = &target.location().world;
        if !self.server.world_exists(world) {
            warn!(
                target: "compass::repository",
                %player,
                world = %world,
                "could not restore compass target: world not found"
            );
            return None;
        }

        self.server.point_compass(player, target.location());
        let name = target.display_name();
        debug!(
            target: "compass::repository",
            %player,
            category = %target.category(),
            "restored compass target"
        );
        self.targets.set(player, target);

        Some(name)
    }

    pub fn announce_restore(&self, player: PlayerId, name: &str) {
        if self.server.player(player).is_none() {
            return;
        }
        self.send_player(
            player,
            Message::success("Your compass target has been restored: ").then(name, TextColor::Aqua),
        );
    }

    /// Tears down the player's session, keeping the target on disk.
    pub fn release(&mut self, player: PlayerId) {
        self.overlays.remove(player);

        if let Some(target) = self.targets.get(player) {
            self.persist(player, target);
        }
        self.targets.remove(player);
    }

    /// Re-reads the config file and swaps the active snapshot.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let Some(loader) = &self.loader else {
            debug!(target: "compass::config", "no config file attached, keeping snapshot");
            return Ok(());
        };

        let config = loader.load()?;
        self.settings.replace(config);
        info!(target: "compass::config", "configuration reloaded from {}", loader.path().display());
        Ok(())
    }

    pub fn shutdown(&mut self) {
        let hidden = self.overlays.hide_all();
        let targets = self.targets.len();
        self.targets.clear();
        info!(target: "compass::worker", hidden, targets, "plugin state cleared");
    }
}
