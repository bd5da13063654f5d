//! In-process stand-ins for the game server, its overlay renderer and its
//! feature registries, all built from a [`Scenario`].
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use compass_core::{
    CategoryId, CategoryKind, CategoryLocator, DimensionBucket, LocateQuery, Location, PlayerId,
};
use compass_runtime::{
    CommandSender, Message, Overlay, OverlayClient, OverlayId, Permission, PlayerView, Server,
};
use tracing::debug;

use crate::scenario::{FeatureSpec, PlayerSpec, Scenario};

// ============================================================================
// Server
// ============================================================================

#[derive(Default)]
struct WorldState {
    worlds: HashMap<String, DimensionBucket>,
    roster: HashMap<String, (PlayerId, PlayerSpec)>,
    online: Vec<PlayerId>,
    players: HashMap<PlayerId, PlayerView>,
    ops: HashSet<PlayerId>,
}

/// Scripted game server. Chat and compass updates are printed to stdout.
pub struct ScriptedServer {
    state: RwLock<WorldState>,
}

impl ScriptedServer {
    pub fn from_scenario(scenario: &Scenario) -> Arc<Self> {
        let mut state = WorldState::default();
        for world in &scenario.worlds {
            state.worlds.insert(world.name.clone(), world.dimension);
        }
        for player in &scenario.players {
            let id = player.id.unwrap_or_else(PlayerId::random);
            if player.op {
                state.ops.insert(id);
            }
            state
                .roster
                .insert(player.name.to_lowercase(), (id, player.clone()));
        }

        Arc::new(Self {
            state: RwLock::new(state),
        })
    }

    /// Brings a roster player online at their scenario spawn point.
    pub fn connect(&self, name: &str) -> Option<PlayerId> {
        let mut state = self.write();
        let (id, spec) = state.roster.get(&name.to_lowercase()).cloned()?;
        let dimension = state.worlds.get(&spec.world).copied()?;

        if !state.online.contains(&id) {
            state.online.push(id);
        }
        state.players.insert(
            id,
            PlayerView {
                id,
                name: spec.name,
                location: Location::new(spec.world, spec.position),
                dimension,
                holding_compass: false,
            },
        );
        Some(id)
    }

    pub fn disconnect(&self, id: PlayerId) {
        let mut state = self.write();
        state.online.retain(|online| *online != id);
        state.players.remove(&id);
    }

    /// Id of an online player by case-insensitive name.
    pub fn online_id(&self, name: &str) -> Option<PlayerId> {
        let state = self.read();
        let (id, _) = state.roster.get(&name.to_lowercase())?;
        state.players.contains_key(id).then_some(*id)
    }

    pub fn name_of(&self, id: PlayerId) -> String {
        self.read()
            .players
            .get(&id)
            .map(|view| view.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn set_holding(&self, id: PlayerId, holding: bool) {
        if let Some(view) = self.write().players.get_mut(&id) {
            view.holding_compass = holding;
        }
    }

    /// Teleports an online player. Returns `false` for an unknown world.
    pub fn teleport(&self, id: PlayerId, location: Location) -> bool {
        let mut state = self.write();
        let Some(dimension) = state.worlds.get(&location.world).copied() else {
            return false;
        };
        match state.players.get_mut(&id) {
            Some(view) => {
                view.location = location;
                view.dimension = dimension;
                true
            }
            None => false,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, WorldState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, WorldState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Server for ScriptedServer {
    fn online_players(&self) -> Vec<PlayerId> {
        self.read().online.clone()
    }

    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.read().players.get(&id).cloned()
    }

    fn world_exists(&self, world: &str) -> bool {
        self.read().worlds.contains_key(world)
    }

    fn has_permission(&self, id: PlayerId, permission: Permission) -> bool {
        let granted = match permission {
            Permission::Use => true,
            Permission::Reload => self.read().ops.contains(&id),
        };
        debug!(
            target: "compass::host",
            player = %id,
            node = permission.node(),
            granted,
            "permission check"
        );
        granted
    }

    fn send_message(&self, recipient: &CommandSender, message: Message) {
        let to = match recipient {
            CommandSender::Console => "console".to_string(),
            CommandSender::Player(id) => self.name_of(*id),
        };
        println!("[{to}] {message}");
    }

    fn point_compass(&self, id: PlayerId, location: &Location) {
        debug!(target: "compass::host", player = %id, %location, "compass needle moved");
        println!("[{}] (compass -> {location})", self.name_of(id));
    }
}

// ============================================================================
// Overlay client
// ============================================================================

/// Prints overlay changes, skipping refreshes that leave the title as is.
pub struct ConsoleOverlays {
    server: Arc<ScriptedServer>,
    titles: RwLock<HashMap<PlayerId, String>>,
}

impl ConsoleOverlays {
    pub fn new(server: Arc<ScriptedServer>) -> Arc<Self> {
        Arc::new(Self {
            server,
            titles: RwLock::new(HashMap::new()),
        })
    }
}

impl OverlayClient for ConsoleOverlays {
    fn show(&self, player: PlayerId, overlay: &Overlay) {
        println!("[{}] (overlay {} shown)", self.server.name_of(player), overlay.id);
    }

    fn refresh(&self, player: PlayerId, overlay: &Overlay) {
        let title = overlay.title_text();
        let mut titles = self.titles.write().unwrap_or_else(PoisonError::into_inner);
        if titles.get(&player) == Some(&title) {
            return;
        }
        println!("[{}] (overlay) {title}", self.server.name_of(player));
        titles.insert(player, title);
    }

    fn hide(&self, player: PlayerId, overlay: OverlayId) {
        self.titles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player);
        println!("[{}] (overlay {overlay} hidden)", self.server.name_of(player));
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Registry of placed features for one category kind.
///
/// A search returns the closest placed instance in the origin's world that
/// lies within the query radius.
pub struct FeatureTable {
    kind: CategoryKind,
    registry: BTreeSet<CategoryId>,
    features: Vec<(CategoryId, Location)>,
}

impl FeatureTable {
    pub fn new(kind: CategoryKind, features: &[FeatureSpec], extra: &[CategoryId]) -> Self {
        let features: Vec<(CategoryId, Location)> = features
            .iter()
            .map(|spec| {
                (
                    spec.category.clone(),
                    Location::new(spec.world.clone(), spec.position),
                )
            })
            .collect();
        let registry = features
            .iter()
            .map(|(category, _)| category.clone())
            .chain(extra.iter().cloned())
            .collect();

        Self {
            kind,
            registry,
            features,
        }
    }

    pub fn structures(scenario: &Scenario) -> Arc<Self> {
        Arc::new(Self::new(
            CategoryKind::Structure,
            &scenario.structures,
            &scenario.registry.structures,
        ))
    }

    pub fn biomes(scenario: &Scenario) -> Arc<Self> {
        Arc::new(Self::new(
            CategoryKind::Biome,
            &scenario.biomes,
            &scenario.registry.biomes,
        ))
    }
}

impl CategoryLocator for FeatureTable {
    fn kind(&self) -> CategoryKind {
        self.kind
    }

    fn recognizes(&self, category: &CategoryId) -> bool {
        self.registry.contains(category)
    }

    fn known_categories(&self) -> Vec<CategoryId> {
        self.registry.iter().cloned().collect()
    }

    fn locate(&self, query: &LocateQuery) -> Option<Location> {
        let limit = query.radius.blocks() as f64;
        self.features
            .iter()
            .filter(|(category, _)| *category == query.category)
            .filter_map(|(_, location)| {
                let distance = query.origin.distance_to(location)?;
                (distance <= limit).then_some((distance, location))
            })
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, location)| location.clone())
    }
}

#[cfg(test)]
mod tests {
    use compass_core::{Position, SearchRadius};

    use super::*;

    fn id(raw: &str) -> CategoryId {
        CategoryId::new(raw).unwrap()
    }

    fn feature(category: &str, world: &str, x: f64) -> FeatureSpec {
        FeatureSpec {
            category: id(category),
            world: world.into(),
            position: Position::new(x, 64.0, 0.0),
        }
    }

    fn query(category: &str, chunks: u32) -> LocateQuery {
        LocateQuery {
            origin: Location::at("world", 0.0, 64.0, 0.0),
            dimension: DimensionBucket::Normal,
            category: id(category),
            radius: SearchRadius::chunks(chunks),
        }
    }

    #[test]
    fn locate_picks_closest_in_same_world_within_radius() {
        let table = FeatureTable::new(
            CategoryKind::Structure,
            &[
                feature("IGLOO", "world", 300.0),
                feature("IGLOO", "world", -120.0),
                feature("IGLOO", "other", 5.0),
                feature("MANSION", "world", 10.0),
            ],
            &[id("STRONGHOLD")],
        );

        assert_eq!(
            table.locate(&query("igloo", 100)),
            Some(Location::at("world", -120.0, 64.0, 0.0))
        );
        // 5 chunks = 80 blocks
        assert_eq!(table.locate(&query("igloo", 5)), None);
        assert_eq!(table.locate(&query("stronghold", 100)), None);
        assert!(table.recognizes(&id("STRONGHOLD")));
        assert_eq!(
            table.known_categories(),
            vec![id("IGLOO"), id("MANSION"), id("STRONGHOLD")]
        );
    }
}
