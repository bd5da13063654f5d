//! Recording fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use compass_core::{
    CategoryId, CategoryKind, CompassConfig, DimensionBucket, LocateQuery, Location, PlayerId,
};
use compass_runtime::{
    CommandSender, CompassHandle, InMemoryTargetRepository, Message, Overlay, OverlayClient,
    OverlayId, Permission, PlayerView, Runtime, RuntimeConfig, Server, SettingsHandle,
    TargetRepository,
};

pub fn id(raw: &str) -> CategoryId {
    CategoryId::new(raw).unwrap()
}

// ============================================================================
// Server
// ============================================================================

#[derive(Default)]
struct ServerState {
    players: HashMap<PlayerId, PlayerView>,
    order: Vec<PlayerId>,
    permissions: HashMap<PlayerId, HashSet<Permission>>,
    worlds: HashSet<String>,
    messages: Vec<(CommandSender, Message)>,
    compass: HashMap<PlayerId, Location>,
}

#[derive(Default)]
pub struct FakeServer {
    state: Mutex<ServerState>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_world(&self, world: &str) {
        self.state.lock().unwrap().worlds.insert(world.to_owned());
    }

    /// Connects a player holding [`Permission::Use`].
    pub fn join(&self, name: &str, location: Location, dimension: DimensionBucket) -> PlayerId {
        let id = PlayerId::random();
        self.rejoin(id, name, location, dimension);
        id
    }

    pub fn rejoin(&self, id: PlayerId, name: &str, location: Location, dimension: DimensionBucket) {
        let mut state = self.state.lock().unwrap();
        state.worlds.insert(location.world.clone());
        state.players.insert(
            id,
            PlayerView {
                id,
                name: name.to_owned(),
                location,
                dimension,
                holding_compass: false,
            },
        );
        state.order.push(id);
        state
            .permissions
            .entry(id)
            .or_default()
            .insert(Permission::Use);
    }

    pub fn disconnect(&self, id: PlayerId) {
        let mut state = self.state.lock().unwrap();
        state.players.remove(&id);
        state.order.retain(|player| *player != id);
    }

    pub fn hold_compass(&self, id: PlayerId, holding: bool) {
        if let Some(view) = self.state.lock().unwrap().players.get_mut(&id) {
            view.holding_compass = holding;
        }
    }

    pub fn move_to(&self, id: PlayerId, location: Location, dimension: DimensionBucket) {
        let mut state = self.state.lock().unwrap();
        state.worlds.insert(location.world.clone());
        if let Some(view) = state.players.get_mut(&id) {
            view.location = location;
            view.dimension = dimension;
        }
    }

    pub fn grant(&self, id: PlayerId, permission: Permission) {
        self.state
            .lock()
            .unwrap()
            .permissions
            .entry(id)
            .or_default()
            .insert(permission);
    }

    pub fn revoke(&self, id: PlayerId, permission: Permission) {
        if let Some(granted) = self.state.lock().unwrap().permissions.get_mut(&id) {
            granted.remove(&permission);
        }
    }

    /// Plain text of every message sent to `recipient`, oldest first.
    pub fn messages(&self, recipient: CommandSender) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|(to, _)| *to == recipient)
            .map(|(_, message)| message.plain())
            .collect()
    }

    pub fn player_messages(&self, id: PlayerId) -> Vec<String> {
        self.messages(CommandSender::Player(id))
    }

    pub fn clear_messages(&self) {
        self.state.lock().unwrap().messages.clear();
    }

    pub fn compass(&self, id: PlayerId) -> Option<Location> {
        self.state.lock().unwrap().compass.get(&id).cloned()
    }
}

impl Server for FakeServer {
    fn online_players(&self) -> Vec<PlayerId> {
        self.state.lock().unwrap().order.clone()
    }

    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.state.lock().unwrap().players.get(&id).cloned()
    }

    fn world_exists(&self, world: &str) -> bool {
        self.state.lock().unwrap().worlds.contains(world)
    }

    fn has_permission(&self, id: PlayerId, permission: Permission) -> bool {
        self.state
            .lock()
            .unwrap()
            .permissions
            .get(&id)
            .is_some_and(|granted| granted.contains(&permission))
    }

    fn send_message(&self, recipient: &CommandSender, message: Message) {
        self.state
            .lock()
            .unwrap()
            .messages
            .push((*recipient, message));
    }

    fn point_compass(&self, id: PlayerId, location: &Location) {
        self.state
            .lock()
            .unwrap()
            .compass
            .insert(id, location.clone());
    }
}

// ============================================================================
// Overlay client
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    Show(PlayerId, OverlayId),
    Refresh(PlayerId, String),
    Hide(PlayerId, OverlayId),
}

#[derive(Default)]
pub struct RecordingOverlays {
    events: Mutex<Vec<OverlayEvent>>,
    visible: Mutex<HashMap<PlayerId, OverlayId>>,
}

impl RecordingOverlays {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<OverlayEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn shows(&self, player: PlayerId) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, OverlayEvent::Show(id, _) if *id == player))
            .count()
    }

    pub fn visible(&self, player: PlayerId) -> Option<OverlayId> {
        self.visible.lock().unwrap().get(&player).copied()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.lock().unwrap().len()
    }
}

impl OverlayClient for RecordingOverlays {
    fn show(&self, player: PlayerId, overlay: &Overlay) {
        self.events
            .lock()
            .unwrap()
            .push(OverlayEvent::Show(player, overlay.id));
        self.visible.lock().unwrap().insert(player, overlay.id);
    }

    fn refresh(&self, player: PlayerId, overlay: &Overlay) {
        self.events
            .lock()
            .unwrap()
            .push(OverlayEvent::Refresh(player, overlay.title_text()));
    }

    fn hide(&self, player: PlayerId, overlay: OverlayId) {
        self.events
            .lock()
            .unwrap()
            .push(OverlayEvent::Hide(player, overlay));
        let mut visible = self.visible.lock().unwrap();
        if visible.get(&player) == Some(&overlay) {
            visible.remove(&player);
        }
    }
}

// ============================================================================
// Locator
// ============================================================================

/// Holds locator calls until [`Gate::open`] is called.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    signal: Condvar,
}

impl Gate {
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.signal.notify_all();
    }

    fn wait(&self) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.signal.wait(open).unwrap();
        }
    }
}

/// Locator backed by a fixed table of feature locations.
///
/// A hit counts only when it lies in the origin's world and within the
/// query radius.
pub struct TableLocator {
    kind: CategoryKind,
    known: Mutex<Vec<CategoryId>>,
    features: Mutex<HashMap<CategoryId, Location>>,
    unchecked: Mutex<HashSet<CategoryId>>,
    calls: Mutex<Vec<CategoryId>>,
    call_count: AtomicUsize,
    gate: Mutex<Option<Arc<Gate>>>,
    panics: AtomicBool,
}

impl TableLocator {
    pub fn new(kind: CategoryKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            known: Mutex::new(Vec::new()),
            features: Mutex::new(HashMap::new()),
            unchecked: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            gate: Mutex::new(None),
            panics: AtomicBool::new(false),
        })
    }

    /// Registers `category` in the registry without placing any instance.
    pub fn know(&self, category: &str) {
        let category = id(category);
        let mut known = self.known.lock().unwrap();
        if !known.contains(&category) {
            known.push(category);
        }
    }

    pub fn place(&self, category: &str, location: Location) {
        self.know(category);
        self.features
            .lock()
            .unwrap()
            .insert(id(category), location);
    }

    /// Places `category` so it is returned whatever the query's world and
    /// radius.
    pub fn place_anywhere(&self, category: &str, location: Location) {
        self.place(category, location);
        self.unchecked.lock().unwrap().insert(id(category));
    }

    /// Every later `locate` call panics.
    pub fn break_locate(&self) {
        self.panics.store(true, Ordering::SeqCst);
    }

    pub fn hold_with(&self, gate: Arc<Gate>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<CategoryId> {
        self.calls.lock().unwrap().clone()
    }
}

impl compass_core::CategoryLocator for TableLocator {
    fn kind(&self) -> CategoryKind {
        self.kind
    }

    fn recognizes(&self, category: &CategoryId) -> bool {
        self.known.lock().unwrap().contains(category)
    }

    fn known_categories(&self) -> Vec<CategoryId> {
        self.known.lock().unwrap().clone()
    }

    fn locate(&self, query: &LocateQuery) -> Option<Location> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(query.category.clone());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait();
        }

        if self.panics.load(Ordering::SeqCst) {
            panic!("locator failure for {}", query.category);
        }

        let location = self.features.lock().unwrap().get(&query.category).cloned()?;
        if self.unchecked.lock().unwrap().contains(&query.category) {
            return Some(location);
        }
        let distance = query.origin.distance_to(&location)?;
        (distance <= query.radius.blocks() as f64).then_some(location)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub runtime: Runtime,
    pub handle: CompassHandle,
    pub server: Arc<FakeServer>,
    pub overlays: Arc<RecordingOverlays>,
    pub structures: Arc<TableLocator>,
    pub biomes: Arc<TableLocator>,
    pub repository: Arc<dyn TargetRepository>,
}

/// Config enabling `structures` and `biomes` in the overworld bucket.
pub fn overworld_config(structures: &[&str], biomes: &[&str]) -> CompassConfig {
    let mut config = CompassConfig::new();
    for raw in structures {
        config = config.with_enabled(CategoryKind::Structure, DimensionBucket::Normal, id(raw));
    }
    for raw in biomes {
        config = config.with_enabled(CategoryKind::Biome, DimensionBucket::Normal, id(raw));
    }
    config
}

/// Runtime without an automatic refresh interval; tests call `tick()`.
pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        refresh_interval: None,
        command_buffer_size: 16,
        restore_notice_delay: Duration::ZERO,
    }
}

pub fn setup(config: CompassConfig) -> Harness {
    setup_with(config, Arc::new(InMemoryTargetRepository::new()))
}

pub fn setup_with(config: CompassConfig, repository: Arc<dyn TargetRepository>) -> Harness {
    let server = FakeServer::new();
    let overlays = RecordingOverlays::new();
    let structures = TableLocator::new(CategoryKind::Structure);
    let biomes = TableLocator::new(CategoryKind::Biome);

    let runtime = Runtime::builder()
        .config(test_config())
        .server(server.clone())
        .overlay_client(overlays.clone())
        .structure_locator(structures.clone())
        .biome_locator(biomes.clone())
        .repository(repository.clone())
        .settings(SettingsHandle::new(config))
        .build()
        .unwrap();

    Harness {
        handle: runtime.handle(),
        runtime,
        server,
        overlays,
        structures,
        biomes,
        repository,
    }
}

impl Harness {
    pub async fn run(&self, player: PlayerId, args: &[&str]) {
        self.handle
            .dispatch(CommandSender::Player(player), args.iter().copied())
            .await
            .unwrap();
    }

    /// Waits until every background search has been resumed on the worker.
    pub async fn settle(&self) {
        for _ in 0..500 {
            if self.handle.pending_searches().await.unwrap() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background searches did not finish");
    }
}

/// Polls `check` until it holds or a few seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..500 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
