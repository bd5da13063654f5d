//! Boundary to the game server that embeds the plugin.
//!
//! The server owns players, worlds, chat and client-side rendering. The
//! runtime only reaches it through [`Server`] and [`OverlayClient`], and only
//! from the plugin worker, which stands in for the server's main thread.

use compass_core::{DimensionBucket, Location, PlayerId};

use crate::message::Message;
use crate::overlay::{Overlay, OverlayId};

/// Permission nodes checked by the command layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Search, inspect the current target, and see the overlay.
    Use,
    /// Reload the configuration.
    Reload,
}

impl Permission {
    pub const fn node(self) -> &'static str {
        match self {
            Permission::Use => "enhancedcompass.use",
            Permission::Reload => "enhancedcompass.reload",
        }
    }
}

/// Who issued a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandSender {
    Console,
    Player(PlayerId),
}

impl CommandSender {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            CommandSender::Player(id) => Some(*id),
            CommandSender::Console => None,
        }
    }
}

/// Snapshot of a connected player, taken on the worker.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub location: Location,
    pub dimension: DimensionBucket,
    /// Whether the tracked item is in either hand.
    pub holding_compass: bool,
}

/// Server capabilities the plugin consumes.
pub trait Server: Send + Sync {
    /// Every currently connected player.
    fn online_players(&self) -> Vec<PlayerId>;

    /// Snapshot of a connected player, `None` once they have left.
    fn player(&self, id: PlayerId) -> Option<PlayerView>;

    fn world_exists(&self, world: &str) -> bool;

    fn has_permission(&self, id: PlayerId, permission: Permission) -> bool;

    fn send_message(&self, recipient: &CommandSender, message: Message);

    /// Points the player's native compass needle at `location`.
    fn point_compass(&self, id: PlayerId, location: &Location);
}

/// Client-side status bar rendering.
///
/// Implementations must treat calls for a player who just disconnected as
/// no-ops.
pub trait OverlayClient: Send + Sync {
    fn show(&self, player: PlayerId, overlay: &Overlay);

    fn refresh(&self, player: PlayerId, overlay: &Overlay);

    fn hide(&self, player: PlayerId, overlay: OverlayId);
}
