//! Unified error types surfaced by the runtime API.
//!
//! Covers worker coordination and the initial configuration load. Player-facing
//! failures never appear here; they end as chat messages or log lines.
use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("plugin worker command channel closed")]
    CommandChannelClosed,

    #[error("plugin worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("plugin worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a {component} before building")]
    MissingComponent { component: Component },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Collaborators the builder cannot default.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Component {
    Server,
    OverlayClient,
    StructureLocator,
    BiomeLocator,
    Repository,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Component::Server => "server",
            Component::OverlayClient => "overlay client",
            Component::StructureLocator => "structure locator",
            Component::BiomeLocator => "biome locator",
            Component::Repository => "target repository",
        };
        write!(f, "{}", label)
    }
}
