//! Runtime for the enhanced compass plugin.
//!
//! This crate wires the tracking domain from `compass-core` into a single
//! worker task that owns every player's target and overlay, plus the
//! adapters a host server plugs into. Hosts embed [`Runtime`] and forward
//! their callbacks through [`CompassHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the handle and error types
//! - [`host`] defines what the embedding server must provide
//! - [`commands`] parses and completes `/enhancedcompass`
//! - [`overlay`] and [`store`] hold per-player session state
//! - [`config`] and [`repository`] load settings and player records
pub mod api;
pub mod commands;
pub mod config;
pub mod host;
pub mod message;
pub mod overlay;
pub mod repository;
pub mod runtime;
pub mod search;
pub mod store;

mod context;
mod workers;

pub use api::{CompassHandle, Component, Result, RuntimeError};
pub use commands::{CompassCommand, Verb, help_lines};
pub use config::{ConfigError, ConfigLoader, DEFAULT_CONFIG, SettingsHandle};
pub use host::{CommandSender, OverlayClient, Permission, PlayerView, Server};
pub use message::{Message, Span, TextColor, format_blocks};
pub use overlay::{Accent, BarColor, BarStyle, NOT_IN_SAME_REGION, Overlay, OverlayId, OverlayManager};
pub use repository::{
    FileTargetRepository, InMemoryTargetRepository, PlayerRecord, RepositoryError,
    TargetRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use search::Locators;
pub use store::TargetStore;
