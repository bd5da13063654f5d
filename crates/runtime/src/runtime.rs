//! High-level runtime orchestrator.
//!
//! The runtime owns the plugin worker, wires up its command channel, and
//! exposes a builder-based API for hosts to embed the plugin.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use compass_core::CategoryLocator;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{CompassHandle, Component, Result, RuntimeError};
use crate::config::{ConfigLoader, SettingsHandle};
use crate::context::PluginContext;
use crate::host::{OverlayClient, Server};
use crate::repository::TargetRepository;
use crate::search::Locators;
use crate::workers::PluginWorker;

/// Runtime configuration for the worker and its timers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Period of the overlay refresh loop. `None` leaves refreshing to
    /// explicit [`CompassHandle::tick`] calls.
    pub refresh_interval: Option<Duration>,
    pub command_buffer_size: usize,
    /// Delay before greeting a player whose target was restored on join.
    pub restore_notice_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Some(Duration::from_millis(500)),
            command_buffer_size: 64,
            restore_notice_delay: Duration::from_secs(1),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `COMPASS_REFRESH_MS` - Refresh period, `0` disables the interval (default: 500)
    /// - `COMPASS_COMMAND_BUFFER` - Worker command queue size (default: 64)
    /// - `COMPASS_RESTORE_NOTICE_MS` - Restore greeting delay (default: 1000)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("COMPASS_REFRESH_MS") {
            config.refresh_interval = (millis > 0).then(|| Duration::from_millis(millis));
        }

        if let Some(capacity) = read_env::<usize>("COMPASS_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        if let Some(millis) = read_env::<u64>("COMPASS_RESTORE_NOTICE_MS") {
            config.restore_notice_delay = Duration::from_millis(millis);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Embedded plugin instance.
///
/// [`CompassHandle`] provides a cloneable façade for host callbacks.
pub struct Runtime {
    handle: CompassHandle,
    settings: SettingsHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime.
    pub fn handle(&self) -> CompassHandle {
        self.handle.clone()
    }

    /// The live configuration pointer shared with the worker.
    pub fn settings(&self) -> SettingsHandle {
        self.settings.clone()
    }

    /// Hide every overlay, clear state and wait for the worker to stop.
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown().await {
            Ok(()) | Err(RuntimeError::CommandChannelClosed) => {}
            Err(RuntimeError::ReplyChannelClosed(_)) => {}
            Err(error) => return Err(error),
        }

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    server: Option<Arc<dyn Server>>,
    overlay_client: Option<Arc<dyn OverlayClient>>,
    structure_locator: Option<Arc<dyn CategoryLocator>>,
    biome_locator: Option<Arc<dyn CategoryLocator>>,
    repository: Option<Arc<dyn TargetRepository>>,
    settings: Option<SettingsHandle>,
    config_loader: Option<ConfigLoader>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            server: None,
            overlay_client: None,
            structure_locator: None,
            biome_locator: None,
            repository: None,
            settings: None,
            config_loader: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn server(mut self, server: Arc<dyn Server>) -> Self {
        self.server = Some(server);
        self
    }

    pub fn overlay_client(mut self, client: Arc<dyn OverlayClient>) -> Self {
        self.overlay_client = Some(client);
        self
    }

    pub fn structure_locator(mut self, locator: Arc<dyn CategoryLocator>) -> Self {
        self.structure_locator = Some(locator);
        self
    }

    pub fn biome_locator(mut self, locator: Arc<dyn CategoryLocator>) -> Self {
        self.biome_locator = Some(locator);
        self
    }

    pub fn repository(mut self, repository: Arc<dyn TargetRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Use an existing settings pointer instead of loading one.
    pub fn settings(mut self, settings: SettingsHandle) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Config file used by `reload`, and for the initial snapshot when no
    /// settings were given.
    pub fn config_loader(mut self, loader: ConfigLoader) -> Self {
        self.config_loader = Some(loader);
        self
    }

    /// Spawns the plugin worker. Must be called inside a Tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let server = self.server.ok_or(RuntimeError::MissingComponent {
            component: Component::Server,
        })?;
        let overlay_client = self.overlay_client.ok_or(RuntimeError::MissingComponent {
            component: Component::OverlayClient,
        })?;
        let structures = self.structure_locator.ok_or(RuntimeError::MissingComponent {
            component: Component::StructureLocator,
        })?;
        let biomes = self.biome_locator.ok_or(RuntimeError::MissingComponent {
            component: Component::BiomeLocator,
        })?;
        let repository = self.repository.ok_or(RuntimeError::MissingComponent {
            component: Component::Repository,
        })?;

        let settings = match (self.settings, &self.config_loader) {
            (Some(settings), _) => settings,
            (None, Some(loader)) => SettingsHandle::new(loader.load_or_init()?),
            (None, None) => SettingsHandle::default(),
        };

        let context = PluginContext::new(
            server,
            overlay_client,
            Locators::new(structures, biomes),
            repository,
            settings.clone(),
            self.config_loader,
        );

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let worker = PluginWorker::new(
            context,
            command_rx,
            self.config.refresh_interval,
            self.config.restore_notice_delay,
        );
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: CompassHandle::new(command_tx),
            settings,
            worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_plugin_timings() {
        let config = RuntimeConfig::default();
        assert_eq!(config.refresh_interval, Some(Duration::from_millis(500)));
        assert_eq!(config.restore_notice_delay, Duration::from_secs(1));
        assert_eq!(config.command_buffer_size, 64);
    }

    #[test]
    fn builder_reports_first_missing_component() {
        let error = Runtime::builder().build().err().unwrap();
        assert!(matches!(
            error,
            RuntimeError::MissingComponent {
                component: Component::Server
            }
        ));
        assert_eq!(error.to_string(), "runtime requires a server before building");
    }
}
