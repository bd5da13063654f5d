//! Plugin configuration file loading and hot-reloadable snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use compass_core::CompassConfig;
use thiserror::Error;

/// Configuration file written on first start.
pub const DEFAULT_CONFIG: &str = include_str!("../assets/config.toml");

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write default config to {path}")]
    WriteDefault {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Reads [`CompassConfig`] snapshots from one TOML file.
#[derive(Clone, Debug)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for `config.toml` inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the file as it is now on disk.
    pub fn load(&self) -> Result<CompassConfig, ConfigError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse(&raw).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes [`DEFAULT_CONFIG`] if the file is missing, then loads it.
    pub fn load_or_init(&self) -> Result<CompassConfig, ConfigError> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::WriteDefault {
                    path: self.path.clone(),
                    source,
                })?;
            }
            fs::write(&self.path, DEFAULT_CONFIG).map_err(|source| ConfigError::WriteDefault {
                path: self.path.clone(),
                source,
            })?;
            tracing::info!(
                target: "compass::config",
                "wrote default config to {}",
                self.path.display()
            );
        }

        self.load()
    }
}

pub fn parse(raw: &str) -> Result<CompassConfig, toml::de::Error> {
    toml::from_str(raw)
}

/// Shared pointer to the active configuration snapshot.
///
/// Readers take a whole snapshot and keep using it; a reload swaps the
/// pointer, so no reader ever sees a half-updated configuration.
#[derive(Clone, Debug)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<CompassConfig>>>,
}

impl SettingsHandle {
    pub fn new(config: CompassConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    pub fn snapshot(&self) -> Arc<CompassConfig> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, config: CompassConfig) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(config);
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(CompassConfig::default())
    }
}
