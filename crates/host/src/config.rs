//! Host configuration resolved from flags and the environment.
use std::env;
use std::path::PathBuf;

use crate::dirs;

/// Where the host keeps plugin data.
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Holds `config.toml` and the `players/` record directory.
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl HostConfig {
    /// Construct host configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COMPASS_DATA_DIR` - plugin data directory (default: platform data dir)
    /// - `COMPASS_LOG_DIR` - log directory (default: platform cache dir)
    pub fn from_env() -> Self {
        Self {
            data_dir: read_env("COMPASS_DATA_DIR").unwrap_or_else(dirs::data_dir),
            log_dir: read_env("COMPASS_LOG_DIR").unwrap_or_else(dirs::log_dir),
        }
    }

    pub fn players_dir(&self) -> PathBuf {
        self.data_dir.join("players")
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
