//! Platform-specific directory utilities
//!
//! Follows platform conventions for cache and data directories, with `/tmp`
//! and working-directory fallbacks when no home directory is known.

use std::path::PathBuf;

const APPLICATION: &str = "enhanced-compass";

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/enhanced-compass/logs`
/// - Linux: `~/.cache/enhanced-compass/logs` (or `$XDG_CACHE_HOME/...`)
/// - Windows: `%LOCALAPPDATA%\enhanced-compass\logs`
/// - Fallback: `/tmp/enhanced-compass/logs`
pub fn log_dir() -> PathBuf {
    let base_dir = directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp").join(APPLICATION));

    base_dir.join("logs")
}

/// Get the platform-specific data directory (config and player records)
///
/// - macOS: `~/Library/Application Support/enhanced-compass`
/// - Linux: `~/.local/share/enhanced-compass` (or `$XDG_DATA_HOME/...`)
/// - Windows: `%APPDATA%\enhanced-compass`
/// - Fallback: `./compass_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./compass_data"))
}
