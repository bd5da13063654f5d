//! Headless host for the enhanced compass runtime.
//!
//! Stands in for the game server: worlds, players and locatable features come
//! from a TOML scenario, and console lines (stdin or a script file) drive
//! joins, movement, item holding and `/enhancedcompass` commands.
//!
//! # Examples
//!
//! ```bash
//! cargo run -p compass-host -- crates/host/scenarios/demo.toml \
//!     --script crates/host/scenarios/demo.script
//! ```
mod config;
mod console;
mod dirs;
mod logging;
mod scenario;
mod world;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use compass_runtime::{ConfigLoader, FileTargetRepository, Runtime, RuntimeConfig};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use config::HostConfig;
use console::{Console, ConsoleLine};
use scenario::Scenario;
use world::{ConsoleOverlays, FeatureTable, ScriptedServer};

/// Headless scripted host for the enhanced compass plugin
#[derive(Parser, Debug)]
#[command(name = "compass-host")]
#[command(about = "Drive the enhanced compass runtime from a scenario file", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario describing worlds, players and locatable features
    scenario: PathBuf,

    /// Read console lines from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Plugin data directory (overrides COMPASS_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log to the log file only
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut host_config = HostConfig::from_env();
    if let Some(data_dir) = cli.data_dir.clone() {
        host_config.data_dir = data_dir;
    }

    let _guard = logging::setup_logging(&host_config.log_dir, !cli.quiet)?;

    let scenario = Scenario::load(&cli.scenario)?;
    tracing::info!(
        worlds = scenario.worlds.len(),
        players = scenario.players.len(),
        "Scenario loaded: {}",
        cli.scenario.display()
    );

    let server = ScriptedServer::from_scenario(&scenario);
    let repository = FileTargetRepository::new(host_config.players_dir()).with_context(|| {
        format!(
            "Failed to open player records: {}",
            host_config.players_dir().display()
        )
    })?;

    let runtime_config = RuntimeConfig::from_env();
    tracing::info!("Data directory: {}", host_config.data_dir.display());
    tracing::debug!(?runtime_config, "Building runtime...");

    let runtime = Runtime::builder()
        .config(runtime_config)
        .server(server.clone())
        .overlay_client(ConsoleOverlays::new(server.clone()))
        .structure_locator(FeatureTable::structures(&scenario))
        .biome_locator(FeatureTable::biomes(&scenario))
        .repository(Arc::new(repository))
        .config_loader(ConfigLoader::in_dir(&host_config.data_dir))
        .build()
        .context("Failed to start compass runtime")?;

    tracing::info!("Runtime started");

    let console = Console::new(runtime.handle(), server);
    let reader: Box<dyn AsyncBufRead + Unpin> = match &cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open script: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let session = run_console(&console, reader).await;

    runtime
        .shutdown()
        .await
        .context("Runtime did not shut down cleanly")?;
    tracing::info!("Host shutdown complete");

    session
}

async fn run_console(console: &Console, reader: Box<dyn AsyncBufRead + Unpin>) -> Result<()> {
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read console input")?
    {
        let parsed = match ConsoleLine::parse_line(&line) {
            None => continue,
            Some(Ok(parsed)) => parsed,
            Some(Err(error)) => {
                // Usage errors and `help` output both land here.
                let _ = error.print();
                continue;
            }
        };

        if console.execute(parsed).await?.is_break() {
            break;
        }
    }

    Ok(())
}
