//! Console lines that drive a scripted session.
//!
//! Each line is one of the commands below, parsed with clap in multicall mode
//! so the first word selects the command. Blank lines and lines starting with
//! `#` are skipped.
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use compass_core::{Location, PlayerId};
use compass_runtime::{CommandSender, CompassHandle, NOT_IN_SAME_REGION};
use tracing::debug;

use crate::world::ScriptedServer;

#[derive(Parser, Debug, PartialEq)]
#[command(multicall = true)]
pub enum ConsoleLine {
    /// Connect a scenario player at their spawn point
    Join { name: String },

    /// Disconnect a player
    Quit { name: String },

    /// Put the compass in the player's hand
    Hold { name: String },

    /// Put the compass away
    Stow { name: String },

    /// Teleport a player
    #[command(allow_negative_numbers = true)]
    Tp {
        name: String,
        world: String,
        x: f64,
        y: f64,
        z: f64,
    },

    /// Run /enhancedcompass as a player, or as `console`
    Run {
        sender: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Tab-complete the last argument of /enhancedcompass
    Complete {
        sender: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show a player's current target and overlay
    Status { name: String },

    /// Run one overlay refresh pass
    Tick,

    /// Wait for background searches to finish
    Wait,

    /// Pause the script
    Sleep { millis: u64 },

    /// Stop the host
    #[command(alias = "stop")]
    Exit,
}

impl ConsoleLine {
    /// Parses one console line. `None` for blank lines and comments.
    pub fn parse_line(line: &str) -> Option<Result<Self, clap::Error>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(Self::try_parse_from(line.split_whitespace()))
    }
}

/// Executes console lines against the runtime.
pub struct Console {
    handle: CompassHandle,
    server: Arc<ScriptedServer>,
}

impl Console {
    pub fn new(handle: CompassHandle, server: Arc<ScriptedServer>) -> Self {
        Self { handle, server }
    }

    /// Runs one line. Unknown players are reported, not treated as errors;
    /// an error here means the runtime is gone.
    pub async fn execute(&self, line: ConsoleLine) -> Result<ControlFlow<()>> {
        debug!(target: "compass::host", ?line, "console line");

        match line {
            ConsoleLine::Join { name } => match self.server.connect(&name) {
                Some(id) => {
                    println!("{name} joined the game");
                    self.handle.player_joined(id).await?;
                }
                None => println!("No player named '{name}' in the scenario"),
            },
            ConsoleLine::Quit { name } => {
                if let Some(id) = self.online(&name) {
                    self.handle.player_quit(id).await?;
                    self.server.disconnect(id);
                    println!("{name} left the game");
                }
            }
            ConsoleLine::Hold { name } => {
                if let Some(id) = self.online(&name) {
                    self.server.set_holding(id, true);
                }
            }
            ConsoleLine::Stow { name } => {
                if let Some(id) = self.online(&name) {
                    self.server.set_holding(id, false);
                }
            }
            ConsoleLine::Tp {
                name,
                world,
                x,
                y,
                z,
            } => {
                if let Some(id) = self.online(&name)
                    && !self.server.teleport(id, Location::at(world.clone(), x, y, z))
                {
                    println!("No world named '{world}'");
                }
            }
            ConsoleLine::Run { sender, args } => {
                if let Some(sender) = self.sender(&sender) {
                    self.handle.dispatch(sender, args).await?;
                }
            }
            ConsoleLine::Complete { sender, args } => {
                if let Some(sender) = self.sender(&sender) {
                    let suggestions = self.handle.complete(sender, args).await?;
                    println!("{}", suggestions.join(" "));
                }
            }
            ConsoleLine::Status { name } => {
                if let Some(id) = self.online(&name) {
                    self.status(&name, id).await?;
                }
            }
            ConsoleLine::Tick => self.handle.tick().await?,
            ConsoleLine::Wait => self.wait_for_searches().await?,
            ConsoleLine::Sleep { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            ConsoleLine::Exit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn online(&self, name: &str) -> Option<PlayerId> {
        let id = self.server.online_id(name);
        if id.is_none() {
            println!("{name} is not online");
        }
        id
    }

    fn sender(&self, name: &str) -> Option<CommandSender> {
        if name.eq_ignore_ascii_case("console") {
            return Some(CommandSender::Console);
        }
        self.online(name).map(CommandSender::Player)
    }

    async fn status(&self, name: &str, id: PlayerId) -> Result<()> {
        match self.handle.current_target(id).await? {
            Some(target) => println!(
                "{name}: tracking {} at {}",
                target.labelled_name(),
                target.location()
            ),
            None => println!("{name}: no target"),
        }

        if let Some(overlay) = self.handle.overlay(id).await? {
            let title = overlay.title_text();
            let marker = if title.ends_with(NOT_IN_SAME_REGION) {
                " (other world)"
            } else {
                ""
            };
            println!("{name}: overlay {} \"{title}\"{marker}", overlay.id);
        }

        Ok(())
    }

    async fn wait_for_searches(&self) -> Result<()> {
        while self.handle.pending_searches().await? > 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        Ok(())
    }
}
