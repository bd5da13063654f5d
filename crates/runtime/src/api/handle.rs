//! Cloneable façade for issuing commands to the plugin worker.
//!
//! [`CompassHandle`] hides channel plumbing. Every call is answered by the
//! worker once it has been applied, so callers observe a consistent order.
use tokio::sync::{mpsc, oneshot};

use compass_core::{PlayerId, Target};

use super::errors::{Result, RuntimeError};
use crate::host::CommandSender;
use crate::overlay::Overlay;
use crate::workers::Command;

/// Client-facing handle to interact with the plugin runtime.
#[derive(Clone)]
pub struct CompassHandle {
    command_tx: mpsc::Sender<Command>,
}

impl CompassHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Run `/enhancedcompass` with `args`. Feedback goes to the sender
    /// through the server.
    pub async fn dispatch<I, S>(&self, sender: CommandSender, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.request(|reply| Command::Dispatch {
            sender,
            args,
            reply,
        })
        .await
    }

    /// Completion candidates for the last argument.
    pub async fn complete<I, S>(&self, sender: CommandSender, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.request(|reply| Command::Complete {
            sender,
            args,
            reply,
        })
        .await
    }

    /// Restore the player's saved target.
    pub async fn player_joined(&self, player: PlayerId) -> Result<()> {
        self.request(|reply| Command::PlayerJoined { player, reply })
            .await
    }

    /// Hide the overlay, save the target and release the session.
    pub async fn player_quit(&self, player: PlayerId) -> Result<()> {
        self.request(|reply| Command::PlayerQuit { player, reply })
            .await
    }

    /// Run one overlay refresh pass now.
    pub async fn tick(&self) -> Result<()> {
        self.request(|reply| Command::Tick { reply }).await
    }

    pub async fn current_target(&self, player: PlayerId) -> Result<Option<Target>> {
        self.request(|reply| Command::CurrentTarget { player, reply })
            .await
    }

    pub async fn overlay(&self, player: PlayerId) -> Result<Option<Overlay>> {
        self.request(|reply| Command::Overlay { player, reply })
            .await
    }

    /// Number of background searches not yet resumed on the worker.
    pub async fn pending_searches(&self) -> Result<usize> {
        self.request(|reply| Command::PendingSearches { reply })
            .await
    }

    /// Hide every overlay, clear all state and stop the worker.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}
