//! Plugin worker that owns every player's target and overlay.
//!
//! The worker stands in for the server's main thread: commands, joins and
//! quits, refresh passes and resumed background searches all run here one at
//! a time, so the target store and overlay manager need no locks.

use std::future;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use compass_core::{PlayerId, Target};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::refresh::refresh;
use crate::commands;
use crate::context::PluginContext;
use crate::host::CommandSender;
use crate::overlay::Overlay;
use crate::search::{SearchCompletion, SingleSearch};

/// Commands that can be sent to the plugin worker.
pub enum Command {
    /// Run `/enhancedcompass <args>`. Replies once the command has been
    /// handled on the worker; a biome search may still be running.
    Dispatch {
        sender: CommandSender,
        args: Vec<String>,
        reply: oneshot::Sender<()>,
    },
    /// Tab completion for the last argument in `args`.
    Complete {
        sender: CommandSender,
        args: Vec<String>,
        reply: oneshot::Sender<Vec<String>>,
    },
    PlayerJoined {
        player: PlayerId,
        reply: oneshot::Sender<()>,
    },
    PlayerQuit {
        player: PlayerId,
        reply: oneshot::Sender<()>,
    },
    /// One refresh pass, outside the automatic interval.
    Tick { reply: oneshot::Sender<()> },
    CurrentTarget {
        player: PlayerId,
        reply: oneshot::Sender<Option<Target>>,
    },
    Overlay {
        player: PlayerId,
        reply: oneshot::Sender<Option<Overlay>>,
    },
    PendingSearches { reply: oneshot::Sender<usize> },
    /// Hide every overlay, clear all state and stop.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Work produced by the worker's own background tasks.
enum WorkerEvent {
    SearchFinished(SearchCompletion),
    SearchAborted { player: PlayerId },
    RestoreNotice { player: PlayerId, name: String },
}

pub struct PluginWorker {
    context: PluginContext,
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
    event_rx: mpsc::UnboundedReceiver<WorkerEvent>,
    refresh: Option<Interval>,
    restore_notice_delay: Duration,
    pending_searches: usize,
}

impl PluginWorker {
    pub(crate) fn new(
        context: PluginContext,
        command_rx: mpsc::Receiver<Command>,
        refresh_interval: Option<Duration>,
        restore_notice_delay: Duration,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let refresh = refresh_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        info!(
            target: "compass::worker",
            refresh_ms = refresh_interval.map(|period| period.as_millis() as u64),
            "PluginWorker initialized"
        );

        Self {
            context,
            command_rx,
            event_tx,
            event_rx,
            refresh,
            restore_notice_delay,
            pending_searches: 0,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).is_break() {
                            break;
                        }
                    }
                    None => {
                        self.context.shutdown();
                        break;
                    }
                },
                Some(event) = self.event_rx.recv() => self.handle_event(event),
                _ = next_refresh(&mut self.refresh) => refresh(&mut self.context),
            }
        }

        if self.pending_searches > 0 {
            debug!(
                target: "compass::worker",
                pending = self.pending_searches,
                "abandoning in-flight searches"
            );
        }
        info!(target: "compass::worker", "PluginWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) -> ControlFlow<()> {
        match cmd {
            Command::Dispatch {
                sender,
                args,
                reply,
            } => {
                if let Some(search) = commands::dispatch(&mut self.context, sender, args.as_slice()) {
                    self.spawn_search(search);
                }
                if reply.send(()).is_err() {
                    debug!(target: "compass::worker", "Dispatch reply channel closed (caller dropped)");
                }
            }
            Command::Complete {
                sender,
                args,
                reply,
            } => {
                let suggestions = commands::complete(&self.context, sender, args.as_slice());
                if reply.send(suggestions).is_err() {
                    debug!(target: "compass::worker", "Complete reply channel closed (caller dropped)");
                }
            }
            Command::PlayerJoined { player, reply } => {
                if let Some(name) = self.context.restore(player) {
                    self.schedule_restore_notice(player, name);
                }
                if reply.send(()).is_err() {
                    debug!(target: "compass::worker", "PlayerJoined reply channel closed (caller dropped)");
                }
            }
            Command::PlayerQuit { player, reply } => {
                self.context.release(player);
                if reply.send(()).is_err() {
                    debug!(target: "compass::worker", "PlayerQuit reply channel closed (caller dropped)");
                }
            }
            Command::Tick { reply } => {
                refresh(&mut self.context);
                if reply.send(()).is_err() {
                    debug!(target: "compass::worker", "Tick reply channel closed (caller dropped)");
                }
            }
            Command::CurrentTarget { player, reply } => {
                let target = self.context.targets.get(player).cloned();
                if reply.send(target).is_err() {
                    debug!(target: "compass::worker", "CurrentTarget reply channel closed (caller dropped)");
                }
            }
            Command::Overlay { player, reply } => {
                let overlay = self.context.overlays.get(player).cloned();
                if reply.send(overlay).is_err() {
                    debug!(target: "compass::worker", "Overlay reply channel closed (caller dropped)");
                }
            }
            Command::PendingSearches { reply } => {
                if reply.send(self.pending_searches).is_err() {
                    debug!(target: "compass::worker", "PendingSearches reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                self.context.shutdown();
                if reply.send(()).is_err() {
                    debug!(target: "compass::worker", "Shutdown reply channel closed (caller dropped)");
                }
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn handle_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::SearchFinished(completion) => {
                self.pending_searches = self.pending_searches.saturating_sub(1);
                self.context.complete_search(completion);
            }
            WorkerEvent::SearchAborted { player } => {
                self.pending_searches = self.pending_searches.saturating_sub(1);
                warn!(target: "compass::search", %player, "background search task failed");
            }
            WorkerEvent::RestoreNotice { player, name } => {
                self.context.announce_restore(player, &name);
            }
        }
    }

    /// Runs the locator on the blocking pool and posts the result back.
    fn spawn_search(&mut self, search: SingleSearch) {
        let locator = Arc::clone(self.context.locators.for_kind(search.kind));
        let events = self.event_tx.clone();
        let player = search.player;

        debug!(
            target: "compass::search",
            %player,
            category = %search.query.category,
            "starting background search"
        );
        self.pending_searches += 1;

        tokio::spawn(async move {
            let event = match tokio::task::spawn_blocking(move || search.run(locator.as_ref())).await
            {
                Ok(completion) => WorkerEvent::SearchFinished(completion),
                Err(error) => {
                    warn!(target: "compass::search", %player, %error, "locator task panicked");
                    WorkerEvent::SearchAborted { player }
                }
            };
            // Fails only once the worker has stopped.
            let _ = events.send(event);
        });
    }

    fn schedule_restore_notice(&self, player: PlayerId, name: String) {
        let events = self.event_tx.clone();
        let delay = self.restore_notice_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(WorkerEvent::RestoreNotice { player, name });
        });
    }
}

/// Next refresh instant, or never when the interval is disabled.
async fn next_refresh(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending::<()>().await,
    }
}
