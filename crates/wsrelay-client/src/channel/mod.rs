//! The reconnecting message channel.
//!
//! A [`Channel`] owns one logical connection to a remote endpoint. The
//! consumer handle is cheap and non-blocking: every operation either
//! forwards a command to the runner task or reads the shared snapshot.

pub(crate) mod runner;
pub mod state;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use wsrelay_core::error::Result;
use wsrelay_core::protocol::Envelope;

use crate::config::ChannelConfig;
use crate::dispatch::{Dispatcher, MessageHandler};
use crate::events::ChannelEvent;
use crate::obs::StatsSnapshot;

use runner::{Command, Runner};
use state::Shared;

pub use state::LifecycleState;

/// Consumer handle for one reconnecting message channel.
///
/// Owned by exactly one consumer. Dropping the handle shuts the runner
/// down and cancels its timers.
pub struct Channel {
    shared: Arc<Shared>,
    dispatcher: Arc<Dispatcher>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    events: Option<mpsc::UnboundedReceiver<ChannelEvent>>,
}

impl Channel {
    /// Validate the config and spawn the runner. Must be called within a
    /// tokio runtime. The channel starts `disconnected`; call
    /// [`Channel::connect`] to dial.
    pub fn new(cfg: ChannelConfig) -> Result<Self> {
        cfg.validate()?;

        let shared = Arc::new(Shared::new());
        let dispatcher = Arc::new(Dispatcher::new());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(
            Runner::new(
                cfg,
                Arc::clone(&shared),
                Arc::clone(&dispatcher),
                event_tx,
                cmd_rx,
            )
            .run(),
        );

        Ok(Self {
            shared,
            dispatcher,
            cmd_tx,
            events: Some(event_rx),
        })
    }

    /// Ask the runner to dial. No-op while already connected with a live
    /// transport.
    pub fn connect(&self) {
        self.command(Command::Connect);
    }

    /// Tear the connection down and stay down: cancels the reconnect and
    /// liveness timers, closes the transport. Idempotent.
    pub fn disconnect(&self) {
        self.command(Command::Disconnect);
    }

    /// Tear down, reset the attempt counter, and dial again after a short
    /// grace delay.
    pub fn reconnect(&self) {
        self.command(Command::Reconnect);
    }

    /// Wrap `data` in an envelope (fresh timestamp + correlation id) and
    /// transmit it. Returns whether transmission was attempted; delivery is
    /// not guaranteed. Logs a warning and returns `false` while not
    /// connected.
    pub fn send(&self, msg_type: &str, data: Value) -> bool {
        if !self.is_connected() {
            tracing::warn!(%msg_type, state = %self.state(), "send while not connected");
            return false;
        }
        match Envelope::outbound(msg_type, data).to_frame() {
            Ok(frame) => self.cmd_tx.send(Command::Transmit(frame)).is_ok(),
            Err(e) => {
                tracing::warn!(%msg_type, error = %e, "failed to serialize outbound envelope");
                false
            }
        }
    }

    /// Transmit a pre-built frame without wrapping it. Same precondition and
    /// return contract as [`Channel::send`].
    pub fn send_raw(&self, frame: impl Into<String>) -> bool {
        if !self.is_connected() {
            tracing::warn!(state = %self.state(), "send_raw while not connected");
            return false;
        }
        self.cmd_tx.send(Command::Transmit(frame.into())).is_ok()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LifecycleState::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.state() == LifecycleState::Connecting
    }

    /// Most recent consumer-visible inbound envelope.
    pub fn last_message(&self) -> Option<Envelope> {
        self.shared.last_message()
    }

    /// Last recorded error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.shared.last_error()
    }

    /// Snapshot of the bounded message history, oldest first.
    pub fn history(&self) -> Vec<Envelope> {
        self.shared.history_snapshot()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Register a handler for one envelope type.
    pub fn register_handler(&self, handler: Arc<dyn MessageHandler>) {
        self.dispatcher.register(handler);
    }

    /// Take the event receiver. Yields `None` after the first call; the
    /// channel has exactly one consumer.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ChannelEvent>> {
        self.events.take()
    }

    fn command(&self, cmd: Command) {
        // the runner outlives the handle, so this only fails mid-teardown
        let _ = self.cmd_tx.send(cmd);
    }
}
