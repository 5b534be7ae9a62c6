//! Connection runner: the task that owns the socket.
//!
//! The runner is the channel's actor boundary. It exclusively owns the
//! WebSocket and every piece of mutable connection state (attempt counter,
//! timers, intentional-close tracking); consumer handles reach it only
//! through the command queue. Observable state is mirrored into
//! [`Shared`], which the runner alone writes.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;

use wsrelay_core::protocol::Envelope;
use wsrelay_core::WsRelayError;

use crate::channel::state::{LifecycleState, Shared};
use crate::config::ChannelConfig;
use crate::dispatch::Dispatcher;
use crate::events::ChannelEvent;
use crate::transport::codec::{self, Inbound};
use crate::transport::{self, WsStream};

/// Grace period between the teardown half of `reconnect()` and the fresh
/// dial, so the previous transport finishes closing.
const RECONNECT_GRACE: Duration = Duration::from_millis(100);

/// Commands from the consumer handle.
#[derive(Debug)]
pub(crate) enum Command {
    Connect,
    Disconnect,
    Reconnect,
    /// Pre-serialized frame to transmit on the live transport.
    Transmit(String),
}

/// Why a dial-plus-session round ended.
enum SessionEnd {
    /// Consumer called `disconnect()`.
    Intentional,
    /// Transport closed or failed on its own.
    Unintentional,
    /// Consumer called `reconnect()`.
    Restart,
    /// The consumer handle was dropped.
    Dropped,
}

enum BackoffOutcome {
    Elapsed,
    Aborted,
    Dropped,
}

/// Result of a dial that stays responsive to commands.
enum DialOutcome {
    Done(wsrelay_core::Result<WsStream>),
    /// `reconnect()` arrived mid-dial; start over after the grace delay.
    Restart,
    /// `disconnect()` arrived mid-dial.
    Aborted,
    Dropped,
}

pub(crate) struct Runner {
    cfg: ChannelConfig,
    shared: Arc<Shared>,
    dispatcher: Arc<Dispatcher>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    /// Consecutive automatic reconnects scheduled since the last successful
    /// open (or explicit `reconnect()`).
    attempts: u32,
}

impl Runner {
    pub(crate) fn new(
        cfg: ChannelConfig,
        shared: Arc<Shared>,
        dispatcher: Arc<Dispatcher>,
        events: mpsc::UnboundedSender<ChannelEvent>,
        cmd_rx: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        Self {
            cfg,
            shared,
            dispatcher,
            events,
            cmd_rx,
            attempts: 0,
        }
    }

    /// Top-level loop: idle while disconnected, run dial/session cycles on
    /// demand, exit when the consumer handle is dropped.
    pub(crate) async fn run(mut self) {
        loop {
            let Some(cmd) = self.cmd_rx.recv().await else { break };
            let flow = match cmd {
                Command::Connect => self.session_cycle().await,
                Command::Reconnect => {
                    self.attempts = 0;
                    tokio::time::sleep(RECONNECT_GRACE).await;
                    self.session_cycle().await
                }
                Command::Disconnect => {
                    // idempotent while already down
                    self.shared.set_state(LifecycleState::Disconnected);
                    ControlFlow::Continue(())
                }
                Command::Transmit(_) => {
                    tracing::debug!("dropping outbound frame while disconnected");
                    ControlFlow::Continue(())
                }
            };
            if flow.is_break() {
                break;
            }
        }
        tracing::debug!("channel runner exiting");
    }

    /// One connect-until-idle cycle: dial, drive the session, and keep
    /// redialing on unintentional closes while the reconnect policy allows.
    async fn session_cycle(&mut self) -> ControlFlow<()> {
        loop {
            self.shared.set_state(LifecycleState::Connecting);

            let dialed = match self.dial().await {
                DialOutcome::Done(result) => result,
                DialOutcome::Restart => {
                    self.attempts = 0;
                    tokio::time::sleep(RECONNECT_GRACE).await;
                    continue;
                }
                DialOutcome::Aborted => {
                    self.shared.set_state(LifecycleState::Disconnected);
                    return ControlFlow::Continue(());
                }
                DialOutcome::Dropped => return ControlFlow::Break(()),
            };

            match dialed {
                Ok(ws) => {
                    // the cap counts consecutive failures
                    self.attempts = 0;
                    self.shared.stats.inc_connects();
                    self.shared.set_state(LifecycleState::Connected);
                    self.emit(ChannelEvent::Open);
                    self.emit(ChannelEvent::ConnectSuccess);
                    tracing::info!(endpoint = %self.cfg.endpoint, "channel connected");

                    match self.drive_session(ws).await {
                        SessionEnd::Intentional => {
                            self.shared.set_state(LifecycleState::Disconnected);
                            self.emit(ChannelEvent::Closed { intentional: true });
                            return ControlFlow::Continue(());
                        }
                        SessionEnd::Restart => {
                            self.attempts = 0;
                            self.shared.set_state(LifecycleState::Disconnected);
                            self.emit(ChannelEvent::Closed { intentional: true });
                            tokio::time::sleep(RECONNECT_GRACE).await;
                            continue;
                        }
                        SessionEnd::Dropped => return ControlFlow::Break(()),
                        SessionEnd::Unintentional => {
                            // a close lands the channel in `disconnected` only
                            // from a clean connected state; after a transport
                            // error the error state stays visible through the
                            // backoff wait
                            if self.shared.state() == LifecycleState::Connected {
                                self.shared.set_state(LifecycleState::Disconnected);
                            }
                            self.emit(ChannelEvent::Closed { intentional: false });
                            // fall through to the reconnect-eligibility check
                        }
                    }
                }
                Err(e @ WsRelayError::InvalidEndpoint(_)) => {
                    // synchronous construction failure: no close follows, so
                    // no automatic retry either; terminal for this connect
                    let msg = e.to_string();
                    tracing::warn!(error = %msg, "transport construction failed");
                    self.shared.set_error(msg.clone());
                    self.emit(ChannelEvent::Error(msg));
                    return ControlFlow::Continue(());
                }
                Err(e) => {
                    let msg = e.to_string();
                    tracing::warn!(endpoint = %self.cfg.endpoint, error = %msg, "connect failed");
                    self.shared.set_error(msg.clone());
                    self.emit(ChannelEvent::Error(msg));
                    self.emit(ChannelEvent::Closed { intentional: false });
                    // fall through to the reconnect-eligibility check
                }
            }

            if !self.cfg.reconnect.auto || self.attempts >= self.cfg.reconnect.max_attempts {
                self.shared.set_state(LifecycleState::Disconnected);
                tracing::info!(
                    attempts = self.attempts,
                    auto = self.cfg.reconnect.auto,
                    "not reconnecting"
                );
                return ControlFlow::Continue(());
            }

            let delay = backoff_delay(
                self.cfg.reconnect.base_interval_ms,
                self.attempts,
                self.cfg.reconnect.max_delay_ms,
            );
            self.attempts += 1;
            self.shared.stats.inc_reconnects_scheduled();
            tracing::info!(
                attempt = self.attempts,
                delay_ms = delay.as_millis() as u64,
                "scheduling reconnect"
            );

            match self.wait_backoff(delay).await {
                BackoffOutcome::Elapsed => {}
                BackoffOutcome::Aborted => return ControlFlow::Continue(()),
                BackoffOutcome::Dropped => return ControlFlow::Break(()),
            }
        }
    }

    /// Dial the endpoint while staying responsive to commands, so
    /// `disconnect()` can cancel an in-flight (opening) transport.
    async fn dial(&mut self) -> DialOutcome {
        let endpoint = self.cfg.endpoint.clone();
        let protocols = self.cfg.protocols.clone();
        let mut attempt = std::pin::pin!(transport::connect(&endpoint, &protocols));
        loop {
            tokio::select! {
                result = &mut attempt => return DialOutcome::Done(result),
                cmd = self.cmd_rx.recv() => match cmd {
                    None => return DialOutcome::Dropped,
                    Some(Command::Disconnect) => return DialOutcome::Aborted,
                    Some(Command::Reconnect) => return DialOutcome::Restart,
                    // already dialing: no-op
                    Some(Command::Connect) => {}
                    Some(Command::Transmit(_)) => {
                        tracing::debug!("dropping outbound frame while connecting");
                    }
                }
            }
        }
    }

    /// Sleep out the reconnect delay while staying responsive to commands.
    async fn wait_backoff(&mut self, delay: Duration) -> BackoffOutcome {
        let mut deadline = Instant::now() + delay;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return BackoffOutcome::Elapsed,
                cmd = self.cmd_rx.recv() => match cmd {
                    None => return BackoffOutcome::Dropped,
                    Some(Command::Disconnect) => {
                        self.shared.set_state(LifecycleState::Disconnected);
                        return BackoffOutcome::Aborted;
                    }
                    Some(Command::Reconnect) => {
                        self.attempts = 0;
                        deadline = Instant::now() + RECONNECT_GRACE;
                    }
                    Some(Command::Connect) => return BackoffOutcome::Elapsed,
                    Some(Command::Transmit(_)) => {
                        tracing::debug!("dropping outbound frame while reconnecting");
                    }
                }
            }
        }
    }

    /// Drive one live session until it ends.
    async fn drive_session(&mut self, ws: WsStream) -> SessionEnd {
        let (mut tx, mut rx) = ws.split();

        let ping_ms = self.cfg.liveness.ping_interval_ms;
        let ping_enabled = ping_ms > 0;
        // first probe fires one full interval after connect
        let period = Duration::from_millis(ping_ms.max(1));
        let mut probe = interval_at(Instant::now() + period, period);
        probe.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let idle_timeout = Duration::from_millis(self.cfg.liveness.idle_timeout_ms);
        let mut last_inbound = Instant::now();

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    None => {
                        let _ = tx.close().await;
                        return SessionEnd::Dropped;
                    }
                    Some(Command::Disconnect) => {
                        let _ = tx.close().await;
                        return SessionEnd::Intentional;
                    }
                    Some(Command::Reconnect) => {
                        let _ = tx.close().await;
                        return SessionEnd::Restart;
                    }
                    // already connected with a live transport: no-op
                    Some(Command::Connect) => {}
                    Some(Command::Transmit(frame)) => {
                        if let Err(e) = tx.send(Message::Text(frame.into())).await {
                            let msg = format!("send failed: {e}");
                            self.shared.set_error(msg.clone());
                            self.emit(ChannelEvent::Error(msg));
                            return SessionEnd::Unintentional;
                        }
                        self.shared.stats.inc_messages_out();
                    }
                },
                incoming = rx.next() => match incoming {
                    None => return SessionEnd::Unintentional,
                    Some(Err(e)) => {
                        let msg = format!("transport error: {e}");
                        self.shared.set_error(msg.clone());
                        self.emit(ChannelEvent::Error(msg));
                        return SessionEnd::Unintentional;
                    }
                    Some(Ok(msg)) => match codec::decode(msg) {
                        Inbound::Envelope(env) => {
                            last_inbound = Instant::now();
                            self.handle_envelope(env).await;
                        }
                        Inbound::Ping(payload) => {
                            last_inbound = Instant::now();
                            let _ = tx.send(Message::Pong(payload)).await;
                        }
                        Inbound::Pong(_) => {
                            last_inbound = Instant::now();
                        }
                        Inbound::Close => return SessionEnd::Unintentional,
                        Inbound::Ignored => {}
                    },
                },
                _ = probe.tick(), if ping_enabled => {
                    if !idle_timeout.is_zero() && last_inbound.elapsed() >= idle_timeout {
                        let msg = "connection stale: no inbound traffic within idle timeout";
                        tracing::warn!(idle_ms = last_inbound.elapsed().as_millis() as u64, "{msg}");
                        self.shared.set_error(msg);
                        self.emit(ChannelEvent::Error(msg.into()));
                        let _ = tx.close().await;
                        return SessionEnd::Unintentional;
                    }
                    match Envelope::ping().to_frame() {
                        Ok(frame) => {
                            if tx.send(Message::Text(frame.into())).await.is_err() {
                                return SessionEnd::Unintentional;
                            }
                            self.shared.stats.inc_pings_sent();
                        }
                        Err(e) => tracing::warn!(error = %e, "failed to serialize liveness probe"),
                    }
                },
            }
        }
    }

    async fn handle_envelope(&self, env: Envelope) {
        self.shared.stats.inc_messages_in();
        if env.is_raw() {
            self.shared.stats.inc_parse_fallbacks();
        }
        if env.is_pong() {
            // recorded in history, suppressed from consumer notification
            self.shared.stats.inc_pongs_received();
            self.shared.record_message(&env, false);
            return;
        }
        self.shared.record_message(&env, true);
        if let Err(e) = self.dispatcher.dispatch(&env).await {
            tracing::warn!(msg_type = %env.msg_type, error = %e, "message handler failed");
        }
        self.emit(ChannelEvent::Message(env));
    }

    fn emit(&self, ev: ChannelEvent) {
        // consumer may have dropped the receiver; events are then discarded
        let _ = self.events.send(ev);
    }
}

/// Delay before automatic attempt `attempt` (0-based):
/// `base × 1.5^attempt`, clamped by `max_delay_ms` when nonzero.
fn backoff_delay(base_ms: u64, attempt: u32, max_delay_ms: u64) -> Duration {
    let mut ms = (base_ms as f64 * 1.5_f64.powi(attempt as i32)) as u64;
    if max_delay_ms > 0 {
        ms = ms.min(max_delay_ms);
    }
    Duration::from_millis(ms)
}
