//! Consumer-facing channel events.
//!
//! The runner publishes these over an unbounded queue obtained once via
//! [`crate::channel::Channel::take_events`]. The variants mirror the five
//! lifecycle notifications of the channel: open, connect-success, message,
//! error, close.

use wsrelay_core::protocol::Envelope;

#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Transport reported open.
    Open,
    /// Connection established and ready; follows `Open` and marks the
    /// attempt-counter reset.
    ConnectSuccess,
    /// Inbound envelope. Probe replies (`pong`) are suppressed and never
    /// appear here.
    Message(Envelope),
    /// Transport-reported error, already recorded as the channel's last
    /// error.
    Error(String),
    /// Transport closed. `intentional` is true for consumer-initiated
    /// disconnects (including the teardown half of `reconnect()`).
    Closed { intentional: bool },
}
