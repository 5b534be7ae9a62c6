//! Shared error type across wsRelay crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, WsRelayError>;

/// Unified error type used by core and client.
///
/// None of these escape the channel as a panic: every failure path either
/// updates the channel's observable state (`error` lifecycle state plus a
/// last-error message), is reported through a boolean return, or is logged
/// and swallowed.
#[derive(Debug, Error)]
pub enum WsRelayError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("not connected")]
    NotConnected,
    #[error("serialize failed: {0}")]
    Serialize(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl WsRelayError {
    /// Stable label for logs and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            WsRelayError::BadConfig(_) => "bad_config",
            WsRelayError::InvalidEndpoint(_) => "invalid_endpoint",
            WsRelayError::Transport(_) => "transport",
            WsRelayError::NotConnected => "not_connected",
            WsRelayError::Serialize(_) => "serialize",
            WsRelayError::Internal(_) => "internal",
        }
    }
}
