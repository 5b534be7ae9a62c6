//! wsRelay core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the envelope wire contract, the bounded message
//! history, and the error surface shared by the client runtime. It
//! intentionally carries no transport or runtime dependencies so it can be
//! reused in multiple contexts (native client, tests, tooling).
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `WsRelayError`/`Result` so a host
//! process never crashes on malformed input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod history;
pub mod protocol;

/// Shared result type.
pub use error::{Result, WsRelayError};
