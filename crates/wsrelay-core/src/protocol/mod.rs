//! Protocol module: the JSON envelope wire contract.
//!
//! One logical message per WebSocket text frame. Parsing is panic-free and
//! total: text that is not a well-formed envelope is preserved as a
//! `"raw"`-typed envelope instead of being dropped, so consumers are never
//! silently denied data.

pub mod envelope;

pub use envelope::{Envelope, TYPE_PING, TYPE_PONG, TYPE_RAW};
