//! wsRelay client library entry.
//!
//! This crate wires the config loader, transport, connection runner, event
//! stream, and handler dispatch into the reconnecting message channel. It is
//! consumed by the probe binary (`main.rs`) and by integration tests.

pub mod channel;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod obs;
pub mod transport;

pub use channel::{Channel, LifecycleState};
pub use events::ChannelEvent;
