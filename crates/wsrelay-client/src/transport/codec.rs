//! Decode-once codec for the transport layer.
//!
//! - Text frames => Envelope (raw fallback on parse failure, never an error)
//! - Binary frames => decoded as UTF-8 text and run through the same path
//! - Ping/Pong/Close are surfaced for lifecycle management

use tokio_tungstenite::tungstenite::{Bytes, Message};
use wsrelay_core::protocol::Envelope;

#[derive(Debug)]
pub enum Inbound {
    Envelope(Envelope),
    /// Transport-level ping, to be answered with a pong. Distinct from the
    /// JSON `"ping"` liveness envelope.
    Ping(Bytes),
    Pong(Bytes),
    Close,
    /// Raw frames never occur on a read stream; skipped if they do.
    Ignored,
}

pub fn decode(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Envelope(Envelope::parse_frame(s.as_str())),
        Message::Binary(b) => {
            let text = String::from_utf8_lossy(&b).into_owned();
            Inbound::Envelope(Envelope::parse_frame(&text))
        }
        Message::Ping(p) => Inbound::Ping(p),
        Message::Pong(p) => Inbound::Pong(p),
        Message::Close(_) => Inbound::Close,
        Message::Frame(_) => Inbound::Ignored,
    }
}
