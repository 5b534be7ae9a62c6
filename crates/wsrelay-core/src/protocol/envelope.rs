//! Message envelope (JSON text frame).
//!
//! Outbound shape: `{ "type": string, "data": any, "timestamp": epoch-ms,
//! "id": uuid }`. Inbound frames only need a string `type`; other fields are
//! defaulted. Unknown fields are tolerated on inbound frames (remote peers
//! may send more than we model), which is why this struct does not use
//! `deny_unknown_fields`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Liveness probe sent by the channel while connected.
pub const TYPE_PING: &str = "ping";
/// Probe reply; recorded in history but suppressed from consumer
/// notification.
pub const TYPE_PONG: &str = "pong";
/// Fallback type for inbound text that is not a well-formed envelope.
pub const TYPE_RAW: &str = "raw";

/// A single message exchanged over the channel. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type tag (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Structured payload.
    #[serde(default)]
    pub data: Value,
    /// Epoch milliseconds at construction (outbound) or receipt (inbound
    /// frames that omit it).
    #[serde(default)]
    pub timestamp: u64,
    /// Correlation identifier; generated for outbound envelopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Envelope {
    /// Build an outbound envelope: wall-clock timestamp plus a fresh
    /// correlation id.
    pub fn outbound(msg_type: impl Into<String>, data: Value) -> Self {
        Self {
            msg_type: msg_type.into(),
            data,
            timestamp: now_ms(),
            id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Build the liveness probe envelope.
    pub fn ping() -> Self {
        Self::outbound(TYPE_PING, Value::Object(serde_json::Map::new()))
    }

    /// Wrap text that failed to parse. The original text is preserved as the
    /// payload; the timestamp is the receipt time.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            msg_type: TYPE_RAW.into(),
            data: Value::String(text.into()),
            timestamp: now_ms(),
            id: None,
        }
    }

    /// Serialize to a wire frame.
    pub fn to_frame(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::WsRelayError::Serialize(e.to_string()))
    }

    /// Parse an inbound frame. Total: anything that is not a well-formed
    /// envelope (invalid JSON, or JSON without a usable `type` string) comes
    /// back as a `raw` envelope instead of an error.
    pub fn parse_frame(text: &str) -> Self {
        match serde_json::from_str::<Envelope>(text) {
            Ok(mut env) if !env.msg_type.is_empty() => {
                if env.timestamp == 0 {
                    env.timestamp = now_ms();
                }
                env
            }
            _ => {
                tracing::debug!(len = text.len(), "inbound frame is not an envelope, keeping as raw");
                Self::raw(text)
            }
        }
    }

    /// Whether this is a probe reply.
    pub fn is_pong(&self) -> bool {
        self.msg_type == TYPE_PONG
    }

    /// Whether this envelope came through the parse-failure fallback.
    pub fn is_raw(&self) -> bool {
        self.msg_type == TYPE_RAW
    }
}

/// Current wall clock in epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
