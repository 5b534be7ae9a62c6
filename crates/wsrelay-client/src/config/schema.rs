use serde::Deserialize;
use wsrelay_core::error::{Result, WsRelayError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Remote endpoint, `ws://` or `wss://`.
    pub endpoint: String,

    /// Optional WebSocket sub-protocol list.
    #[serde(default)]
    pub protocols: Vec<String>,

    #[serde(default)]
    pub reconnect: ReconnectSection,

    #[serde(default)]
    pub liveness: LivenessSection,
}

impl ChannelConfig {
    /// Programmatic construction with defaults for everything but the
    /// endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            endpoint: endpoint.into(),
            protocols: Vec::new(),
            reconnect: ReconnectSection::default(),
            liveness: LivenessSection::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WsRelayError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if self.endpoint.is_empty() {
            return Err(WsRelayError::BadConfig("endpoint must not be empty".into()));
        }
        if !(self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")) {
            return Err(WsRelayError::BadConfig(
                "endpoint must use a ws:// or wss:// scheme".into(),
            ));
        }

        self.reconnect.validate()?;
        self.liveness.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconnectSection {
    /// Consecutive automatic attempts before the channel stays down until an
    /// explicit `reconnect()`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First retry delay; attempt N waits `base_interval_ms * 1.5^N`.
    #[serde(default = "default_base_interval_ms")]
    pub base_interval_ms: u64,

    /// Absolute delay ceiling. 0 leaves the geometric growth uncapped.
    #[serde(default)]
    pub max_delay_ms: u64,

    /// Whether unintentional closes trigger automatic reconnection.
    #[serde(default = "default_auto")]
    pub auto: bool,
}

impl Default for ReconnectSection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_interval_ms: default_base_interval_ms(),
            max_delay_ms: 0,
            auto: default_auto(),
        }
    }
}

impl ReconnectSection {
    pub fn validate(&self) -> Result<()> {
        if self.base_interval_ms == 0 {
            return Err(WsRelayError::BadConfig(
                "reconnect.base_interval_ms must be greater than 0".into(),
            ));
        }
        if self.max_delay_ms != 0 && self.max_delay_ms < self.base_interval_ms {
            return Err(WsRelayError::BadConfig(
                "reconnect.max_delay_ms must be at least base_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LivenessSection {
    /// Probe interval while connected. 0 disables probing.
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    /// Inbound-silence threshold checked at each probe tick. 0 disables.
    #[serde(default)]
    pub idle_timeout_ms: u64,
}

impl Default for LivenessSection {
    fn default() -> Self {
        Self {
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: 0,
        }
    }
}

impl LivenessSection {
    pub fn validate(&self) -> Result<()> {
        if self.idle_timeout_ms != 0 {
            if self.ping_interval_ms == 0 {
                return Err(WsRelayError::BadConfig(
                    "liveness.idle_timeout_ms requires ping_interval_ms > 0".into(),
                ));
            }
            if self.idle_timeout_ms <= self.ping_interval_ms {
                return Err(WsRelayError::BadConfig(
                    "liveness.idle_timeout_ms must be greater than ping_interval_ms".into(),
                ));
            }
        }
        Ok(())
    }
}

fn default_version() -> u32 {
    1
}
fn default_max_attempts() -> u32 {
    5
}
fn default_base_interval_ms() -> u64 {
    3000
}
fn default_auto() -> bool {
    true
}
fn default_ping_interval_ms() -> u64 {
    30000
}
