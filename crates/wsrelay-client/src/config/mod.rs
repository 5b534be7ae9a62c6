//! Channel config loader (strict parsing).

pub mod schema;

use std::fs;

use wsrelay_core::error::{Result, WsRelayError};

pub use schema::{ChannelConfig, LivenessSection, ReconnectSection};

pub fn load_from_file(path: &str) -> Result<ChannelConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| WsRelayError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ChannelConfig> {
    let cfg: ChannelConfig = serde_yaml::from_str(s)
        .map_err(|e| WsRelayError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
