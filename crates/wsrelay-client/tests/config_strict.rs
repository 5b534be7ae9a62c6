#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use wsrelay_client::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
endpoint: "ws://localhost:9000/ws"
reconnect:
  max_attemptz: 3 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.kind(), "bad_config");
}

#[test]
fn ok_minimal_config_applies_defaults() {
    let ok = r#"
endpoint: "wss://relay.example.com/ws"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.endpoint, "wss://relay.example.com/ws");
    assert!(cfg.protocols.is_empty());
    assert_eq!(cfg.reconnect.max_attempts, 5);
    assert_eq!(cfg.reconnect.base_interval_ms, 3000);
    assert_eq!(cfg.reconnect.max_delay_ms, 0);
    assert!(cfg.reconnect.auto);
    assert_eq!(cfg.liveness.ping_interval_ms, 30000);
    assert_eq!(cfg.liveness.idle_timeout_ms, 0);
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
endpoint: "ws://localhost:9000/ws"
protocols: ["relay.v1", "relay.v0"]
reconnect:
  max_attempts: 8
  base_interval_ms: 1000
  max_delay_ms: 15000
  auto: false
liveness:
  ping_interval_ms: 10000
  idle_timeout_ms: 25000
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.protocols, vec!["relay.v1", "relay.v0"]);
    assert_eq!(cfg.reconnect.max_attempts, 8);
    assert_eq!(cfg.reconnect.max_delay_ms, 15000);
    assert!(!cfg.reconnect.auto);
    assert_eq!(cfg.liveness.idle_timeout_ms, 25000);
}

#[test]
fn reject_non_websocket_scheme() {
    let bad = r#"
endpoint: "https://relay.example.com/ws"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("ws://"));
}

#[test]
fn reject_zero_base_interval() {
    let bad = r#"
endpoint: "ws://localhost:9000/ws"
reconnect:
  base_interval_ms: 0
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn reject_delay_cap_below_base() {
    let bad = r#"
endpoint: "ws://localhost:9000/ws"
reconnect:
  base_interval_ms: 2000
  max_delay_ms: 1000
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn reject_idle_timeout_not_above_ping_interval() {
    let bad = r#"
endpoint: "ws://localhost:9000/ws"
liveness:
  ping_interval_ms: 30000
  idle_timeout_ms: 30000
"#;
    config::load_from_str(bad).expect_err("must fail");
}

#[test]
fn reject_idle_timeout_with_probing_disabled() {
    let bad = r#"
endpoint: "ws://localhost:9000/ws"
liveness:
  ping_interval_ms: 0
  idle_timeout_ms: 5000
"#;
    config::load_from_str(bad).expect_err("must fail");
}
