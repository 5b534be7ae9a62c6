//! Envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use serde_json::json;
use wsrelay_core::protocol::{Envelope, TYPE_PING, TYPE_RAW};

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_envelope_min() {
    let env = Envelope::parse_frame(&load("envelope_min.json"));
    assert_eq!(env.msg_type, "status");
    assert_eq!(env.data, json!({"cpu": 0.42}));
    assert!(env.id.is_none());
    // omitted timestamp is filled with the receipt time
    assert!(env.timestamp > 0);
}

#[test]
fn parse_envelope_full() {
    let env = Envelope::parse_frame(&load("envelope_full.json"));
    assert_eq!(env.msg_type, "agent_update");
    assert_eq!(env.timestamp, 1_723_000_000_000);
    assert_eq!(
        env.id.as_deref(),
        Some("5f3a2e1c-9b7d-4c6a-8e21-0d4f6b9a1c55")
    );
    assert_eq!(env.data["tasks"], json!([1, 2, 3]));
}

#[test]
fn parse_non_json_falls_back_to_raw() {
    let text = load("not_envelope.txt");
    let env = Envelope::parse_frame(&text);
    assert_eq!(env.msg_type, TYPE_RAW);
    assert_eq!(env.data, json!("not json"));
    assert!(env.timestamp > 0);
    assert!(env.is_raw());
}

#[test]
fn parse_json_without_type_falls_back_to_raw() {
    let env = Envelope::parse_frame(r#"{"data": {"k": 1}}"#);
    assert_eq!(env.msg_type, TYPE_RAW);
    assert_eq!(env.data, json!(r#"{"data": {"k": 1}}"#));
}

#[test]
fn parse_json_with_non_string_type_falls_back_to_raw() {
    let env = Envelope::parse_frame(r#"{"type": 7, "data": null}"#);
    assert_eq!(env.msg_type, TYPE_RAW);
}

#[test]
fn outbound_round_trip_preserves_type_and_data() {
    let data = json!({"query": "state", "nested": {"a": [true, null, 1.5]}});
    let sent = Envelope::outbound("dashboard_query", data.clone());
    let frame = sent.to_frame().unwrap();

    let received = Envelope::parse_frame(&frame);
    assert_eq!(received.msg_type, "dashboard_query");
    assert_eq!(received.data, data);
    // timestamp/id travel with the frame when present
    assert_eq!(received.timestamp, sent.timestamp);
    assert_eq!(received.id, sent.id);
}

#[test]
fn outbound_generates_fresh_ids() {
    let a = Envelope::outbound("x", json!(1));
    let b = Envelope::outbound("x", json!(1));
    assert!(a.id.is_some());
    assert_ne!(a.id, b.id);
}

#[test]
fn ping_envelope_shape() {
    let ping = Envelope::ping();
    assert_eq!(ping.msg_type, TYPE_PING);
    assert!(ping.id.is_some());
    assert!(ping.timestamp > 0);
    let frame = ping.to_frame().unwrap();
    assert!(frame.contains(r#""type":"ping""#));
}
