//! Lightweight channel counters.
//!
//! Atomics only, no exporter; consumers take a snapshot and render it
//! themselves.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct ChannelStats {
    messages_in: AtomicU64,
    messages_out: AtomicU64,
    pings_sent: AtomicU64,
    pongs_received: AtomicU64,
    parse_fallbacks: AtomicU64,
    connects: AtomicU64,
    reconnects_scheduled: AtomicU64,
}

impl ChannelStats {
    pub fn inc_messages_in(&self) {
        self.messages_in.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_messages_out(&self) {
        self.messages_out.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_pings_sent(&self) {
        self.pings_sent.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_pongs_received(&self) {
        self.pongs_received.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_parse_fallbacks(&self) {
        self.parse_fallbacks.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_connects(&self) {
        self.connects.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_reconnects_scheduled(&self) {
        self.reconnects_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            messages_in: self.messages_in.load(Ordering::Relaxed),
            messages_out: self.messages_out.load(Ordering::Relaxed),
            pings_sent: self.pings_sent.load(Ordering::Relaxed),
            pongs_received: self.pongs_received.load(Ordering::Relaxed),
            parse_fallbacks: self.parse_fallbacks.load(Ordering::Relaxed),
            connects: self.connects.load(Ordering::Relaxed),
            reconnects_scheduled: self.reconnects_scheduled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub messages_in: u64,
    pub messages_out: u64,
    pub pings_sent: u64,
    pub pongs_received: u64,
    pub parse_fallbacks: u64,
    pub connects: u64,
    pub reconnects_scheduled: u64,
}
