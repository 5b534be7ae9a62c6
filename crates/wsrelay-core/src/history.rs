//! Bounded message history (FIFO ring).

use std::collections::VecDeque;

use crate::protocol::Envelope;

/// Default capacity used by the channel.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Bounded ordered sequence of the most recently received envelopes.
/// Oldest entries are evicted first once capacity is reached.
#[derive(Debug)]
pub struct MessageHistory {
    capacity: usize,
    buf: VecDeque<Envelope>,
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl MessageHistory {
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buf: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an envelope, evicting the oldest entry at capacity.
    pub fn push(&mut self, env: Envelope) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(env);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently received envelope.
    pub fn latest(&self) -> Option<&Envelope> {
        self.buf.back()
    }

    /// Entries in receipt order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.buf.iter()
    }

    /// Owned copy in receipt order, oldest first.
    pub fn snapshot(&self) -> Vec<Envelope> {
        self.buf.iter().cloned().collect()
    }
}
