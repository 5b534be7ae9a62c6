//! Lifecycle state and the shared observable snapshot.
//!
//! The snapshot is written only by the runner task; consumer handles read
//! it through the accessors on [`crate::channel::Channel`]. Derived flags
//! (`is_connected`, `is_connecting`) are computed on demand from the
//! canonical state, never cached separately.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use wsrelay_core::history::{MessageHistory, DEFAULT_HISTORY_CAPACITY};
use wsrelay_core::protocol::Envelope;

use crate::obs::ChannelStats;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Disconnected => "disconnected",
            LifecycleState::Connecting => "connecting",
            LifecycleState::Connected => "connected",
            LifecycleState::Error => "error",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable channel state, shared between the runner and the handle.
pub(crate) struct Shared {
    state: RwLock<LifecycleState>,
    last_error: RwLock<Option<String>>,
    last_message: RwLock<Option<Envelope>>,
    history: RwLock<MessageHistory>,
    pub(crate) stats: ChannelStats,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(LifecycleState::Disconnected),
            last_error: RwLock::new(None),
            last_message: RwLock::new(None),
            history: RwLock::new(MessageHistory::new(DEFAULT_HISTORY_CAPACITY)),
            stats: ChannelStats::default(),
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        *read(&self.state)
    }

    pub(crate) fn set_state(&self, state: LifecycleState) {
        *write(&self.state) = state;
    }

    /// Record a failure: error lifecycle state plus the last-error message.
    pub(crate) fn set_error(&self, message: impl Into<String>) {
        *write(&self.last_error) = Some(message.into());
        self.set_state(LifecycleState::Error);
    }

    pub(crate) fn last_error(&self) -> Option<String> {
        read(&self.last_error).clone()
    }

    pub(crate) fn last_message(&self) -> Option<Envelope> {
        read(&self.last_message).clone()
    }

    pub(crate) fn history_snapshot(&self) -> Vec<Envelope> {
        read(&self.history).snapshot()
    }

    /// Append to history; `visible` additionally updates the most-recent
    /// message (suppressed envelopes such as pongs pass `false`).
    pub(crate) fn record_message(&self, env: &Envelope, visible: bool) {
        write(&self.history).push(env.clone());
        if visible {
            *write(&self.last_message) = Some(env.clone());
        }
    }
}

// A poisoned lock only means another thread panicked mid-write of a plain
// value; the data is still usable, so recover instead of propagating.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
