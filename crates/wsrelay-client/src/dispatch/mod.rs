//! Named-message handler registry.
//!
//! Consumers may register a handler per envelope type; the runner dispatches
//! each consumer-visible inbound envelope to the matching handler. Types
//! without a handler are still delivered through the event stream, so
//! registration is optional sugar, not a delivery gate.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use wsrelay_core::error::Result;
use wsrelay_core::protocol::Envelope;

/// Handler for one envelope type.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Envelope type this handler consumes.
    fn msg_type(&self) -> &'static str;
    async fn handle(&self, env: Envelope) -> Result<()>;
}

/// Registry and dispatcher, keyed by envelope type.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<&'static str, Arc<dyn MessageHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register(&self, handler: Arc<dyn MessageHandler>) {
        self.handlers.insert(handler.msg_type(), handler);
    }

    pub fn registered_types(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    /// Dispatch one envelope. Missing handlers are not an error; handler
    /// failures are surfaced to the caller for logging only.
    pub async fn dispatch(&self, env: &Envelope) -> Result<()> {
        let msg_type = env.msg_type.as_str();
        let Some(handler) = self.handlers.get(msg_type).map(|e| e.value().clone()) else {
            tracing::debug!(%msg_type, "no handler registered");
            return Ok(());
        };
        handler.handle(env.clone()).await
    }
}
