use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use patchwire_core::error::Result;
use patchwire_core::protocol::Message;

use crate::context::SessionCtx;

/// One handler per msgtype. Handlers see only complete, problem-free
/// messages; the session loop gates both before dispatching.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    fn msgtype(&self) -> &'static str;
    async fn handle(&self, ctx: &SessionCtx, message: &Message) -> Result<()>;
}

/// Registry and dispatcher for message handlers, keyed by msgtype.
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
        self.handlers.insert(handler.msgtype(), handler);
    }

    pub fn registered_msgtypes(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| *e.key()).collect()
    }

    /// Route a message to its handler.
    ///
    /// Unknown msgtypes are logged and ignored, matching the peer's
    /// behavior for messages it does not understand.
    pub async fn dispatch(&self, ctx: &SessionCtx, message: &Message) -> Result<()> {
        let Some(msgtype) = message.msgtype() else {
            // problem() gating upstream makes this unreachable in practice
            tracing::warn!("dispatch called with untyped message");
            return Ok(());
        };
        let Some(entry) = self.handlers.get(msgtype) else {
            tracing::debug!(msgtype, "ignoring message with no handler");
            return Ok(());
        };
        let handler = entry.value().clone();
        drop(entry);
        handler.handle(ctx, message).await
    }
}
