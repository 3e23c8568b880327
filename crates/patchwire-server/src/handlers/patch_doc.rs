use std::sync::Arc;

use async_trait::async_trait;

use patchwire_core::error::Result;
use patchwire_core::protocol::Message;

use crate::context::SessionCtx;
use crate::dispatch::MessageHandler;
use crate::doc::DocumentSink;

/// Hands PATCH-DOC content and metadata to the document sink.
pub struct PatchDocHandler {
    sink: Arc<dyn DocumentSink>,
}

impl PatchDocHandler {
    pub fn new(sink: Arc<dyn DocumentSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl MessageHandler for PatchDocHandler {
    fn msgtype(&self) -> &'static str {
        "PATCH-DOC"
    }

    async fn handle(&self, ctx: &SessionCtx, message: &Message) -> Result<()> {
        tracing::debug!(
            session = ctx.session_id(),
            buffers = message.buffers().len(),
            "applying document patch"
        );
        self.sink
            .apply_patch(message.content(), message.metadata())
            .await
    }
}
