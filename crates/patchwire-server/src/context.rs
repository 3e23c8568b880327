//! Per-session context handed to message handlers.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use patchwire_core::error::{PatchwireError, Result};
use patchwire_core::protocol::{Message, Protocol};

use crate::transport::{self, Transport};

/// Session-scoped handle: identity, message factory, and the outbound
/// transport. Cheap to clone; handlers hold it for the duration of one
/// dispatch.
#[derive(Clone)]
pub struct SessionCtx {
    session_id: String,
    protocol: Arc<Mutex<Protocol>>,
    transport: Arc<dyn Transport>,
}

impl SessionCtx {
    pub fn new(session_id: String, protocol: Protocol, transport: Arc<dyn Transport>) -> Self {
        Self {
            session_id,
            protocol: Arc::new(Mutex::new(protocol)),
            transport,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Create an unsolicited outbound message.
    pub fn create(&self, msgtype: &str, metadata: Value, content: Value) -> Result<Message> {
        let mut protocol = self
            .protocol
            .lock()
            .map_err(|_| PatchwireError::Internal("protocol lock poisoned".into()))?;
        Ok(protocol.create(msgtype, metadata, content))
    }

    /// Create a reply correlated to `reqid`.
    pub fn create_reply(
        &self,
        msgtype: &str,
        reqid: &str,
        metadata: Value,
        content: Value,
    ) -> Result<Message> {
        let mut protocol = self
            .protocol
            .lock()
            .map_err(|_| PatchwireError::Internal("protocol lock poisoned".into()))?;
        Ok(protocol.create_reply(msgtype, reqid, metadata, content))
    }

    /// Send a message on this session's transport.
    pub async fn send(&self, message: &Message) -> Result<usize> {
        transport::send_message(self.transport.as_ref(), message).await
    }
}
