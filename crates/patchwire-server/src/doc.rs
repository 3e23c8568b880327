//! The document-patch collaborator seam.
//!
//! Applying a patch to visual/model state is outside the protocol core; the
//! server only hands over content and metadata once a message is complete
//! and problem-free.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use patchwire_core::error::{PatchwireError, Result};

/// Consumer of PATCH-DOC payloads.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn apply_patch(&self, content: &Value, metadata: &Value) -> Result<()>;
}

/// Sink that records applied patches; backs tests and the default server
/// wiring until a real document store is attached.
#[derive(Default)]
pub struct InMemorySink {
    patches: Mutex<Vec<Value>>,
}

impl InMemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn patches(&self) -> Vec<Value> {
        self.patches.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentSink for InMemorySink {
    async fn apply_patch(&self, content: &Value, metadata: &Value) -> Result<()> {
        let _ = metadata;
        let mut patches = self
            .patches
            .lock()
            .map_err(|_| PatchwireError::Internal("sink lock poisoned".into()))?;
        patches.push(content.clone());
        Ok(())
    }
}
