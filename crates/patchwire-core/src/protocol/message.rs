//! The message envelope: header, metadata, content, and received buffers.
//!
//! A message is created either by [`Message::assemble`] from three incoming
//! text frames (buffers still outstanding), or by application code via the
//! [`Protocol`](super::Protocol) factory for outbound traffic. Completeness
//! is a pull-based predicate: callers re-check [`Message::complete`] after
//! every [`Message::assemble_buffer`].

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;

use crate::error::{PatchwireError, Result};

use super::header::{BufferHeader, Header};

/// One protocol message, with its buffers keyed by buffer id.
#[derive(Debug, Clone)]
pub struct Message {
    header: Header,
    metadata: Value,
    content: Value,
    buffers: HashMap<String, Bytes>,
}

impl Message {
    /// Build a message from already-decoded parts, with no buffers held.
    pub fn new(header: Header, metadata: Value, content: Value) -> Self {
        Self {
            header,
            metadata,
            content,
            buffers: HashMap::new(),
        }
    }

    /// Assemble a message from the three incoming text frames.
    ///
    /// Each frame is parsed independently; any parse failure is fatal to the
    /// whole message. No semantic header validation happens here — that is
    /// [`Message::problem`]'s job.
    pub fn assemble(header_json: &str, metadata_json: &str, content_json: &str) -> Result<Self> {
        let header: Header = serde_json::from_str(header_json).map_err(|e| {
            PatchwireError::Decode {
                part: "header",
                source: e,
            }
        })?;
        let metadata: Value = serde_json::from_str(metadata_json).map_err(|e| {
            PatchwireError::Decode {
                part: "metadata",
                source: e,
            }
        })?;
        let content: Value = serde_json::from_str(content_json).map_err(|e| {
            PatchwireError::Decode {
                part: "content",
                source: e,
            }
        })?;
        Ok(Self::new(header, metadata, content))
    }

    /// Serialize the three logical parts back to text frames, in wire order.
    ///
    /// Only receiving buffer-bearing messages is supported: a header that
    /// declares `num_buffers > 0` cannot be encoded for send.
    pub fn encode(&self) -> Result<[String; 3]> {
        let declared = self.header.declared_buffers();
        if declared > 0 {
            return Err(PatchwireError::NotSendable { declared });
        }
        let header = serde_json::to_string(&self.header).map_err(|e| {
            PatchwireError::Internal(format!("header encode failed: {e}"))
        })?;
        let metadata = serde_json::to_string(&self.metadata).map_err(|e| {
            PatchwireError::Internal(format!("metadata encode failed: {e}"))
        })?;
        let content = serde_json::to_string(&self.content).map_err(|e| {
            PatchwireError::Internal(format!("content encode failed: {e}"))
        })?;
        Ok([header, metadata, content])
    }

    /// Record one buffer read from the socket, validating against the
    /// header's declared count.
    ///
    /// Fails loudly past capacity or on a repeated id; a failed call leaves
    /// the held buffers untouched.
    pub fn assemble_buffer(&mut self, buf_header_json: &str, payload: Bytes) -> Result<()> {
        let buf_header: BufferHeader = serde_json::from_str(buf_header_json).map_err(|e| {
            PatchwireError::Decode {
                part: "buffer header",
                source: e,
            }
        })?;
        let expected = self.header.declared_buffers();
        if self.buffers.len() >= expected {
            return Err(PatchwireError::TooManyBuffers { expected });
        }
        if self.buffers.contains_key(&buf_header.id) {
            return Err(PatchwireError::DuplicateBuffer { id: buf_header.id });
        }
        self.buffers.insert(buf_header.id, payload);
        Ok(())
    }

    /// Whether every declared part has been assembled.
    ///
    /// Metadata and content must be non-null and the held buffer count must
    /// match the declared budget. Nothing un-assembles a buffer, so once
    /// true this stays true.
    pub fn complete(&self) -> bool {
        !self.metadata.is_null()
            && !self.content.is_null()
            && self.buffers.len() == self.header.declared_buffers()
    }

    /// Structural header validation; see [`Header::problem`].
    pub fn problem(&self) -> Option<String> {
        self.header.problem()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Message kind, when the header carries one.
    pub fn msgtype(&self) -> Option<&str> {
        self.header.msgtype.as_deref()
    }

    /// Message id, when the header carries one.
    pub fn msgid(&self) -> Option<&str> {
        self.header.msgid.as_deref()
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Assembled buffers, keyed by buffer id.
    pub fn buffers(&self) -> &HashMap<String, Bytes> {
        &self.buffers
    }
}
