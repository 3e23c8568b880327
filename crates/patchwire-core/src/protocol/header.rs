//! Message header and buffer sub-header records.
//!
//! The header is a closed record: the four fields below are the only ones
//! the protocol defines. `msgid` and `msgtype` are required for a message to
//! be structurally valid, but presence is checked by [`Header::problem`],
//! not at parse time, so a syntactically well-formed header always decodes.

use serde::{Deserialize, Serialize};

/// Message header frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Unique id for this message, assigned at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgid: Option<String>,
    /// Semantic kind of the message, e.g. "PATCH-DOC" or "ACK".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgtype: Option<String>,
    /// msgid of the request this message replies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reqid: Option<String>,
    /// Number of binary buffers that follow the three text frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_buffers: Option<usize>,
}

impl Header {
    /// Structural validation, independent of completeness.
    ///
    /// Returns a human-readable reason if a required field is missing, else
    /// `None`. Must be consulted before the message is dispatched anywhere.
    pub fn problem(&self) -> Option<String> {
        if self.msgid.is_none() {
            Some("header missing msgid".to_string())
        } else if self.msgtype.is_none() {
            Some("header missing msgtype".to_string())
        } else {
            None
        }
    }

    /// Declared buffer budget; absent means zero.
    pub fn declared_buffers(&self) -> usize {
        self.num_buffers.unwrap_or(0)
    }
}

/// Sub-header announcing one binary buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferHeader {
    /// Identifier the buffer payload is keyed under.
    pub id: String,
}
