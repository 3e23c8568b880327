//! Fragment-driven message assembly.
//!
//! The transport delivers discrete fragments (text or binary). For one
//! message the receiver expects: header text, metadata text, content text,
//! then per declared buffer a sub-header text fragment followed by a binary
//! payload fragment. At most one message is in assembly at a time; a
//! transport that interleaves messages must demultiplex before this point.
//!
//! Any error resets the receiver to idle so the owning connection can tear
//! down cleanly; partial messages are discarded wholesale.

use bytes::Bytes;

use crate::error::{PatchwireError, Result};

use super::message::Message;

/// One unit of transport-level delivery.
#[derive(Debug, Clone)]
pub enum Fragment {
    Text(String),
    Binary(Bytes),
}

impl Fragment {
    fn kind(&self) -> &'static str {
        match self {
            Fragment::Text(_) => "text",
            Fragment::Binary(_) => "binary",
        }
    }
}

#[derive(Debug)]
enum State {
    AwaitHeader,
    AwaitMetadata {
        header_json: String,
    },
    AwaitContent {
        header_json: String,
        metadata_json: String,
    },
    AwaitBufferHeader {
        message: Message,
    },
    AwaitBufferPayload {
        message: Message,
        buf_header_json: String,
    },
}

/// Assembles messages from a stream of fragments, one message at a time.
#[derive(Debug)]
pub struct Receiver {
    state: State,
}

impl Receiver {
    pub fn new() -> Self {
        Self {
            state: State::AwaitHeader,
        }
    }

    /// Feed one fragment; returns the message exactly when it completes.
    ///
    /// On any error the receiver is reset to idle and the error propagated;
    /// the caller is expected to close the connection.
    pub fn consume(&mut self, fragment: Fragment) -> Result<Option<Message>> {
        // Take the state out so message ownership can move through it; on
        // the error paths below the receiver is already back at idle.
        let state = std::mem::replace(&mut self.state, State::AwaitHeader);
        match (state, fragment) {
            (State::AwaitHeader, Fragment::Text(header_json)) => {
                self.state = State::AwaitMetadata { header_json };
                Ok(None)
            }
            (State::AwaitMetadata { header_json }, Fragment::Text(metadata_json)) => {
                self.state = State::AwaitContent {
                    header_json,
                    metadata_json,
                };
                Ok(None)
            }
            (
                State::AwaitContent {
                    header_json,
                    metadata_json,
                },
                Fragment::Text(content_json),
            ) => {
                let message = Message::assemble(&header_json, &metadata_json, &content_json)?;
                if message.complete() {
                    tracing::debug!(msgtype = ?message.msgtype(), "message assembled");
                    return Ok(Some(message));
                }
                tracing::debug!(
                    expecting = message.header().declared_buffers(),
                    "message awaiting buffers"
                );
                self.state = State::AwaitBufferHeader { message };
                Ok(None)
            }
            (State::AwaitBufferHeader { message }, Fragment::Text(buf_header_json)) => {
                self.state = State::AwaitBufferPayload {
                    message,
                    buf_header_json,
                };
                Ok(None)
            }
            (
                State::AwaitBufferPayload {
                    mut message,
                    buf_header_json,
                },
                Fragment::Binary(payload),
            ) => {
                message.assemble_buffer(&buf_header_json, payload)?;
                if message.complete() {
                    tracing::debug!(msgtype = ?message.msgtype(), "message assembled");
                    return Ok(Some(message));
                }
                self.state = State::AwaitBufferHeader { message };
                Ok(None)
            }
            (state, fragment) => {
                let expected = match state {
                    State::AwaitBufferPayload { .. } => "binary buffer payload",
                    _ => "text",
                };
                Err(PatchwireError::UnexpectedFragment(format!(
                    "got {} fragment while expecting {expected}",
                    fragment.kind()
                )))
            }
        }
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}
