//! Protocol modules (envelope + buffers + receiver).
//!
//! A message travels as three JSON text frames (header, metadata, content),
//! followed by zero or more binary buffers, each announced by a small JSON
//! sub-header carrying its id. The header declares how many buffers follow
//! via `num_buffers`.
//!
//! All parsers are panic-free: malformed input is reported as
//! `PatchwireError` instead of panicking, keeping the server resilient to
//! hostile traffic.

pub mod header;
pub mod id;
pub mod message;
pub mod receiver;

pub use header::{BufferHeader, Header};
pub use id::{IdSource, SessionIds};
pub use message::Message;
pub use receiver::{Fragment, Receiver};

use serde_json::Value;

/// Message factory bound to an id source.
///
/// The id source is injected so tests can supply deterministic ids instead
/// of depending on global incrementing state.
pub struct Protocol {
    ids: Box<dyn IdSource>,
}

impl Protocol {
    pub fn new(ids: Box<dyn IdSource>) -> Self {
        Self { ids }
    }

    /// Factory with the production id source (session prefix + counter).
    pub fn with_session_ids() -> Self {
        Self::new(Box::new(SessionIds::new()))
    }

    /// Build a header for a fresh outbound message.
    ///
    /// `reqid` carries the msgid of the message this one replies to; absent
    /// for unsolicited messages.
    pub fn create_header(&mut self, msgtype: &str, reqid: Option<&str>) -> Header {
        Header {
            msgid: Some(self.ids.next_id()),
            msgtype: Some(msgtype.to_string()),
            reqid: reqid.map(str::to_string),
            num_buffers: None,
        }
    }

    /// Build a fresh outbound message with a generated header and no buffers.
    pub fn create(&mut self, msgtype: &str, metadata: Value, content: Value) -> Message {
        let header = self.create_header(msgtype, None);
        Message::new(header, metadata, content)
    }

    /// Build a reply message, correlated to `reqid`.
    pub fn create_reply(
        &mut self,
        msgtype: &str,
        reqid: &str,
        metadata: Value,
        content: Value,
    ) -> Message {
        let header = self.create_header(msgtype, Some(reqid));
        Message::new(header, metadata, content)
    }
}

impl std::fmt::Debug for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Protocol").finish_non_exhaustive()
    }
}
