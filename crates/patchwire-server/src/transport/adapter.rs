//! The duplex-channel contract the protocol core expects.
//!
//! The core never touches a socket directly: it sends through this trait and
//! receives fragments the session loop pulls off the wire. Connection
//! establishment, reconnection, and liveness policy live with whoever owns
//! the concrete channel.

use async_trait::async_trait;
use bytes::Bytes;

use patchwire_core::error::Result;
use patchwire_core::protocol::Message;

/// Outbound half of a duplex frame channel.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, frame: String) -> Result<()>;
    async fn send_binary(&self, frame: Bytes) -> Result<()>;
}

/// Send one message as its three text frames, in wire order.
///
/// Buffer-bearing messages are refused by `Message::encode`; only receiving
/// buffers is supported. Returns the number of bytes handed to the
/// transport.
pub async fn send_message(transport: &dyn Transport, message: &Message) -> Result<usize> {
    let [header, metadata, content] = message.encode()?;
    let mut sent = 0;

    sent += header.len();
    transport.send_text(header).await?;

    sent += metadata.len();
    transport.send_text(metadata).await?;

    sent += content.len();
    transport.send_text(content).await?;

    tracing::debug!(msgtype = ?message.msgtype(), sent, "message sent");
    Ok(sent)
}
