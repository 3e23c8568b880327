use async_trait::async_trait;
use serde_json::json;

use patchwire_core::error::{PatchwireError, Result};
use patchwire_core::protocol::Message;

use crate::context::SessionCtx;
use crate::dispatch::MessageHandler;

/// Replies SERVER-INFO-REP, correlated to the request's msgid.
#[derive(Default)]
pub struct ServerInfoHandler;

impl ServerInfoHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageHandler for ServerInfoHandler {
    fn msgtype(&self) -> &'static str {
        "SERVER-INFO-REQ"
    }

    async fn handle(&self, ctx: &SessionCtx, message: &Message) -> Result<()> {
        let reqid = message
            .msgid()
            .ok_or_else(|| PatchwireError::InvalidHeader("request has no msgid".into()))?;

        let reply = ctx.create_reply(
            "SERVER-INFO-REP",
            reqid,
            json!({}),
            json!({ "version_info": { "patchwire": env!("CARGO_PKG_VERSION") } }),
        )?;
        ctx.send(&reply).await?;
        Ok(())
    }
}
