//! WebSocket session handling.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS and greet the client with ACK
//! - Feed inbound frames through the core `Receiver`, one message in
//!   assembly at a time
//! - Gate completed messages on `problem()` before dispatching
//! - Close the connection on any protocol violation (no partial-trust mode)
//! - Lifecycle: heartbeat ping + idle timeout

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use patchwire_core::error::{PatchwireError, Result};
use patchwire_core::protocol::{Fragment, Protocol, Receiver};

use crate::app_state::AppState;
use crate::context::SessionCtx;
use crate::transport::Transport;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub session: String,
}

/// Outbound half of one WebSocket session, behind an mpsc queue so handlers
/// never hold the socket itself.
struct WsTransport {
    out: mpsc::Sender<Message>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_text(&self, frame: String) -> Result<()> {
        self.out
            .send(Message::Text(frame))
            .await
            .map_err(|_| PatchwireError::Internal("outbound channel closed".into()))
    }

    async fn send_binary(&self, frame: Bytes) -> Result<()> {
        self.out
            .send(Message::Binary(frame.to_vec()))
            .await
            .map_err(|_| PatchwireError::Internal("outbound channel closed".into()))
    }
}

fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.as_bytes().len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}

fn close_frame(code: u16, reason: &str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Cow::Owned(reason.to_string()),
    }))
}

pub async fn ws_upgrade(
    State(app): State<AppState>,
    ws: WebSocketUpgrade,
    Query(q): Query<WsQuery>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = run_session(app, q, socket).await {
            tracing::warn!(error = %e, "session ended with error");
        }
    })
}

async fn run_session(app: AppState, q: WsQuery, socket: WebSocket) -> Result<()> {
    let session_id = q.session;
    tracing::info!(session = %session_id, "session opened");

    let (out_tx, mut out_rx) = mpsc::channel::<Message>(1024);
    let (mut ws_tx, mut ws_rx) = socket.split();

    let transport = Arc::new(WsTransport {
        out: out_tx.clone(),
    });
    let ctx = SessionCtx::new(
        session_id.clone(),
        Protocol::with_session_ids(),
        transport.clone(),
    );

    // Greet the client; the peer treats ACK as the go-ahead to sync.
    let ack = ctx.create("ACK", json!({}), json!({}))?;
    ctx.send(&ack).await?;

    let server = &app.cfg().server;
    let ping_every = Duration::from_millis(server.ping_interval_ms);
    let idle_timeout = Duration::from_millis(server.idle_timeout_ms);
    let max_frame_bytes = server.max_frame_bytes;

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut receiver = Receiver::new();
    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                if frame_len(&msg) > max_frame_bytes {
                    tracing::warn!(session = %session_id, len = frame_len(&msg), "frame over size limit");
                    let _ = ws_tx.send(close_frame(1009, "frame too large")).await;
                    break;
                }

                let fragment = match msg {
                    Message::Text(s) => Fragment::Text(s),
                    Message::Binary(b) => Fragment::Binary(Bytes::from(b)),
                    Message::Ping(payload) => {
                        let _ = out_tx.send(Message::Pong(payload)).await;
                        continue;
                    }
                    Message::Pong(_) => continue,
                    Message::Close(_) => break,
                };

                let assembled = match receiver.consume(fragment) {
                    Ok(assembled) => assembled,
                    Err(e) => {
                        tracing::warn!(session = %session_id, error = %e, "protocol violation");
                        let _ = ws_tx.send(close_frame(e.close_code(), &e.to_string())).await;
                        break;
                    }
                };
                let Some(message) = assembled else { continue; };

                // Structural validation gates every dispatch.
                if let Some(problem) = message.problem() {
                    tracing::warn!(session = %session_id, %problem, "invalid header");
                    let _ = ws_tx.send(close_frame(1002, &problem)).await;
                    break;
                }

                if let Err(e) = app.dispatcher().dispatch(&ctx, &message).await {
                    tracing::warn!(session = %session_id, error = %e, "handler failed");
                    let _ = ws_tx.send(close_frame(e.close_code(), &e.to_string())).await;
                    break;
                }
            }

            // ping
            _ = ping_tick.tick() => {
                let _ = out_tx.send(Message::Ping(Vec::new())).await;
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::info!(session = %session_id, "idle timeout");
                    let _ = ws_tx.send(close_frame(1000, "idle timeout")).await;
                    break;
                }
            }
        }
    }

    tracing::info!(session = %session_id, "session closed");
    Ok(())
}
