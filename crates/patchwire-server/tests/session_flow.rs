//! Dispatch flow over a mock transport: PATCH-DOC reaches the sink,
//! SERVER-INFO-REQ gets a correlated reply, unknown msgtypes are ignored.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;

use patchwire_core::protocol::{Header, IdSource, Message, Protocol};
use patchwire_core::Result;
use patchwire_server::context::SessionCtx;
use patchwire_server::dispatch::Dispatcher;
use patchwire_server::doc::{DocumentSink, InMemorySink};
use patchwire_server::handlers::{PatchDocHandler, ServerInfoHandler};
use patchwire_server::transport::{send_message, Transport};

#[derive(Default)]
struct MockTransport {
    text_frames: Mutex<Vec<String>>,
}

impl MockTransport {
    fn frames(&self) -> Vec<String> {
        self.text_frames.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, frame: String) -> Result<()> {
        self.text_frames.lock().unwrap().push(frame);
        Ok(())
    }

    async fn send_binary(&self, _frame: Bytes) -> Result<()> {
        panic!("binary send is not exercised by these tests");
    }
}

struct SeqIds(u64);

impl IdSource for SeqIds {
    fn next_id(&mut self) -> String {
        let id = format!("srv-{}", self.0);
        self.0 += 1;
        id
    }
}

fn session(transport: Arc<MockTransport>) -> SessionCtx {
    SessionCtx::new(
        "s1".into(),
        Protocol::new(Box::new(SeqIds(0))),
        transport,
    )
}

fn wired_dispatcher(sink: Arc<InMemorySink>) -> Dispatcher {
    let d = Dispatcher::new();
    d.register(Arc::new(PatchDocHandler::new(sink as Arc<dyn DocumentSink>)));
    d.register(Arc::new(ServerInfoHandler::new()));
    d
}

#[tokio::test]
async fn patch_doc_reaches_the_sink() {
    let transport = Arc::new(MockTransport::default());
    let ctx = session(transport.clone());
    let sink = InMemorySink::new();
    let dispatcher = wired_dispatcher(sink.clone());

    let msg = Message::assemble(
        r#"{"msgid":"c-1","msgtype":"PATCH-DOC"}"#,
        r#"{}"#,
        r#"{"events":[{"kind":"ModelChanged"}]}"#,
    )
    .unwrap();
    assert!(msg.complete());
    assert!(msg.problem().is_none());

    dispatcher.dispatch(&ctx, &msg).await.unwrap();

    let patches = sink.patches();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0], json!({"events":[{"kind":"ModelChanged"}]}));
    assert!(transport.frames().is_empty(), "patch has no reply");
}

#[tokio::test]
async fn server_info_req_gets_a_correlated_reply() {
    let transport = Arc::new(MockTransport::default());
    let ctx = session(transport.clone());
    let dispatcher = wired_dispatcher(InMemorySink::new());

    let msg = Message::assemble(
        r#"{"msgid":"c-7","msgtype":"SERVER-INFO-REQ"}"#,
        r#"{}"#,
        r#"{}"#,
    )
    .unwrap();

    dispatcher.dispatch(&ctx, &msg).await.unwrap();

    let frames = transport.frames();
    assert_eq!(frames.len(), 3, "reply is three text frames");

    let header: Header = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(header.msgtype.as_deref(), Some("SERVER-INFO-REP"));
    assert_eq!(header.reqid.as_deref(), Some("c-7"));
    assert!(header.msgid.is_some());

    let content: serde_json::Value = serde_json::from_str(&frames[2]).unwrap();
    assert!(content["version_info"]["patchwire"].is_string());
}

#[tokio::test]
async fn unknown_msgtype_is_ignored() {
    let transport = Arc::new(MockTransport::default());
    let ctx = session(transport.clone());
    let dispatcher = wired_dispatcher(InMemorySink::new());

    let msg = Message::assemble(
        r#"{"msgid":"c-2","msgtype":"NO-SUCH-TYPE"}"#,
        r#"{}"#,
        r#"{}"#,
    )
    .unwrap();

    dispatcher.dispatch(&ctx, &msg).await.unwrap();
    assert!(transport.frames().is_empty());
}

#[tokio::test]
async fn outbound_send_is_three_frames_and_counts_bytes() {
    let transport = Arc::new(MockTransport::default());
    let ctx = session(transport.clone());

    let msg = ctx.create("ACK", json!({}), json!({})).unwrap();
    let sent = ctx.send(&msg).await.unwrap();

    let frames = transport.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(sent, frames.iter().map(String::len).sum::<usize>());

    // wire order: header, metadata, content
    let header: Header = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(header.msgtype.as_deref(), Some("ACK"));
    assert_eq!(frames[1], "{}");
    assert_eq!(frames[2], "{}");

    // buffer-bearing messages cannot be sent
    let msg = Message::assemble(
        r#"{"msgid":"m1","msgtype":"PATCH-DOC","num_buffers":1}"#,
        r#"{}"#,
        r#"{}"#,
    )
    .unwrap();
    let transport2 = Arc::new(MockTransport::default());
    let err = send_message(transport2.as_ref(), &msg)
        .await
        .expect_err("must refuse");
    assert_eq!(err.code().as_str(), "NOT_SENDABLE");
    assert!(transport2.frames().is_empty());
}
