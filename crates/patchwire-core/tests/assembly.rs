//! Message assembly and factory behavior.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;
use serde_json::json;

use patchwire_core::error::ErrorCode;
use patchwire_core::protocol::{IdSource, Message, Protocol};

/// Deterministic id source for tests.
struct FixedIds(u64);

impl IdSource for FixedIds {
    fn next_id(&mut self) -> String {
        let id = format!("test-{}", self.0);
        self.0 += 1;
        id
    }
}

fn protocol() -> Protocol {
    Protocol::new(Box::new(FixedIds(0)))
}

#[test]
fn encode_decode_round_trip() {
    let mut p = protocol();
    let msg = p.create(
        "PATCH-DOC",
        json!({"trace": "t-9"}),
        json!({"events": [{"kind": "ModelChanged", "attr": "start", "new": 4}]}),
    );

    let [h, m, c] = msg.encode().unwrap();
    let back = Message::assemble(&h, &m, &c).unwrap();

    assert_eq!(back.header(), msg.header());
    assert_eq!(back.metadata(), msg.metadata());
    assert_eq!(back.content(), msg.content());
    assert!(back.complete());
}

#[test]
fn created_message_is_complete_immediately() {
    let mut p = protocol();
    let msg = p.create("ACK", json!({}), json!({}));
    assert!(msg.complete());
    assert!(msg.problem().is_none());
}

#[test]
fn completeness_is_monotonic_over_declared_buffers() {
    let mut msg = Message::assemble(
        r#"{"msgid":"m1","msgtype":"PATCH-DOC","num_buffers":2}"#,
        "{}",
        r#"{"events":[]}"#,
    )
    .unwrap();

    assert!(!msg.complete());
    msg.assemble_buffer(r#"{"id":"b1"}"#, Bytes::from_static(b"one"))
        .unwrap();
    assert!(!msg.complete());
    msg.assemble_buffer(r#"{"id":"b2"}"#, Bytes::from_static(b"two"))
        .unwrap();
    assert!(msg.complete());
}

#[test]
fn buffer_overrun_is_rejected_and_leaves_buffers_untouched() {
    let mut msg = Message::assemble(
        r#"{"msgid":"m1","msgtype":"PATCH-DOC","num_buffers":1}"#,
        "{}",
        "{}",
    )
    .unwrap();

    msg.assemble_buffer(r#"{"id":"b1"}"#, Bytes::from_static(b"payload"))
        .unwrap();
    assert!(msg.complete());

    let err = msg
        .assemble_buffer(r#"{"id":"b2"}"#, Bytes::from_static(b"extra"))
        .expect_err("must reject past declared capacity");
    assert_eq!(err.code(), ErrorCode::TooManyBuffers);
    assert!(err.to_string().contains("expecting 1"));

    assert_eq!(msg.buffers().len(), 1);
    assert_eq!(msg.buffers().get("b1").unwrap().as_ref(), b"payload");
    assert!(msg.complete());
}

#[test]
fn duplicate_buffer_id_is_rejected() {
    let mut msg = Message::assemble(
        r#"{"msgid":"m1","msgtype":"PATCH-DOC","num_buffers":2}"#,
        "{}",
        "{}",
    )
    .unwrap();

    msg.assemble_buffer(r#"{"id":"b1"}"#, Bytes::from_static(b"first"))
        .unwrap();
    let err = msg
        .assemble_buffer(r#"{"id":"b1"}"#, Bytes::from_static(b"second"))
        .expect_err("re-delivery must be rejected");
    assert_eq!(err.code(), ErrorCode::DuplicateBuffer);

    assert_eq!(msg.buffers().len(), 1);
    assert_eq!(msg.buffers().get("b1").unwrap().as_ref(), b"first");
}

#[test]
fn problem_is_independent_of_completeness() {
    // Complete (no buffers declared) but structurally invalid.
    let msg = Message::assemble(r#"{"msgtype":"PATCH-DOC"}"#, r#"{"k":1}"#, r#"{"k":2}"#).unwrap();
    assert!(msg.complete());
    assert!(msg.problem().unwrap().contains("msgid"));

    // Incomplete (buffers outstanding) but structurally valid.
    let msg = Message::assemble(
        r#"{"msgid":"m1","msgtype":"PATCH-DOC","num_buffers":1}"#,
        "{}",
        "{}",
    )
    .unwrap();
    assert!(!msg.complete());
    assert!(msg.problem().is_none());
}

#[test]
fn missing_msgtype_is_reported_after_msgid_is_present() {
    let msg = Message::assemble(r#"{"msgid":"m1"}"#, "{}", "{}").unwrap();
    assert!(msg.problem().unwrap().contains("msgtype"));
}

#[test]
fn encode_refuses_buffer_bearing_messages() {
    let msg = Message::assemble(
        r#"{"msgid":"m1","msgtype":"PATCH-DOC","num_buffers":1}"#,
        "{}",
        "{}",
    )
    .unwrap();

    let err = msg.encode().expect_err("send with buffers is unsupported");
    assert_eq!(err.code(), ErrorCode::NotSendable);
}

#[test]
fn successive_headers_get_distinct_ids() {
    let mut p = Protocol::with_session_ids();
    let a = p.create_header("ACK", None);
    let b = p.create_header("ACK", None);
    assert_ne!(a.msgid, b.msgid);
}

#[test]
fn reply_headers_carry_the_request_id() {
    let mut p = protocol();
    let req = p.create("SERVER-INFO-REQ", json!({}), json!({}));
    let reply = p.create_reply(
        "SERVER-INFO-REP",
        req.msgid().unwrap(),
        json!({}),
        json!({"version": "0.1.0"}),
    );
    assert_eq!(reply.header().reqid.as_deref(), req.msgid());
    assert_ne!(reply.msgid(), req.msgid());
}

#[test]
fn decode_error_names_the_offending_part() {
    let err = Message::assemble(r#"{"msgid":"m1","msgtype":"ACK"}"#, "{bad", "{}")
        .expect_err("metadata is malformed");
    assert_eq!(err.code(), ErrorCode::Decode);
    assert!(err.to_string().contains("metadata"));
}
