//! Patchwire server library entry.
//!
//! This crate wires the transport, message receiver, dispatcher, and the
//! built-in document-sync handlers into a cohesive server stack. It is
//! intended to be consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod doc;
pub mod handlers;
pub mod ops;
pub mod router;
pub mod transport;
