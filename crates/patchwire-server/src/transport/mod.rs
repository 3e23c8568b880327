//! Transport layer: the adapter contract plus the axum WebSocket session.

pub mod adapter;
pub mod ws;

pub use adapter::{send_message, Transport};
