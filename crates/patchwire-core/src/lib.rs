//! Patchwire core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the message envelope (header/metadata/content plus
//! optional binary buffers), the fragment-driven receiver that assembles
//! envelopes from a stream of transport frames, and the error surface shared
//! by the server and SDK tooling. It intentionally carries no transport or
//! runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `PatchwireError`/`Result` so production
//! processes do not crash on malformed input or bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{PatchwireError, Result};
