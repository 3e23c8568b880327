//! Top-level facade crate for patchwire.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use patchwire_core::*;
}

pub mod server {
    pub use patchwire_server::*;
}
