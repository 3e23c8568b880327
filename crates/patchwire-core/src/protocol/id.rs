//! Message id generation.
//!
//! Ids must be unique with overwhelming probability within one session;
//! cryptographic unguessability is not required. The source is an injected
//! capability so callers (and tests) control id determinism.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of fresh message ids.
pub trait IdSource: Send {
    fn next_id(&mut self) -> String;
}

/// Production id source: session-scoped prefix plus a monotonic counter.
///
/// The prefix is derived from the startup clock, so two sessions started in
/// the same process do not collide even though each counter starts at zero.
#[derive(Debug)]
pub struct SessionIds {
    prefix: String,
    counter: u64,
}

impl SessionIds {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self {
            prefix: format!("{nanos:x}"),
            counter: 0,
        }
    }
}

impl Default for SessionIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SessionIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.counter);
        self.counter += 1;
        id
    }
}
