//! Shared error type across patchwire crates.

use thiserror::Error;

/// Stable error codes surfaced to peers and test vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed JSON in a text frame.
    Decode,
    /// Header fails structural validation (missing msgid/msgtype).
    InvalidHeader,
    /// More buffers delivered than the header declared.
    TooManyBuffers,
    /// A buffer id was delivered twice.
    DuplicateBuffer,
    /// Outbound encoding of a buffer-bearing message.
    NotSendable,
    /// Fragment kind does not match the receiver's current state.
    UnexpectedFragment,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Decode => "DECODE",
            ErrorCode::InvalidHeader => "INVALID_HEADER",
            ErrorCode::TooManyBuffers => "TOO_MANY_BUFFERS",
            ErrorCode::DuplicateBuffer => "DUPLICATE_BUFFER",
            ErrorCode::NotSendable => "NOT_SENDABLE",
            ErrorCode::UnexpectedFragment => "UNEXPECTED_FRAGMENT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PatchwireError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum PatchwireError {
    /// One of the three text frames (or a buffer sub-header) was not valid JSON.
    #[error("{part} could not be decoded: {source}")]
    Decode {
        part: &'static str,
        source: serde_json::Error,
    },

    /// Structural header validation failed; the connection must be closed.
    #[error("invalid message header: {0}")]
    InvalidHeader(String),

    /// A buffer arrived past the declared capacity.
    #[error("too many buffers received, expecting {expected}")]
    TooManyBuffers { expected: usize },

    /// A buffer id arrived twice for the same message.
    #[error("buffer {id:?} delivered more than once")]
    DuplicateBuffer { id: String },

    /// Only receiving buffer-bearing messages is supported.
    #[error("cannot send a message declaring {declared} buffers")]
    NotSendable { declared: usize },

    /// The receiver got a fragment of the wrong kind for its state.
    #[error("unexpected fragment: {0}")]
    UnexpectedFragment(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl PatchwireError {
    /// Map internal error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PatchwireError::Decode { .. } => ErrorCode::Decode,
            PatchwireError::InvalidHeader(_) => ErrorCode::InvalidHeader,
            PatchwireError::TooManyBuffers { .. } => ErrorCode::TooManyBuffers,
            PatchwireError::DuplicateBuffer { .. } => ErrorCode::DuplicateBuffer,
            PatchwireError::NotSendable { .. } => ErrorCode::NotSendable,
            PatchwireError::UnexpectedFragment(_) => ErrorCode::UnexpectedFragment,
            PatchwireError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// WebSocket close code used when this error tears down a session.
    ///
    /// Every wire violation maps to 1002 (protocol error); only server-side
    /// faults map to 1011 (internal error).
    pub fn close_code(&self) -> u16 {
        match self {
            PatchwireError::Internal(_) => 1011,
            _ => 1002,
        }
    }
}
