//! Error types for tqsave-common.

use thiserror::Error;

/// Common error type for tqsave operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid unique id text.
    #[error("invalid unique id: {0}")]
    InvalidUniqueId(String),

    /// UTF-16 payload could not be decoded.
    #[error("invalid UTF-16 string data")]
    InvalidUtf16,

    /// Character outside the single-byte range of the save format.
    #[error("character {0:?} cannot be stored as a single-byte string")]
    NotLatin1(char),

    /// Length does not fit the 32-bit prefix of the format.
    #[error("length {0} exceeds the 32-bit length prefix")]
    LengthOverflow(usize),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
