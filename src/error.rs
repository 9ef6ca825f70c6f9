use serde::{de, ser};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during Borsh encoding or decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A custom error message from serde
    #[error("{0}")]
    Message(String),

    /// Attempted to read past the end of the buffer
    #[error("buffer underflow: needed {needed} bytes, {remaining} remaining")]
    BufferUnderflow { needed: usize, remaining: usize },

    /// Attempted to write past the end of a fixed-capacity buffer
    #[error("buffer overflow: needed {needed} bytes, {remaining} remaining")]
    BufferOverflow { needed: usize, remaining: usize },

    /// Integer does not fit in 128 unsigned bits
    #[error("integer overflow")]
    IntegerOverflow,

    /// Negative integer where an unsigned value is required
    #[error("integer underflow")]
    IntegerUnderflow,

    /// The input bytes are not a well-formed encoding
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// No codec exists for the requested type, or value and type disagree
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A caller-supplied argument was rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `reset` was called on a buffer without a mark
    #[error("buffer reset without a mark")]
    MarkNotSet,

    /// Input had bytes left over after a complete value was decoded
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    /// An I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    pub(crate) fn invalid_encoding(msg: impl fmt::Display) -> Self {
        Error::InvalidEncoding(msg.to_string())
    }

    pub(crate) fn unsupported(msg: impl fmt::Display) -> Self {
        Error::UnsupportedType(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
