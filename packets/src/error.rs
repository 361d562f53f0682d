use thiserror::Error;

/// Reasons a packet payload could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The 23 reserved bytes after the charset are not all zero, so the
    /// buffer is not a handshake response at all.
    #[error("not a handshake response packet: reserved byte {offset} is non-zero")]
    NotHandshakeResponse { offset: usize },

    #[error("buffer exhausted: requested {requested} bytes, {remaining} remaining")]
    BufferExhausted { requested: usize, remaining: usize },

    /// Leading byte of a length-encoded integer is 0xfb or 0xff.
    #[error("malformed length-encoded integer: leading byte {0:#04x}")]
    MalformedVarint(u8),

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("connect attributes block length {declared} does not match its encoded entries")]
    AttributeBlockMismatch { declared: u64 },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
