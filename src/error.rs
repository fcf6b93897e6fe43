//! Error types for the header compressor.

use thiserror::Error;

/// Result type alias using [`EncodeError`].
pub type Result<T> = std::result::Result<T, EncodeError>;

/// A header field was rejected by [`HeaderFields::append`](crate::HeaderFields::append).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppendError {
    #[error("Header key is empty")]
    EmptyKey,

    #[error("Invalid header key: {0:?}")]
    InvalidKey(String),

    /// Non-binary values must be printable ASCII (plus space and tab).
    #[error("Invalid value for non-binary header {key:?}")]
    InvalidValue { key: String },
}

/// Errors returned by [`HeaderCompressor`](crate::HeaderCompressor).
///
/// Both variants are caller contract violations. The compressor rejects
/// them before touching its dynamic table, so a failed call leaves the
/// connection state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Malformed header field: {0}")]
    Append(#[from] AppendError),

    /// Zero, or larger than the 24-bit frame length field can carry.
    #[error("Invalid max frame size: {0}")]
    InvalidFrameSize(u32),
}
