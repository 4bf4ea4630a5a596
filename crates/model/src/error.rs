//! Error types for BSON decoding and projection.

use thiserror::Error;

/// Errors that can occur while framing or projecting BSON bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Fewer than four bytes remain where a length prefix is expected.
    #[error("Truncated length prefix at offset {offset}: only {remaining} bytes remain")]
    TruncatedLength { offset: usize, remaining: usize },

    /// A declared document length runs past the end of the buffer or is
    /// smaller than the length prefix itself.
    #[error(
        "Truncated document at offset {offset}: declared {declared} bytes, {available} available"
    )]
    TruncatedDocument {
        offset: usize,
        declared: i32,
        available: usize,
    },

    /// Single-document input whose declared length disagrees with the
    /// buffer length.
    #[error("Misaligned stream at offset {offset} (buffer length {len})")]
    MisalignedStream { offset: usize, len: usize },

    /// An element carries a type tag with no decoding or rendering rule.
    #[error("Unsupported BSON type 0x{tag:02x} for field '{field}'")]
    UnsupportedType { field: String, tag: u8 },

    /// A container's declared structure could not be decoded.
    #[error("Malformed container at offset {offset}: {reason}")]
    MalformedContainer { offset: usize, reason: String },

    /// The codec rejected a scalar value's bytes.
    #[error("Failed to decode scalar field '{field}': {source}")]
    Scalar {
        field: String,
        #[source]
        source: bson::raw::Error,
    },
}

impl DecodeError {
    /// Build a [`DecodeError::MalformedContainer`].
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::MalformedContainer {
            offset,
            reason: reason.into(),
        }
    }

    /// Whether this error came from stream framing rather than from
    /// decoding a single container.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            DecodeError::TruncatedLength { .. }
                | DecodeError::TruncatedDocument { .. }
                | DecodeError::MisalignedStream { .. }
        )
    }
}
