//! Codec error types

use thiserror::Error;

/// Errors raised while decoding wire bytes
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes do not follow the tagged-field layout of the message:
    /// truncated buffer, invalid varint, or wrong wire type for a known field
    #[error("malformed {message} input: {source}")]
    MalformedInput {
        /// Top-level message being decoded
        message: &'static str,
        /// Underlying decoder error
        #[source]
        source: prost::DecodeError,
    },
}

impl CodecError {
    pub(crate) fn malformed(message: &'static str, source: prost::DecodeError) -> Self {
        Self::MalformedInput { message, source }
    }

    /// Whether this is a `MalformedInput` error
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}
