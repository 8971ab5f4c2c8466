//! Feed error types

use market_proto::CodecError;
use thiserror::Error;

/// Errors raised by the directory, quote and snapshot components
#[derive(Debug, Error)]
pub enum FeedError {
    /// Wire bytes could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Tick token has no directory entry; callers may show it raw
    #[error("Unresolved token: {token}")]
    UnresolvedToken {
        /// Token carried by the tick
        token: u32,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Instrument master could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Snapshot metadata could not be read or written
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Configuration value could not be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidConfig {
        /// Environment key
        key: &'static str,
        /// Rejected value
        value: String,
    },
}

impl FeedError {
    /// Whether the error only means "no metadata yet" for a token
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedToken { .. })
    }
}

/// Result alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;
