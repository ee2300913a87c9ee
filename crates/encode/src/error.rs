//! Encoder Error Types
//!
//! Every variant is fatal to the one image being encoded and nothing else.

use derive_more::{Display, Error};

/// An encoder error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for encoder operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source bytes are corrupt, truncated or empty.
    #[display("could not decode image: {_0}")]
    Decode(#[error(not(source))] String),
    /// The source bytes are not a raster format we can read.
    #[display("unsupported image format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// Decoding succeeded but the output encoder failed.
    #[display("could not encode image: {_0}")]
    Encode(#[error(not(source))] String),
    /// The blocking encode task panicked or was cancelled.
    #[display("encode task did not complete")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Task)
    }
}
