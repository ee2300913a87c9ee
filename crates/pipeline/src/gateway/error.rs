//! Upload Gateway Error Types

use derive_more::{Display, Error};

/// An upload error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for upload operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why the gateway did not store an image.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The gateway refused this particular image (size, type, permissions).
    #[display("upload rejected: {_0}")]
    Rejected(#[error(not(source))] String),
    /// The gateway asked us to slow down.
    #[display("upload rate limited")]
    RateLimited,
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The gateway or its storage is down.
    #[display("upload gateway unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}
