//! Pipeline Error Types
//!
//! Errors here never escape a batch. Each one is caught at the per-file
//! boundary and turned into a failed
//! [`ProcessingResult`](crate::ProcessingResult).

use crate::gateway::error::{Error as GatewayError, ErrorKind as GatewayErrorKind};
use derive_more::{Display, Error};
use snapsku_encode::error::{Error as EncodeError, ErrorKind as EncodeErrorKind};

/// A per-file pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for per-file pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The stage at which a file failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source image could not be decoded or re-encoded.
    #[display("encode failed: {_0}")]
    Encode(EncodeErrorKind),
    /// The upload gateway did not store the image.
    #[display("upload failed: {_0}")]
    Upload(GatewayErrorKind),
    /// The batch was cancelled before this file was reached.
    #[display("batch cancelled")]
    Cancelled,
}

impl ErrorKind {
    /// Wrap an encoder error, keeping its frame as a child in the error tree.
    #[track_caller]
    pub fn encode(err: EncodeError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Encode(inner))
    }

    /// Wrap a gateway error, keeping its frame as a child in the error tree.
    #[track_caller]
    pub fn upload(err: GatewayError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Upload(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Encode(inner) => inner.is_retryable(),
            Self::Upload(inner) => inner.is_retryable(),
            Self::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Encode(EncodeErrorKind::Decode("truncated".to_string())), "encode failed: could not decode image: truncated")]
    #[case(ErrorKind::Upload(GatewayErrorKind::RateLimited), "upload failed: upload rate limited")]
    #[case(ErrorKind::Cancelled, "batch cancelled")]
    fn test_error_kind_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn test_wrapping_keeps_inner_kind() {
        let err = ErrorKind::upload(exn::Exn::from(GatewayErrorKind::Network("reset".to_string())));
        assert_eq!(*err, ErrorKind::Upload(GatewayErrorKind::Network("reset".to_string())));
        assert!(err.is_retryable());
        assert!(!ErrorKind::Cancelled.is_retryable());
    }
}
