//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Nothing in this crate is fatal to a batch: callers are expected to degrade
//! (empty index, pattern-less brand) rather than abort ingestion.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The catalog query service refused or failed the request.
    #[display("catalog fetch failed: {_0}")]
    Fetch(#[error(not(source))] String),
    /// Network-related error reaching an external source.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The external source answered with something that could not be used.
    #[display("invalid response: {_0}")]
    InvalidResponse(#[error(not(source))] String),
    /// A brand's SKU pattern could not be compiled as a regular expression.
    #[display("invalid SKU pattern for brand '{brand}': {pattern}")]
    InvalidPattern {
        /// Brand the pattern belongs to.
        brand: String,
        /// The offending pattern string.
        pattern: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Fetch("timeout".to_string()).to_string(), "catalog fetch failed: timeout");
        assert_eq!(
            ErrorKind::InvalidPattern {
                brand: "Acme".to_string(),
                pattern: "([".to_string()
            }
            .to_string(),
            "invalid SKU pattern for brand 'Acme': (["
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Network("reset".to_string()).is_retryable());
        assert!(!ErrorKind::InvalidResponse("garbage".to_string()).is_retryable());
        assert!(
            !ErrorKind::InvalidPattern {
                brand: String::new(),
                pattern: String::new()
            }
            .is_retryable()
        );
    }
}
