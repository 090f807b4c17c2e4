//! Error types for the Mealcast ranking engine.
//!
//! This module defines the centralized error type [`MealcastError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for Mealcast operations.
///
/// Variants fall into two groups: client errors caused by what the caller passed
/// in (`InvalidCursor`, `InvalidParameters`) and server-side failures (storage,
/// I/O, configuration). Use [`MealcastError::is_client_error`] to tell them apart
/// when mapping to a transport status code.
///
/// # Examples
///
/// ```
/// use mealcast::MealcastError;
///
/// let err = MealcastError::InvalidParameters("limit must be positive".to_string());
/// assert!(err.is_client_error());
/// ```
#[derive(Debug, Error)]
pub enum MealcastError {
    /// A continuation token could not be decoded.
    ///
    /// Raised for malformed base64, unknown cursor versions, non-finite scores
    /// and anything else that does not round-trip. Never swallowed into an
    /// empty page.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// A public entry point was called with out-of-range arguments.
    ///
    /// Covers zero or oversized page limits and lookback windows outside the
    /// supported range.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The observation store failed to answer a query.
    ///
    /// The store's own error is kept intact as the source. The engine does not
    /// retry.
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetchFailed(#[source] Box<MealcastError>),

    /// Storage operation failed.
    ///
    /// Occurs when reading or decoding the backing store fails. The string
    /// contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MealcastError {
    /// Returns `true` when the error was caused by caller input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCursor(_) | Self::InvalidParameters(_))
    }
}

/// A specialized `Result` type for Mealcast operations.
pub type Result<T> = std::result::Result<T, MealcastError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn client_errors_are_classified() {
        assert!(MealcastError::InvalidCursor("x".into()).is_client_error());
        assert!(MealcastError::InvalidParameters("x".into()).is_client_error());
        assert!(!MealcastError::Storage("x".into()).is_client_error());
        assert!(!MealcastError::Config("x".into()).is_client_error());
    }

    #[test]
    fn upstream_failure_keeps_source() {
        let err = MealcastError::UpstreamFetchFailed(Box::new(MealcastError::Storage(
            "disk gone".into(),
        )));
        assert!(!err.is_client_error());
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Storage error: disk gone"));
    }
}
