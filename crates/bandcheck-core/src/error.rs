//! Definition source error types.
//!
//! These error types represent failures when fetching test definitions.
//! Defined in `bandcheck-core` so callers can downcast and classify errors
//! without string matching.

use thiserror::Error;

/// Errors that can occur when fetching a test definition.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Authentication failed (missing or rejected token).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested test does not exist.
    #[error("test not found: {0}")]
    TestNotFound(String),

    /// The source returned data that is not a valid test definition.
    #[error("invalid test definition from {source_name}: {message}")]
    InvalidDefinition {
        source_name: String,
        message: String,
    },

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl SourceError {
    /// Returns `true` if asking again cannot succeed without a change on
    /// the caller's side.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::AuthenticationFailed(_)
                | SourceError::TestNotFound(_)
                | SourceError::InvalidDefinition { .. }
        )
    }
}
