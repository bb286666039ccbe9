//! Error types for the API client

use labelcheck_core::LookupError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Refused locally by the client-side rate limiter
    #[error("Rate limited - retry in {}s", .retry_after.as_secs().max(1))]
    RateLimited {
        /// Time until a request would be allowed
        retry_after: Duration,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Every transport failure is a connection error; HTTP statuses are
/// interpreted from the completed response instead
impl From<ApiError> for LookupError {
    fn from(err: ApiError) -> Self {
        LookupError::ConnectionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_lookup_error() {
        assert_eq!(
            LookupError::from(ApiError::InvalidUrl("api/v2/product/x".to_string())),
            LookupError::ConnectionError("Invalid URL: api/v2/product/x".to_string())
        );

        let limited = ApiError::RateLimited {
            retry_after: Duration::from_millis(1500),
        };
        match LookupError::from(limited) {
            LookupError::ConnectionError(msg) => assert!(msg.contains("Rate limited")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
