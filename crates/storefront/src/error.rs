//! Crate-level error type for the shopper flows.
//!
//! The taxonomy mirrors how errors are presented:
//! - validation errors block the action locally; no network call is made
//! - [`ApiError::Unauthorized`] reads as "please log in again"
//! - every other API failure is a generic retryable notification

use thiserror::Error;

use eshop_client::ApiError;

use crate::session::SessionError;

/// Errors surfaced by the storefront flows.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Remote API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing the persisted session failed.
    #[error("session store error: {0}")]
    Session(#[from] SessionError),

    /// Client-side validation rejected the input; nothing was sent.
    #[error("{0}")]
    Validation(String),
}

impl StorefrontError {
    /// Whether this failure is worth retrying unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_retryable(),
            Self::Session(_) => true,
            Self::Validation(_) => false,
        }
    }
}

/// Result type alias for [`StorefrontError`].
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_not_retryable() {
        let err = StorefrontError::Validation("missing field".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "missing field");
    }

    #[test]
    fn test_unauthorized_is_not_retryable() {
        let err = StorefrontError::Api(ApiError::Unauthorized);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_error_is_retryable() {
        let err = StorefrontError::Api(ApiError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert!(err.is_retryable());
    }
}
